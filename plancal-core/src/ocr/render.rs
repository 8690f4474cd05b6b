use std::time::Instant;

use glam::Vec2;
use image::DynamicImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use snafu::ResultExt;
use tracing::*;

use crate::{consts::*, error::*};

/// A rendered pdf page.
pub struct PageImage {
    /// 1-based page number
    pub page_no: usize,
    pub image: DynamicImage,
    /// page size in pdf points
    pub pdf_size: Vec2,
    /// scale factor from pdf points to image pixels
    pub scale: f32,
}

impl PageImage {
    pub fn image_size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }
}

/// Bind the pdfium dynamic library found in `PDFIUM_DYNAMIC_LIB_PATH`.
pub fn bind_pdfium() -> Result<Pdfium, PlancalError> {
    let pdfium_lib_path = std::env::var(PDFIUM_LIB_PATH_ENV_NAME).context(EnvNotFoundSnafu {
        name: PDFIUM_LIB_PATH_ENV_NAME,
    })?;

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
        &pdfium_lib_path,
    ))
    .context(PdfiumSnafu {
        stage: "load-dyn-lib",
    })?;

    Ok(Pdfium::new(bindings))
}

/// Render every page of the document at `scale` times its size in points.
pub fn render_pages(
    pdfium: &Pdfium,
    document: &[u8],
    scale: f32,
) -> Result<Vec<PageImage>, PlancalError> {
    let pdf = pdfium
        .load_pdf_from_byte_slice(document, None)
        .context(PdfiumSnafu { stage: "load-pdf" })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let render_start = Instant::now();
    let pages = pdf
        .pages()
        .iter()
        .enumerate()
        .map(|(idx, page)| -> Result<PageImage, PlancalError> {
            let pdf_size = Vec2::new(page.width().value, page.height().value);

            let image = page
                .render_with_config(&render_config)
                .context(PdfiumSnafu { stage: "render" })?
                .as_image();

            debug!(
                "rendered page {} to {}x{}",
                idx + 1,
                image.width(),
                image.height()
            );

            Ok(PageImage {
                page_no: idx + 1,
                image,
                pdf_size,
                scale,
            })
        })
        .collect::<Result<Vec<_>, PlancalError>>()?;

    info!(
        "rendered {} pages in {}ms",
        pages.len(),
        render_start.elapsed().as_millis()
    );

    Ok(pages)
}
