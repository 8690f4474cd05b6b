use std::{path::Path, time::Instant};

use glam::Vec2;
use pdfium_render::prelude::Pdfium;
use plsfix::fix_text;
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    consts::*,
    error::*,
    inference::{
        model::session_builder,
        paddle::{
            detect::{PaddleDet, PaddleDetConfig, PaddleDetSession},
            recognize::{PaddleRec, PaddleRecConfig, PaddleRecSession},
        },
    },
};

use super::{
    OcrBlock, OcrDocument, OcrEngine, OcrLine, OcrPage, OcrWord,
    render::{PageImage, bind_pdfium, render_pages},
};

#[derive(Debug, Clone)]
pub struct PaddleOcrConfig {
    /// Scale applied to pdf points when rendering pages.
    pub render_scale: f32,
    /// Repair mojibake and odd unicode in recognized text.
    pub auto_clean_text: bool,
    pub detect: PaddleDetConfig,
    pub recognize: PaddleRecConfig,
}

impl Default for PaddleOcrConfig {
    fn default() -> Self {
        Self {
            render_scale: RENDER_SCALE,
            auto_clean_text: true,
            detect: PaddleDetConfig::default(),
            recognize: PaddleRecConfig::default(),
        }
    }
}

/// OCR engine rendering pages with pdfium and reading them with the
/// PaddleOCR detection and recognition models.
pub struct PaddleOcr {
    pdfium: Pdfium,
    detect: PaddleDetSession<PaddleDet>,
    recognizer: PaddleRecSession<PaddleRec>,
    config: PaddleOcrConfig,
}

impl PaddleOcr {
    pub fn new(
        det_model: impl AsRef<Path>,
        rec_model: impl AsRef<Path>,
        config: PaddleOcrConfig,
    ) -> Result<Self, PlancalError> {
        info!(
            "loading ocr models {} and {}",
            det_model.as_ref().display(),
            rec_model.as_ref().display()
        );

        let pdfium = bind_pdfium()?;
        let detect = PaddleDetSession::new(
            session_builder()?,
            PaddleDet::with_config(det_model, config.detect.clone()),
        )?;
        let recognizer = PaddleRecSession::new(
            session_builder()?,
            PaddleRec::with_config(rec_model, config.recognize.clone()),
        )?;

        Ok(Self {
            pdfium,
            detect,
            recognizer,
            config,
        })
    }

    /// Build the engine from the model paths in `PLANCAL_DET_MODEL` and
    /// `PLANCAL_REC_MODEL`.
    pub fn from_env(config: PaddleOcrConfig) -> Result<Self, PlancalError> {
        let det_model = std::env::var(DET_MODEL_PATH_ENV_NAME).context(EnvNotFoundSnafu {
            name: DET_MODEL_PATH_ENV_NAME,
        })?;
        let rec_model = std::env::var(REC_MODEL_PATH_ENV_NAME).context(EnvNotFoundSnafu {
            name: REC_MODEL_PATH_ENV_NAME,
        })?;

        Self::new(det_model, rec_model, config)
    }

    fn recognize_page(&mut self, page: &PageImage) -> Result<OcrPage, PlancalError> {
        let page_start = Instant::now();
        let detections = self.detect.detect_text_lines(&page.image)?;
        let image_size = page.image_size();

        let mut lines = Vec::with_capacity(detections.len());
        for detection in detections {
            let mut text = self
                .recognizer
                .recognize_text_region(&page.image, &detection.bbox)?;

            if self.config.auto_clean_text {
                text = fix_text(&text, None);
            }

            if let Some(line) = line_from_text(&text, &detection.bbox, image_size) {
                lines.push(line);
            }
        }

        info!(
            "page {}: {} text lines in {}ms",
            page.page_no,
            lines.len(),
            page_start.elapsed().as_millis()
        );

        // Paddle has no block level, a page is one block.
        Ok(OcrPage {
            blocks: vec![OcrBlock { lines }],
        })
    }
}

impl OcrEngine for PaddleOcr {
    fn recognize(&mut self, document: &[u8]) -> Result<OcrDocument, PlancalError> {
        let pages = render_pages(&self.pdfium, document, self.config.render_scale)?;

        let pages = pages
            .iter()
            .map(|page| self.recognize_page(page))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OcrDocument { pages })
    }
}

/// Turn a recognized text line into words.
///
/// The recognizer reads a whole line at once, so word boxes are estimated by
/// splitting the line box in proportion to each word's length.
pub fn line_from_text(text: &str, bbox: &Bbox, image_size: Vec2) -> Option<OcrLine> {
    let values = text.split_whitespace().collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }

    let weights = values
        .iter()
        .map(|value| value.chars().count())
        .collect::<Vec<_>>();

    let words = values
        .into_iter()
        .zip(bbox.split_horizontal(&weights))
        .map(|(value, geometry)| OcrWord {
            value: value.to_string(),
            geometry: geometry.normalize(image_size),
        })
        .collect();

    Some(OcrLine { words })
}
