use glam::Vec2;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, imageops::FilterType};
use imageproc::{
    contours::{BorderType, find_contours},
    distance_transform::Norm,
    morphology::dilate,
};
use ndarray::prelude::*;
use ort::session::{Session, builder::SessionBuilder};
use ort::value::TensorRef;
use snafu::{OptionExt, ResultExt};
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    error::*,
    inference::model::{Model, OnnxSession, commit},
};

use super::model::{PaddleDet, PaddleDetConfig};

pub struct PaddleDetSession<M: Model> {
    session: Session,
    model: M,
}

/// Text line detection result with bounding box and confidence score
#[derive(Debug, Clone)]
pub struct TextDetection {
    /// Box in pixels of the image given to the detector.
    pub bbox: Bbox,
    pub proba: f32,
}

/// Mapping between the source image and the padded model input.
#[derive(Debug, Clone, Copy)]
pub struct DetExtra {
    /// Factor from source image pixels to model input pixels.
    pub scale: f32,
    /// Size of the source image.
    pub original_size: Vec2,
    /// Size of the resized image inside the padded input.
    pub resized_size: Vec2,
}

impl DetExtra {
    pub fn new(config: &PaddleDetConfig, width: u32, height: u32) -> Self {
        let scale = f32::min(
            config.required_width as f32 / width as f32,
            config.required_height as f32 / height as f32,
        );
        let original_size = Vec2::new(width as f32, height as f32);
        let resized_size = (original_size * scale).floor().max(Vec2::ONE);

        Self {
            scale,
            original_size,
            resized_size,
        }
    }
}

impl PaddleDetSession<PaddleDet> {
    pub fn new(session: SessionBuilder, model: PaddleDet) -> Result<Self, PlancalError> {
        let session = commit(session, &model)?;

        Ok(Self { session, model })
    }

    /// Detect text lines in an entire image, sorted top to bottom
    pub fn detect_text_lines(
        &mut self,
        image: &DynamicImage,
    ) -> Result<Vec<TextDetection>, PlancalError> {
        let (width, height) = image.dimensions();
        let extra = DetExtra::new(self.model.config(), width, height);

        self.run(image, extra)
    }
}

impl OnnxSession<PaddleDet> for PaddleDetSession<PaddleDet> {
    type Output = Vec<TextDetection>;
    type Extra = DetExtra;

    fn preprocess(
        &self,
        image: &DynamicImage,
    ) -> Result<<PaddleDet as Model>::Input, PlancalError> {
        Ok(normalize_image(image, self.model.config()))
    }

    fn postprocess(
        &self,
        output: <PaddleDet as Model>::Output,
        extra: Self::Extra,
    ) -> Result<Self::Output, PlancalError> {
        let detections = db_postprocess(&output, self.model.config(), &extra);
        debug!("detected {} text lines", detections.len());
        Ok(detections)
    }

    fn infer(
        &mut self,
        input: <PaddleDet as Model>::Input,
        input_name: &str,
        output_name: &str,
    ) -> Result<<PaddleDet as Model>::Output, PlancalError> {
        let output = self
            .session
            .run(ort::inputs![
                input_name => TensorRef::from_array_view(&input).context(TensorSnafu{stage: "detect-input"})?
            ])
            .context(InferenceSnafu {})?;

        let tensor = output
            .get(output_name)
            .context(NotFoundOutputSnafu { output_name })?
            .try_extract_array::<f32>()
            .context(TensorSnafu {
                stage: "detect-extract",
            })?;

        // [batch, 1, height, width] with a single page and a single channel
        let shape = tensor.shape();
        let (height, width) = (shape[shape.len() - 2], shape[shape.len() - 1]);
        let prob_map = tensor
            .to_shape((height, width))
            .context(ShapeSnafu { stage: "detect" })?
            .to_owned();

        Ok(prob_map)
    }
}

/// Resize the image into the top-left corner of the zero padded model input
/// and normalize it with the configured mean and std.
pub fn normalize_image(image: &DynamicImage, config: &PaddleDetConfig) -> Array4<f32> {
    let img_src = image.to_rgb8();
    let extra = DetExtra::new(config, img_src.width(), img_src.height());

    let resized = image::imageops::resize(
        &img_src,
        extra.resized_size.x as u32,
        extra.resized_size.y as u32,
        FilterType::Triangle,
    );

    let mut input_tensor = Array4::zeros([1, 3, config.required_height, config.required_width]);

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        if x >= config.required_width || y >= config.required_height {
            continue;
        }
        for (channel, value) in pixel.0.iter().enumerate() {
            input_tensor[[0, channel, y, x]] =
                (*value as f32 / 255.0 - config.mean[channel]) / config.std[channel];
        }
    }

    input_tensor
}

/// DB post-processing: binarize the probability map, dilate it, take the
/// outer contours and turn each into an axis aligned, unclipped box in source
/// image coordinates.
pub fn db_postprocess(
    prob_map: &Array2<f32>,
    config: &PaddleDetConfig,
    extra: &DetExtra,
) -> Vec<TextDetection> {
    let (height, width) = prob_map.dim();

    let bitmap = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        if prob_map[[y as usize, x as usize]] > config.det_db_thresh {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    let dilated = dilate(&bitmap, Norm::LInf, 1);

    let resized_bounds = Bbox::new(Vec2::ZERO, extra.resized_size);

    let mut detections = find_contours::<i32>(&dilated)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.points.len() > 2)
        .take(config.max_candidates)
        .filter_map(|contour| {
            let (mut min, mut max) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
            for point in &contour.points {
                let point = Vec2::new(point.x as f32, point.y as f32);
                min = min.min(point);
                max = max.max(point);
            }
            let rect = Bbox::new(min, max + Vec2::ONE);
            if rect.width().min(rect.height()) < config.min_side_thresh {
                return None;
            }

            let score = prob_map
                .slice(s![
                    rect.min.y as usize..(rect.max.y as usize).min(height),
                    rect.min.x as usize..(rect.max.x as usize).min(width)
                ])
                .mean()
                .unwrap_or(0.0);
            if score < config.det_db_box_thresh {
                return None;
            }

            let distance = rect.area() * config.det_db_unclip_ratio / rect.perimeter();
            let unclipped = rect
                .expand(distance)
                .clamp(resized_bounds.min, resized_bounds.max);
            if unclipped.width().min(unclipped.height()) < config.min_side_thresh + 2.0 {
                return None;
            }

            let bbox = unclipped
                .scale(1.0 / extra.scale)
                .clamp(Vec2::ZERO, extra.original_size);

            Some(TextDetection { bbox, proba: score })
        })
        .collect::<Vec<_>>();

    detections.sort_by(|a, b| {
        a.bbox
            .min
            .y
            .total_cmp(&b.bbox.min.y)
            .then(a.bbox.min.x.total_cmp(&b.bbox.min.x))
    });

    detections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prob_map_with(rects: &[(usize, usize, usize, usize)]) -> Array2<f32> {
        let mut map = Array2::<f32>::zeros((64, 64));
        for &(x0, y0, x1, y1) in rects {
            map.slice_mut(s![y0..y1, x0..x1]).fill(0.9);
        }
        map
    }

    fn identity_extra() -> DetExtra {
        DetExtra {
            scale: 1.0,
            original_size: Vec2::new(64.0, 64.0),
            resized_size: Vec2::new(64.0, 64.0),
        }
    }

    #[test]
    fn test_det_extra_keeps_aspect_ratio() {
        let config = PaddleDetConfig::default();
        let extra = DetExtra::new(&config, 1920, 960);
        assert_eq!(extra.scale, 0.5);
        assert_eq!(extra.resized_size, Vec2::new(960.0, 480.0));
    }

    #[test]
    fn test_db_postprocess_finds_lines_in_reading_order() {
        let config = PaddleDetConfig::default();
        let map = prob_map_with(&[(30, 40, 60, 48), (4, 10, 40, 18)]);

        let detections = db_postprocess(&map, &config, &identity_extra());
        assert_eq!(detections.len(), 2);

        let first = &detections[0];
        assert!(first.bbox.min.y < 10.0 && first.bbox.max.y > 18.0);
        assert!(first.bbox.min.x < 4.0 && first.bbox.max.x > 40.0);
        assert!(first.proba > 0.6);

        assert!(detections[1].bbox.min.y > first.bbox.min.y);
    }

    #[test]
    fn test_db_postprocess_drops_noise() {
        let config = PaddleDetConfig::default();
        let map = prob_map_with(&[(10, 10, 12, 12)]);

        assert!(db_postprocess(&map, &config, &identity_extra()).is_empty());
    }

    #[test]
    fn test_db_postprocess_maps_back_to_source_size() {
        let config = PaddleDetConfig::default();
        let map = prob_map_with(&[(8, 8, 40, 16)]);
        let extra = DetExtra {
            scale: 0.5,
            original_size: Vec2::new(128.0, 128.0),
            resized_size: Vec2::new(64.0, 64.0),
        };

        let detections = db_postprocess(&map, &config, &extra);
        assert_eq!(detections.len(), 1);
        let bbox = detections[0].bbox;
        assert!(bbox.min.x < 16.0 && bbox.max.x > 80.0);
        assert!(bbox.max.x <= 128.0 && bbox.max.y <= 128.0);
    }

    #[test]
    fn test_normalize_image_pads_with_zero() {
        let config = PaddleDetConfig {
            required_width: 64,
            required_height: 64,
            ..PaddleDetConfig::default()
        };
        let image = DynamicImage::new_rgb8(64, 32);

        let tensor = normalize_image(&image, &config);
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);
        // black pixel normalized with ImageNet statistics
        let expected = -config.mean[0] / config.std[0];
        assert!((tensor[[0, 0, 0, 0]] - expected).abs() < 1e-5);
        assert_eq!(tensor[[0, 0, 40, 0]], 0.0);
    }
}
