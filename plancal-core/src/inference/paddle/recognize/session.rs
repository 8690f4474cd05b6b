use glam::Vec2;
use image::{DynamicImage, imageops::FilterType};
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

use super::model::{PaddleRec, PaddleRecConfig};

pub struct PaddleRecSession<M: Model> {
    session: Session,
    model: M,
    character_dict: Vec<String>,
}

impl PaddleRecSession<PaddleRec> {
    pub fn new(session: SessionBuilder, model: PaddleRec) -> Result<Self, PlancalError> {
        let session = commit(session, &model)?;

        let chars = match &model.config().character_dict_path {
            Some(path) => std::fs::read_to_string(path).context(IoReadSnafu {
                path: path.to_string_lossy(),
            })?,
            None => session
                .metadata()
                .ok()
                .and_then(|m| m.custom("character").ok().flatten())
                .unwrap_or_default(),
        };

        let character_dict = build_character_dict(&chars);
        if character_dict.len() <= 2 {
            warn!(
                "{} has an empty character dictionary",
                <PaddleRec as Model>::MODEL_NAME
            );
        }

        Ok(Self {
            session,
            model,
            character_dict,
        })
    }

    pub fn character_dict(&self) -> &[String] {
        &self.character_dict
    }

    /// Extract text from a specific region of an image
    pub fn recognize_text_region(
        &mut self,
        image: &DynamicImage,
        bbox: &Bbox,
    ) -> Result<String, PlancalError> {
        let cropped_image = crop_image_region(image, bbox);

        self.run(&cropped_image, ())
    }
}

impl OnnxSession<PaddleRec> for PaddleRecSession<PaddleRec> {
    type Output = String;
    type Extra = ();

    fn preprocess(
        &self,
        image: &DynamicImage,
    ) -> Result<<PaddleRec as Model>::Input, PlancalError> {
        Ok(normalize_line(image, self.model.config()))
    }

    fn postprocess(
        &self,
        output: <PaddleRec as Model>::Output,
        _extra: Self::Extra,
    ) -> Result<Self::Output, PlancalError> {
        Ok(ctc_greedy_decode(
            output.slice(s![0, .., ..]),
            &self.character_dict,
        ))
    }

    fn infer(
        &mut self,
        input: <PaddleRec as Model>::Input,
        input_name: &str,
        output_name: &str,
    ) -> Result<<PaddleRec as Model>::Output, PlancalError> {
        let output = self
            .session
            .run(ort::inputs![
                input_name => TensorRef::from_array_view(&input).context(TensorSnafu{stage: "recognize-input"})?
            ])
            .context(InferenceSnafu {})?;

        let tensor = output
            .get(output_name)
            .context(NotFoundOutputSnafu { output_name })?
            .try_extract_array::<f32>()
            .context(TensorSnafu {
                stage: "recognize-extract",
            })?;

        let shape = tensor.shape();
        let (batch, sequence, vocabulary) = (shape[0], shape[1], shape[2]);
        let output_array = tensor
            .to_shape((batch, sequence, vocabulary))
            .context(ShapeSnafu { stage: "recognize" })?
            .to_owned();

        Ok(output_array)
    }
}

/// Index 0 is the CTC blank and the last entry is the space character.
pub fn build_character_dict(chars: &str) -> Vec<String> {
    let mut character_dict = Vec::with_capacity(chars.len() + 2);
    character_dict.push("#".to_string());
    character_dict.extend(chars.lines().map(|char| char.to_string()));
    character_dict.push(" ".to_string());
    character_dict
}

/// Collapse repeated argmax indices and drop blanks.
pub fn ctc_greedy_decode(probabilities: ArrayView2<'_, f32>, character_dict: &[String]) -> String {
    let mut text = String::new();
    let mut prev_char_idx = None;

    for timestep in probabilities.axis_iter(Axis(0)) {
        let max_idx = timestep
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        if max_idx != 0 && Some(max_idx) != prev_char_idx {
            if let Some(char) = character_dict.get(max_idx) {
                text.push_str(char);
            }
        }

        prev_char_idx = Some(max_idx);
    }

    text
}

/// Resize a text line crop to the model height, normalized to `[-1, 1]`.
pub fn normalize_line(image: &DynamicImage, config: &PaddleRecConfig) -> Array4<f32> {
    let mut img_src = image.to_rgb8();

    let aspect_ratio = img_src.height() as f32 / img_src.width().max(1) as f32;
    if config.aspect_ratio_threshold > 0.0 && aspect_ratio > config.aspect_ratio_threshold {
        img_src = image::imageops::rotate270(&img_src);
    }

    let scale = config.required_height as f32 / img_src.height().max(1) as f32;
    let dst_width = ((img_src.width() as f32 * scale) as u32).max(1);

    let resized = image::imageops::resize(
        &img_src,
        dst_width,
        config.required_height as u32,
        FilterType::Triangle,
    );

    let mut input_tensor = Array4::zeros([
        1,
        3,
        resized.height() as usize,
        resized.width() as usize,
    ]);

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (channel, value) in pixel.0.iter().enumerate() {
            input_tensor[[0, channel, y, x]] = (*value as f32 / 255.0 - 0.5) / 0.5;
        }
    }

    input_tensor
}

/// Crop image to a bounding box, clamped to the image.
pub fn crop_image_region(image: &DynamicImage, bbox: &Bbox) -> DynamicImage {
    let clamped = bbox.clamp(
        Vec2::ZERO,
        Vec2::new(image.width() as f32, image.height() as f32),
    );

    let x = clamped.min.x as u32;
    let y = clamped.min.y as u32;
    let width = (clamped.width() as u32).min(image.width().saturating_sub(x));
    let height = (clamped.height() as u32).min(image.height().saturating_sub(y));

    if width == 0 || height == 0 {
        return DynamicImage::new_rgb8(1, 1);
    }

    image.crop_imm(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot(indices: &[usize], vocabulary: usize) -> Array2<f32> {
        let mut probabilities = Array2::zeros((indices.len(), vocabulary));
        for (step, &idx) in indices.iter().enumerate() {
            probabilities[[step, idx]] = 1.0;
        }
        probabilities
    }

    #[test]
    fn test_character_dict_layout() {
        let dict = build_character_dict("a\nb\n:");
        assert_eq!(dict, vec!["#", "a", "b", ":", " "]);
    }

    #[test]
    fn test_ctc_decode_collapses_repeats_and_blanks() {
        let dict = build_character_dict("1\n2\n:\n0");
        // "1 1 _ 2 : 0 _ 0 0" decodes to "12:00"
        let probabilities = one_hot(&[1, 1, 0, 2, 3, 4, 0, 4, 4], dict.len());

        assert_eq!(ctc_greedy_decode(probabilities.view(), &dict), "12:00");
    }

    #[test]
    fn test_ctc_decode_ignores_out_of_range_index() {
        let dict = build_character_dict("a");
        let probabilities = one_hot(&[1, 5], 6);

        assert_eq!(ctc_greedy_decode(probabilities.view(), &dict), "a");
    }

    #[test]
    fn test_normalize_line_keeps_height() {
        let config = PaddleRecConfig::default();
        let wide = normalize_line(&DynamicImage::new_rgb8(200, 50), &config);
        let tall = normalize_line(&DynamicImage::new_rgb8(50, 100), &config);

        assert_eq!(wide.shape()[2], 48);
        assert_eq!(wide.shape()[3], 192);
        // rotated to 100x50 then resized to 96x48
        assert_eq!(tall.shape()[2], 48);
        assert_eq!(tall.shape()[3], 96);
        assert_eq!(wide[[0, 0, 0, 0]], -1.0);
    }

    #[test]
    fn test_crop_image_region_clamps() {
        let image = DynamicImage::new_rgb8(100, 48);
        let bbox = Bbox::new(Vec2::new(90.0, -5.0), Vec2::new(130.0, 40.0));

        let cropped = crop_image_region(&image, &bbox);
        assert_eq!((cropped.width(), cropped.height()), (10, 40));

        let outside = Bbox::new(Vec2::new(120.0, 0.0), Vec2::new(130.0, 10.0));
        let cropped = crop_image_region(&image, &outside);
        assert_eq!((cropped.width(), cropped.height()), (1, 1));
    }
}
