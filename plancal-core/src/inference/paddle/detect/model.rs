use std::path::{Path, PathBuf};

use ndarray::{Array2, Array4};

use crate::inference::model::Model;

pub struct PaddleDet {
    path: PathBuf,
    config: PaddleDetConfig,
}

pub type PaddleDetInput = Array4<f32>;
/// Probability map `[height, width]` of the padded model input.
pub type PaddleDetOutput = Array2<f32>;

/// Configuration for PaddleOCR text detection model
///
/// Controls the model input size and the DB (Differentiable Binarization)
/// post-processing which turns the probability map into text line boxes.
#[derive(Debug, Clone)]
pub struct PaddleDetConfig {
    /// Required input width for the model, a multiple of 32.
    ///
    /// Pages are resized to fit within this width while keeping their
    /// aspect ratio; the rest of the tensor is padding.
    pub required_width: usize,

    /// Required input height for the model, a multiple of 32.
    pub required_height: usize,

    /// Per channel mean used to normalize the input (ImageNet statistics).
    pub mean: [f32; 3],

    /// Per channel standard deviation used to normalize the input.
    pub std: [f32; 3],

    /// Pixel probability above which a pixel counts as text.
    ///
    /// Typical range: 0.2 - 0.4
    /// Default: 0.3
    pub det_db_thresh: f32,

    /// Minimum mean probability of a candidate box.
    ///
    /// Candidates scoring below are discarded. Higher values give fewer but
    /// more confident text lines.
    ///
    /// Typical range: 0.5 - 0.7
    /// Default: 0.6
    pub det_db_box_thresh: f32,

    /// Unclip ratio for text region expansion
    ///
    /// The binarized text kernel is smaller than the glyphs; each box is grown
    /// by `area * ratio / perimeter` to cover the full text.
    ///
    /// Default: 1.5
    pub det_db_unclip_ratio: f32,

    /// Maximum number of candidate regions processed per page.
    pub max_candidates: usize,

    /// Candidates whose shorter side is below this many pixels are dropped.
    pub min_side_thresh: f32,
}

impl Default for PaddleDetConfig {
    fn default() -> Self {
        Self {
            required_width: 960,
            required_height: 960,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            det_db_thresh: 0.3,
            det_db_box_thresh: 0.6,
            det_db_unclip_ratio: 1.5,
            max_candidates: 1000,
            min_side_thresh: 3.0,
        }
    }
}

impl PaddleDet {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, PaddleDetConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: PaddleDetConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }
}

impl Model for PaddleDet {
    type Input = PaddleDetInput;
    type Output = PaddleDetOutput;
    type Config = PaddleDetConfig;

    const INPUT_NAME: &'static str = "x";
    const OUTPUT_NAME: &'static str = "fetch_name_0";
    const MODEL_NAME: &'static str = "ch_PP-OCRv5_mobile_det";

    fn path(&self) -> &Path {
        &self.path
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
