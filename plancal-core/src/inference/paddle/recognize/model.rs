use std::path::{Path, PathBuf};

use ndarray::{Array3, Array4};

use crate::inference::model::Model;

pub struct PaddleRec {
    path: PathBuf,
    config: PaddleRecConfig,
}

pub type PaddleInput = Array4<f32>;
/// `[batch, sequence, vocabulary]` character probabilities.
pub type PaddleOutput = Array3<f32>;

/// Configuration for PaddleOCR text recognition model
#[derive(Debug, Clone)]
pub struct PaddleRecConfig {
    /// Required input height for the model
    ///
    /// Text line crops are resized to this height; the width follows the
    /// aspect ratio of the crop.
    ///
    /// Default: 48
    pub required_height: usize,

    /// Crops taller than `width * aspect_ratio_threshold` are treated as
    /// vertical text and rotated before recognition. `0.0` disables it.
    ///
    /// Default: 1.5
    pub aspect_ratio_threshold: f32,

    /// Character dictionary, one entry per line.
    ///
    /// When unset the dictionary stored in the `character` metadata of the
    /// onnx model is used.
    pub character_dict_path: Option<PathBuf>,
}

impl Default for PaddleRecConfig {
    fn default() -> Self {
        Self {
            required_height: 48,
            aspect_ratio_threshold: 1.5,
            character_dict_path: None,
        }
    }
}

impl PaddleRec {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_config(path, PaddleRecConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: PaddleRecConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }
}

impl Model for PaddleRec {
    type Input = PaddleInput;

    type Output = PaddleOutput;

    type Config = PaddleRecConfig;

    const INPUT_NAME: &'static str = "x";

    const OUTPUT_NAME: &'static str = "fetch_name_0";

    const MODEL_NAME: &'static str = "ch_PP-OCRv5_rec_mobile_infer";

    fn path(&self) -> &Path {
        &self.path
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
