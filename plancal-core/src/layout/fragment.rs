use serde::Serialize;
use snafu::ensure;

use crate::error::{InvalidFragmentSnafu, PlancalError};

/// One recognized OCR line with its page and top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    page: usize,
    x: f32,
    y: f32,
    text: String,
}

impl Fragment {
    /// `page` is 1-based.
    pub fn new(page: usize, x: f32, y: f32, text: impl Into<String>) -> Result<Self, PlancalError> {
        ensure!(page >= 1, InvalidFragmentSnafu { page });

        Ok(Self {
            page,
            x,
            y,
            text: text.into(),
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
