//! Document model returned by OCR engines.
//!
//! An engine reads a whole pdf and returns pages made of blocks, lines and
//! words. Word geometry is normalized to the page, `(0, 0)` being the
//! top-left corner and `(1, 1)` the bottom-right one.

pub mod paddle;
pub mod render;

use serde::Serialize;

use crate::{analysis::bbox::Bbox, error::PlancalError};

pub use paddle::{PaddleOcr, PaddleOcrConfig};

#[derive(Debug, Clone, Default, Serialize)]
pub struct OcrDocument {
    pub pages: Vec<OcrPage>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OcrPage {
    pub blocks: Vec<OcrBlock>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OcrBlock {
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OcrLine {
    pub words: Vec<OcrWord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrWord {
    pub value: String,
    pub geometry: Bbox,
}

/// Text recognition over a pdf document.
///
/// Engines are built once at startup and lent to each extraction, so a
/// stub can stand in for the model in tests.
pub trait OcrEngine: Send {
    fn recognize(&mut self, document: &[u8]) -> Result<OcrDocument, PlancalError>;
}
