//! From OCR output to text lines: fragments, their extraction and their
//! regrouping into visual rows.

pub mod extract;
pub mod fragment;
pub mod lines;

pub use extract::{extract_fragments, flatten_document};
pub use fragment::Fragment;
pub use lines::reconstruct_lines;
