pub mod analysis;
pub mod config;
pub mod consts;
pub mod error;
pub mod event;
pub mod export;
pub mod inference;
pub mod layout;
pub mod ocr;
pub mod pipeline;

// Re-export commonly used types
pub use config::{PlannerConfig, PlannerConfigBuilder};
pub use error::PlancalError;
pub use event::{Event, EventParser, FrenchMonth};
pub use ocr::{OcrEngine, PaddleOcr, PaddleOcrConfig};
pub use pipeline::{OutputPaths, Planner, PlanningOutput};
