pub mod detect;
pub mod recognize;

pub use detect::{PaddleDet, PaddleDetSession, TextDetection};
pub use recognize::{PaddleRec, PaddleRecSession};
