pub mod model;
pub mod session;

pub use model::{PaddleDet, PaddleDetConfig};
pub use session::{PaddleDetSession, TextDetection};
