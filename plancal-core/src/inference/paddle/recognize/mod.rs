pub mod model;
pub mod session;

pub use model::{PaddleRec, PaddleRecConfig};
pub use session::PaddleRecSession;
