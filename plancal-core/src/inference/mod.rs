pub mod model;
pub mod paddle;
