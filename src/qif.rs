mod model;
pub mod summary;
pub mod writer;

pub use model::*;
