mod action;
mod brokerage_tx;
mod description;
pub mod io;

pub use action::*;
pub use brokerage_tx::*;
pub use description::*;
