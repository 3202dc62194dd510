pub mod app;
pub mod brokerage;
pub mod convert_impl;
pub mod qif;
pub mod tracing;
pub mod util;

extern crate lazy_static;

#[cfg(any(test, feature = "testlib"))]
pub mod testlib;
