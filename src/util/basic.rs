// A user-facing error message.
pub type SError = String;

/// Write a line to an error stream (usually a WriteHandle), ignoring any
/// failure to write it. There is nowhere left to report that failure to.
#[macro_export]
macro_rules! write_errln {
    ($dst:expr, $($arg:tt)*) => {{
        use std::io::Write as _;
        let _ = writeln!($dst, $($arg)*);
    }};
}
