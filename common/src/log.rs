//! Status macros shared by every crate in the workspace.
//!
//! They only emit `tracing` events; the binary decides how they look.

#[doc(hidden)]
pub use tracing as __tracing;

/// Target used for lines that must be printed verbatim, without a status prefix.
pub const PRINT_TARGET: &str = "hostprobe::print";
/// Target used for positive confirmations.
pub const SUCCESS_TARGET: &str = "hostprobe::success";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::__tracing::warn!($($arg)*)
    };
}
