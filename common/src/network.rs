pub mod target;

pub use target::{HostTarget, TargetList, TargetParseError};
