//! Types shared between the probing core and the command line front-end.

pub mod config;
pub mod log;
pub mod network;
