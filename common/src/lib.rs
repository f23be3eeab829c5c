#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod global;
pub mod http;
pub mod logging;
pub mod prelude;
pub mod signal;
