pub mod calendar;
pub mod config;
pub mod error;
pub mod highlight;
pub mod range;
pub mod render;

pub use error::{Error, ErrorKind, Result};
