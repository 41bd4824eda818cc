pub mod collector;
pub mod compositor;
pub mod config;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod resolver;

pub use error::{CollageError, ErrorKind, Result};
