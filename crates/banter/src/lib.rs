mod error;
pub mod utils;
pub use error::{Error, Result};

pub mod chat;
pub mod http;
pub mod session;
pub mod transport;
