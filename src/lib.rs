pub mod analyzers;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod parser;
pub mod records;
pub mod store;

pub use error::{Error, Result};
