pub mod chart;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod reshape;
pub mod table;

pub use error::{Result, TidyError};
