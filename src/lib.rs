//! Job matcher library: rank job postings against a resume

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod sources;

pub use config::Config;
pub use error::{JobMatcherError, Result};
