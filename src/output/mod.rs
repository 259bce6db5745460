//! Output formatting module

pub mod report;
pub mod formatter;
