//! Input processing module
//! Resume file detection and text extraction

pub mod file_detector;
pub mod text_extractor;
pub mod manager;
