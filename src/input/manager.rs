//! Input manager for reading resumes from disk

use crate::error::{JobMatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{extract_text, Extraction};
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, Extraction>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a resume file. Missing files and unsupported extensions are errors;
    /// unparseable content comes back as empty text with a warning.
    pub async fn extract(&mut self, path: &Path) -> Result<Extraction> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(JobMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(JobMatcherError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        info!("Extracting resume text from: {}", path.display());
        let bytes = fs::read(path).await?;
        let extraction = extract_text(&bytes, file_type.mime_type());

        if self.enable_cache {
            self.cache.insert(path_str, extraction.clone());
        }

        Ok(extraction)
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        Ok(self.extract(path).await?.text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                JobMatcherError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
