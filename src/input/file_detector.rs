//! File type detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Parameters such as `; charset=utf-8` are ignored
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => FileType::Pdf,
            "text/plain" => FileType::Text,
            "text/markdown" | "text/x-markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Text => "text/plain",
            FileType::Markdown => "text/markdown",
            FileType::Unknown => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("xyz"), FileType::Unknown);
        assert_eq!(FileType::from_mime("text/plain; charset=utf-8"), FileType::Text);
        assert_eq!(FileType::from_mime("image/png"), FileType::Unknown);
        assert_eq!(FileType::from_mime(FileType::Markdown.mime_type()), FileType::Markdown);
    }
}
