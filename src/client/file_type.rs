// File: ./src/client/file_type.rs
use std::path::Path;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Upload formats the extraction backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SupportedFileType {
    Pdf,
    Docx,
    Txt,
}

impl SupportedFileType {
    /// Detects the type from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }

    pub fn mime(&self) -> &'static str {
        match self {
            SupportedFileType::Pdf => "application/pdf",
            SupportedFileType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SupportedFileType::Txt => "text/plain",
        }
    }

    /// ".pdf, .docx, .txt" for help and error text.
    pub fn accepted_list() -> String {
        Self::iter()
            .map(|t| format!(".{}", t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_is_case_insensitive() {
        assert_eq!(
            SupportedFileType::from_path(Path::new("CS101.PDF")),
            Some(SupportedFileType::Pdf)
        );
        assert_eq!(
            SupportedFileType::from_path(Path::new("notes.Docx")),
            Some(SupportedFileType::Docx)
        );
        assert_eq!(SupportedFileType::from_path(Path::new("scan.png")), None);
        assert_eq!(SupportedFileType::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_accepted_list() {
        assert_eq!(SupportedFileType::accepted_list(), ".pdf, .docx, .txt");
    }
}
