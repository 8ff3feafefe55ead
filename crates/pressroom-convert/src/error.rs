use thiserror::Error;

/// Conversion failures. Fatal to the conversion that raised them only; a
/// single asset that fails to upload is NOT a conversion error (it degrades
/// to an empty image reference instead).
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Not a DOCX container: {0}")]
    NotDocx(String),

    #[error("Missing document part: {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    MalformedXml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ConversionError {
    fn from(err: quick_xml::Error) -> Self {
        ConversionError::MalformedXml(err.to_string())
    }
}
