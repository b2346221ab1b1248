/// Top-level error type. All public API functions return this.
#[derive(Debug, thiserror::Error)]
pub enum BookmetaError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning EPUB bytes into a metadata record.
///
/// Only the container/package variants (and the zip/XML failures that
/// prevent reaching them) abort a book. Everything downstream of the
/// package document degrades to an absent field instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Not a readable ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("META-INF/container.xml not found")]
    MissingContainer,

    #[error("container.xml names no package document path")]
    MissingPackagePath,

    #[error("Package document missing or unreadable: {0}")]
    MissingPackageDocument(String),

    #[error("Malformed XML: {0}")]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),

    #[error("Document contains no root element")]
    NoRoot,

    #[error("Document ended with unclosed elements")]
    Truncated,
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("File not found in vault: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Input folder is not configured")]
    InputNotConfigured,

    #[error("Input folder not found: {0}")]
    InputNotFound(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
