//! OCF container resolution: container.xml names the package document.

use std::io::{Read, Seek};

use crate::archive::EpubArchive;
use crate::error::ParseError;
use crate::xml::XmlElement;

pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Returns the package-document path named by the first `rootfile`.
///
/// A missing container file and a missing, empty, or attribute-less
/// rootfile are the two fatal conditions every EPUB must clear before
/// any metadata can be read.
pub fn package_path<R: Read + Seek>(archive: &mut EpubArchive<R>) -> Result<String, ParseError> {
    let xml = archive
        .read_text(CONTAINER_PATH)
        .ok_or(ParseError::MissingContainer)?;
    let root = XmlElement::parse(&xml)?;
    let rootfile = root.find("rootfile").ok_or(ParseError::MissingPackagePath)?;
    match rootfile.attr("full-path") {
        Some(path) if !path.is_empty() => Ok(path.to_string()),
        _ => Err(ParseError::MissingPackagePath),
    }
}
