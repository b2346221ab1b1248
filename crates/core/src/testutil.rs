//! In-memory EPUB fixtures for tests.

use std::io::{Cursor, Write};

pub(crate) const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Assembles a ZIP archive from (path, bytes) pairs.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let cursor = Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(cursor);

    let opts_store: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let opts_deflate: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (path, data) in entries {
        let opts = if *path == "mimetype" { opts_store } else { opts_deflate };
        zip.start_file(*path, opts).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// A minimal EPUB: mimetype, standard container, the given OPF at
/// `OEBPS/content.opf`, plus any extra entries.
pub(crate) fn epub_with(opf: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
    let mut entries: Vec<(&str, &[u8])> = vec![
        ("mimetype", b"application/epub+zip".as_slice()),
        ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
        ("OEBPS/content.opf", opf.as_bytes()),
    ];
    entries.extend_from_slice(extra);
    zip_bytes(&entries)
}

/// `epub_with` without extra entries.
pub(crate) fn epub_with_opf(opf: &str) -> Vec<u8> {
    epub_with(opf, &[])
}
