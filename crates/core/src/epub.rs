//! Parsing driver: EPUB bytes in, one finished record out.

use std::io::{Cursor, Read, Seek};

use crate::archive::EpubArchive;
use crate::book::BookMeta;
use crate::container;
use crate::cover;
use crate::error::ParseError;
use crate::isbn;
use crate::package::{self, base_dir};
use crate::toc;

/// Parses an EPUB from a seekable reader.
///
/// Fatal failures are the non-ZIP input, a missing container, a missing
/// package path, a missing package document, and malformed container or
/// package XML. Cover and ToC sources degrade to absent fields instead.
pub fn parse_epub<R: Read + Seek>(reader: R) -> Result<BookMeta, ParseError> {
    let mut archive = EpubArchive::from_reader(reader)?;
    let opf_path = container::package_path(&mut archive)?;
    let opf = archive
        .read_text(&opf_path)
        .ok_or_else(|| ParseError::MissingPackageDocument(opf_path.clone()))?;
    let base = base_dir(&opf_path);

    let mut meta = package::parse_package(&opf)?;
    meta.isbn = isbn::detect_isbn(&meta.identifiers);
    meta.cover = cover::resolve_cover(&meta.meta_tags, &meta.manifest, &base, &mut archive);
    meta.toc_nav = toc::nav_toc(&meta.manifest, &base, &mut archive);
    meta.toc_ncx = toc::ncx_toc(&meta.manifest, &base, &mut archive);
    Ok(meta)
}

/// `parse_epub` over an in-memory buffer.
pub fn parse_epub_bytes(bytes: &[u8]) -> Result<BookMeta, ParseError> {
    parse_epub(Cursor::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{epub_with, epub_with_opf, zip_bytes};

    const OPF: &str = r#"<package xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
  <metadata>
    <dc:title>T</dc:title>
    <dc:creator>A</dc:creator>
    <dc:identifier opf:scheme="ISBN">000</dc:identifier>
    <meta name="cover" content="cover-img"/>
  </metadata>
  <manifest>
    <item id="cover-img" href="images/cover.jpg" media-type="image/jpeg"/>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;

    const NAV: &str =
        r#"<html><body><nav epub:type="toc"><a href="ch1.xhtml">One</a></nav></body></html>"#;

    const NCX: &str = r#"<ncx><navMap><navPoint>
        <navLabel><text>One</text></navLabel><content src="ch1.xhtml"/>
      </navPoint></navMap></ncx>"#;

    #[test]
    fn test_full_record_assembled() {
        let bytes = epub_with(
            OPF,
            &[
                ("OEBPS/images/cover.jpg", &[1u8, 2, 3][..]),
                ("OEBPS/nav.xhtml", NAV.as_bytes()),
                ("OEBPS/toc.ncx", NCX.as_bytes()),
            ],
        );
        let meta = parse_epub_bytes(&bytes).unwrap();
        assert_eq!(meta.title, "T");
        assert_eq!(meta.author, "A");
        assert_eq!(meta.isbn, "000");

        let cover = meta.cover.unwrap();
        assert_eq!(cover.mime, "image/jpeg");
        assert_eq!(cover.path, "images/cover.jpg");
        assert_eq!(cover.data, Some(vec![1, 2, 3]));

        assert_eq!(meta.toc_nav.unwrap()[0].href, "ch1.xhtml");
        assert_eq!(meta.toc_ncx.unwrap()[0].label, "One");
    }

    #[test]
    fn test_missing_package_document_is_fatal() {
        let bytes = zip_bytes(&[(
            "META-INF/container.xml",
            crate::testutil::CONTAINER_XML.as_bytes(),
        )]);
        assert!(matches!(
            parse_epub_bytes(&bytes),
            Err(ParseError::MissingPackageDocument(path)) if path == "OEBPS/content.opf"
        ));
    }

    #[test]
    fn test_ncx_only_leaves_nav_genuinely_absent() {
        let opf = r#"<package><metadata/><manifest>
            <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
          </manifest></package>"#;
        let bytes = epub_with(opf, &[("OEBPS/toc.ncx", NCX.as_bytes())]);
        let meta = parse_epub_bytes(&bytes).unwrap();
        assert_eq!(meta.toc_nav, None);
        assert_eq!(meta.toc_ncx.unwrap().len(), 1);
    }

    #[test]
    fn test_nav_only_leaves_ncx_genuinely_absent() {
        let opf = r#"<package><metadata/><manifest>
            <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
          </manifest></package>"#;
        let bytes = epub_with(opf, &[("OEBPS/nav.xhtml", NAV.as_bytes())]);
        let meta = parse_epub_bytes(&bytes).unwrap();
        assert_eq!(meta.toc_nav.unwrap().len(), 1);
        assert_eq!(meta.toc_ncx, None);
    }

    #[test]
    fn test_no_cover_meta_no_cover() {
        let meta = parse_epub_bytes(&epub_with_opf("<package/>")).unwrap();
        assert_eq!(meta.cover, None);
        assert_eq!(meta.isbn, "");
    }
}
