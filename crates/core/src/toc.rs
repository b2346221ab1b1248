//! Table-of-contents extraction: the EPUB3 nav document and the EPUB2
//! NCX are read independently, so one failing never hides the other.

use std::io::{Read, Seek};

use scraper::{ElementRef, Html, Selector};

use crate::archive::EpubArchive;
use crate::book::{ManifestItem, NavEntry, NcxEntry};
use crate::package::resolve_href;
use crate::xml::{text_of, XmlElement};

pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// Anchors of the EPUB3 nav document.
///
/// `None` when the manifest names no nav item (a `properties` token
/// `nav`), when its document cannot be read, or when no nav element is
/// found. A nav with zero anchors is `Some` and empty.
pub fn nav_toc<R: Read + Seek>(
    manifest: &[ManifestItem],
    base: &str,
    archive: &mut EpubArchive<R>,
) -> Option<Vec<NavEntry>> {
    let item = manifest.iter().find(|i| {
        i.properties
            .as_deref()
            .map_or(false, |p| p.split_whitespace().any(|t| t == "nav"))
    })?;
    let html = archive.read_text(&resolve_href(base, &item.href))?;
    parse_nav_document(&html)
}

fn parse_nav_document(html: &str) -> Option<Vec<NavEntry>> {
    let document = Html::parse_document(html);
    let nav = select_toc_nav(&document)?;
    let anchors = Selector::parse("a").unwrap();
    let entries = nav
        .select(&anchors)
        .map(|a| NavEntry {
            label: a.text().collect::<String>().trim().to_string(),
            href: a.value().attr("href").unwrap_or_default().to_string(),
        })
        .filter(|e| !e.label.is_empty() || !e.href.is_empty())
        .collect();
    Some(entries)
}

/// Preference order: a nav flagged as toc by type, then by role, then
/// the first nav in the document.
fn select_toc_nav(document: &Html) -> Option<ElementRef<'_>> {
    for selector in [
        "nav[epub\\:type='toc']",
        "nav[type='toc']",
        "nav[role='doc-toc']",
        "nav",
    ] {
        let sel = Selector::parse(selector).unwrap();
        if let Some(el) = document.select(&sel).next() {
            return Some(el);
        }
    }
    None
}

/// Flattened `navPoint` entries of the EPUB2 NCX, document order,
/// nesting ignored.
///
/// `None` when the manifest has no item with the NCX media type or the
/// document cannot be read or parsed.
pub fn ncx_toc<R: Read + Seek>(
    manifest: &[ManifestItem],
    base: &str,
    archive: &mut EpubArchive<R>,
) -> Option<Vec<NcxEntry>> {
    let item = manifest.iter().find(|i| i.media_type == NCX_MEDIA_TYPE)?;
    let xml = archive.read_text(&resolve_href(base, &item.href))?;
    let root = XmlElement::parse(&xml).ok()?;
    let entries = root
        .find_all("navPoint")
        .map(|np| NcxEntry {
            label: text_of(np.find("navLabel").and_then(|l| l.find("text"))),
            src: np
                .find("content")
                .and_then(|c| c.attr("src"))
                .unwrap_or_default()
                .to_string(),
        })
        .filter(|e| !e.label.is_empty() || !e.src.is_empty())
        .collect();
    Some(entries)
}
