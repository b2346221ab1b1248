//! The metadata record produced for one EPUB.

use serde::{Deserialize, Serialize};

/// Everything extracted from a single EPUB archive.
///
/// Plain owned data, immutable once the assembler returns it. Hrefs and
/// paths are stored exactly as written in the source documents; nothing
/// is resolved against the package base directory except at read time.
/// `toc_nav`/`toc_ncx` distinguish an absent source (`None`) from a
/// present-but-empty one (`Some(vec![])`), and keep that distinction
/// across JSON round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMeta {
    pub title: String,
    pub author: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub isbn: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub languages: Vec<String>,
    pub contributors: Vec<String>,
    pub rights: String,
    pub sources: Vec<String>,
    pub relations: Vec<String>,
    pub coverage: String,
    pub r#type: String,
    pub format: String,
    pub identifiers: Vec<Identifier>,
    pub dates: Vec<DateEntry>,
    pub meta_tags: Vec<MetaTag>,
    pub manifest: Vec<ManifestItem>,
    pub spine: Vec<SpineItem>,
    pub cover: Option<Cover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc_nav: Option<Vec<NavEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc_ncx: Option<Vec<NcxEntry>>,
}

/// One `dc:identifier`. Entries with an empty value are never kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub value: String,
}

/// One `dc:date`, with its optional `event` qualifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub value: String,
}

/// One `meta` element, captured verbatim: EPUB2 name/content pairs and
/// EPUB3 property refinements both land here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// One manifest `item` in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// One spine `itemref` in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpineItem {
    pub idref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// The resolved cover image. `path` is the manifest href, unresolved;
/// `data` is `None` when the archive entry could not be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub mime: String,
    pub path: String,
    pub data: Option<Vec<u8>>,
}

/// One anchor from the EPUB3 nav document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub href: String,
}

/// One `navPoint` from the EPUB2 NCX, nesting flattened away.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NcxEntry {
    pub label: String,
    pub src: String,
}
