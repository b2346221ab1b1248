//! Package-document (OPF) parsing: Dublin Core fields, identifiers,
//! dates, raw meta tags, manifest, and spine.

use crate::book::{BookMeta, DateEntry, Identifier, ManifestItem, MetaTag, SpineItem};
use crate::error::ParseError;
use crate::xml::XmlElement;

/// Directory of the package document: everything before the final `/`,
/// empty when the document sits at the archive root.
pub fn base_dir(package_path: &str) -> String {
    match package_path.rfind('/') {
        Some(idx) => package_path[..idx].to_string(),
        None => String::new(),
    }
}

/// Joins an href onto the package base directory. An empty base leaves
/// the href untouched, so root-level packages resolve to the href as-is.
pub fn resolve_href(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base, href)
    }
}

/// Parses the OPF into a record. The derived fields (isbn, cover, the
/// two ToCs) are left at their defaults for the assembler to fill in.
///
/// Missing metadata/manifest/spine elements yield empty collections;
/// only malformed XML is an error here.
pub fn parse_package(opf: &str) -> Result<BookMeta, ParseError> {
    let root = XmlElement::parse(opf)?;

    let mut meta = BookMeta::default();
    if let Some(metadata) = root.find("metadata") {
        collect_metadata(metadata, &mut meta);
    }
    if let Some(manifest) = root.find("manifest") {
        meta.manifest = collect_manifest(manifest);
    }
    if let Some(spine) = root.find("spine") {
        meta.spine = collect_spine(spine);
    }
    Ok(meta)
}

/// One walk over the metadata element gathers every field. Scalars keep
/// the first matching element (even when its text is empty); sequences
/// keep every non-empty text in document order.
fn collect_metadata(metadata: &XmlElement, meta: &mut BookMeta) {
    let mut title = None;
    let mut publisher = None;
    let mut description = None;
    let mut rights = None;
    let mut coverage = None;
    let mut type_ = None;
    let mut format = None;

    for el in metadata.descendants() {
        match el.name() {
            "title" => set_first(&mut title, el),
            "publisher" => set_first(&mut publisher, el),
            "description" => set_first(&mut description, el),
            "rights" => set_first(&mut rights, el),
            "coverage" => set_first(&mut coverage, el),
            "type" => set_first(&mut type_, el),
            "format" => set_first(&mut format, el),
            "creator" => push_text(&mut meta.authors, el),
            "subject" => push_text(&mut meta.subjects, el),
            "language" => push_text(&mut meta.languages, el),
            "contributor" => push_text(&mut meta.contributors, el),
            "source" => push_text(&mut meta.sources, el),
            "relation" => push_text(&mut meta.relations, el),
            "identifier" => {
                let value = el.text();
                if !value.is_empty() {
                    meta.identifiers.push(Identifier {
                        id: opt_attr(el, "id"),
                        scheme: opt_attr(el, "scheme"),
                        value,
                    });
                }
            }
            "date" => {
                let value = el.text();
                if !value.is_empty() {
                    meta.dates.push(DateEntry {
                        event: opt_attr(el, "event"),
                        value,
                    });
                }
            }
            "meta" => meta.meta_tags.push(MetaTag {
                name: opt_attr(el, "name"),
                property: opt_attr(el, "property"),
                content: opt_attr(el, "content"),
            }),
            _ => {}
        }
    }

    meta.title = title.unwrap_or_default();
    meta.publisher = publisher.unwrap_or_default();
    meta.description = description.unwrap_or_default();
    meta.rights = rights.unwrap_or_default();
    meta.coverage = coverage.unwrap_or_default();
    meta.r#type = type_.unwrap_or_default();
    meta.format = format.unwrap_or_default();
    meta.author = meta.authors.first().cloned().unwrap_or_default();
}

fn collect_manifest(manifest: &XmlElement) -> Vec<ManifestItem> {
    manifest
        .find_all("item")
        .map(|el| ManifestItem {
            id: el.attr("id").unwrap_or_default().to_string(),
            href: el.attr("href").unwrap_or_default().to_string(),
            media_type: el.attr("media-type").unwrap_or_default().to_string(),
            properties: opt_attr(el, "properties"),
        })
        .collect()
}

fn collect_spine(spine: &XmlElement) -> Vec<SpineItem> {
    spine
        .find_all("itemref")
        .map(|el| SpineItem {
            idref: el.attr("idref").unwrap_or_default().to_string(),
            linear: opt_attr(el, "linear"),
            properties: opt_attr(el, "properties"),
        })
        .collect()
}

fn set_first(slot: &mut Option<String>, el: &XmlElement) {
    if slot.is_none() {
        *slot = Some(el.text());
    }
}

fn push_text(values: &mut Vec<String>, el: &XmlElement) {
    let text = el.text();
    if !text.is_empty() {
        values.push(text);
    }
}

/// Attribute as `Some` only when present and non-empty.
fn opt_attr(el: &XmlElement, name: &str) -> Option<String> {
    el.attr(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" xmlns:dc="http://purl.org/dc/elements/1.1/" version="3.0">
  <metadata xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Dune</dc:title>
    <dc:creator>Frank Herbert</dc:creator>
    <dc:creator>Second Author</dc:creator>
    <dc:publisher>Chilton</dc:publisher>
    <dc:description>Desert planet</dc:description>
    <dc:subject>SF</dc:subject>
    <dc:subject>Ecology</dc:subject>
    <dc:language>en</dc:language>
    <dc:contributor>J. Schoenherr</dc:contributor>
    <dc:rights>All rights reserved</dc:rights>
    <dc:source>print edition</dc:source>
    <dc:relation>dune-saga</dc:relation>
    <dc:coverage>Arrakis</dc:coverage>
    <dc:type>Text</dc:type>
    <dc:format>application/epub+zip</dc:format>
    <dc:identifier id="pub-id" opf:scheme="ISBN">9780441013593</dc:identifier>
    <dc:identifier scheme="uuid">urn:uuid:1234</dc:identifier>
    <dc:identifier></dc:identifier>
    <dc:date event="publication">1965-08-01</dc:date>
    <dc:date>2010-01-01</dc:date>
    <meta name="cover" content="cover-img"/>
    <meta property="dcterms:modified">2020-01-01T00:00:00Z</meta>
  </metadata>
  <manifest>
    <item id="cover-img" href="images/cover.jpg" media-type="image/jpeg"/>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml" properties=""/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1" linear="yes"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

    #[test]
    fn test_scalars_and_sequences() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.title, "Dune");
        assert_eq!(meta.author, "Frank Herbert");
        assert_eq!(meta.authors, vec!["Frank Herbert", "Second Author"]);
        assert_eq!(meta.publisher, "Chilton");
        assert_eq!(meta.description, "Desert planet");
        assert_eq!(meta.subjects, vec!["SF", "Ecology"]);
        assert_eq!(meta.languages, vec!["en"]);
        assert_eq!(meta.contributors, vec!["J. Schoenherr"]);
        assert_eq!(meta.rights, "All rights reserved");
        assert_eq!(meta.sources, vec!["print edition"]);
        assert_eq!(meta.relations, vec!["dune-saga"]);
        assert_eq!(meta.coverage, "Arrakis");
        assert_eq!(meta.r#type, "Text");
        assert_eq!(meta.format, "application/epub+zip");
    }

    #[test]
    fn test_identifiers_drop_empty_values() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.identifiers.len(), 2);
        assert_eq!(meta.identifiers[0].id.as_deref(), Some("pub-id"));
        assert_eq!(meta.identifiers[0].scheme.as_deref(), Some("ISBN"));
        assert_eq!(meta.identifiers[0].value, "9780441013593");
        assert_eq!(meta.identifiers[1].scheme.as_deref(), Some("uuid"));
    }

    #[test]
    fn test_dates_keep_optional_event() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.dates.len(), 2);
        assert_eq!(meta.dates[0].event.as_deref(), Some("publication"));
        assert_eq!(meta.dates[0].value, "1965-08-01");
        assert_eq!(meta.dates[1].event, None);
    }

    #[test]
    fn test_meta_tags_unfiltered() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.meta_tags.len(), 2);
        assert_eq!(meta.meta_tags[0].name.as_deref(), Some("cover"));
        assert_eq!(meta.meta_tags[0].content.as_deref(), Some("cover-img"));
        assert_eq!(
            meta.meta_tags[1].property.as_deref(),
            Some("dcterms:modified")
        );
        assert_eq!(meta.meta_tags[1].content, None);
    }

    #[test]
    fn test_manifest_items_in_document_order() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.manifest.len(), 3);
        assert_eq!(meta.manifest[0].id, "cover-img");
        assert_eq!(meta.manifest[0].media_type, "image/jpeg");
        assert_eq!(meta.manifest[1].properties.as_deref(), Some("nav"));
        // empty properties attribute normalizes to absent
        assert_eq!(meta.manifest[2].properties, None);
    }

    #[test]
    fn test_spine_itemrefs() {
        let meta = parse_package(FULL_OPF).unwrap();
        assert_eq!(meta.spine.len(), 2);
        assert_eq!(meta.spine[0].idref, "ch1");
        assert_eq!(meta.spine[0].linear.as_deref(), Some("yes"));
        assert_eq!(meta.spine[1].linear, None);
    }

    #[test]
    fn test_first_scalar_wins_even_when_empty() {
        let meta = parse_package(
            "<package><metadata><dc:title></dc:title><dc:title>Second</dc:title></metadata></package>",
        )
        .unwrap();
        assert_eq!(meta.title, "");
    }

    #[test]
    fn test_missing_sections_yield_empty_collections() {
        let meta = parse_package("<package/>").unwrap();
        assert_eq!(meta.title, "");
        assert!(meta.authors.is_empty());
        assert!(meta.identifiers.is_empty());
        assert!(meta.manifest.is_empty());
        assert!(meta.spine.is_empty());
    }

    #[test]
    fn test_bare_element_names_match() {
        let meta = parse_package(
            "<package><metadata><title>Plain</title><creator>A</creator></metadata></package>",
        )
        .unwrap();
        assert_eq!(meta.title, "Plain");
        assert_eq!(meta.author, "A");
    }

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir("OEBPS/content.opf"), "OEBPS");
        assert_eq!(base_dir("content.opf"), "");
        assert_eq!(base_dir("a/b/c.opf"), "a/b");
    }

    #[test]
    fn test_resolve_href_empty_base_is_identity() {
        assert_eq!(resolve_href("", "images/cover.jpg"), "images/cover.jpg");
        assert_eq!(resolve_href("OEBPS", "images/cover.jpg"), "OEBPS/images/cover.jpg");
    }
}
