//! `{{dotted.key}}` note templating over a flat, statically-known key set.

use std::collections::HashMap;

use crate::book::BookMeta;

/// Note rendered when the vault has no template file configured.
pub const DEFAULT_TEMPLATE: &str =
    "{{bookmeta.title}}\n{{bookmeta.authors}}\n{{bookmeta.publisher}}\n{{bookmeta.isbn}}\n{{bookmeta.coverPath}}";

/// Replaces every `{{ key }}` placeholder with `data[key]`, or the empty
/// string when the key is unknown. Key characters are `[A-Za-z0-9_.]`;
/// whitespace inside the braces is allowed. Anything that does not form a
/// full placeholder passes through verbatim, and scanning resumes one
/// character after a failed `{{`, so `{{{x}}}` renders as `{`, the value
/// of `x`, `}`.
pub fn apply_template(template: &str, data: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match parse_key(after) {
            Some((key, consumed)) => {
                out.push_str(data.get(key).map(String::as_str).unwrap_or_default());
                rest = &after[consumed..];
            }
            None => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Matches `\s* [\w.]+ \s* }}` at the start of `s`, returning the key and
/// the number of bytes consumed.
fn parse_key(s: &str) -> Option<(&str, usize)> {
    let trimmed = s.trim_start();
    let key_len = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(trimmed.len());
    if key_len == 0 {
        return None;
    }
    let key = &trimmed[..key_len];
    let after_key = trimmed[key_len..].trim_start();
    if !after_key.starts_with("}}") {
        return None;
    }
    Some((key, s.len() - after_key.len() + 2))
}

/// Flattens a record into the `bookmeta.*` key set used by note
/// templates. Sequences are comma-joined; the `*_json` keys carry the
/// raw lists as JSON, with absent ToCs dumping as `[]`.
pub fn template_data(meta: &BookMeta, cover_path: &str) -> HashMap<String, String> {
    let mut data = HashMap::new();

    let dates = meta
        .dates
        .iter()
        .map(|d| match &d.event {
            Some(event) => format!("{}:{}", event, d.value),
            None => d.value.clone(),
        })
        .collect::<Vec<_>>()
        .join(",");
    let identifiers = meta
        .identifiers
        .iter()
        .map(|i| format!("{}:{}", i.scheme.as_deref().unwrap_or_default(), i.value))
        .collect::<Vec<_>>()
        .join(",");

    let entries = [
        ("title", meta.title.clone()),
        ("author", meta.author.clone()),
        ("authors", meta.authors.join(",")),
        ("publisher", meta.publisher.clone()),
        ("isbn", meta.isbn.clone()),
        ("description", meta.description.clone()),
        ("subjects", meta.subjects.join(",")),
        ("languages", meta.languages.join(",")),
        ("contributors", meta.contributors.join(",")),
        ("rights", meta.rights.clone()),
        ("sources", meta.sources.join(",")),
        ("relations", meta.relations.join(",")),
        ("coverage", meta.coverage.clone()),
        ("type", meta.r#type.clone()),
        ("format", meta.format.clone()),
        ("dates", dates),
        ("identifiers", identifiers),
        ("coverPath", cover_path.to_string()),
        ("identifiers_json", dump(&meta.identifiers)),
        ("meta_json", dump(&meta.meta_tags)),
        ("manifest_json", dump(&meta.manifest)),
        ("spine_json", dump(&meta.spine)),
        ("tocNav_json", dump(&meta.toc_nav.as_deref().unwrap_or_default())),
        ("tocNcx_json", dump(&meta.toc_ncx.as_deref().unwrap_or_default())),
    ];
    for (key, value) in entries {
        data.insert(format!("bookmeta.{}", key), value);
    }
    data
}

fn dump<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{DateEntry, Identifier, NavEntry};
    use proptest::prelude::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_basic() {
        let data = map(&[("bookmeta.title", "T"), ("bookmeta.author", "A")]);
        assert_eq!(
            apply_template("{{bookmeta.title}} by {{bookmeta.author}}", &data),
            "T by A"
        );
    }

    #[test]
    fn test_unknown_key_renders_empty() {
        assert_eq!(apply_template("x{{missing.key}}y", &HashMap::new()), "xy");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let data = map(&[("k", "v")]);
        assert_eq!(apply_template("{{ k }}", &data), "v");
        assert_eq!(apply_template("{{\tk\n}}", &data), "v");
    }

    #[test]
    fn test_unmatched_braces_pass_through() {
        let data = map(&[("k", "v")]);
        assert_eq!(apply_template("{{k", &data), "{{k");
        assert_eq!(apply_template("{k}", &data), "{k}");
        assert_eq!(apply_template("a {{}} b", &data), "a {{}} b");
        assert_eq!(apply_template("{{a-b}}", &data), "{{a-b}}");
    }

    #[test]
    fn test_triple_braces_rescan() {
        let data = map(&[("x", "v")]);
        assert_eq!(apply_template("{{{x}}}", &data), "{v}");
    }

    #[test]
    fn test_template_data_joins_and_formats() {
        let meta = BookMeta {
            title: "T".into(),
            author: "A".into(),
            authors: vec!["A".into(), "B".into()],
            dates: vec![
                DateEntry {
                    event: Some("publication".into()),
                    value: "1965".into(),
                },
                DateEntry {
                    event: None,
                    value: "2010".into(),
                },
            ],
            identifiers: vec![
                Identifier {
                    id: None,
                    scheme: Some("ISBN".into()),
                    value: "000".into(),
                },
                Identifier {
                    id: None,
                    scheme: None,
                    value: "urn:uuid:1".into(),
                },
            ],
            ..BookMeta::default()
        };
        let data = template_data(&meta, "covers/T.jpg");
        assert_eq!(data["bookmeta.authors"], "A,B");
        assert_eq!(data["bookmeta.dates"], "publication:1965,2010");
        assert_eq!(data["bookmeta.identifiers"], "ISBN:000,:urn:uuid:1");
        assert_eq!(data["bookmeta.coverPath"], "covers/T.jpg");
    }

    #[test]
    fn test_template_data_json_dumps() {
        let meta = BookMeta {
            toc_nav: Some(vec![NavEntry {
                label: "One".into(),
                href: "ch1.xhtml".into(),
            }]),
            ..BookMeta::default()
        };
        let data = template_data(&meta, "");
        assert_eq!(
            data["bookmeta.tocNav_json"],
            r#"[{"label":"One","href":"ch1.xhtml"}]"#
        );
        // absent sources dump as empty arrays, not null
        assert_eq!(data["bookmeta.tocNcx_json"], "[]");
        assert_eq!(data["bookmeta.manifest_json"], "[]");
    }

    #[test]
    fn test_default_template_renders_five_lines() {
        let meta = BookMeta {
            title: "T".into(),
            authors: vec!["A".into()],
            publisher: "P".into(),
            isbn: "000".into(),
            ..BookMeta::default()
        };
        let note = apply_template(DEFAULT_TEMPLATE, &template_data(&meta, "c.jpg"));
        assert_eq!(note, "T\nA\nP\n000\nc.jpg");
    }

    proptest! {
        #[test]
        fn prop_text_without_open_brace_is_fixed_point(s in "[^{]{0,64}") {
            prop_assert_eq!(apply_template(&s, &HashMap::new()), s);
        }
    }
}
