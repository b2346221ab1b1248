//! ISBN selection from the identifier list.

use crate::book::Identifier;

const URN_PREFIX: &str = "urn:isbn:";

/// Picks the ISBN for a record, first match wins:
/// 1. an identifier whose scheme equals `isbn` case-insensitively, value
///    taken as-is;
/// 2. an identifier whose value starts with `urn:isbn:` case-insensitively,
///    prefix stripped;
/// 3. the first identifier's value;
/// 4. empty when there are no identifiers.
///
/// No validation or normalization: hyphens and check digits pass through
/// untouched.
pub fn detect_isbn(identifiers: &[Identifier]) -> String {
    if let Some(ident) = identifiers.iter().find(|i| {
        i.scheme
            .as_deref()
            .map_or(false, |s| s.eq_ignore_ascii_case("isbn"))
    }) {
        return ident.value.clone();
    }

    if let Some(stripped) = identifiers.iter().find_map(|i| strip_urn(&i.value)) {
        return stripped.to_string();
    }

    identifiers
        .first()
        .map(|i| i.value.clone())
        .unwrap_or_default()
}

fn strip_urn(value: &str) -> Option<&str> {
    value
        .get(..URN_PREFIX.len())
        .filter(|p| p.eq_ignore_ascii_case(URN_PREFIX))
        .map(|_| &value[URN_PREFIX.len()..])
}
