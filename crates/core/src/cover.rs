//! Cover resolution via the EPUB2 meta-tag chain.

use std::io::{Read, Seek};

use crate::archive::EpubArchive;
use crate::book::{Cover, ManifestItem, MetaTag};
use crate::package::resolve_href;

/// Follows `meta[name="cover"]` to a manifest id, then reads the image
/// bytes at the base-joined href. Returns `None` without touching the
/// archive when the meta tag is absent or has no content; a matching
/// manifest item whose bytes cannot be read still yields a cover with
/// `data` unset. `path` stays as the unresolved manifest href.
///
/// The EPUB3 `properties="cover-image"` route is deliberately not
/// consulted.
pub fn resolve_cover<R: Read + Seek>(
    meta_tags: &[MetaTag],
    manifest: &[ManifestItem],
    base: &str,
    archive: &mut EpubArchive<R>,
) -> Option<Cover> {
    let cover_id = meta_tags
        .iter()
        .find(|m| m.name.as_deref() == Some("cover"))
        .and_then(|m| m.content.as_deref())?;
    let item = manifest.iter().find(|i| i.id == cover_id)?;
    let data = archive.read_binary(&resolve_href(base, &item.href));
    Some(Cover {
        mime: item.media_type.clone(),
        path: item.href.clone(),
        data,
    })
}
