//! Batch driver: every EPUB under the input folder becomes a cover file,
//! a JSON metadata record, and a rendered note.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::epub::parse_epub_bytes;
use crate::error::{BatchError, VaultError};
use crate::template::{apply_template, template_data, DEFAULT_TEMPLATE};
use crate::vault::{slug, Vault};

/// Outcome of one folder run.
///
/// `total` starts as the number of EPUBs listed and drops by one for each
/// skipped book, so the user-facing tally reads "processed of total" over
/// books that were actually attempted.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub total: usize,
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub path: String,
    pub message: String,
}

/// Runs the full pipeline over every EPUB in `settings.input_folder`.
///
/// Per-book failures never abort the run: a book whose output already
/// exists counts as skipped, any other failure is recorded and the run
/// moves on. Only setup problems (unconfigured or missing input folder)
/// return an error.
pub fn process_folder(vault: &dyn Vault, settings: &Settings) -> Result<BatchSummary, BatchError> {
    if settings.input_folder.is_empty() {
        return Err(BatchError::InputNotConfigured);
    }
    if !vault.folder_exists(&settings.input_folder) {
        return Err(BatchError::InputNotFound(settings.input_folder.clone()));
    }
    if !settings.metadata_folder.is_empty() {
        vault.ensure_folder(&settings.metadata_folder)?;
    }
    if !settings.output_folder.is_empty() {
        vault.ensure_folder(&settings.output_folder)?;
    }

    let template = load_template(vault, settings);
    let books = vault.list_epubs(&settings.input_folder)?;

    let mut summary = BatchSummary {
        total: books.len(),
        ..BatchSummary::default()
    };
    for book in &books {
        match process_book(vault, settings, &template, book) {
            Ok(()) => summary.processed += 1,
            Err(BatchError::Vault(VaultError::AlreadyExists(path))) => {
                info!(book = %book, path = %path, "output exists, skipping");
                summary.skipped += 1;
                summary.total -= 1;
            }
            Err(e) => {
                warn!(book = %book, error = %e, "failed to process");
                summary.failures.push(BatchFailure {
                    path: book.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(summary)
}

/// One book: parse, save cover, save JSON record, render and save note.
fn process_book(
    vault: &dyn Vault,
    settings: &Settings,
    template: &str,
    book: &str,
) -> Result<(), BatchError> {
    let bytes = vault.read_binary(book)?;
    let meta = parse_epub_bytes(&bytes)?;
    let name = slug(stem(book));

    let cover_path = save_cover(vault, settings, &meta, &name)?;

    let json_dir = join(&settings.metadata_folder, "datas");
    vault.ensure_folder(&json_dir)?;
    let mut record = serde_json::to_value(&meta)?;
    record["coverPath"] = serde_json::Value::String(cover_path.clone());
    vault.create_text(
        &format!("{}/{}.json", json_dir, name),
        &serde_json::to_string_pretty(&record)?,
    )?;

    let note = apply_template(template, &template_data(&meta, &cover_path));
    let note_path = join(&settings.output_folder, &format!("{}.md", name));
    vault.create_text(&note_path, &note)?;
    Ok(())
}

/// Writes the cover bytes under `{metadata_folder}/covers/` and returns
/// the written path, or `""` when the book carries no readable cover.
fn save_cover(
    vault: &dyn Vault,
    settings: &Settings,
    meta: &crate::book::BookMeta,
    name: &str,
) -> Result<String, BatchError> {
    let cover = match &meta.cover {
        Some(c) => c,
        None => return Ok(String::new()),
    };
    let data = match &cover.data {
        Some(d) => d,
        None => return Ok(String::new()),
    };
    let ext = if cover.mime.contains("png") { "png" } else { "jpg" };
    let dir = join(&settings.metadata_folder, "covers");
    vault.ensure_folder(&dir)?;
    let path = format!("{}/{}.{}", dir, name, ext);
    vault.create_binary(&path, data)?;
    Ok(path)
}

fn load_template(vault: &dyn Vault, settings: &Settings) -> String {
    if !settings.template_path.is_empty() {
        if let Ok(text) = vault.read_text(&settings.template_path) {
            if !text.is_empty() {
                return text;
            }
        }
    }
    DEFAULT_TEMPLATE.to_string()
}

fn join(folder: &str, rest: &str) -> String {
    if folder.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", folder, rest)
    }
}

fn stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}
