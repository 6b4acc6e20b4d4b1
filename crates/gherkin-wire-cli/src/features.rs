//! Feature file discovery and loading.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Context, Result, bail};
use gherkin_wire::Document;
use walkdir::WalkDir;

/// Collect `.feature` files from files and directories, sorted and unique.
///
/// Directories are searched recursively. Paths that are not valid UTF-8
/// are skipped with a warning.
///
/// # Errors
///
/// Returns an error when a path does not exist or a directory cannot be read.
pub fn gather_features(paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let meta = fs::metadata(path).wrap_err_with(|| format!("cannot access {path}"))?;
        if meta.is_file() {
            if !is_feature_file(path) {
                tracing::warn!(%path, "ignoring file without a .feature extension");
                continue;
            }
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path) {
            let entry = entry.wrap_err_with(|| format!("failed to walk {path}"))?;
            if !entry.file_type().is_file() {
                continue;
            }
            match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(file) if is_feature_file(&file) => files.push(file),
                Ok(_) => {}
                Err(file) => tracing::warn!(path = %file.display(), "skipping non UTF-8 path"),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_feature_file(path: &Utf8Path) -> bool {
    path.extension() == Some("feature")
}

/// Parse every file into one document, features in file order.
///
/// # Errors
///
/// Returns an error naming the first file that cannot be read or parsed.
pub fn load_document(files: &[Utf8PathBuf]) -> Result<Document> {
    if files.is_empty() {
        bail!("no .feature files found");
    }
    let mut features = Vec::with_capacity(files.len());
    for file in files {
        let document =
            Document::from_path(file).wrap_err_with(|| format!("failed to load {file}"))?;
        tracing::debug!(%file, features = document.features.len(), "loaded feature file");
        features.extend(document.features);
    }
    Ok(Document::new(features))
}
