use crate::{error::ProjectError, layout::TargetDir};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directory segment that starts a model's identity within the compiled tree.
pub const MODELS_SEGMENT: &str = "models";

/// Recursively enumerate compiled `.sql` files under the target directory.
///
/// Results are sorted so repeated runs submit units in a stable order. An
/// empty tree is a valid, empty batch rather than an error.
pub fn discover_models(dir: &TargetDir) -> Result<Vec<PathBuf>, ProjectError> {
    dir.verify()?;

    let mut models = Vec::new();
    for entry in WalkDir::new(dir.path()) {
        let entry = entry.map_err(|source| ProjectError::Walk {
            path: dir.path().to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && has_sql_extension(entry.path()) {
            models.push(entry.into_path());
        }
    }
    models.sort();

    debug!(
        dir = %dir.path().display(),
        count = models.len(),
        "Discovered compiled models."
    );
    Ok(models)
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}

/// Trim a compiled path down to its identity: the sub-path starting at the
/// first occurrence of the given segment, joined with `/` regardless of
/// platform. Non-UTF-8 components are carried through lossily rather than
/// dropped, so the identity never shortens silently.
///
/// `target/compiled/acme/models/marts/orders.sql` → `models/marts/orders.sql`.
/// Returns `None` when the segment never appears; callers treat that as a
/// layout violation instead of inventing a label.
pub fn trim_from_segment(path: &Path, segment: &str) -> Option<String> {
    let components: Vec<_> = path.iter().map(|part| part.to_string_lossy()).collect();
    let start = components.iter().position(|part| part == segment)?;
    Some(components[start..].join("/"))
}
