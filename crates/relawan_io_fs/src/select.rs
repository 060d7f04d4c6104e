//! Directory listing and newest-snapshot selection.

use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::spec::{SelectSourceError, SpecSourceEntry, SpecSourceSelection};
use crate::util::{compile_pattern, is_name_matching};

/// List regular files directly under `dir_source` (non-recursive).
///
/// Entries whose metadata cannot be read (e.g. broken symlinks) are skipped.
/// `time_created` is the platform birth time, or the last modification time
/// where birth time is not recorded.
pub fn list_source_entries<P>(dir_source: P) -> Result<Vec<SpecSourceEntry>, SelectSourceError>
where
    P: AsRef<Path>,
{
    let path_dir = dir_source.as_ref();
    let iter_entries = fs::read_dir(path_dir).map_err(|e| SelectSourceError::ListingFailed {
        path: path_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut l_entries = Vec::new();
    for entry in iter_entries {
        let entry = entry.map_err(|e| SelectSourceError::ListingFailed {
            path: path_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path_file = entry.path();
        let Ok(meta) = fs::metadata(&path_file) else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }

        let time_created = FileTime::from_creation_time(&meta)
            .unwrap_or_else(|| FileTime::from_last_modification_time(&meta));
        l_entries.push(SpecSourceEntry {
            name_file: entry.file_name().to_string_lossy().to_string(),
            path_file,
            time_created,
        });
    }

    Ok(l_entries)
}

/// Pick the newest entry whose basename matches `pattern`.
///
/// Equal creation times resolve to the lexicographically greatest name.
/// Returns `Ok(None)` when nothing matches.
pub fn select_newest_source(
    pattern: &str,
    entries: &[SpecSourceEntry],
) -> Result<Option<SpecSourceEntry>, SelectSourceError> {
    let matcher = compile_pattern(pattern)?;
    Ok(entries
        .iter()
        .filter(|entry| is_name_matching(&entry.name_file, &matcher))
        .max_by(|a, b| {
            a.time_created
                .cmp(&b.time_created)
                .then_with(|| a.name_file.cmp(&b.name_file))
        })
        .cloned())
}

/// Select registry (required) and family detail (optional) sources.
pub fn select_sources(
    entries: &[SpecSourceEntry],
    pattern_registry: &str,
    pattern_family: &str,
) -> Result<SpecSourceSelection, SelectSourceError> {
    let Some(registry) = select_newest_source(pattern_registry, entries)? else {
        return Err(SelectSourceError::NoInputFound {
            pattern: pattern_registry.to_string(),
        });
    };
    let family = select_newest_source(pattern_family, entries)?;

    Ok(SpecSourceSelection { registry, family })
}
