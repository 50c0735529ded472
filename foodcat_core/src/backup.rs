//! Backup file reading and writing.
//!
//! Output is written atomically: serialized to a temp file in the
//! destination directory, then renamed over the target path. The JSON is
//! pretty-printed with 2-space indentation and non-ASCII characters are
//! left unescaped, so the file stays readable and diffable against the
//! input.

use crate::{Backup, Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load a backup document from a JSON file
///
/// A missing file or invalid JSON is an error; callers treat it as fatal.
pub fn load_backup(path: &Path) -> Result<Backup> {
    let contents = std::fs::read_to_string(path)?;
    let backup: Backup = serde_json::from_str(&contents)?;
    tracing::info!("Loaded {} foods from {:?}", backup.foods.len(), path);
    Ok(backup)
}

/// Save a backup document as pretty-printed JSON
pub fn save_backup(path: &Path, backup: &Backup) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string_pretty(backup)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;

    // Atomically replace whatever is at the target path
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote {} foods to {:?}", backup.foods.len(), path);
    Ok(())
}

/// Derive the sibling output path for an input file
///
/// `backup.json` with suffix `-categorized` becomes
/// `backup-categorized.json` next to the input, so the original file is
/// never written over.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}{}", stem, suffix);
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("/data/backup.json"), "-categorized"),
            PathBuf::from("/data/backup-categorized.json")
        );
        assert_eq!(
            derive_output_path(Path::new("backup.json"), "-corrected"),
            PathBuf::from("backup-corrected.json")
        );
        assert_eq!(
            derive_output_path(Path::new("/data/backup"), "-categorized"),
            PathBuf::from("/data/backup-categorized")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("backup.json");

        let backup: Backup = serde_json::from_str(
            r#"{
              "version": "1.0",
              "foods": [
                {"name": "Châtaigne grillée", "proteins": 3.5, "carbs": 33, "fats": 2,
                 "id": "chataigne", "price": 4.99}
              ]
            }"#,
        )
        .unwrap();

        save_backup(&path, &backup).unwrap();
        let loaded = load_backup(&path).unwrap();

        assert_eq!(loaded.foods.len(), 1);
        assert_eq!(loaded.foods[0].name, "Châtaigne grillée");
        assert_eq!(loaded.foods[0].extra.get("id"), Some(&serde_json::json!("chataigne")));
        assert_eq!(loaded.extra.get("version"), Some(&serde_json::json!("1.0")));
    }

    #[test]
    fn test_output_is_pretty_and_unescaped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("backup.json");

        let backup: Backup =
            serde_json::from_str(r#"{"foods": [{"name": "Café"}]}"#).unwrap();
        save_backup(&path, &backup).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("  \"foods\""), "expected 2-space indent:\n{}", written);
        assert!(written.contains("Café"), "expected unescaped UTF-8:\n{}", written);
        assert!(!written.contains("\\u"), "expected no escape sequences:\n{}", written);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("backup.json");

        std::fs::write(&path, "old contents").unwrap();

        let backup: Backup = serde_json::from_str(r#"{"foods": []}"#).unwrap();
        save_backup(&path, &backup).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("foods"));

        // No stray temp files left behind
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "backup.json")
            .collect();
        assert!(extras.is_empty(), "Expected only backup.json, found: {:?}", extras);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_backup(&temp_dir.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_backup(&path).is_err());
    }
}
