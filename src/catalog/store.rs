use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{CatalogError, Result};

use super::models::VideoRecord;

/// In-memory record store. Loaded once per session; downstream layers only
/// ever derive views over it, never mutate it.
pub struct CatalogStore {
    records: Vec<VideoRecord>,
    used_fallback: bool,
}

impl CatalogStore {
    /// Load the record file. Any failure (missing file, unreadable,
    /// malformed JSON) falls back to the built-in record set instead of
    /// surfacing an error.
    pub fn open(path: &Path) -> Self {
        match try_load(path) {
            Ok(records) => Self {
                records: normalize(records),
                used_fallback: false,
            },
            Err(e) => {
                eprintln!(
                    "vidcat: could not load {} ({}), using built-in records",
                    path.display(),
                    e
                );
                Self {
                    records: normalize(fallback_records()),
                    used_fallback: true,
                }
            }
        }
    }

    pub fn from_records(records: Vec<VideoRecord>) -> Self {
        Self {
            records: normalize(records),
            used_fallback: false,
        }
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn get(&self, id: &str) -> Result<&VideoRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("Video with id {} not found", id)))
    }

    /// Distinct categories across the store, sorted. Used to populate the
    /// category selector.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.records.iter().flat_map(|r| r.categories.iter()))
    }

    /// Distinct tags across the store, sorted.
    pub fn tags(&self) -> Vec<String> {
        distinct(self.records.iter().flat_map(|r| r.tags.iter()))
    }
}

fn try_load(path: &Path) -> Result<Vec<VideoRecord>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Parse sort dates and enforce id uniqueness (first occurrence wins).
fn normalize(records: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .map(VideoRecord::normalize)
        .collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let set: HashSet<&String> = values.collect();
    let mut out: Vec<String> = set.into_iter().cloned().collect();
    out.sort();
    out
}

/// The built-in record set used when the data file cannot be loaded,
/// mirroring the archive's sample entries.
pub fn fallback_records() -> Vec<VideoRecord> {
    let raw = r#"[
        {
            "id": "1",
            "title": "Test Video 1",
            "description": "A first sample video.",
            "date": "2023-01-01",
            "categories": ["Test"],
            "tags": ["Demo"],
            "thumbnail": "",
            "local_path": "Videos/test1.mp4"
        },
        {
            "id": "2",
            "title": "Test Video 2",
            "description": "Another sample video.",
            "date": "2023-02-01",
            "categories": ["Sample"],
            "tags": ["Test"],
            "thumbnail": "",
            "local_path": "Videos/test2.mp4"
        }
    ]"#;
    serde_json::from_str(raw).expect("built-in records are valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_data(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("video_data.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_open_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_data(
            &dir,
            r#"[{"id":"a","title":"Alpha","date":"2023-01-01"}]"#,
        );
        let store = CatalogStore::open(&path);
        assert!(!store.used_fallback());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].title, "Alpha");
        assert_eq!(
            store.records()[0].sort_date,
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_open_missing_file_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("nope.json"));
        assert!(store.used_fallback());
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].title, "Test Video 1");
    }

    #[test]
    fn test_open_malformed_json_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, "{ not json");
        let store = CatalogStore::open(&path);
        assert!(store.used_fallback());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let store = CatalogStore::from_records(
            serde_json::from_str(
                r#"[
                    {"id":"x","title":"First","date":"2023-01-01"},
                    {"id":"x","title":"Second","date":"2023-02-01"}
                ]"#,
            )
            .unwrap(),
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x").unwrap().title, "First");
    }

    #[test]
    fn test_get_not_found() {
        let store = CatalogStore::from_records(Vec::new());
        assert!(matches!(
            store.get("missing"),
            Err(crate::errors::CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_vocabularies_distinct_and_sorted() {
        let store = CatalogStore::from_records(
            serde_json::from_str(
                r#"[
                    {"id":"1","title":"A","date":"2023-01-01","categories":["Music","Talks"],"tags":["b","a"]},
                    {"id":"2","title":"B","date":"2023-01-02","categories":["Music"],"tags":["a"]}
                ]"#,
            )
            .unwrap(),
        );
        assert_eq!(store.categories(), vec!["Music", "Talks"]);
        assert_eq!(store.tags(), vec!["a", "b"]);
    }

    #[test]
    fn test_fallback_records_are_two() {
        let records = fallback_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.local_path.is_some()));
    }
}
