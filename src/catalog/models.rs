use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel for records whose `date` field does not parse: they sort as
/// the earliest possible date.
pub fn earliest_date() -> NaiveDate {
    NaiveDate::MIN
}

/// One catalog entry. Immutable after load; only `sort_date` is computed,
/// everything else comes straight from the record file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw date string as found in the source, kept for display.
    pub date: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub local_path: Option<String>,
    /// Parsed once at load time (see [`CatalogStore`](super::CatalogStore)).
    #[serde(skip, default = "earliest_date")]
    pub sort_date: NaiveDate,
}

impl VideoRecord {
    /// Parse the raw `date` field; unparseable dates get the sentinel
    /// minimum so they still have a deterministic total order.
    pub fn normalize(mut self) -> Self {
        self.sort_date = parse_record_date(&self.date);
        self
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

pub fn parse_record_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").unwrap_or_else(|_| earliest_date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(date: &str) -> String {
        format!(
            r#"{{"id":"1","title":"Clip","date":"{date}","video_url":"","video_id":""}}"#
        )
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let rec: VideoRecord = serde_json::from_str(&record_json("2023-01-01")).unwrap();
        assert!(rec.description.is_none());
        assert!(rec.categories.is_empty());
        assert!(rec.tags.is_empty());
        assert!(rec.thumbnail.is_none());
        assert!(rec.local_path.is_none());
    }

    #[test]
    fn test_unknown_source_fields_ignored() {
        // video_url / video_id exist in the source format but are not modeled.
        let rec: VideoRecord = serde_json::from_str(&record_json("2023-01-01")).unwrap();
        assert_eq!(rec.id, "1");
    }

    #[test]
    fn test_normalize_parses_date() {
        let rec: VideoRecord = serde_json::from_str(&record_json("2023-02-01")).unwrap();
        let rec = rec.normalize();
        assert_eq!(rec.sort_date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    }

    #[test]
    fn test_normalize_unparseable_date_is_sentinel() {
        let rec: VideoRecord = serde_json::from_str(&record_json("not a date")).unwrap();
        let rec = rec.normalize();
        assert_eq!(rec.sort_date, earliest_date());
    }

    #[test]
    fn test_parse_record_date_trims() {
        assert_eq!(
            parse_record_date(" 2023-01-01 "),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_has_category_and_tag() {
        let rec = VideoRecord {
            id: "1".into(),
            title: "Clip".into(),
            description: None,
            date: "2023-01-01".into(),
            categories: vec!["Talks".into()],
            tags: vec!["demo".into()],
            thumbnail: None,
            local_path: None,
            sort_date: earliest_date(),
        };
        assert!(rec.has_category("Talks"));
        assert!(!rec.has_category("Music"));
        assert!(rec.has_tag("demo"));
        assert!(!rec.has_tag("live"));
    }
}
