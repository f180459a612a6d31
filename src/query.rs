use std::cmp::Ordering;

use crate::catalog::VideoRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
        }
    }

    pub fn parse(s: &str) -> Option<SortKey> {
        match s {
            "date-desc" => Some(SortKey::DateDesc),
            "date-asc" => Some(SortKey::DateAsc),
            "title-asc" => Some(SortKey::TitleAsc),
            "title-desc" => Some(SortKey::TitleDesc),
            _ => None,
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::DateDesc => SortKey::DateAsc,
            SortKey::DateAsc => SortKey::TitleAsc,
            SortKey::TitleAsc => SortKey::TitleDesc,
            SortKey::TitleDesc => SortKey::DateDesc,
        }
    }
}

/// The current search/filter/sort selection. Rebuilt from the UI on every
/// change; never stored past the derivation it drives.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub search_term: String,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: SortKey,
}

impl QueryParams {
    pub fn matches(&self, record: &VideoRecord) -> bool {
        self.matches_lowered(record, &self.search_term.to_lowercase())
    }

    /// `term` is the pre-lowercased search term, folded once per
    /// derivation rather than once per record.
    fn matches_lowered(&self, record: &VideoRecord, term: &str) -> bool {
        let matches_search = term.is_empty()
            || record.title.to_lowercase().contains(term)
            || record
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(term));

        let matches_category = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => record.has_category(category),
        };

        let matches_tag = match self.tag.as_deref() {
            None | Some("") => true,
            Some(tag) => record.has_tag(tag),
        };

        matches_search && matches_category && matches_tag
    }
}

/// Derive the filtered, sorted view over the full record list. Pure: the
/// input is untouched and the same params always yield the same sequence.
pub fn apply(records: &[VideoRecord], params: &QueryParams) -> Vec<VideoRecord> {
    let term = params.search_term.to_lowercase();
    let mut filtered: Vec<VideoRecord> = records
        .iter()
        .filter(|r| params.matches_lowered(r, &term))
        .cloned()
        .collect();

    // sort_by is stable, so records with equal keys keep their store order.
    match params.sort {
        SortKey::DateDesc => filtered.sort_by(|a, b| b.sort_date.cmp(&a.sort_date)),
        SortKey::DateAsc => filtered.sort_by(|a, b| a.sort_date.cmp(&b.sort_date)),
        SortKey::TitleAsc => filtered.sort_by(title_cmp),
        SortKey::TitleDesc => filtered.sort_by(|a, b| title_cmp(b, a)),
    }

    filtered
}

/// Case-insensitive title order with the raw title as tie-breaker, keeping
/// the comparison total and deterministic.
fn title_cmp(a: &VideoRecord, b: &VideoRecord) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}
