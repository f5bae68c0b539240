use crate::model::RecordRef;
use crate::source::{RecordSource, SourceError};

/// Every catalog name, in listing order, for client-side substring search.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<RecordRef>,
    /// Catalog size reported by the source (may exceed `entries.len()` if
    /// the bulk limit was too small).
    count: usize,
}

impl NameIndex {
    pub fn new(entries: Vec<RecordRef>, count: usize) -> Self {
        Self { entries, count }
    }

    /// Fetch the whole listing in one request of `bulk_limit` entries.
    pub async fn load(source: &dyn RecordSource, bulk_limit: usize) -> Result<Self, SourceError> {
        let page = source.list_page(bulk_limit, 0).await?;
        tracing::info!(
            source = source.name(),
            entries = page.results.len(),
            count = page.count,
            "loaded name index"
        );
        if page.results.len() < page.count {
            tracing::warn!(
                entries = page.results.len(),
                count = page.count,
                "name index truncated by bulk limit"
            );
        }
        Ok(Self::new(page.results, page.count))
    }

    /// Case-insensitive substring matches in listing order, at most `cap`.
    pub fn filter(&self, query: &str, cap: usize) -> Vec<RecordRef> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .take(cap)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MockSource;

    fn index(names: &[&str]) -> NameIndex {
        let entries = names
            .iter()
            .map(|n| RecordRef {
                name: n.to_string(),
                url: String::new(),
            })
            .collect();
        NameIndex::new(entries, names.len())
    }

    fn names(refs: &[RecordRef]) -> Vec<&str> {
        refs.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn substring_matches_keep_listing_order() {
        let idx = index(&["charmander", "squirtle", "charizard"]);
        assert_eq!(names(&idx.filter("char", 20)), vec!["charmander", "charizard"]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let idx = index(&["Pikachu", "raichu"]);
        assert_eq!(names(&idx.filter("CHU", 20)), vec!["Pikachu", "raichu"]);
    }

    #[test]
    fn results_are_capped() {
        let all: Vec<String> = (0..50).map(|i| format!("mon-{i}")).collect();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let idx = index(&refs);
        let hits = idx.filter("mon", 20);
        assert_eq!(hits.len(), 20);
        assert_eq!(hits[19].name, "mon-19");
    }

    #[test]
    fn no_match_is_empty() {
        assert!(index(&["bulbasaur"]).filter("zzz", 20).is_empty());
    }

    #[tokio::test]
    async fn load_uses_one_bulk_request() {
        let source = MockSource::with_catalog(&["bulbasaur", "ivysaur"]);
        let idx = NameIndex::load(&source, 100_000).await.unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.count(), 2);
        assert_eq!(source.list_calls(), vec![(100_000, 0)]);
    }
}
