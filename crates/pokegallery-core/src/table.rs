//! Client-side table over a fixed slice of the catalog.
//!
//! Unlike the query controller, the table loads its rows once and does all
//! filtering, sorting and paging locally.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::join::join_all_or_nothing;
use crate::model::DetailRecord;
use crate::source::{DetailKey, RecordSource, SourceError};

pub const DEFAULT_FETCH_LIMIT: usize = 50;
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
}

impl From<&DetailRecord> for TableRow {
    fn from(r: &DetailRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            height: r.height,
            weight: r.weight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Name,
    Height,
    Weight,
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Column::Id),
            "name" => Ok(Column::Name),
            "height" => Ok(Column::Height),
            "weight" => Ok(Column::Weight),
            other => Err(format!("unknown column {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct CatalogTable {
    rows: Vec<TableRow>,
    filter: String,
    sort: Option<(Column, Direction)>,
    page: usize,
    page_size: usize,
}

impl CatalogTable {
    pub fn new(rows: Vec<TableRow>, page_size: usize) -> Self {
        Self {
            rows,
            filter: String::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Fetch the first `fetch_limit` records with all their details.
    pub async fn load<S>(
        source: std::sync::Arc<S>,
        fetch_limit: usize,
        page_size: usize,
    ) -> Result<Self, SourceError>
    where
        S: RecordSource + ?Sized + 'static,
    {
        let listing = source.list_page(fetch_limit, 0).await?;
        let tasks = listing.results.into_iter().map(|r| {
            let source = std::sync::Arc::clone(&source);
            async move {
                let key = DetailKey::Url(r.url);
                source.fetch_detail(&key).await
            }
        });
        let records = join_all_or_nothing(tasks).await?;
        tracing::debug!(rows = records.len(), "loaded table");
        Ok(Self::new(records.iter().map(TableRow::from).collect(), page_size))
    }

    /// Set the name filter and go back to the first page.
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_lowercase();
        self.page = 1;
    }

    pub fn sort_by(&mut self, column: Column, direction: Direction) {
        self.sort = Some((column, direction));
    }

    /// Rows after filtering and sorting.
    pub fn visible_rows(&self) -> Vec<&TableRow> {
        let mut rows: Vec<&TableRow> = self
            .rows
            .iter()
            .filter(|r| self.filter.is_empty() || r.name.to_lowercase().contains(&self.filter))
            .collect();
        if let Some((column, direction)) = self.sort {
            rows.sort_by(|a, b| {
                let ord = compare(a, b, column);
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    pub fn page_count(&self) -> usize {
        self.visible_rows().len().div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&TableRow> {
        self.visible_rows()
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn compare(a: &TableRow, b: &TableRow, column: Column) -> Ordering {
    match column {
        Column::Id => a.id.cmp(&b.id),
        Column::Name => a.name.cmp(&b.name),
        Column::Height => a.height.cmp(&b.height),
        Column::Weight => a.weight.cmp(&b.weight),
    }
}
