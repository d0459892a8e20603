//! List-query shaping: page window plus allow-listed sort column and direction.
//!
//! The boundary is permissive: out-of-range sizes and unknown sort values fall
//! back to defaults instead of failing. Only a non-numeric `page` or
//! `per_page` is rejected.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    CreatedOn,
    UpdatedOn,
    Id,
}

impl SortColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::CreatedOn => "created_on",
            SortColumn::UpdatedOn => "updated_on",
            SortColumn::Id => "id",
        }
    }

    fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "updated" => SortColumn::UpdatedOn,
            "id" => SortColumn::Id,
            _ => SortColumn::CreatedOn,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Strips every whitespace character and lowercases.
fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// Raw query-string values as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl PaginationParams {
    /// Collects the known keys from decoded query pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = PaginationParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "per_page" => &mut params.per_page,
                "sort" => &mut params.sort,
                "direction" => &mut params.direction,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("invalid per_page format: {0}")]
    PerPage(String),
    #[error("invalid page format: {0}")]
    Page(String),
}

/// A validated page request. `page` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub sort: SortColumn,
    pub direction: SortDirection,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
            sort: SortColumn::default(),
            direction: SortDirection::default(),
        }
    }
}

impl Pagination {
    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.per_page)
    }

    pub fn from_params(params: &PaginationParams) -> Result<Self, PaginationError> {
        let mut pagi = Pagination::default();

        if let Some(raw) = &params.per_page {
            let per_page: i64 = raw.trim().parse().map_err(|_| PaginationError::PerPage(raw.clone()))?;
            pagi.per_page = if per_page <= 0 {
                DEFAULT_PER_PAGE
            } else {
                per_page.min(i64::from(MAX_PER_PAGE)) as u32
            };
        }

        if let Some(raw) = &params.page {
            let page: i64 = raw.trim().parse().map_err(|_| PaginationError::Page(raw.clone()))?;
            // 1-based at the boundary
            pagi.page = page.saturating_sub(1).clamp(0, i64::from(u32::MAX)) as u32;
        }

        if let Some(raw) = &params.sort {
            pagi.sort = SortColumn::parse(raw);
        }
        if let Some(raw) = &params.direction {
            pagi.direction = SortDirection::parse(raw);
        }

        Ok(pagi)
    }
}
