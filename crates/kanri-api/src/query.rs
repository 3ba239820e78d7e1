//! Request parameters for list endpoints.

use crate::types::{FollowCategory, FollowStatus};

/// 1-based page position. Sent to the server as decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Which slice of the anime catalog to list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum AnimeFilter {
    #[default]
    None,
    BySeason(String),
    ByCategory(String),
    ByTag(String),
    ByName(String),
}

impl AnimeFilter {
    /// Trim the filter token; a blank token means no filter at all.
    pub fn normalized(&self) -> AnimeFilter {
        let rebuild = |token: &str, make: fn(String) -> AnimeFilter| {
            let token = token.trim();
            if token.is_empty() {
                AnimeFilter::None
            } else {
                make(token.to_string())
            }
        };
        match self {
            Self::None => Self::None,
            Self::BySeason(t) => rebuild(t, Self::BySeason),
            Self::ByCategory(t) => rebuild(t, Self::ByCategory),
            Self::ByTag(t) => rebuild(t, Self::ByTag),
            Self::ByName(t) => rebuild(t, Self::ByName),
        }
    }

    /// Endpoint path relative to the API base.
    pub fn path(&self) -> &'static str {
        match self.normalized() {
            Self::None => "animes",
            Self::BySeason(_) => "animes/season",
            Self::ByCategory(_) => "animes/category",
            Self::ByTag(_) => "animes/tag",
            Self::ByName(_) => "animes/search",
        }
    }

    /// The extra query parameter carrying the filter token.
    pub fn query_param(&self) -> Option<(&'static str, String)> {
        match self.normalized() {
            Self::None => None,
            Self::BySeason(t) => Some(("season", t)),
            Self::ByCategory(t) => Some(("category", t)),
            Self::ByTag(t) => Some(("tag", t)),
            Self::ByName(t) => Some(("name", t)),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.normalized(), Self::None)
    }
}

impl std::fmt::Display for AnimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "all"),
            Self::BySeason(t) => write!(f, "season {t}"),
            Self::ByCategory(t) => write!(f, "category {t}"),
            Self::ByTag(t) => write!(f, "tag {t}"),
            Self::ByName(t) => write!(f, "name \"{t}\""),
        }
    }
}

/// Sort direction for the follow table's anime-name column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Column header click cycle: unsorted → ascending → descending → unsorted.
    pub fn cycle(current: Option<SortOrder>) -> Option<SortOrder> {
        match current {
            None => Some(Self::Ascending),
            Some(Self::Ascending) => Some(Self::Descending),
            Some(Self::Descending) => None,
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort order {other:?}")),
        }
    }
}

/// Parameters for `GET /follows`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FollowQuery {
    pub page: PageRequest,
    pub category: Option<FollowCategory>,
    pub status: Option<FollowStatus>,
    pub name: Option<String>,
    pub sort: Option<SortOrder>,
}

impl FollowQuery {
    /// First page of a single shelf.
    pub fn for_category(category: FollowCategory, page_size: u32) -> Self {
        Self {
            page: PageRequest::first(page_size),
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page.query_pairs();
        if let Some(category) = self.category {
            pairs.push(("category", category.value().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.value().to_string()));
        }
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_param().to_string()));
        }
        pairs
    }
}
