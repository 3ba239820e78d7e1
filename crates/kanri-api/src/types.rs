//! Catalog entities and the wire envelopes they travel in.
//!
//! The server speaks PascalCase records (`ID`, `Name`, ...) inside
//! camel/snake-case envelopes. Everything here is normalized into plain
//! Rust types before it leaves the crate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Pages ─────────────────────────────────────────────────────────

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        let total = total.unwrap_or(items.len() as u64);
        Self { items, total }
    }
}

// ── Anime ─────────────────────────────────────────────────────────

/// An anime as shown in the console, with name lists already flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anime {
    pub id: u64,
    pub name: String,
    pub aliases: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub production: String,
    pub season: String,
    pub episodes: u32,
    pub image: String,
}

/// `{ "Name": ... }` reference used for nested categories and tags.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedRef {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Anime record exactly as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnimeRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Aliases", default)]
    pub aliases: Option<String>,
    #[serde(rename = "Categories", default)]
    pub categories: Option<Vec<NamedRef>>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<Vec<NamedRef>>,
    #[serde(rename = "Production", default)]
    pub production: String,
    #[serde(rename = "Season", default)]
    pub season: String,
    #[serde(rename = "Episodes", default)]
    pub episodes: u32,
    #[serde(rename = "Image", default)]
    pub image: String,
}

impl AnimeRecord {
    pub fn into_anime(self) -> Anime {
        Anime {
            id: self.id,
            name: self.name,
            aliases: split_aliases(self.aliases.as_deref().unwrap_or_default()),
            categories: names(self.categories),
            tags: names(self.tags),
            production: self.production,
            season: self.season,
            episodes: self.episodes,
            image: self.image,
        }
    }
}

/// Split the comma-joined alias string. Blank segments are dropped.
pub fn split_aliases(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn names(refs: Option<Vec<NamedRef>>) -> Vec<String> {
    refs.unwrap_or_default().into_iter().map(|r| r.name).collect()
}

/// Body for anime create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnimeDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Aliases")]
    pub aliases: Vec<String>,
    #[serde(rename = "Categories")]
    pub categories: Vec<String>,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
    #[serde(rename = "Production")]
    pub production: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Episodes")]
    pub episodes: u32,
    #[serde(rename = "Image")]
    pub image: String,
}

impl From<&Anime> for AnimeDraft {
    fn from(anime: &Anime) -> Self {
        Self {
            name: anime.name.clone(),
            aliases: anime.aliases.clone(),
            categories: anime.categories.clone(),
            tags: anime.tags.clone(),
            production: anime.production.clone(),
            season: anime.season.clone(),
            episodes: anime.episodes,
            image: anime.image.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnimeListEnvelope {
    #[serde(default)]
    pub animes: Option<Vec<AnimeRecord>>,
    #[serde(default)]
    pub total: Option<u64>,
}

// ── Seasons ───────────────────────────────────────────────────────

/// The four quarterly season codes, in calendar order.
pub const SEASON_MONTHS: [u8; 4] = [1, 4, 7, 10];

/// A `YYYY-MM` season token where `MM` is one of 01, 04, 07, 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonToken {
    pub year: u16,
    pub month: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid season token {0:?}: expected YYYY-MM with MM in 01/04/07/10")]
pub struct SeasonTokenError(pub String);

impl SeasonToken {
    pub fn new(year: u16, month: u8) -> Option<Self> {
        SEASON_MONTHS
            .contains(&month)
            .then_some(Self { year, month })
    }

    /// The four tokens of a year, in calendar order.
    pub fn year_tokens(year: u16) -> [SeasonToken; 4] {
        SEASON_MONTHS.map(|month| SeasonToken { year, month })
    }

    /// Display name of the quarter.
    pub fn quarter_name(&self) -> &'static str {
        match self.month {
            1 => "Winter",
            4 => "Spring",
            7 => "Summer",
            _ => "Fall",
        }
    }
}

impl FromStr for SeasonToken {
    type Err = SeasonTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SeasonTokenError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: u16 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        SeasonToken::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for SeasonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Year → season code (`"01"`..`"10"`) → anime count.
pub type SeasonCounts = BTreeMap<String, BTreeMap<String, u32>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SeasonsEnvelope {
    #[serde(default)]
    pub seasons: SeasonCounts,
}

// ── Categories & tags ─────────────────────────────────────────────

/// A named catalog term. Categories and tags share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: String,
}

pub type Category = Term;
pub type Tag = Term;

/// Body for term create and rename.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TermBody<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
}

/// Usage count per term name.
pub type TermStats = BTreeMap<String, u64>;

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<Term>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsEnvelope {
    #[serde(default)]
    pub tags: Option<Vec<Term>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryStatsEnvelope {
    #[serde(default)]
    pub category_stats: TermStats,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagStatsEnvelope {
    #[serde(default)]
    pub tag_stats: TermStats,
}

// ── Follows ───────────────────────────────────────────────────────

/// Which shelf a followed anime sits on.
///
/// Wire values are fixed by the server: there is no 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FollowCategory {
    Classic,
    HighQuality,
    New,
    ToiletPaper,
    Masterpiece,
}

impl FollowCategory {
    pub const ALL: &[FollowCategory] = &[
        Self::Classic,
        Self::HighQuality,
        Self::New,
        Self::ToiletPaper,
        Self::Masterpiece,
    ];

    pub fn value(self) -> u8 {
        match self {
            Self::Classic => 0,
            Self::HighQuality => 1,
            Self::New => 2,
            Self::ToiletPaper => 4,
            Self::Masterpiece => 5,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Classic),
            1 => Some(Self::HighQuality),
            2 => Some(Self::New),
            4 => Some(Self::ToiletPaper),
            5 => Some(Self::Masterpiece),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::HighQuality => "High Quality",
            Self::New => "New",
            Self::ToiletPaper => "Toilet Paper",
            Self::Masterpiece => "Masterpiece",
        }
    }

    /// Label used by the server-side category listing.
    pub fn native_label(self) -> &'static str {
        match self {
            Self::Classic => "经典",
            Self::HighQuality => "高质量",
            Self::New => "新番",
            Self::ToiletPaper => "厕纸",
            Self::Masterpiece => "神作",
        }
    }

    /// Kebab-case key used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::HighQuality => "high-quality",
            Self::New => "new",
            Self::ToiletPaper => "toilet-paper",
            Self::Masterpiece => "masterpiece",
        }
    }
}

impl TryFrom<u8> for FollowCategory {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("unknown follow category {value}"))
    }
}

impl From<FollowCategory> for u8 {
    fn from(category: FollowCategory) -> u8 {
        category.value()
    }
}

impl FromStr for FollowCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Self::try_from(value);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.native_label() == s)
            .ok_or_else(|| format!("unknown follow category {s:?}"))
    }
}

impl fmt::Display for FollowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal watch state of a followed anime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FollowStatus {
    WantToWatch,
    Watching,
    Watched,
}

impl FollowStatus {
    pub const ALL: &[FollowStatus] = &[Self::WantToWatch, Self::Watching, Self::Watched];

    pub fn value(self) -> u8 {
        match self {
            Self::WantToWatch => 0,
            Self::Watching => 1,
            Self::Watched => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WantToWatch => "Want to Watch",
            Self::Watching => "Watching",
            Self::Watched => "Watched",
        }
    }

    pub fn native_label(self) -> &'static str {
        match self {
            Self::WantToWatch => "想看",
            Self::Watching => "在看",
            Self::Watched => "看过",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::WantToWatch => "want-to-watch",
            Self::Watching => "watching",
            Self::Watched => "watched",
        }
    }
}

impl TryFrom<u8> for FollowStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::WantToWatch),
            1 => Ok(Self::Watching),
            2 => Ok(Self::Watched),
            other => Err(format!("unknown follow status {other}")),
        }
    }
}

impl From<FollowStatus> for u8 {
    fn from(status: FollowStatus) -> u8 {
        status.value()
    }
}

impl FromStr for FollowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Self::try_from(value);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.key().eq_ignore_ascii_case(s) || st.native_label() == s)
            .ok_or_else(|| format!("unknown follow status {s:?}"))
    }
}

impl fmt::Display for FollowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of the anime a follow record embeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowedAnime {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Season", default)]
    pub season: String,
    /// Fields the console does not read, kept so a PUT echoes them back.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A personal tracking record for one anime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "AnimeID", default)]
    pub anime_id: u64,
    #[serde(rename = "Anime", default)]
    pub anime: FollowedAnime,
    #[serde(rename = "Category")]
    pub category: FollowCategory,
    #[serde(rename = "Status")]
    pub status: FollowStatus,
    #[serde(rename = "FinishedAt", default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Follow {
    /// Copy with a new completion date. Status is left alone.
    pub fn with_finished_at(&self, finished_at: DateTime<Utc>) -> Follow {
        Follow {
            finished_at: Some(finished_at),
            ..self.clone()
        }
    }
}

/// Body for follow creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFollow {
    #[serde(rename = "animeID")]
    pub anime_id: u64,
    pub category: FollowCategory,
    pub status: FollowStatus,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusBody {
    pub status: FollowStatus,
}

/// A shelf as listed by `/follows/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowedCategory {
    pub value: FollowCategory,
    #[serde(rename = "string", default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowListEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Follow>>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FollowedCategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<FollowedCategory>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HelloEnvelope {
    #[serde(default)]
    pub msg: String,
}
