//! I/O requested by screens, executed by the runtime.

use std::time::Duration;

use chrono::{DateTime, Utc};

use kanri_api::types::{AnimeDraft, Follow, FollowCategory, FollowStatus, NewFollow};
use kanri_api::{AnimeFilter, FollowQuery, PageRequest};

use crate::screen::terms::TermKind;

/// Which search input a debounce wake-up belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebounceTarget {
    TermSearch(TermKind),
    FollowTableSearch,
    AddFollowSearch,
}

/// A single unit of I/O. Each one resolves to exactly one app message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Hello,
    ListAnimes {
        page: PageRequest,
        filter: AnimeFilter,
    },
    CreateAnime(AnimeDraft),
    UpdateAnime {
        id: u64,
        draft: AnimeDraft,
    },
    DeleteAnime {
        id: u64,
        name: String,
    },
    /// Category names for the anime editor's multi-select.
    EditorCategories,
    AnimeSeasons,
    /// Full term list plus usage stats.
    LoadTerms(TermKind),
    ListTerms(TermKind),
    SearchTerms {
        kind: TermKind,
        query: String,
    },
    CreateTerm {
        kind: TermKind,
        name: String,
    },
    RenameTerm {
        kind: TermKind,
        id: u64,
        name: String,
    },
    DeleteTerm {
        kind: TermKind,
        id: u64,
    },
    FollowedCategories,
    LoadFollowGroup {
        category: FollowCategory,
        page_size: u32,
    },
    ListFollowTable(FollowQuery),
    SetFollowStatus {
        id: u64,
        status: FollowStatus,
    },
    /// PUT a follow that is already loaded, with its new completion date.
    SetFinishedAt(Follow),
    /// GET the follow first, then PUT it with the new completion date.
    FetchAndSetFinishedAt {
        id: u64,
        finished_at: DateTime<Utc>,
    },
    CreateFollow(NewFollow),
    DeleteFollow {
        id: u64,
    },
    /// Anime name lookup for the add-follow picker.
    SearchAnimeOptions {
        query: String,
    },
    Debounce {
        target: DebounceTarget,
        generation: u64,
        window: Duration,
    },
}
