#![allow(dead_code, clippy::unwrap_used)]

//! In-memory catalog server for driving the runtime in tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use kanri_api::types::{
    Anime, AnimeDraft, Category, Follow, FollowCategory, FollowStatus, FollowedAnime,
    FollowedCategory, NewFollow, Page, SeasonCounts, Tag, Term, TermStats,
};
use kanri_api::{AnimeFilter, ApiError, CatalogService, FollowQuery, PageRequest, SortOrder};

/// Every request the fake received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ping,
    Hello,
    ListAnimes(PageRequest, AnimeFilter),
    AnimeSeasons,
    CreateAnime(String),
    UpdateAnime(u64),
    DeleteAnime(u64),
    ListCategories,
    SearchCategories(String),
    CategoryStats,
    CreateCategory(String),
    UpdateCategory(u64, String),
    DeleteCategory(u64),
    ListTags,
    SearchTags(String),
    TagStats,
    CreateTag(String),
    UpdateTag(u64, String),
    DeleteTag(u64),
    FollowedCategories,
    ListFollows(FollowQuery),
    GetFollow(u64),
    CreateFollow(NewFollow),
    UpdateFollow(Follow),
    UpdateFollowStatus(u64, FollowStatus),
    DeleteFollow(u64),
}

#[derive(Debug, Default)]
struct State {
    animes: Vec<Anime>,
    categories: Vec<Term>,
    tags: Vec<Term>,
    follows: Vec<Follow>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    list_delays: Mutex<HashMap<AnimeFilter, Duration>>,
    failing: Mutex<HashSet<&'static str>>,
    panicking: Mutex<HashSet<&'static str>>,
}

pub fn anime(id: u64, name: &str, season: &str, tags: &[&str]) -> Anime {
    Anime {
        id,
        name: name.to_string(),
        aliases: Vec::new(),
        categories: Vec::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        production: String::new(),
        season: season.to_string(),
        episodes: 12,
        image: String::new(),
    }
}

pub fn follow(id: u64, name: &str, category: FollowCategory, status: FollowStatus) -> Follow {
    Follow {
        id,
        anime_id: id * 100,
        anime: FollowedAnime {
            name: name.to_string(),
            season: "2024-04".into(),
            ..Default::default()
        },
        category,
        status,
        finished_at: None,
        created_at: None,
        extra: Default::default(),
    }
}

fn not_found(what: &str, id: u64) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("{what} {id} not found"),
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let size = page.page_size as usize;
    let start = (page.page as usize - 1) * size;
    let slice = items.iter().skip(start).take(size).cloned().collect();
    Page::new(slice, Some(items.len() as u64))
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_animes(self, animes: Vec<Anime>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(animes.iter().map(|a| a.id).max().unwrap_or(0));
            state.animes = animes;
        }
        self
    }

    /// `count` anime named `Show 1..=count`.
    pub fn with_numbered_animes(self, count: u64) -> Self {
        let animes = (1..=count)
            .map(|i| anime(i, &format!("Show {i}"), "2024-01", &[]))
            .collect();
        self.with_animes(animes)
    }

    pub fn with_categories(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for name in names {
                let id = state.next_id();
                state.categories.push(Term {
                    id,
                    name: name.to_string(),
                });
            }
        }
        self
    }

    pub fn with_tags(self, names: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for name in names {
                let id = state.next_id();
                state.tags.push(Term {
                    id,
                    name: name.to_string(),
                });
            }
        }
        self
    }

    pub fn with_follows(self, follows: Vec<Follow>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(follows.iter().map(|f| f.id).max().unwrap_or(0));
            state.follows = follows;
        }
        self
    }

    /// Hold list responses for `filter` back by `delay`.
    pub fn delay_list(&self, filter: AnimeFilter, delay: Duration) {
        self.list_delays.lock().unwrap().insert(filter, delay);
    }

    /// Make every call to `method` fail with a 500.
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    /// Make every call to `method` panic inside the effect task.
    pub fn panic_on(&self, method: &'static str) {
        self.panicking.lock().unwrap().insert(method);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn categories(&self) -> Vec<Term> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn follows(&self) -> Vec<Follow> {
        self.state.lock().unwrap().follows.clone()
    }

    pub fn anime_count(&self) -> usize {
        self.state.lock().unwrap().animes.len()
    }

    fn record(&self, call: Call, method: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        let panics = self.panicking.lock().unwrap().contains(method);
        if panics {
            panic!("{method} panicked");
        }
        if self.failing.lock().unwrap().contains(method) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("{method} exploded"),
            });
        }
        Ok(())
    }

    fn terms(&self, kind_is_tag: bool) -> Vec<Term> {
        let state = self.state.lock().unwrap();
        if kind_is_tag {
            state.tags.clone()
        } else {
            state.categories.clone()
        }
    }

    fn create_term(&self, tag: bool, name: &str) -> Result<Option<Term>, ApiError> {
        let mut state = self.state.lock().unwrap();
        let exists = if tag { &state.tags } else { &state.categories }
            .iter()
            .any(|t| t.name == name);
        if exists {
            return Err(ApiError::Api {
                status: 409,
                message: format!("{name} already exists"),
            });
        }
        let term = Term {
            id: state.next_id(),
            name: name.to_string(),
        };
        if tag {
            state.tags.push(term.clone());
        } else {
            state.categories.push(term.clone());
        }
        Ok(Some(term))
    }

    fn rename_term(&self, tag: bool, id: u64, name: &str) -> Result<Option<Term>, ApiError> {
        let mut state = self.state.lock().unwrap();
        let terms = if tag { &mut state.tags } else { &mut state.categories };
        let term = terms
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("term", id))?;
        term.name = name.to_string();
        Ok(Some(term.clone()))
    }

    fn delete_term(&self, tag: bool, id: u64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let terms = if tag { &mut state.tags } else { &mut state.categories };
        terms.retain(|t| t.id != id);
        Ok(())
    }

    fn stats(&self, tag: bool) -> TermStats {
        let state = self.state.lock().unwrap();
        let mut stats = TermStats::new();
        for anime in &state.animes {
            let names = if tag { &anime.tags } else { &anime.categories };
            for name in names {
                *stats.entry(name.clone()).or_insert(0) += 1;
            }
        }
        stats
    }
}

impl CatalogService for FakeCatalog {
    type Error = ApiError;

    async fn ping(&self) -> Result<String, ApiError> {
        self.record(Call::Ping, "ping")?;
        Ok("pong".into())
    }

    async fn hello(&self) -> Result<String, ApiError> {
        self.record(Call::Hello, "hello")?;
        Ok("hello from the catalog".into())
    }

    async fn list_animes(
        &self,
        page: PageRequest,
        filter: &AnimeFilter,
    ) -> Result<Page<Anime>, ApiError> {
        self.record(Call::ListAnimes(page, filter.clone()), "list_animes")?;
        let delay = self.list_delays.lock().unwrap().get(filter).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().unwrap();
        let matching: Vec<Anime> = state
            .animes
            .iter()
            .filter(|a| match filter.normalized() {
                AnimeFilter::None => true,
                AnimeFilter::BySeason(s) => a.season == s,
                AnimeFilter::ByCategory(c) => a.categories.contains(&c),
                AnimeFilter::ByTag(t) => a.tags.contains(&t),
                AnimeFilter::ByName(q) => a.name.to_lowercase().contains(&q.to_lowercase()),
            })
            .cloned()
            .collect();
        Ok(paginate(&matching, page))
    }

    async fn anime_seasons(&self) -> Result<SeasonCounts, ApiError> {
        self.record(Call::AnimeSeasons, "anime_seasons")?;
        let state = self.state.lock().unwrap();
        let mut counts = SeasonCounts::new();
        for anime in &state.animes {
            if let Some((year, code)) = anime.season.split_once('-') {
                *counts
                    .entry(year.to_string())
                    .or_insert_with(BTreeMap::new)
                    .entry(code.to_string())
                    .or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn create_anime(&self, draft: &AnimeDraft) -> Result<Option<Anime>, ApiError> {
        self.record(Call::CreateAnime(draft.name.clone()), "create_anime")?;
        let mut state = self.state.lock().unwrap();
        let anime = Anime {
            id: state.next_id(),
            name: draft.name.clone(),
            aliases: draft.aliases.clone(),
            categories: draft.categories.clone(),
            tags: draft.tags.clone(),
            production: draft.production.clone(),
            season: draft.season.clone(),
            episodes: draft.episodes,
            image: draft.image.clone(),
        };
        state.animes.push(anime.clone());
        Ok(Some(anime))
    }

    async fn update_anime(&self, id: u64, draft: &AnimeDraft) -> Result<Option<Anime>, ApiError> {
        self.record(Call::UpdateAnime(id), "update_anime")?;
        let mut state = self.state.lock().unwrap();
        let anime = state
            .animes
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("anime", id))?;
        anime.name = draft.name.clone();
        anime.aliases = draft.aliases.clone();
        anime.categories = draft.categories.clone();
        anime.tags = draft.tags.clone();
        anime.season = draft.season.clone();
        anime.episodes = draft.episodes;
        // Mirror a server that answers updates with an empty body.
        Ok(None)
    }

    async fn delete_anime(&self, id: u64) -> Result<(), ApiError> {
        self.record(Call::DeleteAnime(id), "delete_anime")?;
        self.state.lock().unwrap().animes.retain(|a| a.id != id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record(Call::ListCategories, "list_categories")?;
        Ok(self.terms(false))
    }

    async fn search_categories(&self, name: &str) -> Result<Vec<Category>, ApiError> {
        self.record(Call::SearchCategories(name.to_string()), "search_categories")?;
        Ok(self
            .terms(false)
            .into_iter()
            .filter(|t| t.name.to_lowercase().contains(&name.to_lowercase()))
            .collect())
    }

    async fn category_stats(&self) -> Result<TermStats, ApiError> {
        self.record(Call::CategoryStats, "category_stats")?;
        Ok(self.stats(false))
    }

    async fn create_category(&self, name: &str) -> Result<Option<Category>, ApiError> {
        self.record(Call::CreateCategory(name.to_string()), "create_category")?;
        self.create_term(false, name)
    }

    async fn update_category(&self, id: u64, name: &str) -> Result<Option<Category>, ApiError> {
        self.record(Call::UpdateCategory(id, name.to_string()), "update_category")?;
        self.rename_term(false, id, name)
    }

    async fn delete_category(&self, id: u64) -> Result<(), ApiError> {
        self.record(Call::DeleteCategory(id), "delete_category")?;
        self.delete_term(false, id)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.record(Call::ListTags, "list_tags")?;
        Ok(self.terms(true))
    }

    async fn search_tags(&self, name: &str) -> Result<Vec<Tag>, ApiError> {
        self.record(Call::SearchTags(name.to_string()), "search_tags")?;
        Ok(self
            .terms(true)
            .into_iter()
            .filter(|t| t.name.to_lowercase().contains(&name.to_lowercase()))
            .collect())
    }

    async fn tag_stats(&self) -> Result<TermStats, ApiError> {
        self.record(Call::TagStats, "tag_stats")?;
        Ok(self.stats(true))
    }

    async fn create_tag(&self, name: &str) -> Result<Option<Tag>, ApiError> {
        self.record(Call::CreateTag(name.to_string()), "create_tag")?;
        self.create_term(true, name)
    }

    async fn update_tag(&self, id: u64, name: &str) -> Result<Option<Tag>, ApiError> {
        self.record(Call::UpdateTag(id, name.to_string()), "update_tag")?;
        self.rename_term(true, id, name)
    }

    async fn delete_tag(&self, id: u64) -> Result<(), ApiError> {
        self.record(Call::DeleteTag(id), "delete_tag")?;
        self.delete_term(true, id)
    }

    async fn followed_categories(&self) -> Result<Vec<FollowedCategory>, ApiError> {
        self.record(Call::FollowedCategories, "followed_categories")?;
        Ok(FollowCategory::ALL
            .iter()
            .map(|&value| FollowedCategory {
                value,
                label: value.native_label().to_string(),
                description: String::new(),
            })
            .collect())
    }

    async fn list_follows(&self, query: &FollowQuery) -> Result<Page<Follow>, ApiError> {
        self.record(Call::ListFollows(query.clone()), "list_follows")?;
        let state = self.state.lock().unwrap();
        let name = query.name.as_deref().unwrap_or("").to_lowercase();
        let mut matching: Vec<Follow> = state
            .follows
            .iter()
            .filter(|f| query.category.map_or(true, |c| f.category == c))
            .filter(|f| query.status.map_or(true, |s| f.status == s))
            .filter(|f| f.anime.name.to_lowercase().contains(&name))
            .cloned()
            .collect();
        match query.sort {
            Some(SortOrder::Ascending) => matching.sort_by(|a, b| a.anime.name.cmp(&b.anime.name)),
            Some(SortOrder::Descending) => matching.sort_by(|a, b| b.anime.name.cmp(&a.anime.name)),
            None => {}
        }
        Ok(paginate(&matching, query.page))
    }

    async fn get_follow(&self, id: u64) -> Result<Follow, ApiError> {
        self.record(Call::GetFollow(id), "get_follow")?;
        let state = self.state.lock().unwrap();
        state
            .follows
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| not_found("follow", id))
    }

    async fn create_follow(&self, follow: &NewFollow) -> Result<Option<Follow>, ApiError> {
        self.record(Call::CreateFollow(follow.clone()), "create_follow")?;
        let mut state = self.state.lock().unwrap();
        let name = state
            .animes
            .iter()
            .find(|a| a.id == follow.anime_id)
            .map(|a| a.name.clone())
            .ok_or_else(|| not_found("anime", follow.anime_id))?;
        let created = Follow {
            id: state.next_id(),
            anime_id: follow.anime_id,
            anime: FollowedAnime {
                name,
                ..Default::default()
            },
            category: follow.category,
            status: follow.status,
            finished_at: None,
            created_at: None,
            extra: Default::default(),
        };
        state.follows.push(created.clone());
        Ok(Some(created))
    }

    async fn update_follow(&self, follow: &Follow) -> Result<Option<Follow>, ApiError> {
        self.record(Call::UpdateFollow(follow.clone()), "update_follow")?;
        let mut state = self.state.lock().unwrap();
        let slot = state
            .follows
            .iter_mut()
            .find(|f| f.id == follow.id)
            .ok_or_else(|| not_found("follow", follow.id))?;
        *slot = follow.clone();
        Ok(Some(follow.clone()))
    }

    async fn update_follow_status(&self, id: u64, status: FollowStatus) -> Result<(), ApiError> {
        self.record(Call::UpdateFollowStatus(id, status), "update_follow_status")?;
        let mut state = self.state.lock().unwrap();
        let slot = state
            .follows
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| not_found("follow", id))?;
        slot.status = status;
        Ok(())
    }

    async fn delete_follow(&self, id: u64) -> Result<(), ApiError> {
        self.record(Call::DeleteFollow(id), "delete_follow")?;
        self.state.lock().unwrap().follows.retain(|f| f.id != id);
        Ok(())
    }
}
