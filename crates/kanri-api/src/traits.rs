//! The catalog service interface.
//!
//! `CatalogClient` talks to the real server; controllers and tests only
//! depend on this trait.

use std::future::Future;

use crate::query::{AnimeFilter, FollowQuery, PageRequest};
use crate::types::{
    Anime, AnimeDraft, Category, Follow, FollowStatus, FollowedCategory, NewFollow, Page,
    SeasonCounts, Tag, TermStats,
};

/// Every call the console makes against the catalog server.
///
/// One method per (resource, verb). Each call is a single attempt; errors
/// are returned to the caller untouched.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    // ── Health ──

    fn ping(&self) -> impl Future<Output = Result<String, Self::Error>> + Send;

    fn hello(&self) -> impl Future<Output = Result<String, Self::Error>> + Send;

    // ── Anime ──

    /// List one page of anime, using the endpoint the filter selects.
    fn list_animes(
        &self,
        page: PageRequest,
        filter: &AnimeFilter,
    ) -> impl Future<Output = Result<Page<Anime>, Self::Error>> + Send;

    fn anime_seasons(&self) -> impl Future<Output = Result<SeasonCounts, Self::Error>> + Send;

    fn create_anime(
        &self,
        draft: &AnimeDraft,
    ) -> impl Future<Output = Result<Option<Anime>, Self::Error>> + Send;

    fn update_anime(
        &self,
        id: u64,
        draft: &AnimeDraft,
    ) -> impl Future<Output = Result<Option<Anime>, Self::Error>> + Send;

    fn delete_anime(&self, id: u64) -> impl Future<Output = Result<(), Self::Error>> + Send;

    // ── Categories ──

    fn list_categories(&self)
        -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send;

    fn search_categories(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send;

    fn category_stats(&self) -> impl Future<Output = Result<TermStats, Self::Error>> + Send;

    fn create_category(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send;

    fn update_category(
        &self,
        id: u64,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send;

    fn delete_category(&self, id: u64) -> impl Future<Output = Result<(), Self::Error>> + Send;

    // ── Tags ──

    fn list_tags(&self) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send;

    fn search_tags(&self, name: &str)
        -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send;

    fn tag_stats(&self) -> impl Future<Output = Result<TermStats, Self::Error>> + Send;

    fn create_tag(&self, name: &str)
        -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send;

    fn update_tag(
        &self,
        id: u64,
        name: &str,
    ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send;

    fn delete_tag(&self, id: u64) -> impl Future<Output = Result<(), Self::Error>> + Send;

    // ── Follows ──

    fn followed_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<FollowedCategory>, Self::Error>> + Send;

    fn list_follows(
        &self,
        query: &FollowQuery,
    ) -> impl Future<Output = Result<Page<Follow>, Self::Error>> + Send;

    fn get_follow(&self, id: u64) -> impl Future<Output = Result<Follow, Self::Error>> + Send;

    fn create_follow(
        &self,
        follow: &NewFollow,
    ) -> impl Future<Output = Result<Option<Follow>, Self::Error>> + Send;

    /// Replace a follow record, used to set the completion date.
    fn update_follow(
        &self,
        follow: &Follow,
    ) -> impl Future<Output = Result<Option<Follow>, Self::Error>> + Send;

    fn update_follow_status(
        &self,
        id: u64,
        status: FollowStatus,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_follow(&self, id: u64) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

