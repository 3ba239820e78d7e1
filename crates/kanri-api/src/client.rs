use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{extract_message, ApiError};
use crate::query::{AnimeFilter, FollowQuery, PageRequest};
use crate::traits::CatalogService;
use crate::types::{
    Anime, AnimeDraft, AnimeListEnvelope, AnimeRecord, CategoriesEnvelope, Category,
    CategoryStatsEnvelope, Follow, FollowListEnvelope, FollowStatus, FollowedCategoriesEnvelope,
    FollowedCategory, HelloEnvelope, NewFollow, Page, SeasonCounts, SeasonsEnvelope, StatusBody,
    Tag, TagStatsEnvelope, TagsEnvelope, TermBody, TermStats,
};

/// Default server location used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// HTTP client for the catalog API.
#[derive(Clone)]
pub struct CatalogClient {
    base_url: Url,
    http: Client,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http(base_url, Client::new())
    }

    /// Use a preconfigured reqwest client (timeouts, proxy settings).
    pub fn with_http(base_url: &str, http: Client) -> Result<Self, ApiError> {
        // `Url::join` drops the last segment unless the base ends in '/'.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint path plus query parameters.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Check the HTTP response for errors and surface the server's message.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = extract_message(status, &body);
            tracing::warn!(status = status.as_u16(), %message, "catalog API error");
            Err(ApiError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        tracing::debug!(%url, "GET");
        let resp = self.http.get(url).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Send a mutation and return the raw JSON body (`Null` when empty).
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(path, &[])?;
        tracing::debug!(%method, %url, "mutation");
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = Self::check_response(req.send().await?).await?;
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Best-effort decode of the record a mutation echoes back.
///
/// Servers reply with either the bare record or a one-key wrapper such as
/// `{"anime": {...}}`; anything else is treated as a plain acknowledgement.
pub(crate) fn decode_echo<T: DeserializeOwned>(value: serde_json::Value) -> Option<T> {
    if let Ok(record) = serde_json::from_value::<T>(value.clone()) {
        return Some(record);
    }
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .find_map(|(_, inner)| serde_json::from_value::<T>(inner).ok()),
        _ => None,
    }
}

fn message_field(value: &serde_json::Value) -> String {
    value
        .get("message")
        .or_else(|| value.get("msg"))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

impl CatalogService for CatalogClient {
    type Error = ApiError;

    async fn ping(&self) -> Result<String, ApiError> {
        let body: serde_json::Value = self.get_json("ping", &[]).await?;
        Ok(message_field(&body))
    }

    async fn hello(&self) -> Result<String, ApiError> {
        let body: HelloEnvelope = self.get_json("hello", &[]).await?;
        Ok(body.msg)
    }

    async fn list_animes(
        &self,
        page: PageRequest,
        filter: &AnimeFilter,
    ) -> Result<Page<Anime>, ApiError> {
        let mut query = page.query_pairs();
        query.extend(filter.query_param());
        let env: AnimeListEnvelope = self.get_json(filter.path(), &query).await?;
        let items = env
            .animes
            .unwrap_or_default()
            .into_iter()
            .map(AnimeRecord::into_anime)
            .collect();
        Ok(Page::new(items, env.total))
    }

    async fn anime_seasons(&self) -> Result<SeasonCounts, ApiError> {
        let env: SeasonsEnvelope = self.get_json("animes/seasons", &[]).await?;
        Ok(env.seasons)
    }

    async fn create_anime(&self, draft: &AnimeDraft) -> Result<Option<Anime>, ApiError> {
        let body = self.send(Method::POST, "animes", Some(draft)).await?;
        tracing::info!(name = %draft.name, "anime created");
        Ok(decode_echo::<AnimeRecord>(body).map(AnimeRecord::into_anime))
    }

    async fn update_anime(&self, id: u64, draft: &AnimeDraft) -> Result<Option<Anime>, ApiError> {
        let body = self
            .send(Method::PUT, &format!("animes/{id}"), Some(draft))
            .await?;
        tracing::info!(id, "anime updated");
        Ok(decode_echo::<AnimeRecord>(body).map(AnimeRecord::into_anime))
    }

    async fn delete_anime(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("animes/{id}")).await?;
        tracing::info!(id, "anime deleted");
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let env: CategoriesEnvelope = self.get_json("categories", &[]).await?;
        Ok(env.categories.unwrap_or_default())
    }

    async fn search_categories(&self, name: &str) -> Result<Vec<Category>, ApiError> {
        let env: CategoriesEnvelope = self
            .get_json("categories/search", &[("name", name.to_string())])
            .await?;
        Ok(env.categories.unwrap_or_default())
    }

    async fn category_stats(&self) -> Result<TermStats, ApiError> {
        let env: CategoryStatsEnvelope = self.get_json("categories/stats", &[]).await?;
        Ok(env.category_stats)
    }

    async fn create_category(&self, name: &str) -> Result<Option<Category>, ApiError> {
        let body = self
            .send(Method::POST, "categories", Some(&TermBody { name }))
            .await?;
        tracing::info!(name, "category created");
        Ok(decode_echo(body))
    }

    async fn update_category(&self, id: u64, name: &str) -> Result<Option<Category>, ApiError> {
        let body = self
            .send(Method::PUT, &format!("categories/{id}"), Some(&TermBody { name }))
            .await?;
        tracing::info!(id, name, "category renamed");
        Ok(decode_echo(body))
    }

    async fn delete_category(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("categories/{id}")).await?;
        tracing::info!(id, "category deleted");
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let env: TagsEnvelope = self.get_json("tags", &[]).await?;
        Ok(env.tags.unwrap_or_default())
    }

    async fn search_tags(&self, name: &str) -> Result<Vec<Tag>, ApiError> {
        let env: TagsEnvelope = self
            .get_json("tags/search", &[("name", name.to_string())])
            .await?;
        Ok(env.tags.unwrap_or_default())
    }

    async fn tag_stats(&self) -> Result<TermStats, ApiError> {
        let env: TagStatsEnvelope = self.get_json("tags/stats", &[]).await?;
        Ok(env.tag_stats)
    }

    async fn create_tag(&self, name: &str) -> Result<Option<Tag>, ApiError> {
        let body = self
            .send(Method::POST, "tags", Some(&TermBody { name }))
            .await?;
        tracing::info!(name, "tag created");
        Ok(decode_echo(body))
    }

    async fn update_tag(&self, id: u64, name: &str) -> Result<Option<Tag>, ApiError> {
        let body = self
            .send(Method::PUT, &format!("tags/{id}"), Some(&TermBody { name }))
            .await?;
        tracing::info!(id, name, "tag renamed");
        Ok(decode_echo(body))
    }

    async fn delete_tag(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("tags/{id}")).await?;
        tracing::info!(id, "tag deleted");
        Ok(())
    }

    async fn followed_categories(&self) -> Result<Vec<FollowedCategory>, ApiError> {
        let env: FollowedCategoriesEnvelope = self.get_json("follows/categories", &[]).await?;
        Ok(env.categories.unwrap_or_default())
    }

    async fn list_follows(&self, query: &FollowQuery) -> Result<Page<Follow>, ApiError> {
        let env: FollowListEnvelope = self.get_json("follows", &query.query_pairs()).await?;
        Ok(Page::new(env.data.unwrap_or_default(), env.total))
    }

    async fn get_follow(&self, id: u64) -> Result<Follow, ApiError> {
        let body: serde_json::Value = self.get_json(&format!("follows/{id}"), &[]).await?;
        decode_echo(body).ok_or_else(|| ApiError::Parse(format!("follow {id}: unexpected body")))
    }

    async fn create_follow(&self, follow: &NewFollow) -> Result<Option<Follow>, ApiError> {
        let body = self.send(Method::POST, "follows", Some(follow)).await?;
        tracing::info!(anime_id = follow.anime_id, category = %follow.category, "follow created");
        Ok(decode_echo(body))
    }

    async fn update_follow(&self, follow: &Follow) -> Result<Option<Follow>, ApiError> {
        let body = self
            .send(Method::PUT, &format!("follows/{}", follow.id), Some(follow))
            .await?;
        tracing::info!(id = follow.id, "follow updated");
        Ok(decode_echo(body))
    }

    async fn update_follow_status(&self, id: u64, status: FollowStatus) -> Result<(), ApiError> {
        self.send(
            Method::PATCH,
            &format!("follows/{id}/status"),
            Some(&StatusBody { status }),
        )
        .await?;
        tracing::info!(id, %status, "follow status changed");
        Ok(())
    }

    async fn delete_follow(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("follows/{id}")).await?;
        tracing::info!(id, "follow deleted");
        Ok(())
    }
}
