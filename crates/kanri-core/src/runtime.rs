//! Executes effects against a [`CatalogService`] and feeds results back.

use std::fmt::Display;
use std::sync::Arc;

use kanri_api::types::{Term, TermStats};
use kanri_api::{AnimeFilter, CatalogService, FollowQuery, PageRequest};
use tokio::sync::mpsc;

use crate::app::{App, Message};
use crate::effect::Effect;
use crate::screen::anime_list;
use crate::screen::follow_board;
use crate::screen::follow_form;
use crate::screen::follow_table;
use crate::screen::home;
use crate::screen::seasons;
use crate::screen::terms::{self, TermKind};
use crate::toast::ToastKind;

/// Page size for the add-follow anime picker.
const PICKER_PAGE_SIZE: u32 = 10;

/// Owns the [`App`] and runs its effects as tokio tasks.
///
/// There is no cancellation: every spawned effect eventually delivers its
/// message, so a slow response can overwrite a newer one. A task that dies
/// delivers `None` instead, so the in-flight count always drains.
pub struct Runtime<S> {
    service: Arc<S>,
    app: App,
    tx: mpsc::UnboundedSender<Option<Message>>,
    rx: mpsc::UnboundedReceiver<Option<Message>>,
    in_flight: usize,
}

impl<S: CatalogService + 'static> Runtime<S> {
    pub fn new(service: S, app: App) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service: Arc::new(service),
            app,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Effects spawned but not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and start every effect it produces.
    pub fn dispatch(&mut self, msg: Message) {
        for effect in self.app.update(msg) {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        tracing::debug!(?effect, "spawn effect");
        self.in_flight += 1;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move { execute(service.as_ref(), effect).await });
        tokio::spawn(async move {
            let delivery = match task.await {
                Ok(msg) => Some(msg),
                Err(e) => {
                    tracing::error!(error = %e, "effect task failed");
                    None
                }
            };
            // The receiver lives as long as the runtime.
            let _ = tx.send(delivery);
        });
    }

    /// Wait for the next delivered message without applying it.
    ///
    /// Returns `None` when nothing is in flight. A task that died without a
    /// message is reported as an error toast and skipped.
    pub async fn next(&mut self) -> Option<Message> {
        while self.in_flight > 0 {
            let delivery = self.rx.recv().await?;
            self.in_flight -= 1;
            match delivery {
                Some(msg) => return Some(msg),
                None => {
                    self.app
                        .toasts
                        .push("Request failed unexpectedly", ToastKind::Error);
                }
            }
        }
        None
    }

    /// Apply the next delivered message. Returns `false` when idle.
    pub async fn step(&mut self) -> bool {
        match self.next().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Run until no effect is left in flight.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Dispatch a message and everything that follows from it.
    pub async fn drive(&mut self, msg: Message) {
        self.dispatch(msg);
        self.settle().await;
    }

    /// Run the startup effects and settle.
    pub async fn boot(&mut self) {
        for effect in self.app.boot() {
            self.spawn(effect);
        }
        self.settle().await;
    }
}

fn fail<E: Display>(e: E) -> String {
    tracing::warn!(error = %e, "request failed");
    e.to_string()
}

async fn list_terms<S: CatalogService>(service: &S, kind: TermKind) -> Result<Vec<Term>, S::Error> {
    match kind {
        TermKind::Category => service.list_categories().await,
        TermKind::Tag => service.list_tags().await,
    }
}

async fn term_stats<S: CatalogService>(service: &S, kind: TermKind) -> Result<TermStats, S::Error> {
    match kind {
        TermKind::Category => service.category_stats().await,
        TermKind::Tag => service.tag_stats().await,
    }
}

/// Perform one effect and turn its outcome into the message that reports it.
pub async fn execute<S: CatalogService>(service: &S, effect: Effect) -> Message {
    match effect {
        Effect::Hello => Message::Home(home::Message::Loaded(service.hello().await.map_err(fail))),
        Effect::ListAnimes { page, filter } => Message::Animes(anime_list::Message::Loaded(
            service.list_animes(page, &filter).await.map_err(fail),
        )),
        Effect::CreateAnime(draft) => {
            let result = service
                .create_anime(&draft)
                .await
                .map(|echo| echo.map_or(draft.name.clone(), |a| a.name))
                .map_err(fail);
            Message::Animes(anime_list::Message::Saved(result))
        }
        Effect::UpdateAnime { id, draft } => {
            let result = service
                .update_anime(id, &draft)
                .await
                .map(|echo| echo.map_or(draft.name.clone(), |a| a.name))
                .map_err(fail);
            Message::Animes(anime_list::Message::Saved(result))
        }
        Effect::DeleteAnime { id, name } => {
            let result = service.delete_anime(id).await.map(|()| name).map_err(fail);
            Message::Animes(anime_list::Message::Deleted(result))
        }
        Effect::EditorCategories => {
            let result = service
                .list_categories()
                .await
                .map(|terms| terms.into_iter().map(|t| t.name).collect())
                .map_err(fail);
            Message::Animes(anime_list::Message::CategoryOptionsLoaded(result))
        }
        Effect::AnimeSeasons => Message::Seasons(seasons::Message::Loaded(
            service.anime_seasons().await.map_err(fail),
        )),
        Effect::LoadTerms(kind) => {
            let result = futures::try_join!(list_terms(service, kind), term_stats(service, kind))
                .map_err(fail);
            Message::Terms(kind, terms::Message::Loaded(result))
        }
        Effect::ListTerms(kind) => Message::Terms(
            kind,
            terms::Message::Listed(list_terms(service, kind).await.map_err(fail)),
        ),
        Effect::SearchTerms { kind, query } => {
            let result = match kind {
                TermKind::Category => service.search_categories(&query).await,
                TermKind::Tag => service.search_tags(&query).await,
            };
            Message::Terms(kind, terms::Message::Listed(result.map_err(fail)))
        }
        Effect::CreateTerm { kind, name } => {
            tracing::info!(kind = kind.label(), %name, "create term");
            let result = match kind {
                TermKind::Category => service.create_category(&name).await,
                TermKind::Tag => service.create_tag(&name).await,
            };
            Message::Terms(kind, terms::Message::Created(result.map_err(fail)))
        }
        Effect::RenameTerm { kind, id, name } => {
            let result = match kind {
                TermKind::Category => service.update_category(id, &name).await,
                TermKind::Tag => service.update_tag(id, &name).await,
            };
            let result = result
                .map(|echo| echo.unwrap_or(Term { id, name }))
                .map_err(fail);
            Message::Terms(kind, terms::Message::Renamed(result))
        }
        Effect::DeleteTerm { kind, id } => {
            let result = match kind {
                TermKind::Category => service.delete_category(id).await,
                TermKind::Tag => service.delete_tag(id).await,
            };
            Message::Terms(kind, terms::Message::Deleted(result.map(|()| id).map_err(fail)))
        }
        Effect::FollowedCategories => Message::FollowBoard(follow_board::Message::CategoriesLoaded(
            service.followed_categories().await.map_err(fail),
        )),
        Effect::LoadFollowGroup {
            category,
            page_size,
        } => {
            let query = FollowQuery::for_category(category, page_size);
            let result = service.list_follows(&query).await.map_err(fail);
            Message::FollowBoard(follow_board::Message::GroupLoaded(category, result))
        }
        Effect::ListFollowTable(query) => Message::FollowTable(follow_table::Message::Loaded(
            service.list_follows(&query).await.map_err(fail),
        )),
        Effect::SetFollowStatus { id, status } => {
            let result = service
                .update_follow_status(id, status)
                .await
                .map(|()| format!("Follow #{id} marked {status}"))
                .map_err(fail);
            Message::FollowChanged(result)
        }
        Effect::SetFinishedAt(follow) => {
            let summary = format!(
                "Follow #{} finished on {}",
                follow.id,
                follow.finished_at.map(|d| d.date_naive().to_string()).unwrap_or_default()
            );
            let result = service
                .update_follow(&follow)
                .await
                .map(|_| summary)
                .map_err(fail);
            Message::FollowChanged(result)
        }
        Effect::FetchAndSetFinishedAt { id, finished_at } => {
            let result = async {
                let follow = service.get_follow(id).await?;
                service.update_follow(&follow.with_finished_at(finished_at)).await
            }
            .await
            .map(|_| format!("Follow #{id} finished on {}", finished_at.date_naive()))
            .map_err(fail);
            Message::FollowChanged(result)
        }
        Effect::CreateFollow(new_follow) => {
            let fallback = format!("anime #{}", new_follow.anime_id);
            let result = service
                .create_follow(&new_follow)
                .await
                .map(|echo| {
                    echo.map(|f| f.anime.name)
                        .filter(|name| !name.is_empty())
                        .unwrap_or(fallback)
                })
                .map_err(fail);
            Message::FollowBoard(follow_board::Message::Created(result))
        }
        Effect::DeleteFollow { id } => {
            let result = service.delete_follow(id).await.map(|()| id).map_err(fail);
            Message::FollowTable(follow_table::Message::Deleted(result))
        }
        Effect::SearchAnimeOptions { query } => {
            let result = service
                .list_animes(
                    PageRequest::first(PICKER_PAGE_SIZE),
                    &AnimeFilter::ByName(query),
                )
                .await
                .map(|page| page.items)
                .map_err(fail);
            Message::FollowBoard(follow_board::Message::AddForm(
                follow_form::Message::OptionsLoaded(result),
            ))
        }
        Effect::Debounce {
            target,
            generation,
            window,
        } => {
            tokio::time::sleep(window).await;
            Message::DebounceElapsed(target, generation)
        }
    }
}
