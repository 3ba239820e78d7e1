use crate::config::AppConfig;
use crate::effect::{DebounceTarget, Effect};
use crate::screen::anime_list::{self, AnimeList};
use crate::screen::follow_board::{self, FollowBoard};
use crate::screen::follow_form;
use crate::screen::follow_table::{self, FollowTable};
use crate::screen::home::{self, Home};
use crate::screen::seasons::{self, SeasonOverview};
use crate::screen::terms::{self, TermBrowser, TermKind};
use crate::screen::{Action, DeleteTarget, ModalKind, Page};
use crate::toast::{ToastKind, Toasts};

// ── State ─────────────────────────────────────────────────────────

/// Root state: every screen, the active page, the modal slot and toasts.
#[derive(Debug)]
pub struct App {
    pub page: Page,
    pub home: Home,
    pub animes: AnimeList,
    pub seasons: SeasonOverview,
    pub categories: TermBrowser,
    pub tags: TermBrowser,
    pub follows: FollowBoard,
    pub follow_table: FollowTable,
    pub modal: Option<ModalKind>,
    pub toasts: Toasts,
}

// ── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Switch page and load its data.
    Open(Page),
    Home(home::Message),
    Animes(anime_list::Message),
    Seasons(seasons::Message),
    Terms(TermKind, terms::Message),
    FollowBoard(follow_board::Message),
    FollowTable(follow_table::Message),
    /// A follow's status or completion date was written.
    FollowChanged(Result<String, String>),
    DebounceElapsed(DebounceTarget, u64),
    ConfirmModal,
    CancelModal,
    DismissToast(u64),
}

// ── Implementation ────────────────────────────────────────────────

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let window = config.debounce();
        Self {
            page: Page::Home,
            home: Home::new(),
            animes: AnimeList::new(config.list.page_size),
            seasons: SeasonOverview::new(),
            categories: TermBrowser::new(TermKind::Category, window),
            tags: TermBrowser::new(TermKind::Tag, window),
            follows: FollowBoard::new(config.follow.group_page_size, window),
            follow_table: FollowTable::new(config.list.page_size, window),
            modal: None,
            toasts: Toasts::default(),
        }
    }

    /// Effects to run when the console starts.
    pub fn boot(&mut self) -> Vec<Effect> {
        self.update(Message::Open(Page::Home))
    }

    pub fn terms(&self, kind: TermKind) -> &TermBrowser {
        match kind {
            TermKind::Category => &self.categories,
            TermKind::Tag => &self.tags,
        }
    }

    fn terms_mut(&mut self, kind: TermKind) -> &mut TermBrowser {
        match kind {
            TermKind::Category => &mut self.categories,
            TermKind::Tag => &mut self.tags,
        }
    }

    /// Apply one message and return the I/O it requests.
    pub fn update(&mut self, msg: Message) -> Vec<Effect> {
        let action = match msg {
            Message::Open(page) => self.open(page),
            Message::Home(msg) => self.home.update(msg),
            Message::Animes(msg) => self.animes.update(msg),
            Message::Seasons(msg) => self.seasons.update(msg),
            Message::Terms(kind, msg) => self.terms_mut(kind).update(msg),
            Message::FollowBoard(msg) => self.follows.update(msg),
            Message::FollowTable(msg) => self.follow_table.update(msg),
            Message::FollowChanged(Ok(summary)) => {
                // Status and dates show up on both follow views.
                let table = if self.follow_table.loaded {
                    self.follow_table.update(follow_table::Message::Refresh)
                } else {
                    Action::None
                };
                Action::batch([
                    Action::success(summary),
                    self.follows.update(follow_board::Message::Refresh),
                    table,
                ])
            }
            Message::FollowChanged(Err(e)) => Action::error(format!("Failed to update follow: {e}")),
            Message::DebounceElapsed(target, generation) => match target {
                DebounceTarget::TermSearch(kind) => self
                    .terms_mut(kind)
                    .update(terms::Message::SearchElapsed(generation)),
                DebounceTarget::FollowTableSearch => self
                    .follow_table
                    .update(follow_table::Message::SearchElapsed(generation)),
                DebounceTarget::AddFollowSearch => {
                    self.follows
                        .update(follow_board::Message::AddForm(
                            follow_form::Message::SearchElapsed(generation),
                        ))
                }
            },
            Message::ConfirmModal => self.confirm_modal(),
            Message::CancelModal => {
                self.modal = None;
                Action::None
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Action::None
            }
        };

        let mut effects = Vec::new();
        self.handle_action(action, &mut effects);
        effects
    }

    fn open(&mut self, page: Page) -> Action {
        tracing::debug!(?page, "open page");
        self.page = page;
        match page {
            Page::Home => self.home.update(home::Message::Load),
            Page::Animes => self.animes.update(anime_list::Message::Refresh),
            Page::Seasons => self.seasons.update(seasons::Message::Load),
            Page::Categories => self.categories.update(terms::Message::Load),
            Page::Tags => self.tags.update(terms::Message::Load),
            Page::Follows => self.follows.update(follow_board::Message::Load),
            Page::FollowTable => self.follow_table.update(follow_table::Message::Refresh),
        }
    }

    fn confirm_modal(&mut self) -> Action {
        let Some(ModalKind::ConfirmDelete { target, .. }) = self.modal.take() else {
            return Action::None;
        };
        match target {
            DeleteTarget::Anime(id) => self.animes.update(anime_list::Message::ConfirmDelete(id)),
            DeleteTarget::Term(kind, id) => {
                self.terms_mut(kind).update(terms::Message::ConfirmDelete(id))
            }
            DeleteTarget::Follow(id) => self
                .follow_table
                .update(follow_table::Message::ConfirmDelete(id)),
        }
    }

    fn handle_action(&mut self, action: Action, effects: &mut Vec<Effect>) {
        match action {
            Action::None => {}
            Action::Batch(actions) => {
                for action in actions {
                    self.handle_action(action, effects);
                }
            }
            Action::NavigateTo(page) => {
                let action = self.open(page);
                self.handle_action(action, effects);
            }
            Action::ShowAnimes(filter) => {
                self.page = Page::Animes;
                let action = self.animes.update(anime_list::Message::Navigate(filter));
                self.handle_action(action, effects);
            }
            Action::ShowModal(kind) => {
                self.modal = Some(kind);
            }
            Action::DismissModal => {
                self.modal = None;
            }
            Action::ShowToast(message, kind) => {
                self.toasts.push(message, kind);
            }
            Action::Run(effect) => effects.push(effect),
        }
    }

    /// Most recent error toast, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.toasts
            .items()
            .iter()
            .rev()
            .find(|t| t.kind == ToastKind::Error)
            .map(|t| t.message.as_str())
    }
}
