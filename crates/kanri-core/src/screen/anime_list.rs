use kanri_api::types::{Anime, Page};
use kanri_api::{AnimeFilter, PageRequest};

use crate::effect::Effect;
use crate::pagination::Pager;
use crate::screen::anime_editor::{self, AnimeEditor};
use crate::screen::{Action, DeleteTarget, ModalKind};

// ── State ─────────────────────────────────────────────────────────

/// Whether the editor creates a new anime or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorModal {
    pub mode: EditorMode,
    pub editor: AnimeEditor,
    pub saving: bool,
}

/// Paginated anime list with its active filter.
#[derive(Debug)]
pub struct AnimeList {
    pub pager: Pager,
    filter: AnimeFilter,
    pub items: Vec<Anime>,
    pub loading: bool,
    /// Row whose "more actions" menu is open.
    pub visible_actions: Option<u64>,
    pub modal: Option<EditorModal>,
}

// ── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Refresh,
    /// Switch filter; starts again from page 1.
    Navigate(AnimeFilter),
    /// Set filter and position together, fetching once.
    JumpTo(AnimeFilter, PageRequest),
    PageChanged {
        page: u32,
        page_size: u32,
    },
    Loaded(Result<Page<Anime>, String>),
    ToggleActions(u64),
    OpenAdd,
    OpenEdit(u64),
    CloseEditor,
    Editor(anime_editor::Message),
    CategoryOptionsLoaded(Result<Vec<String>, String>),
    Submit,
    Saved(Result<String, String>),
    RequestDelete(u64),
    ConfirmDelete(u64),
    Deleted(Result<String, String>),
}

// ── Implementation ────────────────────────────────────────────────

impl AnimeList {
    pub fn new(page_size: u32) -> Self {
        Self {
            pager: Pager::new(page_size),
            filter: AnimeFilter::None,
            items: Vec::new(),
            loading: false,
            visible_actions: None,
            modal: None,
        }
    }

    pub fn filter(&self) -> &AnimeFilter {
        &self.filter
    }

    fn find(&self, id: u64) -> Option<&Anime> {
        self.items.iter().find(|a| a.id == id)
    }

    /// One list request for the current page and filter.
    pub fn fetch(&mut self) -> Action {
        self.loading = true;
        Action::Run(Effect::ListAnimes {
            page: self.pager.request(),
            filter: self.filter.clone(),
        })
    }

    fn open_editor(&mut self, mode: EditorMode, editor: AnimeEditor) -> Action {
        self.visible_actions = None;
        self.modal = Some(EditorModal {
            mode,
            editor,
            saving: false,
        });
        Action::Run(Effect::EditorCategories)
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Refresh => self.fetch(),
            Message::Navigate(filter) => {
                self.filter = filter.normalized();
                self.pager.reset();
                self.visible_actions = None;
                self.fetch()
            }
            Message::JumpTo(filter, request) => {
                self.filter = filter.normalized();
                self.pager.set(request.page, request.page_size);
                self.fetch()
            }
            Message::PageChanged { page, page_size } => {
                if self.pager.set(page, page_size) {
                    self.fetch()
                } else {
                    Action::None
                }
            }
            Message::Loaded(Ok(page)) => {
                self.loading = false;
                self.pager.total = page.total;
                self.items = page.items;
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                Action::error(format!("Failed to load anime: {e}"))
            }
            Message::ToggleActions(id) => {
                self.visible_actions = if self.visible_actions == Some(id) {
                    None
                } else {
                    Some(id)
                };
                Action::None
            }
            Message::OpenAdd => self.open_editor(EditorMode::Add, AnimeEditor::new()),
            Message::OpenEdit(id) => match self.find(id) {
                Some(anime) => {
                    let editor = AnimeEditor::for_anime(anime);
                    self.open_editor(EditorMode::Edit(id), editor)
                }
                None => Action::error(format!("anime #{id} is not on this page")),
            },
            Message::CloseEditor => {
                self.modal = None;
                Action::None
            }
            Message::Editor(msg) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.editor.update(msg);
                }
                Action::None
            }
            Message::CategoryOptionsLoaded(Ok(options)) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal
                        .editor
                        .update(anime_editor::Message::CategoryOptionsLoaded(options));
                }
                Action::None
            }
            Message::CategoryOptionsLoaded(Err(e)) => {
                Action::error(format!("Failed to load categories: {e}"))
            }
            Message::Submit => {
                let Some(modal) = self.modal.as_mut() else {
                    return Action::None;
                };
                if modal.saving {
                    return Action::None;
                }
                // Field errors stay on the editor; nothing is sent.
                let Ok(draft) = modal.editor.validate() else {
                    return Action::None;
                };
                modal.saving = true;
                match modal.mode {
                    EditorMode::Add => Action::Run(Effect::CreateAnime(draft)),
                    EditorMode::Edit(id) => Action::Run(Effect::UpdateAnime { id, draft }),
                }
            }
            Message::Saved(Ok(name)) => {
                self.modal = None;
                Action::batch([Action::success(format!("Saved {name}")), self.fetch()])
            }
            Message::Saved(Err(e)) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.saving = false;
                }
                Action::error(format!("Failed to save anime: {e}"))
            }
            Message::RequestDelete(id) => {
                self.visible_actions = None;
                let title = match self.find(id) {
                    Some(anime) => format!("Delete \"{}\"?", anime.name),
                    None => format!("Delete anime #{id}?"),
                };
                Action::ShowModal(ModalKind::ConfirmDelete {
                    target: DeleteTarget::Anime(id),
                    title,
                })
            }
            Message::ConfirmDelete(id) => {
                let name = self
                    .find(id)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| format!("anime #{id}"));
                Action::Run(Effect::DeleteAnime { id, name })
            }
            // The row stays visible until the re-fetch lands.
            Message::Deleted(Ok(name)) => {
                Action::batch([Action::success(format!("Deleted {name}")), self.fetch()])
            }
            Message::Deleted(Err(e)) => Action::error(format!("Failed to delete anime: {e}")),
        }
    }
}
