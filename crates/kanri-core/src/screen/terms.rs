use std::time::Duration;

use kanri_api::types::{Term, TermStats};
use kanri_api::AnimeFilter;

use crate::debounce::Debouncer;
use crate::effect::{DebounceTarget, Effect};
use crate::screen::{Action, DeleteTarget, ModalKind};

// ── Kind ──────────────────────────────────────────────────────────

/// Categories and tags are browsed by the same screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Category,
    Tag,
}

impl TermKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
        }
    }

    /// Anime list filter showing everything carrying `name`.
    pub fn filter(self, name: &str) -> AnimeFilter {
        match self {
            Self::Category => AnimeFilter::ByCategory(name.to_string()),
            Self::Tag => AnimeFilter::ByTag(name.to_string()),
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── State ─────────────────────────────────────────────────────────

/// Rename dialog state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEdit {
    pub id: u64,
    pub original: String,
    pub name: String,
}

/// Browser for one term kind: list, usage stats, search and edits.
#[derive(Debug)]
pub struct TermBrowser {
    kind: TermKind,
    pub items: Vec<Term>,
    pub stats: TermStats,
    pub search: String,
    debouncer: Debouncer,
    pub loading: bool,
    pub loaded: bool,
    // Inline "+ new" input
    pub input_visible: bool,
    pub input: String,
    /// Add dialog; `Some` while open.
    pub add_form: Option<String>,
    pub editing: Option<TermEdit>,
    pub edit_mode: bool,
    pub delete_mode: bool,
}

// ── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Load,
    Loaded(Result<(Vec<Term>, TermStats), String>),
    Listed(Result<Vec<Term>, String>),
    SearchChanged(String),
    SearchElapsed(u64),
    ShowAll,
    ShowInput,
    InputChanged(String),
    ConfirmInput,
    OpenAddForm,
    AddFormChanged(String),
    SubmitAddForm,
    CloseAddForm,
    Created(Result<Option<Term>, String>),
    StartEdit(u64),
    EditNameChanged(String),
    SaveEdit,
    CancelEdit,
    Renamed(Result<Term, String>),
    ToggleEditMode,
    ToggleDeleteMode,
    RequestDelete(u64),
    ConfirmDelete(u64),
    Deleted(Result<u64, String>),
    Activate(u64),
}

// ── Implementation ────────────────────────────────────────────────

impl TermBrowser {
    pub fn new(kind: TermKind, window: Duration) -> Self {
        Self {
            kind,
            items: Vec::new(),
            stats: TermStats::new(),
            search: String::new(),
            debouncer: Debouncer::new(window),
            loading: false,
            loaded: false,
            input_visible: false,
            input: String::new(),
            add_form: None,
            editing: None,
            edit_mode: false,
            delete_mode: false,
        }
    }

    pub fn kind(&self) -> TermKind {
        self.kind
    }

    /// Usage count for a term name; unknown names count zero.
    pub fn count(&self, name: &str) -> u64 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    fn find(&self, id: u64) -> Option<&Term> {
        self.items.iter().find(|t| t.id == id)
    }

    fn contains_name(&self, name: &str) -> bool {
        self.items.iter().any(|t| t.name == name)
    }

    fn load(&mut self) -> Action {
        self.loading = true;
        Action::Run(Effect::LoadTerms(self.kind))
    }

    pub fn update(&mut self, msg: Message) -> Action {
        let kind = self.kind;
        match msg {
            Message::Load => self.load(),
            Message::Loaded(Ok((items, stats))) => {
                self.loading = false;
                self.loaded = true;
                self.items = items;
                self.stats = stats;
                Action::None
            }
            Message::Loaded(Err(e)) | Message::Listed(Err(e)) => {
                self.loading = false;
                Action::error(format!("Failed to load {}: {e}", kind.plural()))
            }
            Message::Listed(Ok(items)) => {
                self.loading = false;
                self.loaded = true;
                self.items = items;
                Action::None
            }
            Message::SearchChanged(text) => {
                self.search = text;
                let generation = self.debouncer.bump();
                Action::Run(Effect::Debounce {
                    target: DebounceTarget::TermSearch(kind),
                    generation,
                    window: self.debouncer.window(),
                })
            }
            Message::SearchElapsed(generation) => {
                if !self.debouncer.is_current(generation) {
                    return Action::None;
                }
                self.loading = true;
                let query = self.search.trim();
                if query.is_empty() {
                    Action::Run(Effect::ListTerms(kind))
                } else {
                    Action::Run(Effect::SearchTerms {
                        kind,
                        query: query.to_string(),
                    })
                }
            }
            Message::ShowAll => {
                self.search.clear();
                // Invalidate any pending search wake-up.
                self.debouncer.bump();
                self.loading = true;
                Action::Run(Effect::ListTerms(kind))
            }
            Message::ShowInput => {
                self.input_visible = true;
                Action::None
            }
            Message::InputChanged(text) => {
                self.input = text;
                Action::None
            }
            Message::ConfirmInput => {
                let name = self.input.trim().to_string();
                self.input_visible = false;
                self.input.clear();
                if name.is_empty() || self.contains_name(&name) {
                    return Action::None;
                }
                Action::Run(Effect::CreateTerm { kind, name })
            }
            Message::OpenAddForm => {
                self.add_form = Some(String::new());
                Action::None
            }
            Message::AddFormChanged(text) => {
                if let Some(form) = self.add_form.as_mut() {
                    *form = text;
                }
                Action::None
            }
            Message::SubmitAddForm => {
                let Some(form) = self.add_form.as_ref() else {
                    return Action::None;
                };
                let name = form.trim().to_string();
                if name.is_empty() {
                    return Action::error(format!("{} name is required", kind.label()));
                }
                Action::Run(Effect::CreateTerm { kind, name })
            }
            Message::CloseAddForm => {
                self.add_form = None;
                Action::None
            }
            Message::Created(Ok(term)) => {
                self.add_form = None;
                let name = term.map(|t| t.name).unwrap_or_else(|| kind.label().to_string());
                Action::batch([Action::success(format!("Created {name}")), self.load()])
            }
            Message::Created(Err(e)) => {
                Action::error(format!("Failed to create {}: {e}", kind.label()))
            }
            Message::StartEdit(id) => {
                if let Some(term) = self.find(id) {
                    self.editing = Some(TermEdit {
                        id,
                        original: term.name.clone(),
                        name: term.name.clone(),
                    });
                }
                Action::None
            }
            Message::EditNameChanged(text) => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.name = text;
                }
                Action::None
            }
            Message::SaveEdit => {
                let Some(edit) = self.editing.as_ref() else {
                    return Action::None;
                };
                let name = edit.name.trim().to_string();
                if name.is_empty() {
                    return Action::error(format!("{} name is required", kind.label()));
                }
                Action::Run(Effect::RenameTerm {
                    kind,
                    id: edit.id,
                    name,
                })
            }
            Message::CancelEdit => {
                self.editing = None;
                Action::None
            }
            Message::Renamed(Ok(term)) => {
                self.editing = None;
                if let Some(item) = self.items.iter_mut().find(|t| t.id == term.id) {
                    item.name = term.name.clone();
                }
                Action::success(format!("Renamed to {}", term.name))
            }
            Message::Renamed(Err(e)) => {
                Action::error(format!("Failed to rename {}: {e}", kind.label()))
            }
            Message::ToggleEditMode => {
                self.edit_mode = !self.edit_mode;
                if self.edit_mode {
                    self.delete_mode = false;
                }
                Action::None
            }
            Message::ToggleDeleteMode => {
                self.delete_mode = !self.delete_mode;
                if self.delete_mode {
                    self.edit_mode = false;
                }
                Action::None
            }
            Message::RequestDelete(id) => {
                let title = match self.find(id) {
                    Some(term) => format!("Delete {} \"{}\"?", kind.label(), term.name),
                    None => format!("Delete {} #{id}?", kind.label()),
                };
                Action::ShowModal(ModalKind::ConfirmDelete {
                    target: DeleteTarget::Term(kind, id),
                    title,
                })
            }
            Message::ConfirmDelete(id) => Action::Run(Effect::DeleteTerm { kind, id }),
            Message::Deleted(Ok(id)) => {
                let name = self.find(id).map(|t| t.name.clone());
                self.items.retain(|t| t.id != id);
                let name = name.unwrap_or_else(|| format!("#{id}"));
                Action::success(format!("Deleted {} {name}", kind.label()))
            }
            Message::Deleted(Err(e)) => {
                Action::error(format!("Failed to delete {}: {e}", kind.label()))
            }
            Message::Activate(id) => {
                if self.edit_mode {
                    return self.update(Message::StartEdit(id));
                }
                if self.delete_mode {
                    return self.update(Message::RequestDelete(id));
                }
                match self.find(id) {
                    Some(term) => Action::ShowAnimes(kind.filter(&term.name)),
                    None => Action::None,
                }
            }
        }
    }
}
