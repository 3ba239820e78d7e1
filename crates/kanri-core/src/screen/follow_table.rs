use std::time::Duration;

use kanri_api::types::{Follow, FollowCategory, FollowStatus, Page};
use kanri_api::{FollowQuery, PageRequest, SortOrder};

use crate::debounce::Debouncer;
use crate::effect::{DebounceTarget, Effect};
use crate::pagination::Pager;
use crate::screen::{Action, DeleteTarget, ModalKind};

/// Filterable, sortable table of every follow record.
#[derive(Debug)]
pub struct FollowTable {
    pub pager: Pager,
    pub status: Option<FollowStatus>,
    pub category: Option<FollowCategory>,
    pub name: String,
    pub sort: Option<SortOrder>,
    debouncer: Debouncer,
    pub items: Vec<Follow>,
    pub loading: bool,
    pub loaded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Refresh,
    /// Replace every filter and the position at once.
    Apply(FollowQuery),
    Loaded(Result<Page<Follow>, String>),
    PageChanged { page: u32, page_size: u32 },
    StatusFilter(Option<FollowStatus>),
    CategoryFilter(Option<FollowCategory>),
    NameChanged(String),
    SearchElapsed(u64),
    /// Header click: unsorted, ascending, descending, unsorted.
    CycleSort,
    SetStatus(u64, FollowStatus),
    RequestDelete(u64),
    ConfirmDelete(u64),
    Deleted(Result<u64, String>),
}

impl FollowTable {
    pub fn new(page_size: u32, window: Duration) -> Self {
        Self {
            pager: Pager::new(page_size),
            status: None,
            category: None,
            name: String::new(),
            sort: None,
            debouncer: Debouncer::new(window),
            items: Vec::new(),
            loading: false,
            loaded: false,
        }
    }

    pub fn query(&self) -> FollowQuery {
        let name = self.name.trim();
        FollowQuery {
            page: self.pager.request(),
            category: self.category,
            status: self.status,
            name: (!name.is_empty()).then(|| name.to_string()),
            sort: self.sort,
        }
    }

    pub fn fetch(&mut self) -> Action {
        self.loading = true;
        Action::Run(Effect::ListFollowTable(self.query()))
    }

    fn refilter(&mut self) -> Action {
        self.pager.reset();
        self.fetch()
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Refresh => self.fetch(),
            Message::Apply(query) => {
                self.status = query.status;
                self.category = query.category;
                self.name = query.name.unwrap_or_default();
                self.sort = query.sort;
                self.pager.set(query.page.page, query.page.page_size);
                // Drop any search still waiting on its window.
                self.debouncer.bump();
                self.fetch()
            }
            Message::Loaded(Ok(page)) => {
                self.loading = false;
                self.loaded = true;
                self.pager.total = page.total;
                self.items = page.items;
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                Action::error(format!("Failed to load follows: {e}"))
            }
            Message::PageChanged { page, page_size } => {
                if self.pager.set(page, page_size) {
                    self.fetch()
                } else {
                    Action::None
                }
            }
            Message::StatusFilter(status) => {
                self.status = status;
                self.refilter()
            }
            Message::CategoryFilter(category) => {
                self.category = category;
                self.refilter()
            }
            Message::NameChanged(name) => {
                self.name = name;
                let generation = self.debouncer.bump();
                Action::Run(Effect::Debounce {
                    target: DebounceTarget::FollowTableSearch,
                    generation,
                    window: self.debouncer.window(),
                })
            }
            Message::SearchElapsed(generation) => {
                if self.debouncer.is_current(generation) {
                    self.refilter()
                } else {
                    Action::None
                }
            }
            Message::CycleSort => {
                self.sort = SortOrder::cycle(self.sort);
                self.refilter()
            }
            Message::SetStatus(id, status) => Action::Run(Effect::SetFollowStatus { id, status }),
            Message::RequestDelete(id) => {
                let title = match self.items.iter().find(|f| f.id == id) {
                    Some(follow) if !follow.anime.name.is_empty() => {
                        format!("Stop following \"{}\"?", follow.anime.name)
                    }
                    _ => format!("Delete follow #{id}?"),
                };
                Action::ShowModal(ModalKind::ConfirmDelete {
                    target: DeleteTarget::Follow(id),
                    title,
                })
            }
            Message::ConfirmDelete(id) => Action::Run(Effect::DeleteFollow { id }),
            Message::Deleted(Ok(id)) => Action::batch([
                Action::success(format!("Deleted follow #{id}")),
                self.fetch(),
            ]),
            Message::Deleted(Err(e)) => Action::error(format!("Failed to delete follow: {e}")),
        }
    }

    /// Page position the table would request next.
    pub fn page(&self) -> PageRequest {
        self.pager.request()
    }
}
