//! "Follow an anime" dialog: pick an anime by name and a shelf.

use std::time::Duration;

use kanri_api::types::{Anime, FollowCategory, FollowStatus, NewFollow};

use crate::debounce::Debouncer;
use crate::effect::{DebounceTarget, Effect};
use crate::screen::Action;

#[derive(Debug)]
pub struct AddFollowForm {
    pub query: String,
    debouncer: Debouncer,
    pub options: Vec<Anime>,
    pub anime_id: Option<u64>,
    pub category: Option<FollowCategory>,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    QueryChanged(String),
    SearchElapsed(u64),
    OptionsLoaded(Result<Vec<Anime>, String>),
    AnimeSelected(u64),
    CategorySelected(FollowCategory),
    Submit,
}

impl AddFollowForm {
    pub fn new(window: Duration) -> Self {
        Self {
            query: String::new(),
            debouncer: Debouncer::new(window),
            options: Vec::new(),
            anime_id: None,
            category: None,
            submitting: false,
            error: None,
        }
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::QueryChanged(query) => {
                self.query = query;
                let generation = self.debouncer.bump();
                Action::Run(Effect::Debounce {
                    target: DebounceTarget::AddFollowSearch,
                    generation,
                    window: self.debouncer.window(),
                })
            }
            Message::SearchElapsed(generation) => {
                if !self.debouncer.is_current(generation) {
                    return Action::None;
                }
                let query = self.query.trim();
                if query.is_empty() {
                    self.options.clear();
                    return Action::None;
                }
                Action::Run(Effect::SearchAnimeOptions {
                    query: query.to_string(),
                })
            }
            Message::OptionsLoaded(Ok(options)) => {
                self.options = options;
                Action::None
            }
            Message::OptionsLoaded(Err(e)) => Action::error(format!("Anime search failed: {e}")),
            Message::AnimeSelected(id) => {
                self.anime_id = Some(id);
                self.error = None;
                Action::None
            }
            Message::CategorySelected(category) => {
                self.category = Some(category);
                self.error = None;
                Action::None
            }
            Message::Submit => {
                if self.submitting {
                    return Action::None;
                }
                match self.draft() {
                    Ok(follow) => {
                        self.submitting = true;
                        Action::Run(Effect::CreateFollow(follow))
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        Action::None
                    }
                }
            }
        }
    }

    /// New follows always start on the watch list.
    fn draft(&self) -> Result<NewFollow, &'static str> {
        let anime_id = self.anime_id.ok_or("pick an anime")?;
        let category = self.category.ok_or("pick a category")?;
        Ok(NewFollow {
            anime_id,
            category,
            status: FollowStatus::WantToWatch,
        })
    }
}
