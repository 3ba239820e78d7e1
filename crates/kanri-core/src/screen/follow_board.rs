//! Followed anime grouped by shelf, loaded lazily as shelves are opened.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kanri_api::types::{Follow, FollowCategory, FollowStatus, FollowedCategory, Page};

use crate::effect::Effect;
use crate::screen::follow_form::{self, AddFollowForm};
use crate::screen::Action;

// ── State ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FollowBoard {
    pub categories: Vec<FollowedCategory>,
    /// The open accordion section, if any.
    pub expanded: Option<FollowCategory>,
    /// Loaded shelves keyed by category wire value. Never evicted.
    groups: BTreeMap<u8, Page<Follow>>,
    group_page_size: u32,
    window: Duration,
    pub add_form: Option<AddFollowForm>,
}

// ── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Load,
    CategoriesLoaded(Result<Vec<FollowedCategory>, String>),
    Toggle(FollowCategory),
    GroupLoaded(FollowCategory, Result<Page<Follow>, String>),
    /// Reload every shelf that has been opened.
    Refresh,
    SetStatus(u64, FollowStatus),
    SetFinishedAt(u64, DateTime<Utc>),
    OpenAddForm,
    CloseAddForm,
    AddForm(follow_form::Message),
    Created(Result<String, String>),
}

// ── Implementation ────────────────────────────────────────────────

impl FollowBoard {
    pub fn new(group_page_size: u32, window: Duration) -> Self {
        Self {
            categories: Vec::new(),
            expanded: None,
            groups: BTreeMap::new(),
            group_page_size: group_page_size.max(1),
            window,
            add_form: None,
        }
    }

    pub fn group(&self, category: FollowCategory) -> Option<&Page<Follow>> {
        self.groups.get(&category.value())
    }

    pub fn loaded_categories(&self) -> Vec<FollowCategory> {
        self.groups
            .keys()
            .filter_map(|&v| FollowCategory::from_value(v))
            .collect()
    }

    fn find(&self, id: u64) -> Option<&Follow> {
        self.groups
            .values()
            .flat_map(|page| page.items.iter())
            .find(|f| f.id == id)
    }

    fn load_group(&self, category: FollowCategory) -> Action {
        Action::Run(Effect::LoadFollowGroup {
            category,
            page_size: self.group_page_size,
        })
    }

    fn refresh(&self) -> Action {
        Action::batch(
            self.loaded_categories()
                .into_iter()
                .map(|category| self.load_group(category)),
        )
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Load => Action::Run(Effect::FollowedCategories),
            Message::CategoriesLoaded(Ok(categories)) => {
                self.categories = categories;
                Action::None
            }
            Message::CategoriesLoaded(Err(e)) => {
                Action::error(format!("Failed to load follow categories: {e}"))
            }
            Message::Toggle(category) => {
                if self.expanded == Some(category) {
                    self.expanded = None;
                    return Action::None;
                }
                self.expanded = Some(category);
                if self.groups.contains_key(&category.value()) {
                    Action::None
                } else {
                    self.load_group(category)
                }
            }
            Message::GroupLoaded(category, Ok(page)) => {
                self.groups.insert(category.value(), page);
                Action::None
            }
            Message::GroupLoaded(category, Err(e)) => {
                Action::error(format!("Failed to load {category} follows: {e}"))
            }
            Message::Refresh => self.refresh(),
            Message::SetStatus(id, status) => Action::Run(Effect::SetFollowStatus { id, status }),
            Message::SetFinishedAt(id, finished_at) => match self.find(id) {
                Some(follow) => Action::Run(Effect::SetFinishedAt(follow.with_finished_at(finished_at))),
                None => Action::Run(Effect::FetchAndSetFinishedAt { id, finished_at }),
            },
            Message::OpenAddForm => {
                self.add_form = Some(AddFollowForm::new(self.window));
                Action::None
            }
            Message::CloseAddForm => {
                self.add_form = None;
                Action::None
            }
            Message::AddForm(msg) => match self.add_form.as_mut() {
                Some(form) => form.update(msg),
                None => Action::None,
            },
            Message::Created(Ok(name)) => {
                self.add_form = None;
                Action::batch([Action::success(format!("Following {name}")), self.refresh()])
            }
            Message::Created(Err(e)) => {
                if let Some(form) = self.add_form.as_mut() {
                    form.submitting = false;
                }
                Action::error(format!("Failed to follow anime: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanri_api::types::FollowedAnime;

    fn follow(id: u64, category: FollowCategory, status: FollowStatus) -> Follow {
        Follow {
            id,
            anime_id: id * 10,
            anime: FollowedAnime {
                name: format!("anime {id}"),
                season: "2024-01".into(),
                ..Default::default()
            },
            category,
            status,
            finished_at: None,
            created_at: None,
            extra: Default::default(),
        }
    }

    fn board() -> FollowBoard {
        FollowBoard::new(100, Duration::from_millis(300))
    }

    #[test]
    fn test_expand_loads_once_and_keeps_groups() {
        let mut board = board();
        assert_eq!(
            board.update(Message::Toggle(FollowCategory::ToiletPaper)),
            Action::Run(Effect::LoadFollowGroup {
                category: FollowCategory::ToiletPaper,
                page_size: 100
            })
        );
        board.update(Message::GroupLoaded(
            FollowCategory::ToiletPaper,
            Ok(Page::new(vec![follow(1, FollowCategory::ToiletPaper, FollowStatus::Watching)], None)),
        ));
        assert!(board.groups.contains_key(&4));

        // Accordion: opening another closes the first, cache stays.
        board.update(Message::Toggle(FollowCategory::New));
        assert_eq!(board.expanded, Some(FollowCategory::New));
        assert_eq!(board.update(Message::Toggle(FollowCategory::ToiletPaper)), Action::None);
        assert!(board.group(FollowCategory::ToiletPaper).is_some());

        assert_eq!(board.update(Message::Toggle(FollowCategory::ToiletPaper)), Action::None);
        assert_eq!(board.expanded, None);
    }

    #[test]
    fn test_refresh_reloads_every_loaded_group() {
        let mut board = board();
        for category in [FollowCategory::Classic, FollowCategory::Masterpiece] {
            board.update(Message::GroupLoaded(category, Ok(Page::new(Vec::new(), None))));
        }
        let action = board.update(Message::Refresh);
        assert_eq!(
            action.effects(),
            vec![
                &Effect::LoadFollowGroup {
                    category: FollowCategory::Classic,
                    page_size: 100
                },
                &Effect::LoadFollowGroup {
                    category: FollowCategory::Masterpiece,
                    page_size: 100
                },
            ]
        );
    }

    #[test]
    fn test_finished_at_uses_loaded_record_and_keeps_status() {
        let mut board = board();
        board.update(Message::GroupLoaded(
            FollowCategory::New,
            Ok(Page::new(vec![follow(3, FollowCategory::New, FollowStatus::WantToWatch)], None)),
        ));
        let when = DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let Action::Run(Effect::SetFinishedAt(updated)) =
            board.update(Message::SetFinishedAt(3, when))
        else {
            panic!("expected a PUT of the loaded record");
        };
        assert_eq!(updated.finished_at, Some(when));
        assert_eq!(updated.status, FollowStatus::WantToWatch);

        assert_eq!(
            board.update(Message::SetFinishedAt(99, when)),
            Action::Run(Effect::FetchAndSetFinishedAt {
                id: 99,
                finished_at: when
            })
        );
    }

    #[test]
    fn test_created_closes_form() {
        let mut board = board();
        board.update(Message::OpenAddForm);
        board.update(Message::Created(Ok("Aria".into())));
        assert!(board.add_form.is_none());
    }
}
