pub mod anime_editor;
pub mod anime_list;
pub mod follow_board;
pub mod follow_form;
pub mod follow_table;
pub mod home;
pub mod seasons;
pub mod terms;

use kanri_api::AnimeFilter;

use crate::effect::Effect;
use crate::screen::terms::TermKind;
use crate::toast::ToastKind;

/// Which page is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Animes,
    Seasons,
    Categories,
    Tags,
    Follows,
    FollowTable,
}

/// Actions that a screen can request from the app router.
///
/// Screens return these from `update()` instead of touching shared state;
/// the app interprets them in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No side-effect.
    None,
    /// Several actions, applied in order.
    Batch(Vec<Action>),
    /// Navigate to a different page.
    NavigateTo(Page),
    /// Open the anime list on a filter, starting from page 1.
    ShowAnimes(AnimeFilter),
    /// Ask for confirmation before a destructive call.
    ShowModal(ModalKind),
    DismissModal,
    ShowToast(String, ToastKind),
    /// Hand I/O to the runtime.
    Run(Effect),
}

impl Action {
    pub fn batch(actions: impl IntoIterator<Item = Action>) -> Action {
        let mut actions: Vec<Action> = actions
            .into_iter()
            .filter(|a| !matches!(a, Action::None))
            .collect();
        match actions.len() {
            0 => Action::None,
            1 => actions.remove(0),
            _ => Action::Batch(actions),
        }
    }

    pub fn error(message: impl Into<String>) -> Action {
        Action::ShowToast(message.into(), ToastKind::Error)
    }

    pub fn success(message: impl Into<String>) -> Action {
        Action::ShowToast(message.into(), ToastKind::Success)
    }

    /// Every effect this action would run, in order.
    pub fn effects(&self) -> Vec<&Effect> {
        match self {
            Action::Run(effect) => vec![effect],
            Action::Batch(actions) => actions.iter().flat_map(Action::effects).collect(),
            _ => Vec::new(),
        }
    }
}

/// What a confirmation dialog would delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Anime(u64),
    Term(TermKind, u64),
    Follow(u64),
}

/// What kind of modal is currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    ConfirmDelete { target: DeleteTarget, title: String },
}

impl ModalKind {
    pub fn title(&self) -> &str {
        match self {
            Self::ConfirmDelete { title, .. } => title,
        }
    }
}
