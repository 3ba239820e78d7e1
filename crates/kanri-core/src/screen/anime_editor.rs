//! Anime add/edit form state.

use std::collections::BTreeMap;

use kanri_api::types::{Anime, AnimeDraft, SeasonToken};

use crate::chips::ChipList;

/// Which chip list a message targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipField {
    Aliases,
    Tags,
}

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Season,
    Episodes,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Season => write!(f, "season"),
            Self::Episodes => write!(f, "episodes"),
        }
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

/// Editor state for one anime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimeEditor {
    pub name: String,
    pub aliases: ChipList,
    pub tags: ChipList,
    pub categories: Vec<String>,
    /// Options offered by the category multi-select.
    pub category_options: Vec<String>,
    pub category_input: String,
    pub production: String,
    pub season: String,
    pub season_suggestions: Vec<String>,
    pub episodes: String,
    pub image: String,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    NameChanged(String),
    ProductionChanged(String),
    SeasonChanged(String),
    EpisodesChanged(String),
    ImageChanged(String),
    ShowChipInput(ChipField),
    ChipInputChanged(ChipField, String),
    ConfirmChip(ChipField),
    RemoveChip(ChipField, String),
    /// Double-activate a chip and type a replacement.
    EditChip(ChipField, usize, String),
    CategoriesSelected(Vec<String>),
    CategoryInputChanged(String),
    /// Define a brand-new category and select it.
    AddCategory,
    CategoryOptionsLoaded(Vec<String>),
}

impl AnimeEditor {
    /// Blank form for a new anime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form seeded from an existing anime.
    pub fn for_anime(anime: &Anime) -> Self {
        Self {
            name: anime.name.clone(),
            aliases: ChipList::new(anime.aliases.clone()),
            tags: ChipList::new(anime.tags.clone()),
            categories: anime.categories.clone(),
            production: anime.production.clone(),
            season: anime.season.clone(),
            episodes: anime.episodes.to_string(),
            image: anime.image.clone(),
            ..Self::default()
        }
    }

    pub fn chips(&self, field: ChipField) -> &ChipList {
        match field {
            ChipField::Aliases => &self.aliases,
            ChipField::Tags => &self.tags,
        }
    }

    fn chips_mut(&mut self, field: ChipField) -> &mut ChipList {
        match field {
            ChipField::Aliases => &mut self.aliases,
            ChipField::Tags => &mut self.tags,
        }
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::NameChanged(v) => {
                self.name = v;
                self.errors.remove(&Field::Name);
            }
            Message::ProductionChanged(v) => self.production = v,
            Message::SeasonChanged(v) => {
                self.season_suggestions = season_suggestions(&v);
                self.season = v;
                self.errors.remove(&Field::Season);
            }
            Message::EpisodesChanged(v) => {
                self.episodes = v;
                self.errors.remove(&Field::Episodes);
            }
            Message::ImageChanged(v) => self.image = v,
            Message::ShowChipInput(field) => self.chips_mut(field).show_input(),
            Message::ChipInputChanged(field, text) => self.chips_mut(field).set_input(text),
            Message::ConfirmChip(field) => {
                self.chips_mut(field).confirm();
            }
            Message::RemoveChip(field, value) => self.chips_mut(field).remove(&value),
            Message::EditChip(field, index, value) => {
                self.chips_mut(field).edit(index, &value);
            }
            Message::CategoriesSelected(selected) => self.categories = selected,
            Message::CategoryInputChanged(v) => self.category_input = v,
            Message::AddCategory => self.add_category(),
            Message::CategoryOptionsLoaded(options) => {
                self.category_options = options;
                // Keep already-selected names selectable even if the server
                // no longer lists them.
                for name in &self.categories {
                    if !self.category_options.contains(name) {
                        self.category_options.push(name.clone());
                    }
                }
            }
        }
    }

    fn add_category(&mut self) {
        let name = self.category_input.trim().to_string();
        self.category_input.clear();
        if name.is_empty() || self.categories.contains(&name) {
            return;
        }
        if !self.category_options.contains(&name) {
            self.category_options.push(name.clone());
        }
        self.categories.push(name);
    }

    /// Check the form and build the request body.
    ///
    /// On failure the field errors are stored on the editor as well.
    pub fn validate(&mut self) -> Result<AnimeDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(Field::Name, "name is required".into());
        }

        let season = self.season.trim();
        if !season.is_empty() {
            if let Err(e) = season.parse::<SeasonToken>() {
                errors.insert(Field::Season, e.to_string());
            }
        }

        let episodes_text = self.episodes.trim();
        let episodes = if episodes_text.is_empty() {
            0
        } else {
            match episodes_text.parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    errors.insert(
                        Field::Episodes,
                        format!("episodes must be a whole number, got {episodes_text:?}"),
                    );
                    0
                }
            }
        };

        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(errors);
        }

        self.errors.clear();
        Ok(AnimeDraft {
            name: name.to_string(),
            aliases: self.aliases.values().to_vec(),
            categories: self.categories.clone(),
            tags: self.tags.values().to_vec(),
            production: self.production.trim().to_string(),
            season: season.to_string(),
            episodes,
            image: self.image.trim().to_string(),
        })
    }
}

/// Season completions for a typed year: `2024` → the four 2024 tokens.
pub fn season_suggestions(input: &str) -> Vec<String> {
    let year_part = input.trim().split('-').next().unwrap_or_default();
    match year_part.parse::<u16>() {
        Ok(year) => SeasonToken::year_tokens(year)
            .iter()
            .map(ToString::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}
