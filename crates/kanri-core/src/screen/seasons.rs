//! Anime counts per broadcast season.

use kanri_api::types::{SeasonCounts, SeasonToken, SEASON_MONTHS};
use kanri_api::AnimeFilter;

use crate::effect::Effect;
use crate::screen::Action;

/// One quarter of a year with its anime count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonBucket {
    pub token: SeasonToken,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonYear {
    pub year: u16,
    pub buckets: Vec<SeasonBucket>,
}

#[derive(Debug, Default)]
pub struct SeasonOverview {
    pub years: Vec<SeasonYear>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Load,
    Loaded(Result<SeasonCounts, String>),
    Activate(SeasonToken),
}

impl SeasonOverview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, msg: Message) -> Action {
        match msg {
            Message::Load => {
                self.loading = true;
                Action::Run(Effect::AnimeSeasons)
            }
            Message::Loaded(Ok(counts)) => {
                self.loading = false;
                self.years = group_years(&counts);
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                Action::error(format!("Failed to load seasons: {e}"))
            }
            Message::Activate(token) => {
                Action::ShowAnimes(AnimeFilter::BySeason(token.to_string()))
            }
        }
    }
}

/// Newest year first; within a year only the codes present, in calendar order.
///
/// Keys that are not a year or not a quarterly code are skipped.
pub fn group_years(counts: &SeasonCounts) -> Vec<SeasonYear> {
    let mut years: Vec<SeasonYear> = counts
        .iter()
        .filter_map(|(year, codes)| {
            let year: u16 = year.trim().parse().ok()?;
            let buckets = SEASON_MONTHS
                .iter()
                .filter_map(|&month| {
                    let count = codes.get(&format!("{month:02}"))?;
                    Some(SeasonBucket {
                        token: SeasonToken::new(year, month)?,
                        count: *count,
                    })
                })
                .collect::<Vec<_>>();
            (!buckets.is_empty()).then_some(SeasonYear { year, buckets })
        })
        .collect();
    years.sort_by(|a, b| b.year.cmp(&a.year));
    years
}
