//! Plain-text rendering of screen state for terminal output.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use kanri_api::types::{Anime, Follow, FollowCategory, Page, TermStats};
use kanri_api::AnimeFilter;
use kanri_core::pagination::Pager;
use kanri_core::screen::seasons::SeasonYear;
use kanri_core::screen::terms::TermBrowser;

/// Completion date, or a dash when unset.
pub fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.date_naive().to_string())
        .unwrap_or_else(|| "-".into())
}

fn joined(names: &[String]) -> String {
    if names.is_empty() {
        "-".into()
    } else {
        names.join(", ")
    }
}

pub fn anime_page(items: &[Anime], pager: &Pager, filter: &AnimeFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Anime ({filter})");
    for anime in items {
        let _ = writeln!(
            out,
            "{:>5}  {}  [{}]  {} ep  {}  tags: {}",
            anime.id,
            anime.name,
            if anime.season.is_empty() { "-" } else { &anime.season },
            anime.episodes,
            joined(&anime.categories),
            joined(&anime.tags),
        );
    }
    if items.is_empty() {
        let _ = writeln!(out, "  (no anime)");
    }
    let _ = write!(
        out,
        "{}  page {}/{}",
        pager.summary(),
        pager.page,
        pager.last_page()
    );
    out
}

/// Terms in display order, each with its usage count.
pub fn terms(browser: &TermBrowser) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", browser.kind().plural());
    for term in &browser.items {
        let _ = writeln!(
            out,
            "{:>5}  {} ({})",
            term.id,
            term.name,
            browser.count(&term.name)
        );
    }
    if browser.items.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    out.truncate(out.trim_end().len());
    out
}

/// Usage counts, busiest first. Ties keep name order.
pub fn term_stats(stats: &TermStats) -> String {
    let mut rows: Vec<(&String, &u64)> = stats.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1));
    rows.iter()
        .map(|(name, count)| format!("{count:>5}  {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn seasons(years: &[SeasonYear]) -> String {
    if years.is_empty() {
        return "(no seasons)".into();
    }
    years
        .iter()
        .map(|year| {
            let buckets = year
                .buckets
                .iter()
                .map(|b| format!("{} {}", b.token.quarter_name(), b.count))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{}  {buckets}", year.year)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn follow_name(follow: &Follow) -> String {
    if follow.anime.name.is_empty() {
        format!("anime #{}", follow.anime_id)
    } else {
        follow.anime.name.clone()
    }
}

pub fn follow_group(category: FollowCategory, page: &Page<Follow>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{category} ({})", page.total);
    for follow in &page.items {
        let _ = write!(
            out,
            "\n{:>5}  {}  {}  finished {}",
            follow.id,
            follow_name(follow),
            follow.status,
            date(follow.finished_at),
        );
    }
    out
}

pub fn follow_rows(items: &[Follow], pager: &Pager) -> String {
    let mut out = String::new();
    for follow in items {
        let _ = writeln!(
            out,
            "{:>5}  {}  [{}]  {}  {}  finished {}",
            follow.id,
            follow_name(follow),
            if follow.anime.season.is_empty() { "-" } else { &follow.anime.season },
            follow.category,
            follow.status,
            date(follow.finished_at),
        );
    }
    if items.is_empty() {
        let _ = writeln!(out, "  (no follows)");
    }
    let _ = write!(
        out,
        "{}  page {}/{}",
        pager.summary(),
        pager.page,
        pager.last_page()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kanri_api::types::{FollowStatus, FollowedAnime, SeasonCounts, Term};
    use kanri_core::screen::seasons::group_years;
    use kanri_core::screen::terms::TermKind;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn follow(id: u64, name: &str, finished: Option<DateTime<Utc>>) -> Follow {
        Follow {
            id,
            anime_id: id + 100,
            anime: FollowedAnime {
                name: name.into(),
                season: "2024-04".into(),
                ..Default::default()
            },
            category: FollowCategory::New,
            status: FollowStatus::Watched,
            finished_at: finished,
            created_at: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_anime_page_shows_position() {
        let anime = Anime {
            id: 7,
            name: "Frieren".into(),
            aliases: Vec::new(),
            categories: vec!["Fantasy".into()],
            tags: Vec::new(),
            production: "Madhouse".into(),
            season: "2023-10".into(),
            episodes: 28,
            image: String::new(),
        };
        let pager = Pager {
            page: 2,
            page_size: 10,
            total: 11,
        };
        let out = anime_page(&[anime], &pager, &AnimeFilter::ByTag("Magic".into()));
        assert!(out.starts_with("Anime (tag Magic)\n"));
        assert!(out.contains("Frieren  [2023-10]  28 ep  Fantasy  tags: -"));
        assert!(out.ends_with("11-11 of 11  page 2/2"));
    }

    #[test]
    fn test_terms_include_counts() {
        let mut browser = TermBrowser::new(TermKind::Tag, Duration::from_millis(300));
        browser.items = vec![
            Term { id: 1, name: "Magic".into() },
            Term { id: 2, name: "Slow".into() },
        ];
        browser.stats = BTreeMap::from([("Magic".to_string(), 4)]);
        let out = terms(&browser);
        assert!(out.contains("Magic (4)"));
        assert!(out.contains("Slow (0)"));
    }

    #[test]
    fn test_stats_busiest_first() {
        let stats = BTreeMap::from([
            ("Drama".to_string(), 2),
            ("Action".to_string(), 9),
            ("Comedy".to_string(), 2),
        ]);
        assert_eq!(
            term_stats(&stats),
            "    9  Action\n    2  Comedy\n    2  Drama"
        );
    }

    #[test]
    fn test_seasons_newest_year_first() {
        let mut counts = SeasonCounts::new();
        counts.insert("2023".into(), BTreeMap::from([("10".to_string(), 3)]));
        counts.insert("2024".into(), BTreeMap::from([("04".to_string(), 1)]));
        let out = seasons(&group_years(&counts));
        let mut lines = out.lines();
        assert!(lines.next().is_some_and(|l| l.starts_with("2024")));
        assert!(out.contains("Fall 3"));
        assert_eq!(seasons(&[]), "(no seasons)");
    }

    #[test]
    fn test_follow_rows_show_finish_date() {
        let finished = Utc.with_ymd_and_hms(2024, 3, 22, 0, 0, 0).unwrap();
        let items = [follow(1, "Frieren", Some(finished)), follow(2, "", None)];
        let pager = Pager {
            page: 1,
            page_size: 10,
            total: 2,
        };
        let out = follow_rows(&items, &pager);
        assert!(out.contains("Frieren  [2024-04]  New  Watched  finished 2024-03-22"));
        assert!(out.contains("anime #102"));
        assert!(out.contains("finished -"));

        let group = follow_group(FollowCategory::New, &Page::new(items.to_vec(), None));
        assert!(group.starts_with("New (2)"));
    }
}
