//! Command handlers. Each one drives the console runtime the way a user
//! would click through the screens, then prints the resulting state.

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use kanri_api::types::FollowCategory;
use kanri_api::{AnimeFilter, CatalogService, FollowQuery, PageRequest};
use kanri_core::app::Message;
use kanri_core::screen::terms::{self, TermKind};
use kanri_core::screen::{anime_list, follow_board, follow_form, follow_table, Page};
use kanri_core::toast::ToastKind;
use kanri_core::{AppConfig, Runtime};

use crate::cli::{
    AnimeCommand, AnimeListArgs, Command, ConfigCommand, FollowCommand, FollowTableArgs,
    TermCommand,
};
use crate::error::CliError;
use crate::render;

pub async fn run<S: CatalogService + 'static>(
    rt: &mut Runtime<S>,
    command: Command,
    config: &AppConfig,
    config_path: &Path,
) -> Result<(), CliError> {
    match command {
        Command::Ping => {
            let pong = rt
                .service()
                .ping()
                .await
                .map_err(CliError::service)?;
            println!("{pong}");
            Ok(())
        }
        Command::Hello => {
            rt.boot().await;
            report(rt)?;
            if let Some(greeting) = &rt.app().home.greeting {
                println!("{greeting}");
            }
            Ok(())
        }
        Command::Animes(cmd) => animes(rt, cmd, config).await,
        Command::Categories(cmd) => term_command(rt, TermKind::Category, cmd).await,
        Command::Tags(cmd) => term_command(rt, TermKind::Tag, cmd).await,
        Command::Follows(cmd) => follows(rt, cmd, config).await,
        Command::Config(cmd) => config_command(cmd, config_path),
    }
}

/// Print success toasts; the last error toast becomes the command's error.
fn report<S: CatalogService + 'static>(rt: &mut Runtime<S>) -> Result<(), CliError> {
    let mut failure = None;
    for toast in rt.app_mut().toasts.drain() {
        match toast.kind {
            ToastKind::Error => failure = Some(toast.message),
            ToastKind::Success | ToastKind::Info => println!("{}", toast.message),
        }
    }
    match failure {
        Some(message) => Err(CliError::Failed(message)),
        None => Ok(()),
    }
}

fn confirm(title: &str) -> Result<bool, CliError> {
    print!("{title} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Request a delete, answer the confirmation modal, and report.
async fn delete<S: CatalogService + 'static>(
    rt: &mut Runtime<S>,
    request: Message,
    yes: bool,
) -> Result<(), CliError> {
    rt.drive(request).await;
    let Some(modal) = rt.app().modal.clone() else {
        return report(rt);
    };
    let answer = if yes || confirm(modal.title())? {
        Message::ConfirmModal
    } else {
        println!("Cancelled");
        Message::CancelModal
    };
    rt.drive(answer).await;
    report(rt)
}

// ── Anime ─────────────────────────────────────────────────────────

fn anime_filter(args: &AnimeListArgs) -> AnimeFilter {
    if let Some(season) = &args.season {
        AnimeFilter::BySeason(season.clone())
    } else if let Some(category) = &args.category {
        AnimeFilter::ByCategory(category.clone())
    } else if let Some(tag) = &args.tag {
        AnimeFilter::ByTag(tag.clone())
    } else if let Some(name) = &args.name {
        AnimeFilter::ByName(name.clone())
    } else {
        AnimeFilter::None
    }
}

async fn animes<S: CatalogService + 'static>(
    rt: &mut Runtime<S>,
    cmd: AnimeCommand,
    config: &AppConfig,
) -> Result<(), CliError> {
    match cmd {
        AnimeCommand::List(args) => {
            let page_size = args.page_size.unwrap_or(config.list.page_size);
            let request = PageRequest::new(args.page, page_size);
            rt.drive(Message::Animes(anime_list::Message::JumpTo(
                anime_filter(&args),
                request,
            )))
            .await;
            report(rt)?;
            let list = &rt.app().animes;
            println!("{}", render::anime_page(&list.items, &list.pager, list.filter()));
            Ok(())
        }
        AnimeCommand::Delete { id, yes } => {
            delete(rt, Message::Animes(anime_list::Message::RequestDelete(id)), yes).await
        }
        AnimeCommand::Seasons => {
            rt.drive(Message::Open(Page::Seasons)).await;
            report(rt)?;
            println!("{}", render::seasons(&rt.app().seasons.years));
            Ok(())
        }
    }
}

// ── Categories & tags ─────────────────────────────────────────────

fn term_page(kind: TermKind) -> Page {
    match kind {
        TermKind::Category => Page::Categories,
        TermKind::Tag => Page::Tags,
    }
}

async fn term_command<S: CatalogService + 'static>(
    rt: &mut Runtime<S>,
    kind: TermKind,
    cmd: TermCommand,
) -> Result<(), CliError> {
    let msg = |m: terms::Message| Message::Terms(kind, m);
    match cmd {
        TermCommand::List { search } => {
            rt.drive(Message::Open(term_page(kind))).await;
            if let Some(search) = search {
                rt.drive(msg(terms::Message::SearchChanged(search))).await;
            }
            report(rt)?;
            println!("{}", render::terms(rt.app().terms(kind)));
            Ok(())
        }
        TermCommand::Stats => {
            rt.drive(Message::Open(term_page(kind))).await;
            report(rt)?;
            println!("{}", render::term_stats(&rt.app().terms(kind).stats));
            Ok(())
        }
        TermCommand::Add { name } => {
            rt.drive(msg(terms::Message::OpenAddForm)).await;
            rt.drive(msg(terms::Message::AddFormChanged(name))).await;
            rt.drive(msg(terms::Message::SubmitAddForm)).await;
            report(rt)
        }
        TermCommand::Rename { id, name } => {
            rt.drive(Message::Open(term_page(kind))).await;
            report(rt)?;
            rt.drive(msg(terms::Message::StartEdit(id))).await;
            if rt.app().terms(kind).editing.is_none() {
                return Err(CliError::Failed(format!("no {} with id {id}", kind.label())));
            }
            rt.drive(msg(terms::Message::EditNameChanged(name))).await;
            rt.drive(msg(terms::Message::SaveEdit)).await;
            report(rt)
        }
        TermCommand::Delete { id, yes } => {
            // Load first so the prompt can show the name.
            rt.drive(Message::Open(term_page(kind))).await;
            report(rt)?;
            delete(rt, msg(terms::Message::RequestDelete(id)), yes).await
        }
    }
}

// ── Follows ───────────────────────────────────────────────────────

/// Midnight UTC of the given day.
fn finish_time(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn table_query(args: &FollowTableArgs, config: &AppConfig) -> FollowQuery {
    FollowQuery {
        page: PageRequest::new(args.page, args.page_size.unwrap_or(config.list.page_size)),
        category: args.category,
        status: args.status,
        name: args.name.clone(),
        sort: args.sort,
    }
}

async fn follows<S: CatalogService + 'static>(
    rt: &mut Runtime<S>,
    cmd: FollowCommand,
    config: &AppConfig,
) -> Result<(), CliError> {
    match cmd {
        FollowCommand::Board { category } => {
            rt.drive(Message::Open(Page::Follows)).await;
            report(rt)?;
            let shelves: Vec<FollowCategory> = match category {
                Some(category) => vec![category],
                None if rt.app().follows.categories.is_empty() => FollowCategory::ALL.to_vec(),
                None => rt.app().follows.categories.iter().map(|c| c.value).collect(),
            };
            for shelf in &shelves {
                rt.drive(Message::FollowBoard(follow_board::Message::Toggle(*shelf)))
                    .await;
            }
            report(rt)?;
            let board = &rt.app().follows;
            let groups: Vec<String> = shelves
                .iter()
                .filter_map(|&shelf| board.group(shelf).map(|page| render::follow_group(shelf, page)))
                .collect();
            println!("{}", groups.join("\n\n"));
            Ok(())
        }
        FollowCommand::Table(args) => {
            rt.drive(Message::FollowTable(follow_table::Message::Apply(table_query(
                &args, config,
            ))))
            .await;
            report(rt)?;
            let table = &rt.app().follow_table;
            println!("{}", render::follow_rows(&table.items, &table.pager));
            Ok(())
        }
        FollowCommand::Status { id, status } => {
            rt.drive(Message::FollowTable(follow_table::Message::SetStatus(id, status)))
                .await;
            report(rt)
        }
        FollowCommand::Finish { id, date } => {
            rt.drive(Message::FollowBoard(follow_board::Message::SetFinishedAt(
                id,
                finish_time(date),
            )))
            .await;
            report(rt)
        }
        FollowCommand::Add {
            anime_id,
            category,
        } => {
            let form = |m: follow_form::Message| Message::FollowBoard(follow_board::Message::AddForm(m));
            rt.drive(Message::FollowBoard(follow_board::Message::OpenAddForm))
                .await;
            rt.drive(form(follow_form::Message::AnimeSelected(anime_id))).await;
            rt.drive(form(follow_form::Message::CategorySelected(category))).await;
            rt.drive(form(follow_form::Message::Submit)).await;
            report(rt)?;
            match rt.app().follows.add_form.as_ref().and_then(|f| f.error.clone()) {
                Some(error) => Err(CliError::Failed(error)),
                None => Ok(()),
            }
        }
        FollowCommand::Delete { id, yes } => {
            delete(rt, Message::FollowTable(follow_table::Message::RequestDelete(id)), yes).await
        }
    }
}

// ── Config ────────────────────────────────────────────────────────

pub fn config_command(cmd: ConfigCommand, path: &Path) -> Result<(), CliError> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Failed(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            AppConfig::default().save(path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}
