//! Subcommand execution against the local variant.
//!
//! Each invocation restores `state.json`, starts a session for `--as`,
//! stores any `--name` in `profiles.json`, hydrates the roster from `activities.json`, runs one command and writes the
//! snapshot back.

use aktifite_core::{
    relative_age, Activity, ActivityFilter, ActivityId, ActivityInput, AktifiteEngine,
    AktifiteError, City, NotificationId, Outcome, Sport, StaticSession, StorageConfig, ThreadId,
    UserId,
};
use chrono::Utc;
use serde::Serialize;

use crate::Commands;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AktifiteError),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Unknown thread: {0}")]
    UnknownThread(String),

    #[error("No chat available for activity {0} (unknown, or you organize it)")]
    NoThread(String),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Who is acting and how results are printed.
pub struct Invocation {
    pub user: String,
    pub name: Option<String>,
    pub json: bool,
}

pub fn parse_sport(value: &str) -> Result<Sport, String> {
    Sport::ALL
        .into_iter()
        .find(|s| s.label().eq_ignore_ascii_case(value.trim()) || s.label() == value.trim())
        .ok_or_else(|| {
            let labels: Vec<_> = Sport::ALL.iter().map(Sport::label).collect();
            format!("unknown sport {value:?}; expected one of: {}", labels.join(", "))
        })
}

pub fn parse_city(value: &str) -> Result<City, String> {
    City::ALL
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(value.trim()) || c.label() == value.trim())
        .ok_or_else(|| {
            let labels: Vec<_> = City::ALL.iter().map(City::label).collect();
            format!("unknown city {value:?}; expected one of: {}", labels.join(", "))
        })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_activity(activity: &Activity, viewer: &UserId) {
    let view = activity.view_for(viewer);
    let mut flags = Vec::new();
    if view.is_creator {
        flags.push("organizatör");
    } else if view.is_participant {
        flags.push("katılımcı");
    }
    if view.has_requested {
        flags.push("istek bekliyor");
    }
    if view.is_full {
        flags.push("dolu");
    }

    println!(
        "{} {} [{}]{}",
        activity.sport.glyph(),
        activity.title,
        activity.id,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        }
    );
    println!(
        "   {} · {} · {} {} · {}/{} · {}",
        activity.city,
        activity.location,
        activity.date.format("%d.%m.%Y"),
        activity.time.format("%H:%M"),
        activity.current_participants,
        activity.max_participants,
        relative_age(activity.created_at, Utc::now()),
    );
    if view.is_creator {
        for request in &activity.requests {
            println!("   ? {} [{}]", request.user.name, request.user.id);
        }
    }
}

fn report_outcome(outcome: Outcome, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&outcome);
    }
    match outcome {
        Outcome::Applied => println!("ok"),
        Outcome::Skipped(reason) => println!("skipped: {reason}"),
    }
    Ok(())
}

fn require_activity(engine: &AktifiteEngine, id: &str) -> Result<ActivityId, CliError> {
    let id = ActivityId::from(id);
    if engine.activity(&id).is_none() {
        return Err(CliError::UnknownActivity(id.to_string()));
    }
    Ok(id)
}

pub fn run(storage: StorageConfig, who: Invocation, command: Commands) -> Result<(), CliError> {
    storage.ensure_dirs()?;

    let session = StaticSession::signed_in(who.user.as_str(), "");
    let mut engine = AktifiteEngine::local(storage, Box::new(session));
    engine.load_snapshot()?;
    engine.start_session()?;
    if let Some(name) = who.name {
        engine.update_profile(|profile| profile.name = name)?;
        if let Err(err) = engine.sync_profile() {
            tracing::warn!(error = %err, "Display name kept on this device only");
        }
    }
    engine.load_activities();

    let me = UserId::from(who.user.as_str());
    let json = who.json;

    match command {
        Commands::Create {
            title,
            date,
            time,
            location,
            sport,
            city,
            description,
            max,
        } => {
            let input = ActivityInput {
                sport: sport.unwrap_or(engine.config().default_sport),
                title,
                description: description.unwrap_or_default(),
                date,
                time,
                location,
                city: city.unwrap_or(engine.config().default_city),
                max_participants: max.unwrap_or(0),
            };
            let id = engine.create_activity(&input)?;
            if json {
                print_json(&engine.activity(&id))?;
            } else {
                println!("{id}");
            }
        }

        Commands::List {
            sport,
            city,
            search,
            mine,
        } => {
            let filter = ActivityFilter { sport, city, search };
            let mut activities = engine.list_activities(&filter);
            if mine {
                activities.retain(|a| a.is_participant(&me));
            }
            if json {
                print_json(&activities)?;
            } else if activities.is_empty() {
                println!("Aktivite bulunamadı");
            } else {
                for activity in activities {
                    print_activity(activity, &me);
                }
            }
        }

        Commands::Join { activity } => {
            let id = require_activity(&engine, &activity)?;
            report_outcome(engine.request_join(&id)?, json)?;
        }

        Commands::Accept {
            activity,
            requester,
        } => {
            let id = require_activity(&engine, &activity)?;
            report_outcome(engine.accept_request(&id, &UserId::from(requester))?, json)?;
        }

        Commands::Reject {
            activity,
            requester,
        } => {
            let id = require_activity(&engine, &activity)?;
            report_outcome(engine.reject_request(&id, &UserId::from(requester))?, json)?;
        }

        Commands::Notifications { unread } => {
            let entries: Vec<_> = engine
                .notifications()
                .iter()
                .filter(|n| !unread || !n.read)
                .collect();
            if json {
                print_json(&entries)?;
            } else {
                println!("{} okunmamış", engine.unread_count());
                for n in entries {
                    println!(
                        "{} {} {} · {} [{}]",
                        if n.read { " " } else { "•" },
                        n.icon,
                        n.message,
                        relative_age(n.created_at, Utc::now()),
                        n.id
                    );
                }
            }
        }

        Commands::Read { notification } => {
            engine.mark_read(&NotificationId::from(notification));
        }

        Commands::ReadAll => engine.mark_all_read(),

        Commands::Chat { activity } => {
            let id = require_activity(&engine, &activity)?;
            let thread_id = engine
                .open_thread(&id)?
                .ok_or_else(|| CliError::NoThread(id.to_string()))?;
            let thread = engine
                .thread(&thread_id)
                .ok_or_else(|| CliError::UnknownThread(thread_id.to_string()))?;
            if json {
                print_json(thread)?;
            } else {
                let counterpart = thread
                    .counterpart_of(&me)
                    .map(|p| p.name.as_str())
                    .unwrap_or_default();
                println!("{} · {} [{}]", thread.activity_title, counterpart, thread.id);
                for message in &thread.messages {
                    let who = if message.sender_id == me { "sen" } else { counterpart };
                    println!(
                        "  {who}: {} ({})",
                        message.text,
                        relative_age(message.sent_at, Utc::now())
                    );
                }
            }
        }

        Commands::Send { thread, text } => {
            let thread_id = ThreadId::from(thread);
            if engine.thread(&thread_id).is_none() {
                return Err(CliError::UnknownThread(thread_id.to_string()));
            }
            if !engine.send_message(&thread_id, &text.join(" "))? {
                tracing::warn!(thread_id = %thread_id, "Empty message not sent");
            }
        }

        Commands::Threads => {
            let threads = engine.threads()?;
            if json {
                print_json(&threads)?;
            } else {
                for thread in threads {
                    println!(
                        "{}{} · {} · {} [{}]",
                        if thread.unread { "• " } else { "" },
                        thread.activity_title,
                        thread.last_message,
                        relative_age(thread.last_message_at, Utc::now()),
                        thread.id
                    );
                }
            }
        }

        Commands::Stats => {
            let stats = engine.stats()?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Oluşturulan: {}", stats.created);
                println!("Katılınan: {}", stats.joined);
            }
        }
    }

    engine.save_snapshot()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sport_accepts_labels_case_insensitively() {
        assert_eq!(parse_sport("tenis").unwrap(), Sport::Tenis);
        assert_eq!(parse_sport("Masa Tenisi").unwrap(), Sport::MasaTenisi);
        assert!(parse_sport("kriket").is_err());
    }

    #[test]
    fn test_parse_city_accepts_labels() {
        assert_eq!(parse_city("İzmir").unwrap(), City::Izmir);
        assert_eq!(parse_city("ankara").unwrap(), City::Ankara);
        assert!(parse_city("Bursa").is_err());
    }
}
