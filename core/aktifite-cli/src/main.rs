//! aktifite: local command-line driver for the Aktifite core.
//!
//! State lives under `~/.aktifite/` (override with `AKTIFITE_HOME`). Every
//! command runs as the user given by `--as`; switch users between calls to
//! play both sides of a join request. A name given with `--name` is stored
//! per user in `profiles.json`.
//!
//! ## Subcommands
//!
//! - `create`, `list`, `join`, `accept`, `reject`: activity roster
//! - `notifications`, `read`, `read-all`: notification feed
//! - `chat`, `send`, `threads`: per-activity chat with the organizer
//! - `stats`: created vs joined counts

mod commands;
mod logging;

use aktifite_core::{load_config, City, Sport, StorageConfig};
use clap::{Parser, Subcommand};

use commands::{parse_city, parse_sport, Invocation};

#[derive(Parser)]
#[command(name = "aktifite")]
#[command(about = "Sports meet-up roster, notifications and chat")]
#[command(version)]
struct Cli {
    /// User id to act as
    #[arg(long = "as", value_name = "USER_ID", global = true, default_value = "me")]
    acting_user: String,

    /// Display name for the acting user (kept in profiles.json)
    #[arg(long, global = true)]
    name: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create an activity (you become its organizer and first participant)
    Create {
        #[arg(long)]
        title: String,

        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Time as HH:MM
        #[arg(long)]
        time: String,

        #[arg(long)]
        location: String,

        #[arg(long, value_parser = parse_sport)]
        sport: Option<Sport>,

        #[arg(long, value_parser = parse_city)]
        city: Option<City>,

        #[arg(long)]
        description: Option<String>,

        /// Participant cap (defaults from config.json)
        #[arg(long)]
        max: Option<u32>,
    },

    /// List activities, newest first
    List {
        #[arg(long, value_parser = parse_sport)]
        sport: Option<Sport>,

        #[arg(long, value_parser = parse_city)]
        city: Option<City>,

        /// Case-insensitive match on title, sport or location
        #[arg(long)]
        search: Option<String>,

        /// Only activities you take part in
        #[arg(long)]
        mine: bool,
    },

    /// Ask to join an activity
    Join {
        #[arg(value_name = "ACTIVITY_ID")]
        activity: String,
    },

    /// Accept a pending join request (organizer only)
    Accept {
        #[arg(value_name = "ACTIVITY_ID")]
        activity: String,

        #[arg(value_name = "REQUESTER_ID")]
        requester: String,
    },

    /// Reject a pending join request (organizer only)
    Reject {
        #[arg(value_name = "ACTIVITY_ID")]
        activity: String,

        #[arg(value_name = "REQUESTER_ID")]
        requester: String,
    },

    /// Show the notification feed
    Notifications {
        /// Only unread entries
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification read
    Read {
        #[arg(value_name = "NOTIFICATION_ID")]
        notification: String,
    },

    /// Mark every notification read
    ReadAll,

    /// Open (or create) the chat with an activity's organizer
    Chat {
        #[arg(value_name = "ACTIVITY_ID")]
        activity: String,
    },

    /// Send a message to a thread
    Send {
        #[arg(value_name = "THREAD_ID")]
        thread: String,

        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List your chat threads, most recent first
    Threads,

    /// Show created vs joined counts
    Stats,
}

fn main() {
    let cli = Cli::parse();
    let storage = StorageConfig::default();
    let config = load_config(&storage);
    let _logging_guard = logging::init(&storage, &config);

    let who = Invocation {
        user: cli.acting_user,
        name: cli.name,
        json: cli.json,
    };
    if let Err(e) = commands::run(storage, who, cli.command) {
        tracing::error!(error = %e, "aktifite failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acting_user_is_not_shadowed_by_requester() {
        let cli =
            Cli::try_parse_from(["aktifite", "--as", "ayse", "accept", "act-1", "ali"]).unwrap();
        assert_eq!(cli.acting_user, "ayse");
        match cli.command {
            Commands::Accept {
                activity,
                requester,
            } => {
                assert_eq!(activity, "act-1");
                assert_eq!(requester, "ali");
            }
            _ => panic!("expected accept"),
        }
    }

    #[test]
    fn test_as_flag_is_accepted_after_subcommand() {
        let cli =
            Cli::try_parse_from(["aktifite", "reject", "act-1", "ali", "--as", "ayse"]).unwrap();
        assert_eq!(cli.acting_user, "ayse");
        assert!(matches!(cli.command, Commands::Reject { .. }));
    }
}
