use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use station_gen::{AiModel, Strategy};
use station_types::{EmojiUsage, Formality, Humor, LanguageSkill, Punctuation, Verbosity};
use station_world::ExportKind;

#[derive(Parser)]
#[command(name = "station")]
#[command(about = "Roster editor for simulated IRC users and channels")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite file holding the roster (overrides STATION_DB_PATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Gemini model for AI features (overrides STATION_AI_MODEL)
    #[arg(long, global = true)]
    pub model: Option<AiModel>,

    /// Directory exported files are written to (overrides STATION_EXPORT_DIR)
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage users
    Users {
        #[command(subcommand)]
        cmd: UserCommand,
    },
    /// Manage channels
    Channels {
        #[command(subcommand)]
        cmd: ChannelCommand,
    },
    /// Merge a .json or .csv file into the roster
    Import { file: PathBuf },
    /// Write the roster to a file
    Export {
        /// world, users, users-enriched, channels or csv
        kind: ExportKind,
    },
    /// Generate candidate users
    Generate {
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=station_gen::MAX_BATCH as u64))]
        count: u64,
        /// random, template or ai
        #[arg(long, default_value = "random")]
        strategy: Strategy,
        /// Save the candidates instead of only printing them
        #[arg(long)]
        commit: bool,
    },
    /// Suggest a nickname
    Nickname,
    /// List the available AI models
    Models,
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
    Add {
        nickname: String,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    Edit {
        id: String,
        #[arg(long)]
        nickname: Option<String>,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Delete a user and its channel memberships
    Remove { id: String },
}

#[derive(Args, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub personality: Option<String>,
    /// LANGUAGE:FLUENCY[:ACCENT], repeatable; replaces all skills
    #[arg(long = "skill", value_parser = parse_skill)]
    pub skills: Vec<LanguageSkill>,
    #[arg(long)]
    pub formality: Option<Formality>,
    #[arg(long)]
    pub verbosity: Option<Verbosity>,
    #[arg(long)]
    pub humor: Option<Humor>,
    #[arg(long)]
    pub emoji_usage: Option<EmojiUsage>,
    #[arg(long)]
    pub punctuation: Option<Punctuation>,
}

#[derive(Subcommand)]
pub enum ChannelCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        topic: String,
        /// Member user id, repeatable
        #[arg(long = "member")]
        members: Vec<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        /// Member user id, repeatable; replaces all members
        #[arg(long = "member")]
        members: Vec<String>,
        /// Remove every member
        #[arg(long, conflicts_with = "members")]
        clear_members: bool,
    },
    Remove { id: String },
    /// Delete every channel
    Clear,
    /// Drop members that refer to deleted users
    Prune,
}

fn parse_skill(s: &str) -> Result<LanguageSkill, String> {
    let mut parts = s.splitn(3, ':');
    let language = parts.next().unwrap_or_default().trim();
    let fluency = parts
        .next()
        .ok_or_else(|| format!("expected LANGUAGE:FLUENCY[:ACCENT], got '{}'", s))?;
    if language.is_empty() {
        return Err(format!("missing language in '{}'", s));
    }
    Ok(LanguageSkill {
        language: language.to_string(),
        fluency: fluency.trim().parse().map_err(|e| format!("{}", e))?,
        accent: parts.next().unwrap_or_default().trim().to_string(),
    })
}
