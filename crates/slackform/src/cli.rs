//! Clap derive structures for the `slackform` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of workspace crates so `build.rs` can include it directly.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// slackform -- reconcile Slack channels, memberships and user groups
#[derive(Debug, Parser)]
#[command(
    name = "slackform",
    version,
    about = "Reconcile Slack channels, memberships and user groups",
    long_about = "Drives the slackform reconcilers one lifecycle step at a time.\n\n\
        Each resource command takes declared state from flags or --from-file,\n\
        calls the Slack Web API idempotently and prints the observed state.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Workspace profile to use
    #[arg(long, short = 'p', env = "SLACKFORM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Bot token (overrides profile)
    #[arg(long, env = "SLACKFORM_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Web API root (overrides profile)
    #[arg(long, env = "SLACKFORM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// List cache directory (overrides profile)
    #[arg(long, env = "SLACKFORM_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Keep list snapshots in memory only
    #[arg(long, global = true)]
    pub no_persist_cache: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SLACKFORM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SLACKFORM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Field/value table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, identity only (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile a channel (slack_channel)
    #[command(alias = "ch")]
    Channel(ChannelArgs),

    /// Reconcile one user's membership of a conversation
    #[command(alias = "member")]
    ConversationMember(ConversationMemberArgs),

    /// Reconcile a user group's default channels
    UsergroupChannels(UsergroupChannelsArgs),

    /// Reconcile a user group's members
    UsergroupMembers(UsergroupMembersArgs),

    /// List registered resource types and their schemas
    Resources(ResourcesArgs),

    /// Inspect or clear the list cache
    Cache(CacheArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Lifecycle Arguments ───────────────────────────────────────

/// Lifecycle step to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

/// Identity and state files shared by every resource command.
#[derive(Debug, Args)]
pub struct StateArgs {
    /// Identity of the existing resource (required for import)
    #[arg(long)]
    pub id: Option<String>,

    /// Declared state as JSON: either a field object or {"id": .., "fields": {..}}
    #[arg(long, short = 'f', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Previously persisted fields as JSON, for update change detection
    #[arg(long, value_name = "PATH")]
    pub prior_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ChannelArgs {
    #[arg(value_enum)]
    pub operation: OperationArg,

    #[command(flatten)]
    pub state: StateArgs,

    /// Channel name
    #[arg(long)]
    pub name: Option<String>,

    /// Channel topic
    #[arg(long)]
    pub topic: Option<String>,

    /// Channel purpose
    #[arg(long)]
    pub purpose: Option<String>,

    /// Whether the channel should be archived
    #[arg(long, value_name = "BOOL")]
    pub archived: Option<bool>,
}

#[derive(Debug, Args)]
pub struct ConversationMemberArgs {
    #[arg(value_enum)]
    pub operation: OperationArg,

    #[command(flatten)]
    pub state: StateArgs,

    /// Conversation ID (e.g. C0123ABCD)
    #[arg(long)]
    pub conversation_id: Option<String>,

    /// User ID (e.g. U0123ABCD)
    #[arg(long)]
    pub user_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct UsergroupChannelsArgs {
    #[arg(value_enum)]
    pub operation: OperationArg,

    #[command(flatten)]
    pub state: StateArgs,

    /// User group ID (e.g. S0123ABCD)
    #[arg(long)]
    pub usergroup_id: Option<String>,

    /// Default channel IDs, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,
}

#[derive(Debug, Args)]
pub struct UsergroupMembersArgs {
    #[arg(value_enum)]
    pub operation: OperationArg,

    #[command(flatten)]
    pub state: StateArgs,

    /// User group ID (e.g. S0123ABCD)
    #[arg(long)]
    pub usergroup_id: Option<String>,

    /// Member user IDs, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    /// Show the field schema of one resource type (e.g. slack_channel)
    pub name: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CACHE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print the cache directory in use
    Path,

    /// Remove cached list snapshots
    Clear {
        /// Only remove this key (e.g. usergroups)
        #[arg(long)]
        key: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a bot token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
