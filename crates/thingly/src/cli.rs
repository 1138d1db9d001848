//! Clap derive structures for the `thingly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// thingly -- CLI for managing devices through a local gateway
#[derive(Debug, Parser)]
#[command(
    name = "thingly",
    version,
    about = "Discover, own, and control devices through a local gateway",
    long_about = "A CLI for the device gateway's REST and WebSocket APIs:\n\
        device discovery and ownership transfer, resource browsing as a\n\
        tree, resource reads and writes, cloud onboarding, and live event\n\
        watching with per-device notification toggles.",
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
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "THINGLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway URL (overrides profile)
    #[arg(long, short = 'g', env = "THINGLY_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "THINGLY_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "THINGLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "THINGLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,

    /// Device discovery window in milliseconds
    #[arg(
        long,
        env = "THINGLY_DISCOVERY_TIMEOUT",
        default_value = "2000",
        global = true
    )]
    pub discovery_timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
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
    /// Discover and manage devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Browse and manipulate device resources
    #[command(alias = "res", alias = "r")]
    Resources(ResourcesArgs),

    /// Device provisioning service configuration
    Dps(DpsArgs),

    /// Watch live gateway events with notification toggles
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Discover and list devices
    #[command(alias = "ls")]
    List,

    /// Get device details
    Get {
        /// Device ID
        device: String,
    },

    /// Discover a device directly by IP address
    Find {
        /// IP address to probe, e.g. 10.0.0.2 or [fe80::1]
        ip: String,
    },

    /// Take ownership of an unowned device
    Own {
        /// Device ID
        device: String,
    },

    /// Release ownership of a device
    Disown {
        /// Device ID
        device: String,
    },

    /// Rename a device (writes its configuration resource)
    Rename {
        /// Device ID
        device: String,

        /// New device name
        name: String,
    },

    /// Onboard a device to a cloud
    Onboard {
        /// Device ID
        device: String,

        /// Cloud CoAP gateway address
        #[arg(long)]
        coap_gateway: String,

        /// Cloud authority identifier
        #[arg(long)]
        cloud_id: String,

        /// Authorization code
        #[arg(long)]
        auth_code: String,

        /// Authorization provider name
        #[arg(long)]
        provider: Option<String>,
    },

    /// Offboard a device from its cloud
    Offboard {
        /// Device ID
        device: String,
    },

    /// Cloud onboarding status of a device
    Status {
        /// Device ID
        device: String,
    },

    /// Flush the gateway's device cache
    Flush,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List a device's resource links
    #[command(alias = "ls")]
    List {
        /// Device ID
        device: String,
    },

    /// Show a device's resources as a tree
    Tree {
        /// Device ID
        device: String,
    },

    /// Read a resource representation
    Get {
        /// Device ID
        device: String,

        /// Resource href, e.g. /light/1
        href: String,

        /// OCF interface to read through, e.g. oic.if.baseline
        #[arg(long, short = 'i')]
        interface: Option<String>,
    },

    /// Write a resource representation
    Update {
        /// Device ID
        device: String,

        /// Resource href
        href: String,

        /// JSON body, or @path/to/file.json
        #[arg(long, short = 'd')]
        data: String,

        /// OCF interface to write through
        #[arg(long, short = 'i')]
        interface: Option<String>,

        /// Command time-to-live, e.g. 500ms, 1.5s, 2min, or infinite
        #[arg(long)]
        ttl: Option<String>,
    },

    /// Create a resource under a collection
    Create {
        /// Device ID
        device: String,

        /// Collection href
        href: String,

        /// JSON body, or @path/to/file.json. Defaults to an empty
        /// resource skeleton.
        #[arg(long, short = 'd')]
        data: Option<String>,

        /// Command time-to-live, e.g. 500ms, 1.5s, 2min, or infinite
        #[arg(long)]
        ttl: Option<String>,
    },

    /// Delete a resource
    Delete {
        /// Device ID
        device: String,

        /// Resource href
        href: String,

        /// Command time-to-live, e.g. 500ms, 1.5s, 2min, or infinite
        #[arg(long)]
        ttl: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DpsArgs {
    #[command(subcommand)]
    pub command: DpsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DpsCommand {
    /// Read the provisioning service configuration
    Get {
        /// Device ID
        device: String,
    },

    /// Point the device at a provisioning service endpoint
    Set {
        /// Device ID
        device: String,

        /// Endpoint address, e.g. coaps+tcp://dps.example.com:25684
        endpoint: String,

        /// Command time-to-live, e.g. 500ms, 1.5s, 2min, or infinite
        #[arg(long)]
        ttl: Option<String>,
    },

    /// Provisioning status of a device
    Status {
        /// Device ID
        device: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Enable notices for these device IDs (repeatable)
    #[arg(long, short = 'd')]
    pub device: Vec<String>,

    /// Enable notices for all device status changes
    #[arg(long)]
    pub all_status: bool,

    /// Enable notices for updates of one resource, as device-id:href
    /// (repeatable)
    #[arg(long)]
    pub resource: Vec<String>,

    /// Print raw topics instead of only notices
    #[arg(long)]
    pub topics: bool,

    /// Print the device list whenever an event changes it
    #[arg(long)]
    pub devices: bool,

    /// Stop after this many seconds (runs until Ctrl-C by default)
    #[arg(long)]
    pub duration: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a gateway profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Gateway base URL
        #[arg(long)]
        gateway: String,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
