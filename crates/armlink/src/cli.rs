//! Clap derive structures for the `armlink` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use armlink_core::{Direction, RuleAction};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// armlink -- Azure Resource Manager through a provider-agnostic model
#[derive(Debug, Parser)]
#[command(
    name = "armlink",
    version,
    about = "Inspect and manage Azure resources from the command line",
    long_about = "Lists and manages Azure virtual networks, security groups, virtual\n\
        machines, web apps and images through one region-scoped object model.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ARMLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Subscription id (overrides profile)
    #[arg(long, env = "ARMLINK_SUBSCRIPTION", global = true)]
    pub subscription: Option<String>,

    /// ARM bearer token
    #[arg(long, env = "ARMLINK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Region name, e.g. eastus (overrides profile)
    #[arg(long, short = 'r', env = "ARMLINK_REGION", global = true)]
    pub region: Option<String>,

    /// Resource Manager endpoint override
    #[arg(long, env = "ARMLINK_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARMLINK_OUTPUT",
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

    /// Accept any TLS certificate (local emulators, proxies)
    #[arg(long, short = 'k', env = "ARMLINK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ARMLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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
    /// List regions and their synthetic zones
    Regions(RegionsArgs),

    /// Manage virtual networks (modern and classic)
    #[command(alias = "vnets")]
    Vpcs(VpcsArgs),

    /// Manage subnets
    #[command(alias = "subnets", alias = "net")]
    Networks(NetworksArgs),

    /// Manage network security groups and their rules
    #[command(alias = "nsg")]
    Secgroups(SecgroupsArgs),

    /// Manage virtual machines on the region's host
    #[command(alias = "vm")]
    Vms(VmsArgs),

    /// Inspect Web App sites
    #[command(alias = "sites")]
    Apps(AppsArgs),

    /// Browse private and marketplace images
    Images(ImagesArgs),

    /// Read and write resource tags
    Tags(TagsArgs),

    /// List resource groups located in the region
    Groups,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegionsArgs {
    #[command(subcommand)]
    pub command: RegionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegionsCommand {
    /// List every region the subscription can deploy to
    #[command(alias = "ls")]
    List,

    /// Show one region with its zone, host and wires
    Show {
        /// Region name or global id
        region: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VPCS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VpcsArgs {
    #[command(subcommand)]
    pub command: VpcsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VpcsCommand {
    /// List virtual networks in the region
    #[command(alias = "ls")]
    List,

    /// Show one virtual network and its subnets
    Show {
        /// VPC resource id
        id: String,
    },

    /// Create a virtual network
    Create {
        #[arg(long)]
        name: String,

        /// Address prefix, e.g. 10.0.0.0/16
        #[arg(long)]
        cidr: String,

        /// Resource group; created in the region when missing
        #[arg(long, short = 'g', default_value = "")]
        group: String,
    },

    /// Delete a virtual network
    Delete {
        /// VPC resource id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List subnets of every virtual network in the region
    #[command(alias = "ls")]
    List {
        /// Only subnets of this VPC
        #[arg(long)]
        vpc: Option<String>,
    },

    /// Show one subnet with its derived address range
    Show {
        /// Subnet id (modern or classic)
        id: String,
    },

    /// Add a subnet to a virtual network
    Create {
        /// Parent VPC resource id
        #[arg(long)]
        vpc: String,

        #[arg(long)]
        name: String,

        /// Address prefix, e.g. 10.0.1.0/24
        #[arg(long)]
        cidr: String,
    },

    /// Delete a subnet
    Delete {
        /// Subnet id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SECURITY GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SecgroupsArgs {
    #[command(subcommand)]
    pub command: SecgroupsCommand,
}

/// Rule fields shared by `add-rule` and `update-rule`.
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// in or out
    #[arg(long, default_value = "in")]
    pub direction: Direction,

    /// allow or deny
    #[arg(long, default_value = "allow")]
    pub action: RuleAction,

    /// any, tcp, udp, icmp
    #[arg(long, default_value = "any")]
    pub protocol: String,

    /// Remote prefix
    #[arg(long, default_value = "0.0.0.0/0")]
    pub cidr: String,

    /// Port or lo-hi range; empty for all ports
    #[arg(long, default_value = "")]
    pub ports: String,

    #[arg(long)]
    pub priority: u32,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Subcommand)]
pub enum SecgroupsCommand {
    /// List security groups in the region
    #[command(alias = "ls")]
    List,

    /// Show a security group with its rules
    Show {
        /// Security group resource id
        id: String,

        /// Include the platform default rules
        #[arg(long)]
        defaults: bool,
    },

    /// Create an empty security group
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, short = 'g', default_value = "")]
        group: String,
    },

    /// Detach a security group everywhere and delete it
    Delete {
        /// Security group resource id
        id: String,
    },

    /// Add a rule (replaces a rule with the same derived name)
    AddRule {
        /// Security group resource id
        id: String,

        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Replace an existing rule, keeping its name
    UpdateRule {
        /// Security group resource id
        id: String,

        /// Existing rule name
        name: String,

        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Remove a rule by name
    RemoveRule {
        /// Security group resource id
        id: String,

        /// Rule name
        name: String,
    },

    /// Attach a security group to every NIC of a VM
    Attach {
        /// Security group resource id
        id: String,

        /// VM resource id
        #[arg(long)]
        vm: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VmsArgs {
    #[command(subcommand)]
    pub command: VmsCommand,
}

#[derive(Debug, Args)]
pub struct VmCreateArgs {
    #[arg(long)]
    pub name: String,

    /// Guest hostname; defaults to the VM name
    #[arg(long, default_value = "")]
    pub hostname: String,

    /// Private image id or publisher/offer/sku/version
    #[arg(long)]
    pub image: String,

    /// Subnet id the NIC is placed on
    #[arg(long)]
    pub network: String,

    /// Explicit VM size; otherwise every size matching --cpu/--memory is tried
    #[arg(long = "type")]
    pub instance_type: Option<String>,

    #[arg(long, default_value = "1")]
    pub cpu: u32,

    /// Memory in MB
    #[arg(long, default_value = "1024")]
    pub memory: u64,

    /// OS disk size in GB (0 keeps the image size)
    #[arg(long, default_value = "0")]
    pub disk_size: u32,

    /// OS disk storage account type
    #[arg(long, default_value = "Standard_LRS")]
    pub disk_type: String,

    /// Additional empty data disks, in GB
    #[arg(long = "data-disk")]
    pub data_disks: Vec<u32>,

    /// Static private IP
    #[arg(long)]
    pub ip: Option<String>,

    /// Admin password; generated when omitted
    #[arg(long, env = "ARMLINK_VM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SSH public key file (Linux images)
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Base64 custom data
    #[arg(long)]
    pub user_data: Option<String>,

    /// Security group ids; the first is put on the NIC
    #[arg(long = "secgroup")]
    pub security_groups: Vec<String>,

    #[arg(long, short = 'g')]
    pub group: Option<String>,

    /// Tags as key=value
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum VmsCommand {
    /// List VMs in the region
    #[command(alias = "ls")]
    List,

    /// Show one VM
    Show {
        /// VM resource id
        id: String,
    },

    /// Create a VM
    Create(Box<VmCreateArgs>),

    /// Start a VM
    Start {
        /// VM resource id
        id: String,
    },

    /// Stop and deallocate a VM
    Stop {
        /// VM resource id
        id: String,
    },

    /// Delete a VM
    Delete {
        /// VM resource id
        id: String,
    },

    /// List VM sizes offered in the region
    Sizes {
        /// Only sizes with this many cores
        #[arg(long)]
        cpu: Option<u32>,

        /// Only sizes with this much memory (MB)
        #[arg(long)]
        memory: Option<u64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppsCommand {
    /// List Web App sites in the region
    #[command(alias = "ls")]
    List,

    /// Show a site with its stack, OS and plan
    Show {
        /// Site resource id
        id: String,
    },

    /// List manual backups and automatic snapshots
    Backups {
        /// Site resource id
        id: String,
    },

    /// Show the backup configuration
    BackupConfig {
        /// Site resource id
        id: String,
    },

    /// List custom domains
    Domains {
        /// Site resource id
        id: String,
    },

    /// List certificates bound to the site's plan
    Certs {
        /// Site resource id
        id: String,
    },

    /// List deployment slots
    Slots {
        /// Site resource id
        id: String,
    },

    /// List app service plans in the region
    Plans,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IMAGES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(subcommand)]
    pub command: ImagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImagesCommand {
    /// List private images in the region
    #[command(alias = "ls")]
    List,

    /// Resolve a private image id or marketplace coordinate
    Show {
        /// Resource id or publisher/offer/sku/version
        id: String,
    },

    /// List marketplace publishers
    Publishers,

    /// List offers of a publisher
    Offers { publisher: String },

    /// List SKUs of an offer
    Skus { publisher: String, offer: String },

    /// List versions of a SKU
    Versions {
        publisher: String,
        offer: String,
        sku: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TAGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// Show the tags of a resource
    Get {
        /// Resource id
        id: String,
    },

    /// Write tags to a resource
    Set {
        /// Resource id
        id: String,

        /// Tags as key=value
        #[arg(required = true)]
        tags: Vec<String>,

        /// Keep existing tags not named here
        #[arg(long)]
        merge: bool,
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

    /// Display current configuration with secrets masked
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. subscription_id or region
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name (defaults to active profile)
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

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }
}
