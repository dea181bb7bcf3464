//! Command-line interface for the `zrep` CLI application.

pub mod constants;

use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, eyre};
use zrep_core::base::{Commitment, TreeDepth};
use zrep_core::group::{Group, GroupName, Provider};

use self::constants::{DEFAULT_DB_PATH, DEFAULT_DEPTH, ZREP_DB_PATH, ZREP_TREE_DEPTH};

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "zrep")]
#[command(about = "Reputation group Merkle tree tools")]
pub struct Cli {
    /// CLI top-level command.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Seed the zero-hash table. Required once before any insertion or
    /// path retrieval.
    Seed {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Recompute and overwrite an existing table.
        #[arg(long)]
        force: bool,
    },
    /// Insert an identity commitment into a group tree.
    Insert {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Target group.
        #[command(flatten)]
        group: GroupArgs,
        /// Identity commitment as a hex field element.
        #[arg(long, value_parser = parse_commitment)]
        commitment: Commitment,
    },
    /// Export the Merkle authentication path of a commitment as JSON.
    Path {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Target group.
        #[command(flatten)]
        group: GroupArgs,
        /// Identity commitment as a hex field element.
        #[arg(long, value_parser = parse_commitment)]
        commitment: Commitment,
        /// Output file for the path JSON.
        #[arg(long, default_value = "merkle-path.json")]
        output: PathBuf,
    },
    /// Export every materialized node of a group tree as JSON records.
    Dump {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Target group.
        #[command(flatten)]
        group: GroupArgs,
        /// Output file for the node records JSON.
        #[arg(long, default_value = "tree-nodes.json")]
        output: PathBuf,
    },
    /// Log the current root of a group tree.
    Root {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Target group.
        #[command(flatten)]
        group: GroupArgs,
    },
    /// Log per-level node counts of a group tree.
    Status {
        /// Store location and tree depth.
        #[command(flatten)]
        store: StoreArgs,
        /// Target group.
        #[command(flatten)]
        group: GroupArgs,
    },
}

/// Node store location and tree depth.
#[derive(Debug, clap::Args)]
pub struct StoreArgs {
    /// Path to the node store database.
    #[arg(long = "db", env = ZREP_DB_PATH, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,
    /// Tree depth; must match every previous run against the same store.
    #[arg(
        long,
        env = ZREP_TREE_DEPTH,
        default_value = DEFAULT_DEPTH,
        value_parser = parse_tree_depth
    )]
    pub depth: TreeDepth,
}

/// Group selection shared by tree commands.
#[derive(Debug, clap::Args)]
pub struct GroupArgs {
    /// External identity provider of the group.
    #[arg(long, value_parser = parse_provider)]
    pub provider: Provider,
    /// Group name: a reputation tier or a POAP event.
    #[arg(long = "group", value_parser = parse_group_name)]
    pub name: GroupName,
}

impl GroupArgs {
    /// The selected group identity.
    #[must_use]
    pub const fn group(&self) -> Group {
        Group::new(self.provider, self.name)
    }
}

pub fn parse_provider(s: &str) -> Result<Provider> {
    s.parse()
        .map_err(|_| eyre!("Invalid provider: {s}. Expected 'twitter', 'github', 'reddit', or 'poap'."))
}

pub fn parse_group_name(s: &str) -> Result<GroupName> {
    s.parse().map_err(|_| {
        eyre!(
            "Invalid group name: {s}. Expected a reputation tier ('gold', 'silver', 'bronze', \
             'not_sufficient') or a POAP event ('devcon_3', 'devcon_4')."
        )
    })
}

pub fn parse_commitment(s: &str) -> Result<Commitment> {
    s.parse()
        .map_err(|e| eyre!("Invalid commitment: {e}"))
}

pub fn parse_tree_depth(s: &str) -> Result<TreeDepth> {
    let raw: u8 = s.parse().map_err(|_| eyre!("Invalid depth: {s}"))?;
    TreeDepth::new(raw).ok_or_else(|| {
        eyre!(
            "Invalid depth: {raw}. Expected a value in 1..={}.",
            zrep_core::base::MAX_TREE_DEPTH
        )
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use zrep_core::group::{PoapEvent, ReputationLevel};

    use super::*;

    #[test]
    fn provider_parse() {
        let provider = parse_provider("twitter").expect("Failed to parse twitter");
        assert_eq!(provider, Provider::Twitter);
        assert!(parse_provider("myspace").is_err());
    }

    #[test]
    fn group_name_parse() {
        assert_eq!(
            parse_group_name("gold").expect("gold should parse"),
            GroupName::Reputation(ReputationLevel::Gold)
        );
        assert_eq!(
            parse_group_name("devcon_4").expect("devcon_4 should parse"),
            GroupName::Poap(PoapEvent::Devcon4)
        );
        assert!(parse_group_name("platinum").is_err());
    }

    #[test]
    fn depth_parse() {
        assert_eq!(
            parse_tree_depth("16").expect("16 should parse"),
            TreeDepth::DEFAULT
        );
        assert!(parse_tree_depth("0").is_err());
        assert!(parse_tree_depth("33").is_err());
        assert!(parse_tree_depth("deep").is_err());
    }

    #[test]
    fn commitment_parse() {
        let hex = Commitment::from(9_u64).to_hex();
        assert_eq!(
            parse_commitment(&hex).expect("canonical hex should parse"),
            Commitment::from(9_u64)
        );
        assert!(parse_commitment("not-hex").is_err());
    }

    #[test]
    fn parse_insert_command_requires_commitment() {
        let cli = Cli::try_parse_from([
            "zrep", "insert", "--provider", "twitter", "--group", "gold",
        ]);
        assert!(cli.is_err());

        let commitment = Commitment::from(1_u64).to_hex();
        let cli = Cli::try_parse_from([
            "zrep",
            "insert",
            "--provider",
            "twitter",
            "--group",
            "gold",
            "--commitment",
            commitment.as_str(),
        ]);
        assert!(cli.is_ok());
    }
}
