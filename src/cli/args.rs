//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::CHILDREN_FIELD;

/// Inspect and edit hierarchical table documents: lookup, selection, mutation and column views
#[derive(Parser, Debug)]
#[command(name = "hstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .hstore.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest as a tree
    Tree {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the node with the given id
    Find {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Select a row (and optionally a column) and print what the host would see
    Select {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
        /// Column to select as well
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Append a child node
    Add {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Parent node id
        parent: String,
        /// Field of the new node, repeatable
        #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Explicit id instead of a generated one
        #[arg(long)]
        id: Option<String>,
        /// Rewrite the document instead of printing it
        #[arg(short, long)]
        in_place: bool,
    },

    /// Remove a node and its subtree
    Remove {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
        /// Rewrite the document instead of printing it
        #[arg(short, long)]
        in_place: bool,
    },

    /// Flatten one column against the index column
    Column {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Column (field) name
        name: String,
        /// Index field (default: the document's index column)
        #[arg(long)]
        index: Option<String>,
    },

    /// Check that ids are unique
    Validate {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print node count, depth and leaves
    Stats {
        /// JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}

/// Parse `name=value` into its two halves; `children` cannot be set this way.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.trim() == CHILDREN_FIELD => {
            Err(format!("'{}' is reserved for child nodes", CHILDREN_FIELD))
        }
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_add_with_fields_when_parsing_then_collects_pairs() {
        let cli = Cli::try_parse_from([
            "hstore", "add", "tree.json", "1", "-f", "name=Subcategory A-3", "-f", "value=100",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { fields, parent, .. }) => {
                assert_eq!(parent, "1");
                assert_eq!(
                    fields,
                    vec![
                        ("name".to_string(), "Subcategory A-3".to_string()),
                        ("value".to_string(), "100".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_field_without_equals_when_parsing_then_error() {
        assert!(parse_field("oops").is_err());
        assert!(parse_field("=x").is_err());
        assert!(parse_field("children=x").is_err());
    }
}
