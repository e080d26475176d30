//! CLI interface for Tideline.
//!
//! Each subcommand is non-interactive: arguments in, plain output out.
//!
//! Commands split into three groups:
//!
//! - `tideline beach add|list`: the beach directory.
//! - `tideline member add`: the member directory.
//! - `tideline research submit|show|complete|search`: research reports.
//!
//! Report ids take a full UUID or unambiguous prefix.

mod beach;
mod format;
mod member;
mod research;

use clap::{Parser, Subcommand};

use crate::{config::Config, storage::Storage};

use beach::BeachCommand;
use member::MemberCommand;
use research::ResearchCommand;

/// Tideline: record beach-cleanup research.
#[derive(Debug, Parser)]
#[command(name = "tideline", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: from survey to assignment
  1. tideline beach add Haeundae --region 'Busan Haeundae-gu'
  2. tideline member add minji 'Kim Minji'
  3. tideline research submit survey.json --as minji --image s_1.jpg
     → prints a report ID (e.g. a3b0fc12-...)
  4. tideline research search haeundae
  5. tideline research complete a3b

Logging:
  TIDELINE_LOG=debug tideline research submit survey.json";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the beach directory.
    Beach {
        #[command(subcommand)]
        command: BeachCommand,
    },

    /// Manage the member directory.
    Member {
        #[command(subcommand)]
        command: MemberCommand,
    },

    /// File, inspect, assign, and search research reports.
    Research {
        #[command(subcommand)]
        command: ResearchCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Beach { command } => beach::run(storage, command),
        Command::Member { command } => member::run(storage, command),
        Command::Research { command } => research::run(config, storage, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_research_search() {
        let cli = Cli::try_parse_from(["tideline", "research", "search", "haeundae", "--page", "2"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Research {
                command: ResearchCommand::Search {
                    page: 2,
                    size: None,
                    ..
                }
            }
        ));
    }

    #[test]
    fn parses_repeated_images() {
        let cli = Cli::try_parse_from([
            "tideline", "research", "submit", "s.json", "--image", "a.jpg", "--image", "b.jpg",
        ])
        .unwrap();
        let Command::Research {
            command: ResearchCommand::Submit { images, .. },
        } = cli.command
        else {
            panic!("expected research submit");
        };
        assert_eq!(images, ["a.jpg", "b.jpg"]);
    }
}
