//! Research report commands: submit, show, complete, search.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use uuid::Uuid;

use crate::{
    config::Config,
    identity,
    model::{PageRequest, ResearchRequest},
    research::{self, ErrorKind, ResearchError},
    storage::Storage,
};

use super::format::{format_page_footer, format_report_line, short_id};

#[derive(Debug, Subcommand)]
pub enum ResearchCommand {
    /// File a research report from a JSON request. Prints the report ID.
    ///
    /// The request uses the field client's camelCase shape:
    /// `beachName`, `researchSubList`, `uploadedFileNames`, ...
    Submit {
        /// Path to the request JSON.
        request: PathBuf,

        /// Researcher username. Overrides the request's `researcherUsername`.
        /// When neither is given, TIDELINE_RESEARCHER and then the config
        /// default are used.
        #[arg(long = "as")]
        researcher: Option<String>,

        /// Uploaded image file name to attach. Can be specified multiple times.
        /// Appended after any names listed in the request.
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Print a report as JSON.
    Show {
        /// Report ID: full UUID or unambiguous prefix.
        id: String,
    },

    /// Mark a report's cleanup assignment as completed.
    ///
    /// Only reports awaiting assignment can be completed.
    Complete {
        /// Report ID: full UUID or unambiguous prefix.
        id: String,
    },

    /// Search reports awaiting assignment, newest first.
    Search {
        /// Matches beach name, researcher username, or researcher name.
        term: Option<String>,

        /// Page number, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Reports per page (defaults to `page-size` from config).
        #[arg(long)]
        size: Option<u32>,
    },
}

pub(super) fn run(
    config: &Config,
    storage: &Storage,
    command: ResearchCommand,
) -> Result<(), String> {
    match command {
        ResearchCommand::Submit {
            request,
            researcher,
            images,
        } => cmd_submit(config, storage, &request, researcher.as_deref(), images),
        ResearchCommand::Show { id } => {
            let id = resolve_report_id(storage, &id)?;
            cmd_show(storage, id)
        }
        ResearchCommand::Complete { id } => {
            let id = resolve_report_id(storage, &id)?;
            cmd_complete(storage, id)
        }
        ResearchCommand::Search { term, page, size } => {
            let page = PageRequest::new(page, size.unwrap_or_else(|| config.page_size()));
            cmd_search(storage, term.as_deref(), page)
        }
    }
}

fn cmd_submit(
    config: &Config,
    storage: &Storage,
    path: &Path,
    researcher: Option<&str>,
    images: Vec<String>,
) -> Result<(), String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let mut request: ResearchRequest = serde_json::from_str(&json)
        .map_err(|e| format!("invalid request at {}: {e}", path.display()))?;

    request.researcher_username =
        identity::resolve_researcher(researcher, config, &request.researcher_username)?;
    request.uploaded_file_names.extend(images);

    let id = research::insert_research(storage, &request)
        .map_err(|e| format!("failed to file report: {}", describe(&e)))?;

    println!("{id}");
    Ok(())
}

fn cmd_show(storage: &Storage, id: Uuid) -> Result<(), String> {
    let report = research::find_research(storage, id).map_err(|e| describe(&e))?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("failed to serialize report: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_complete(storage: &Storage, id: Uuid) -> Result<(), String> {
    research::update_status(storage, id).map_err(|e| describe(&e))?;
    eprintln!("Report {} assignment completed", short_id(id));
    Ok(())
}

fn cmd_search(storage: &Storage, term: Option<&str>, page: PageRequest) -> Result<(), String> {
    let results = research::search_needed(storage, term, page)
        .map_err(|e| format!("failed to search reports: {e}"))?;

    if results.content.is_empty() {
        println!("No reports awaiting assignment");
    }
    for report in &results.content {
        println!("{}", format_report_line(report));
    }
    if results.total_elements > 0 {
        println!("{}", format_page_footer(&results));
    }

    Ok(())
}

/// Prefixes a research error with its kind.
fn describe(e: &ResearchError) -> String {
    let kind = match e.kind() {
        ErrorKind::NotFound => "not found",
        ErrorKind::InvalidArgument => "invalid argument",
        ErrorKind::InvalidState => "invalid state",
        ErrorKind::Storage => "storage",
    };
    format!("{kind}: {e}")
}

/// Resolve a report reference (full UUID or unambiguous prefix) to an id.
fn resolve_report_id(storage: &Storage, reference: &str) -> Result<Uuid, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }

    // Try as a prefix match against all reports.
    let tx = storage
        .read()
        .map_err(|e| format!("failed to open storage: {e}"))?;
    let matches = tx
        .find_report_ids_by_prefix(reference)
        .map_err(|e| format!("failed to look up reports: {e}"))?;

    match matches.as_slice() {
        [] => Err(format!("no report matching '{reference}'")),
        [id] => Ok(*id),
        ids => {
            let shown: Vec<String> = ids.iter().map(|id| short_id(*id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} reports: {}",
                ids.len(),
                shown.join(", ")
            ))
        }
    }
}
