//! Research reports: the domain logic for filing and assigning beach surveys.
//!
//! Each public operation runs in one storage transaction. An error anywhere
//! drops the transaction uncommitted, so nothing is half-written.

use jiff::Timestamp;
use uuid::Uuid;

use crate::distance;
use crate::model::{
    Beach, Coordinate, Page, PageRequest, ReportStatus, ResearchReport, ResearchRequest,
    ResearchSegment, SegmentRequest, TrashType, Worker,
};
use crate::storage::{Storage, StorageError, Tx};

/// Errors from research operations.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("no member named '{0}'")]
    ResearcherNotFound(String),

    #[error("member '{0}' is not a worker and cannot file research")]
    NotAResearcher(String),

    #[error("no beach named '{0}'")]
    BeachNotFound(String),

    #[error("research report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("unknown trash type: {0}")]
    UnknownTrashType(String),

    #[error("segment '{0}' has coordinates with no finite distance")]
    UnmeasurableSegment(String),

    #[error("cannot complete assignment of report {id}: status is {current}, expected ASSIGNMENT_NEEDED")]
    InvalidStatusTransition { id: Uuid, current: ReportStatus },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Broad failure categories, for callers that only need to branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InvalidState,
    Storage,
}

impl ResearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResearcherNotFound(_)
            | Self::NotAResearcher(_)
            | Self::BeachNotFound(_)
            | Self::ReportNotFound(_) => ErrorKind::NotFound,
            Self::UnknownTrashType(_) | Self::UnmeasurableSegment(_) => {
                ErrorKind::InvalidArgument
            }
            Self::InvalidStatusTransition { .. } => ErrorKind::InvalidState,
            Self::Storage(StorageError::ReportNotFound(_)) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = core::result::Result<T, ResearchError>;

/// Files a new research report and returns its id.
///
/// Resolves the researcher and beach, assembles the report, and stores it
/// with all segments and images in one write.
pub fn insert_research(storage: &Storage, request: &ResearchRequest) -> Result<Uuid> {
    let tx = storage.transaction()?;

    let researcher = find_researcher(&tx, &request.researcher_username)?;
    let beach = find_beach(&tx, &request.beach_name)?;
    let report = assemble_report(researcher, beach, request, Timestamp::now())?;

    tx.save_report(&report)?;
    tx.commit()?;

    tracing::info!(
        id = %report.id,
        beach = %report.beach.name,
        segments = report.segments.len(),
        total_length = report.total_length,
        "stored research report"
    );
    Ok(report.id)
}

/// Builds a report from a request and already-resolved references.
///
/// Segment lengths come from their coordinates. The stored total is their
/// sum; `total_beach_length` from the request is kept only as `beach_length`.
pub fn assemble_report(
    researcher: Worker,
    beach: Beach,
    request: &ResearchRequest,
    reported_at: Timestamp,
) -> Result<ResearchReport> {
    let segments = request
        .research_sub_list
        .iter()
        .map(build_segment)
        .collect::<Result<Vec<_>>>()?;

    let mut report = ResearchReport {
        id: Uuid::new_v4(),
        researcher,
        beach,
        beach_length: request.total_beach_length,
        total_length: 0.0,
        expected_trash_amount: request.expected_trash_amount,
        reported_at,
        weather: request.weather.clone(),
        special_note: request.special_note.clone(),
        status: ReportStatus::AssignmentNeeded,
        segments,
        images: request.uploaded_file_names.clone(),
    };
    report.total_length = report.segment_length_sum();
    Ok(report)
}

/// Marks a report's cleanup assignment as completed.
///
/// Only `ASSIGNMENT_NEEDED` reports can move; anything else, including a
/// report that is already completed, is rejected and left untouched.
pub fn update_status(storage: &Storage, id: Uuid) -> Result<()> {
    let tx = storage.transaction()?;

    let report = tx
        .find_report_by_id(id)?
        .ok_or(ResearchError::ReportNotFound(id))?;

    if report.status != ReportStatus::AssignmentNeeded {
        tracing::warn!(%id, status = %report.status, "rejected status change");
        return Err(ResearchError::InvalidStatusTransition {
            id,
            current: report.status,
        });
    }

    let next = ReportStatus::AssignmentCompleted;
    tx.update_report_status(id, next)?;
    tx.commit()?;

    tracing::info!(%id, from = %report.status, to = %next, "changed report status");
    Ok(())
}

/// Searches reports still awaiting assignment.
pub fn search_needed(
    storage: &Storage,
    term: Option<&str>,
    page: PageRequest,
) -> Result<Page<ResearchReport>> {
    let tx = storage.read()?;
    Ok(tx.search_reports(term, page)?)
}

/// Loads a single report.
pub fn find_research(storage: &Storage, id: Uuid) -> Result<ResearchReport> {
    let tx = storage.read()?;
    tx.find_report_by_id(id)?
        .ok_or(ResearchError::ReportNotFound(id))
}

fn find_researcher(tx: &Tx<'_>, username: &str) -> Result<Worker> {
    let member = tx
        .find_member_by_username(username)?
        .ok_or_else(|| ResearchError::ResearcherNotFound(username.to_string()))?;
    member
        .into_worker()
        .ok_or_else(|| ResearchError::NotAResearcher(username.to_string()))
}

fn find_beach(tx: &Tx<'_>, name: &str) -> Result<Beach> {
    tx.find_beach_by_name(name)?
        .ok_or_else(|| ResearchError::BeachNotFound(name.to_string()))
}

fn build_segment(request: &SegmentRequest) -> Result<ResearchSegment> {
    let main_trash_type = request
        .main_trash_type
        .parse::<TrashType>()
        .map_err(|e| ResearchError::UnknownTrashType(e.0))?;
    let start = Coordinate::new(request.start_latitude, request.start_longitude);
    let end = Coordinate::new(request.end_latitude, request.end_longitude);
    let length = distance::between(start, end);
    if !length.is_finite() {
        return Err(ResearchError::UnmeasurableSegment(
            request.beach_name_with_index.clone(),
        ));
    }
    tracing::debug!(segment = %request.beach_name_with_index, length, "measured segment");

    Ok(ResearchSegment {
        beach_name_with_index: request.beach_name_with_index.clone(),
        start,
        end,
        main_trash_type,
        length,
    })
}
