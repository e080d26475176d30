//! Core data model for Tideline.
//!
//! These types represent the survey domain:
//! members, beaches, research reports and their segments, and paging.

mod beach;
mod member;
mod page;
mod request;
mod research;

pub use beach::Beach;
pub use member::{Admin, Member, Worker};
pub use page::{Page, PageRequest};
pub use request::{ResearchRequest, SegmentRequest};
pub use research::{Coordinate, ReportStatus, ResearchReport, ResearchSegment, TrashType};

/// A stored or submitted label that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);
