//! Member types: everyone with an account, tagged by role.

use serde::{Deserialize, Serialize};

/// A registered member. Only workers may file research reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Member {
    Worker(Worker),
    Admin(Admin),
}

impl Member {
    pub fn username(&self) -> &str {
        match self {
            Self::Worker(w) => &w.username,
            Self::Admin(a) => &a.username,
        }
    }

    /// Narrows to the worker role, if that is what this member is.
    pub fn into_worker(self) -> Option<Worker> {
        match self {
            Self::Worker(w) => Some(w),
            Self::Admin(_) => None,
        }
    }

    /// Role label as stored in the `member.role` column.
    pub fn role(&self) -> &'static str {
        match self {
            Self::Worker(_) => "worker",
            Self::Admin(_) => "admin",
        }
    }
}

/// A field worker. Surveys beaches and files research reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub username: String,
    pub name: String,
    pub contact: Option<String>,
}

/// An administrator. Assigns cleanup crews to reported beaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub username: String,
    pub name: String,
}
