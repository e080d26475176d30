//! Beach: a surveyed location, keyed by name.

use serde::{Deserialize, Serialize};

use super::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beach {
    pub name: String,

    /// Administrative region, e.g. `Busan Haeundae-gu`.
    pub region: Option<String>,

    pub center: Option<Coordinate>,
}
