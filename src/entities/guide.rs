//! Resource guide entity - Static educational content shown in the guide viewer.

use serde::{Deserialize, Serialize};

/// One educational guide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGuide {
    /// Short stable identifier (e.g., "g1")
    pub id: String,
    /// Guide title
    pub title: String,
    /// One-line teaser shown in listings
    pub summary: String,
    /// Full body text
    pub content: String,
}
