use serde::{Deserialize, Serialize};

/// Named search target, carrying the identifier each website uses for the
/// same real-world place
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Location {
    Cambridge,
}

impl Location {
    /// Area string understood by the Zoopla API and search pages
    pub fn zoopla_area(&self) -> &'static str {
        match self {
            Location::Cambridge => "Cambridge, Cambridgeshire",
        }
    }

    /// Opaque region code understood by the Rightmove search endpoint
    pub fn rightmove_identifier(&self) -> &'static str {
        match self {
            Location::Cambridge => "REGION^274",
        }
    }
}

/// Named exclusion policy applied while scraping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Filter {
    /// Exclude shared and room-only accommodation
    NoShare,
}
