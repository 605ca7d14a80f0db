//! Shared domain enumerations.

use std::fmt;
use std::str::FromStr;

pub use penman_api_types::PostType;

/// The three mutually exclusive listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFilter {
    #[default]
    All,
    Published,
    Drafts,
}

impl ListingFilter {
    /// Publish flag the Post-API filters on, if any.
    pub fn published(self) -> Option<bool> {
        match self {
            ListingFilter::All => None,
            ListingFilter::Published => Some(true),
            ListingFilter::Drafts => Some(false),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListingFilter::All => "all",
            ListingFilter::Published => "published",
            ListingFilter::Drafts => "drafts",
        }
    }
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ListingFilter::All),
            "published" => Ok(ListingFilter::Published),
            "drafts" | "draft" => Ok(ListingFilter::Drafts),
            other => Err(format!("unknown listing filter `{other}`")),
        }
    }
}
