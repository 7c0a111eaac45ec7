//! Quote-of-the-day data model
//!
//! Holds the canonical `Quote` record, the role → category table, the
//! deterministic daily category pick, and the per-role fallback quotes.

mod cache;
mod service;
mod source;

pub use cache::{CacheEntry, QuoteCache, LAST_FETCH_KEY, QUOTE_KEY};
pub use service::QuoteService;
pub use source::{
    normalize_response, HttpQuoteSource, QuoteError, QuoteSource, DEFAULT_API_BASE, MISSING_AUTHOR,
    MISSING_TEXT,
};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category value that means "no category filter"
pub const RANDOM_CATEGORY: &str = "random";

/// A single quote as displayed and cached
///
/// `id` is a client-side timestamp and carries no identity; two quotes are
/// equal when their text, author and category match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Client-generated identifier (milliseconds since the Unix epoch)
    pub id: i64,
    /// The quote itself
    pub text: String,
    /// Who said it
    pub author: String,
    /// API category the quote was drawn from
    pub category: String,
}

impl Quote {
    /// Creates a quote stamped with the current time as its id
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            text: text.into(),
            author: author.into(),
            category: category.into(),
        }
    }
}

impl PartialEq for Quote {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.author == other.author && self.category == other.category
    }
}

impl Eq for Quote {}

/// Outcome of a quote request
///
/// Failures are reported through `success`/`message`; `data` always holds
/// something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub message: String,
    pub data: Quote,
}

impl QuoteResponse {
    pub fn ok(data: Quote, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn failed(data: Quote, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

/// Portal role the quote is shown to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Faculty,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Faculty, Role::Student];

    /// Lowercase name used in arguments and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Student => "student",
        }
    }

    /// Candidate API categories, in selection order
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[RANDOM_CATEGORY],
            Role::Faculty => &["wisdom", "education", "inspiration"],
            Role::Student => &["students", "motivation", "inspiration", "education"],
        }
    }

    /// Spreads roles apart when picking from the date seed
    fn multiplier(&self) -> u64 {
        match self {
            Role::Admin => 1,
            Role::Faculty => 2,
            Role::Student => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role: '{0}'. Valid roles: admin, faculty, student")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            "student" => Ok(Role::Student),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// Picks the category of the day for a role
///
/// The pick is a pure function of `(role, date)`: the date is folded into a
/// `YYYYMMDD` seed, scaled by the role multiplier, and reduced modulo the
/// number of candidates.
pub fn select_category(role: Role, date: NaiveDate) -> &'static str {
    let seed = date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64;
    let categories = role.categories();
    let index = (seed * role.multiplier()) % categories.len() as u64;
    categories[index as usize]
}

/// Hardcoded quote shown when the API cannot be reached
pub fn fallback_quote(role: Role) -> Quote {
    match role {
        Role::Admin => Quote::new(
            "The best way to predict the future is to create it.",
            "Peter Drucker",
            "leadership",
        ),
        Role::Faculty => Quote::new(
            "The art of teaching is the art of assisting discovery.",
            "Mark Van Doren",
            "education",
        ),
        Role::Student => Quote::new(
            "Education is the most powerful weapon which you can use to change the world.",
            "Nelson Mandela",
            "education",
        ),
    }
}
