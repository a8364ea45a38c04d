//! Domain models shared across the store, review, and UI layers.

use serde::Deserialize;
use std::fmt;

/// Snippet shown to a user with no saved record, and restored on reset.
pub const DEFAULT_SNIPPET: &str = r#"// Your code here
function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

console.log(fibonacci(10));"#;

/// A user's saved code record as returned by the remote store.
#[derive(Debug, Clone)]
pub struct CodeRecord {
    pub code: String,
    pub updated_at_unix_ms: i64,
    /// True when the store substituted the default payload for a missing record.
    pub is_default: bool,
}

/// The current application route.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Route {
    Editor,
    Review,
}

/// A duck persona the user can talk through.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DuckPersonality {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

/// The selectable duck roster, in display order.
pub const DUCK_PERSONALITIES: [DuckPersonality; 5] = [
    DuckPersonality {
        id: "mentor",
        name: "Mentor Duck",
        emoji: "🦆",
        description: "Patient and encouraging, guides you through problems step by step",
    },
    DuckPersonality {
        id: "socratic",
        name: "Socratic Duck",
        emoji: "🧐",
        description: "Asks thought-provoking questions to help you find your own answers",
    },
    DuckPersonality {
        id: "cheerleader",
        name: "Cheerleader Duck",
        emoji: "🎉",
        description: "Enthusiastic and supportive, celebrates every small win",
    },
    DuckPersonality {
        id: "debugger",
        name: "Debugger Duck",
        emoji: "🔍",
        description: "Methodical and analytical, helps you trace bugs systematically",
    },
    DuckPersonality {
        id: "zen",
        name: "Zen Duck",
        emoji: "🧘",
        description: "Calm and philosophical, helps you step back and see the bigger picture",
    },
];

/// A single issue reported by the review model.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewIssue {
    /// Issue category, e.g. "syntax", "runtime", "style", "logic".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// 1-based line number, when the model could attribute one.
    pub line: Option<u32>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub suggestion: String,
}

/// The structured shape the review prompt asks the model to return.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewReport {
    pub issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub summary: String,
}

/// Outcome of a review request: structured when the response parsed, raw otherwise.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    Report(ReviewReport),
    Raw(String),
}

impl fmt::Display for DuckPersonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.name)
    }
}
