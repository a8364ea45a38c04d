//! Shared component helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Collapses text to a compact single-line preview of at most `max_chars`.
pub fn short_preview(text: &str, max_chars: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        return normalized;
    }

    if max_chars <= 3 {
        return normalized.chars().take(max_chars).collect();
    }

    let mut out: String = normalized.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

/// Formats a unix timestamp (ms) into a compact relative age like "3s ago".
pub fn short_timestamp(unix_ms: i64) -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
        .unwrap_or_default();

    let age = Duration::from_millis((now_ms - unix_ms).max(0) as u64);
    let formatted = humantime::format_duration(age).to_string();

    // Only the most significant unit is worth a header cell.
    let unit = formatted.split_whitespace().next().unwrap_or("0s");
    format!("{unit} ago")
}

#[cfg(test)]
mod tests {
    use super::short_preview;

    #[test]
    fn short_text_passes_through() {
        assert_eq!(short_preview("let x = 1;", 20), "let x = 1;");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let preview = short_preview("a very long line of source code indeed", 14);
        assert_eq!(preview.chars().count(), 14);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(short_preview("if (n <= 1)\n  return n;", 40), "if (n <= 1) return n;");
    }
}
