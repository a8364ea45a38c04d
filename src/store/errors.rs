//! Shared store error formatting helpers.

use std::error::Error as StdError;

/// Formats a reqwest error into a concise user-facing string, without the
/// URL noise reqwest embeds in its `Display` output chain.
pub fn format_http_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "request timed out".to_owned();
    }

    if error.is_connect() {
        return "connection failed".to_owned();
    }

    format_error_chain(error)
}

/// Joins an error chain into a single `a: b: c` string, deduplicating
/// adjacent identical messages.
pub fn format_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut current = Some(error);
    let mut parts = Vec::new();

    while let Some(err) = current {
        let text = err.to_string();
        if !text.is_empty() && parts.last() != Some(&text) {
            parts.push(text);
        }
        current = err.source();
    }

    if parts.is_empty() {
        "unknown error".to_owned()
    } else {
        parts.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::format_error_chain;
    use std::fmt;

    #[derive(Debug)]
    struct Leaf;

    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "leaf failure")
        }
    }

    impl std::error::Error for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrapper failure")
        }
    }

    impl std::error::Error for Wrapper {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn chain_is_joined_with_colons() {
        assert_eq!(
            format_error_chain(&Wrapper(Leaf)),
            "wrapper failure: leaf failure"
        );
    }
}
