//! Structured report parsing with raw-text fallback.

use crate::domain::ReviewReport;

/// Parses model output as a review report. Accepts bare JSON or a fenced
/// ```json block; anything else yields `None` so the caller can fall back to
/// the raw text.
pub fn parse_report(text: &str) -> Option<ReviewReport> {
    if let Ok(report) = serde_json::from_str(text.trim()) {
        return Some(report);
    }

    let fenced = strip_code_fence(text)?;
    serde_json::from_str(fenced.trim()).ok()
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```")
}

#[cfg(test)]
mod tests {
    use super::parse_report;

    const REPORT_JSON: &str = r#"{
        "issues": [
            {
                "type": "logic",
                "line": 3,
                "excerpt": "if (n <= 1) return n;",
                "explanation": "Negative inputs recurse forever.",
                "suggestion": "Guard against n < 0."
            }
        ],
        "summary": "One logic issue found."
    }"#;

    #[test]
    fn parses_bare_json_report() {
        let report = parse_report(REPORT_JSON).expect("report should parse");
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, "logic");
        assert_eq!(report.issues[0].line, Some(3));
        assert_eq!(report.summary, "One logic issue found.");
    }

    #[test]
    fn parses_fenced_json_report() {
        let fenced = format!("```json\n{REPORT_JSON}\n```");
        let report = parse_report(&fenced).expect("fenced report should parse");
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn tolerates_null_line_numbers() {
        let report = parse_report(
            r#"{"issues":[{"type":"style","line":null,"excerpt":"","explanation":"","suggestion":""}],"summary":""}"#,
        )
        .expect("report should parse");
        assert_eq!(report.issues[0].line, None);
    }

    #[test]
    fn prose_falls_through_to_raw() {
        assert!(parse_report("The code looks mostly fine to me.").is_none());
    }

    #[test]
    fn json_of_the_wrong_shape_falls_through_to_raw() {
        assert!(parse_report(r#"{"verdict":"fine"}"#).is_none());
    }
}
