//! Deterministic fixture data for demo mode and harness rendering.

use crate::domain::{CodeRecord, ReviewIssue, ReviewOutcome, ReviewReport};

const DEMO_CODE: &str = r#"// binary search over a sorted array
function search(items, target) {
  let lo = 0;
  let hi = items.length;
  while (lo < hi) {
    const mid = (lo + hi) / 2;
    if (items[mid] === target) return mid;
    if (items[mid] < target) lo = mid + 1;
    else hi = mid;
  }
  return -1;
}

console.log(search([1, 3, 5, 8, 13], 8));"#;

/// Returns the fixture code record shown in demo mode.
pub fn demo_code_record() -> CodeRecord {
    CodeRecord {
        code: DEMO_CODE.to_owned(),
        updated_at_unix_ms: 1_754_300_000_000,
        is_default: false,
    }
}

/// Returns a fixture review report matching the demo snippet.
pub fn demo_review_outcome() -> ReviewOutcome {
    ReviewOutcome::Report(ReviewReport {
        issues: vec![
            ReviewIssue {
                kind: "runtime".to_owned(),
                line: Some(6),
                excerpt: "const mid = (lo + hi) / 2;".to_owned(),
                explanation: "The midpoint is a float whenever lo + hi is odd, so items[mid] \
                              reads an undefined index and the loop can spin forever."
                    .to_owned(),
                suggestion: "Use Math.floor((lo + hi) / 2) to keep the index integral.".to_owned(),
            },
            ReviewIssue {
                kind: "style".to_owned(),
                line: Some(4),
                excerpt: "let hi = items.length;".to_owned(),
                explanation: "Half-open bounds are fine, but the variable never changes meaning \
                              and could be const-scoped into the loop."
                    .to_owned(),
                suggestion: "Keep the half-open convention but document it in a comment."
                    .to_owned(),
            },
        ],
        summary: "One runtime bug in the midpoint computation, otherwise sound.".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::{demo_code_record, demo_review_outcome};
    use crate::domain::ReviewOutcome;

    #[test]
    fn demo_issue_lines_point_into_the_demo_snippet() {
        let record = demo_code_record();
        let line_count = record.code.lines().count() as u32;

        let ReviewOutcome::Report(report) = demo_review_outcome() else {
            panic!("demo outcome should be structured");
        };

        for issue in &report.issues {
            let line = issue.line.expect("demo issues carry line numbers");
            assert!(line >= 1 && line <= line_count);
        }
    }
}
