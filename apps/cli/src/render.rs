//! Plain-text cards for flow results.

use std::fmt::Write;

use qros_core::{BuildLogAnalysis, LaunchFileReport, QuestionAnswer, TfTreeAnalysis};
use qros_shared::RetrievedSource;

const RULE_WIDTH: usize = 72;

/// `── Title ─────...` padded to the rule width.
fn heading(title: &str) -> String {
    let used = title.chars().count() + 4;
    format!("── {title} {}\n", "─".repeat(RULE_WIDTH.saturating_sub(used)))
}

/// Indent every line of `text` by two spaces.
fn indent(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(out: &mut String, label: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    let _ = writeln!(out, "{label}\n{}\n", indent(body));
}

pub(crate) fn answer(result: &QuestionAnswer) -> String {
    let mut out = heading("Answer");
    let _ = writeln!(out, "{}\n", result.answer.trim());

    out.push_str(&heading("Sources"));
    if result.sources.is_empty() {
        out.push_str("  (answered without local documentation)\n");
    } else {
        for source in &result.sources {
            let _ = writeln!(out, "  • {source}");
        }
    }
    out
}

pub(crate) fn sources(sources: &[RetrievedSource]) -> String {
    if sources.is_empty() {
        return "No matching documents.\n".into();
    }

    let mut out = String::new();
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&heading(&format!("{}. {}", i + 1, source.source_id)));
        let _ = writeln!(out, "{}\n", indent(&source.excerpt));
    }
    out
}

pub(crate) fn build_log(analysis: &BuildLogAnalysis) -> String {
    if analysis.issues.is_empty() {
        return "✔ No errors found in the build log.\n".into();
    }

    let mut out = format!("✖ {} issue(s) found\n\n", analysis.issues.len());
    for issue in &analysis.issues {
        out.push_str(&heading(&issue.title));
        section(&mut out, "Error", &issue.error);
        section(&mut out, "Explanation", &issue.explanation);
        section(&mut out, "Suggestion", &issue.suggestion);
    }
    out
}

pub(crate) fn launch_file(report: &LaunchFileReport) -> String {
    let mut out = if report.issues_detected {
        heading("Issues detected")
    } else {
        heading("No issues detected")
    };
    section(&mut out, "Explanation", &report.explanation);
    section(&mut out, "Suggestions", &report.suggestions);
    out
}

pub(crate) fn tf_tree(analysis: &TfTreeAnalysis) -> String {
    if analysis.issues.is_empty() {
        return "✔ No issues found in the TF tree.\n".into();
    }

    let mut out = String::new();
    for (i, issue) in analysis.issues.iter().enumerate() {
        out.push_str(&heading(&format!("Issue {}", i + 1)));
        section(&mut out, "Description", &issue.description);
        section(&mut out, "Suggestion", &issue.suggestion);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use qros_core::{BuildIssue, TfIssue};

    #[test]
    fn heading_pads_to_rule_width() {
        let h = heading("Answer");
        assert!(h.starts_with("── Answer ─"));
        assert_eq!(h.trim_end().chars().count(), RULE_WIDTH);
    }

    #[test]
    fn answer_lists_sources() {
        let text = answer(&QuestionAnswer {
            answer: "Use a `.msg` file.".into(),
            sources: vec!["messages.md".into()],
        });
        assert!(text.contains("Use a `.msg` file."));
        assert!(text.contains("• messages.md"));
    }

    #[test]
    fn answer_without_sources_says_so() {
        let text = answer(&QuestionAnswer {
            answer: "General answer.".into(),
            sources: vec![],
        });
        assert!(text.contains("without local documentation"));
    }

    #[test]
    fn build_log_cards_skip_empty_sections() {
        let text = build_log(&BuildLogAnalysis {
            issues: vec![BuildIssue {
                title: "Missing rclpy".into(),
                error: "CMake Error at CMakeLists.txt:14".into(),
                explanation: "".into(),
                suggestion: "Add `<depend>rclpy</depend>`.".into(),
            }],
        });
        assert!(text.contains("1 issue(s) found"));
        assert!(text.contains("── Missing rclpy"));
        assert!(text.contains("  CMake Error at CMakeLists.txt:14"));
        assert!(!text.contains("Explanation"));
    }

    #[test]
    fn empty_results_render_success_lines() {
        assert!(build_log(&BuildLogAnalysis::default()).contains("No errors"));
        assert!(tf_tree(&TfTreeAnalysis::default()).contains("No issues"));
        assert!(sources(&[]).contains("No matching documents"));
    }

    #[test]
    fn tf_issues_are_numbered() {
        let text = tf_tree(&TfTreeAnalysis {
            issues: vec![
                TfIssue {
                    description: "a".into(),
                    suggestion: "b".into(),
                },
                TfIssue {
                    description: "c".into(),
                    suggestion: "d".into(),
                },
            ],
        });
        assert!(text.contains("Issue 1"));
        assert!(text.contains("Issue 2"));
    }

    #[test]
    fn launch_report_headline_reflects_detection() {
        let report = LaunchFileReport {
            issues_detected: false,
            suggestions: String::new(),
            explanation: "Looks fine.".into(),
        };
        let text = launch_file(&report);
        assert!(text.contains("No issues detected"));
        assert!(!text.contains("Suggestions"));
    }
}
