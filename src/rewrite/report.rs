//! Rewrite report types and formatting.
//!
//! Unresolved references are errors that never abort the run; they are
//! collected here, grouped by source file, and printed once at the end.
//! Ambiguities and malformed tokens land in a separate warnings section.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::plural_s;

/// A single reported reference problem.
#[derive(Debug, Clone)]
pub struct RewriteIssue {
    /// The reference path (or token snippet) in question.
    pub target: String,
    /// Reason/message.
    pub reason: String,
}

/// Diagnostics for one rewrite pass, grouped by source file.
#[derive(Debug, Default)]
pub struct RewriteReport {
    /// Unresolved references (the token was left untouched).
    pub unresolved: BTreeMap<String, Vec<RewriteIssue>>,
    /// Ambiguous resolutions and malformed tokens.
    pub warnings: BTreeMap<String, Vec<RewriteIssue>>,
}

impl RewriteReport {
    /// Record an unresolved reference.
    pub fn add_unresolved(&mut self, source: &str, target: impl Into<String>) {
        self.unresolved
            .entry(source.to_string())
            .or_default()
            .push(RewriteIssue {
                target: target.into(),
                reason: String::from("no matching public asset"),
            });
    }

    /// Record a warning (ambiguity, malformed token).
    pub fn add_warning(
        &mut self,
        source: &str,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.warnings
            .entry(source.to_string())
            .or_default()
            .push(RewriteIssue {
                target: target.into(),
                reason: reason.into(),
            });
    }

    /// Total unresolved reference count.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.values().map(|v| v.len()).sum()
    }

    /// Total warning count.
    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(|v| v.len()).sum()
    }

    /// Check if nothing was reported at all.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.warnings.is_empty()
    }

    /// Print the full report to stderr (unresolved -> warnings).
    pub fn print(&self) {
        self.print_section("unresolved references", &self.unresolved, true);
        self.print_section("warnings", &self.warnings, false);
    }

    fn print_section(
        &self,
        name: &str,
        issues: &BTreeMap<String, Vec<RewriteIssue>>,
        error: bool,
    ) {
        if issues.is_empty() {
            return;
        }
        eprintln!();

        let file_count = issues.len();
        let issue_count: usize = issues.values().map(|v| v.len()).sum();

        let header = if error {
            name.red().bold().to_string()
        } else {
            name.yellow().bold().to_string()
        };
        eprintln!(
            "{} {}",
            header,
            format!(
                "({file_count} file{}, {issue_count} entr{})",
                plural_s(file_count),
                if issue_count == 1 { "y" } else { "ies" }
            )
            .dimmed()
        );

        for (path, errs) in issues {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for e in errs {
                let arrow = if error {
                    "→".red().to_string()
                } else {
                    "→".yellow().to_string()
                };
                eprintln!("{} {} {}", arrow, e.target, e.reason.dimmed());
            }
        }
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unresolved = self.unresolved_count();
        let warnings = self.warning_count();

        if unresolved == 0 && warnings == 0 {
            write!(f, "{}", "all references resolved".green())
        } else {
            write!(
                f,
                "{} unresolved reference{}, {} warning{}",
                unresolved,
                plural_s(unresolved),
                warnings,
                plural_s(warnings)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = RewriteReport::default();
        assert!(report.is_clean());

        report.add_unresolved("css/app.css", "missing.png");
        report.add_unresolved("css/app.css", "gone.svg");
        report.add_unresolved("css/other.css", "missing.png");
        report.add_warning("css/app.css", "app.css", "ambiguous suffix");

        assert_eq!(report.unresolved_count(), 3);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.unresolved.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_names_exact_path() {
        let mut report = RewriteReport::default();
        report.add_unresolved("app.css", "images/missing.png");
        let issues = &report.unresolved["app.css"];
        assert_eq!(issues[0].target, "images/missing.png");
    }
}
