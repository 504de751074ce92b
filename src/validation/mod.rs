//! Pre-flight validation of order requests and post-decode validation of
//! server responses.
//!
//! Both sides share one report shape: a list of [`Issue`]s with a
//! [`Severity`] each, and an `ok` flag that flips to `false` as soon as
//! any issue at `Error` or above lands.

pub mod fields;
pub mod order;
pub mod path;
pub mod response;

pub use fields::{Constraint, FieldSpec, FieldType, ResponseClass};
pub use order::{OrderValidator, RiskAnalysis, SpreadType};
pub use path::{
    sanitize_numeric, sanitize_search_query, sanitize_symbol_list, validate_account_id,
    validate_order_id, validate_option_symbol, validate_session_id, validate_symbol,
};
pub use response::{ResponseValidator, ValidationLevel};

/// How serious a single finding is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
        }
    }
}

/// One finding against a field of a request or response.
#[derive(Clone, Debug)]
pub struct Issue {
    pub field: String,
    pub severity: Severity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(field: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity,
            message: message.into(),
            expected: None,
            actual: None,
            suggestion: None,
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity.as_str(), self.field, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {expected}, got {actual})")?;
        }
        Ok(())
    }
}

/// The outcome of a validation pass.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no issue reaches `Error` severity.
    pub fn ok(&self) -> bool {
        !self.issues.iter().any(|i| i.severity >= Severity::Error)
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(Issue::new(field, Severity::Error, message));
    }

    pub fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(Issue::new(field, Severity::Warning, message));
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    /// Prefix every issue's field with `label.`, for reports composed
    /// from sub-orders (bracket legs, spread legs).
    pub fn merge_labeled(&mut self, label: &str, other: ValidationReport) {
        for mut issue in other.issues {
            issue.field = if issue.field.is_empty() {
                label.to_string()
            } else {
                format!("{label}.{}", issue.field)
            };
            self.issues.push(issue);
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity >= Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    /// One-line roll-up used by error messages.
    pub fn summary(&self) -> String {
        if self.issues.is_empty() {
            return String::from("no issues");
        }
        let first = self
            .issues
            .iter()
            .find(|i| i.severity >= Severity::Error)
            .or(self.issues.first());
        match first {
            Some(issue) => format!(
                "{} error(s), {} warning(s); first: {issue}",
                self.error_count(),
                self.warning_count()
            ),
            None => String::from("no issues"),
        }
    }

    /// Full multi-line report, one issue per line.
    pub fn detailed_report(&self) -> String {
        let mut out = String::new();
        for issue in &self.issues {
            out.push_str(&issue.to_string());
            if let Some(suggestion) = &issue.suggestion {
                out.push_str(&format!(" -- {suggestion}"));
            }
            out.push('\n');
        }
        out
    }
}
