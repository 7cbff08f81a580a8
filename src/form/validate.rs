//! Title validation rules and per-field state.

use std::time::Duration;

/// Delay before async title checks run.
pub const DEFAULT_ASYNC_DEBOUNCE: Duration = Duration::from_millis(500);

/// One title rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Rejects blank values.
    Required {
        /// Error shown when blank.
        message: String,
    },
    /// Rejects values with fewer than `min` characters once trimmed.
    MinLength {
        /// Minimum trimmed length.
        min: usize,
        /// Error shown when too short.
        message: String,
    },
    /// Rejects values containing `forbidden`. Runs only after the debounce
    /// window and only when every synchronous rule passed.
    AsyncPattern {
        /// Substring that is not allowed.
        forbidden: String,
        /// Error shown on a match.
        message: String,
        /// Quiet period before the check runs.
        debounce: Duration,
    },
}

impl Validator {
    /// Whether this rule waits for the debounce window.
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, Self::AsyncPattern { .. })
    }

    fn check(&self, value: &str) -> Option<&str> {
        match self {
            Self::Required { message } => value.trim().is_empty().then_some(message.as_str()),
            Self::MinLength { min, message } => {
                (value.trim().chars().count() < *min).then_some(message.as_str())
            }
            Self::AsyncPattern { forbidden, message, .. } => {
                value.contains(forbidden.as_str()).then_some(message.as_str())
            }
        }
    }
}

/// The ordered rules applied to every title in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRules {
    validators: Vec<Validator>,
}

impl TitleRules {
    /// Builds a rule set from explicit validators.
    #[must_use]
    pub fn new(validators: Vec<Validator>) -> Self {
        Self { validators }
    }

    /// Required title of at least `min_length` characters, plus the
    /// debounced `"error"` check.
    #[must_use]
    pub fn standard(min_length: usize) -> Self {
        let mut validators = vec![Validator::Required { message: "Task title is required".into() }];
        if min_length > 1 {
            validators.push(Validator::MinLength {
                min: min_length,
                message: format!("Must include at least {min_length} characters"),
            });
        }
        validators.push(Validator::AsyncPattern {
            forbidden: "error".into(),
            message: r#"No "error" allowed in task title"#.into(),
            debounce: DEFAULT_ASYNC_DEBOUNCE,
        });
        Self::new(validators)
    }

    /// First failing synchronous rule, if any.
    #[must_use]
    pub fn sync_errors(&self, value: &str) -> Vec<String> {
        self.validators
            .iter()
            .filter(|v| !v.is_async())
            .find_map(|v| v.check(value))
            .map(|message| vec![message.to_string()])
            .unwrap_or_default()
    }

    /// Messages from every async rule that rejects `value`.
    #[must_use]
    pub fn async_errors(&self, value: &str) -> Vec<String> {
        self.validators
            .iter()
            .filter(|v| v.is_async())
            .filter_map(|v| v.check(value))
            .map(str::to_string)
            .collect()
    }

    /// Longest debounce among async rules, or `None` without any.
    #[must_use]
    pub fn debounce(&self) -> Option<Duration> {
        self.validators
            .iter()
            .filter_map(|v| match v {
                Validator::AsyncPattern { debounce, .. } => Some(*debounce),
                Validator::Required { .. } | Validator::MinLength { .. } => None,
            })
            .max()
    }
}

impl Default for TitleRules {
    fn default() -> Self {
        Self::standard(1)
    }
}

/// Validation state of one title field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// The user has edited or left the field.
    pub touched: bool,
    /// An async check is waiting for its debounce window.
    pub validating: bool,
    sync_errors: Vec<String>,
    async_errors: Vec<String>,
}

impl FieldMeta {
    pub(crate) fn validate(&mut self, rules: &TitleRules, value: &str) {
        self.sync_errors = rules.sync_errors(value);
        self.async_errors.clear();
        self.validating = self.sync_errors.is_empty() && rules.debounce().is_some();
    }

    pub(crate) fn finish_async(&mut self, rules: &TitleRules, value: &str) {
        self.async_errors = rules.async_errors(value);
        self.validating = false;
    }

    /// Every current error.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.sync_errors.iter().chain(&self.async_errors).cloned().collect()
    }

    /// Whether the field currently has no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.sync_errors.is_empty() && self.async_errors.is_empty()
    }
}
