//! Select controls and skill pills rendered as text.

use std::fmt;

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value reported when chosen.
    pub value: String,
    /// Text shown for the option.
    pub label: String,
}

impl SelectOption {
    /// Builds an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// A labelled drop-down bound to a current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    /// Field label.
    pub label: String,
    /// Element id, unique per row.
    pub id: String,
    /// Currently selected value.
    pub value: String,
    /// Options in display order.
    pub options: Vec<SelectOption>,
    /// Whether the control ignores input.
    pub disabled: bool,
}

impl SelectControl {
    /// Label of the option matching the current value.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        self.options.iter().find(|option| option.value == self.value).map(|option| option.label.as_str())
    }

    /// Whether `value` is one of the options.
    #[must_use]
    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

impl fmt::Display for SelectControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.selected_label().unwrap_or(&self.value))?;
        if self.disabled {
            f.write_str(" (locked)")?;
        }
        Ok(())
    }
}

/// A toggleable skill chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPill {
    /// Skill name.
    pub label: String,
    /// Whether the skill is chosen.
    pub selected: bool,
    /// Whether the pill ignores input.
    pub disabled: bool,
}

impl fmt::Display for SkillPill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.selected { 'x' } else { ' ' };
        write!(f, "[{mark}] {}", self.label)
    }
}
