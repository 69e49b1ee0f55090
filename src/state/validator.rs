//! Validation and normalization of new timer definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timer::{Timer, TimerId, CUSTOM_CATEGORY, PRESET_CATEGORIES};

/// Reasons a timer definition is refused. The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a timer name")]
    MissingName,

    #[error("Please enter a duration")]
    MissingDuration,

    #[error("Please choose a category")]
    MissingCategory,

    #[error("Unknown category \"{0}\", choose Other to add a custom one")]
    UnknownCategory(String),

    #[error("Please enter a custom category name")]
    MissingCustomCategory,

    #[error("A timer with the name \"{name}\" already exists in the {category} category")]
    Duplicate { name: String, category: String },

    #[error("Duration must be greater than 0")]
    ZeroDuration,
}

/// A minutes or seconds entry, only ever holding 0..=59
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClockField(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {0} is outside 0-59")]
pub struct ClockFieldError(pub u32);

impl ClockField {
    pub const MAX: u8 = 59;

    pub fn value(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for ClockField {
    type Error = ClockFieldError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(ClockFieldError(value))
    }
}

impl From<ClockField> for u32 {
    fn from(field: ClockField) -> Self {
        field.value()
    }
}

/// Raw user input for a new timer, as submitted from the creation form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub minutes: Option<ClockField>,
    #[serde(default)]
    pub seconds: Option<ClockField>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub custom_category: String,
}

fn default_category() -> String {
    PRESET_CATEGORIES[0].to_string()
}

impl Default for TimerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            minutes: None,
            seconds: None,
            category: default_category(),
            custom_category: String::new(),
        }
    }
}

impl TimerDraft {
    /// Category the timer will be filed under
    pub fn resolved_category(&self) -> String {
        let selected = self.category.trim();
        if selected == CUSTOM_CATEGORY {
            self.custom_category.trim().to_string()
        } else {
            selected.to_string()
        }
    }

    /// `minutes*60 + seconds`, treating an empty field as zero
    pub fn total_seconds(&self) -> u32 {
        let minutes = self.minutes.map_or(0, ClockField::value);
        let seconds = self.seconds.map_or(0, ClockField::value);
        minutes * 60 + seconds
    }
}

/// Check a draft against the active list and the offered categories, and turn
/// it into a timer record
pub fn validate(
    draft: &TimerDraft,
    active: &[Timer],
    categories: &[String],
    id: TimerId,
) -> Result<Timer, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    if draft.minutes.is_none() && draft.seconds.is_none() {
        return Err(ValidationError::MissingDuration);
    }

    let selected = draft.category.trim();
    if selected.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if selected != CUSTOM_CATEGORY && !categories.iter().any(|c| c == selected) {
        return Err(ValidationError::UnknownCategory(selected.to_string()));
    }

    let category = draft.resolved_category();
    if category.is_empty() {
        return Err(ValidationError::MissingCustomCategory);
    }

    if active.iter().any(|timer| timer.conflicts_with(name, &category)) {
        return Err(ValidationError::Duplicate {
            name: name.to_string(),
            category,
        });
    }

    let duration = draft.total_seconds();
    if duration == 0 {
        return Err(ValidationError::ZeroDuration);
    }

    Ok(Timer {
        id,
        name: name.to_string(),
        duration,
        category,
    })
}

/// Category names offered when creating a timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySuggestions {
    names: Vec<String>,
}

impl CategorySuggestions {
    pub fn new() -> Self {
        Self {
            names: PRESET_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Remember a custom category. Returns true if it was new.
    pub fn learn(&mut self, category: &str) -> bool {
        if category.is_empty() || self.names.iter().any(|c| c == category) {
            return false;
        }
        self.names.push(category.to_string());
        true
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for CategorySuggestions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, minutes: Option<u32>, seconds: Option<u32>, category: &str) -> TimerDraft {
        TimerDraft {
            name: name.to_string(),
            minutes: minutes.map(|m| ClockField::try_from(m).unwrap()),
            seconds: seconds.map(|s| ClockField::try_from(s).unwrap()),
            category: category.to_string(),
            custom_category: String::new(),
        }
    }

    fn presets() -> Vec<String> {
        CategorySuggestions::new().names().to_vec()
    }

    #[test]
    fn test_valid_draft_is_normalized() {
        let timer = validate(&draft("  Pushups ", Some(1), Some(30), "Workout"), &[], &presets(), 7).unwrap();
        assert_eq!(timer.id, 7);
        assert_eq!(timer.name, "Pushups");
        assert_eq!(timer.duration, 90);
        assert_eq!(timer.category, "Workout");
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = validate(&draft("   ", Some(1), None, "Study"), &[], &presets(), 1).unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
    }

    #[test]
    fn test_missing_duration_rejected() {
        let err = validate(&draft("Read", None, None, "Study"), &[], &presets(), 1).unwrap_err();
        assert_eq!(err, ValidationError::MissingDuration);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = validate(&draft("Read", Some(0), Some(0), "Study"), &[], &presets(), 1).unwrap_err();
        assert_eq!(err, ValidationError::ZeroDuration);
        assert_eq!(err.to_string(), "Duration must be greater than 0");
    }

    #[test]
    fn test_custom_category_required_for_other() {
        let mut d = draft("Nap", None, Some(30), CUSTOM_CATEGORY);
        d.custom_category = "   ".to_string();
        assert_eq!(validate(&d, &[], &presets(), 1).unwrap_err(), ValidationError::MissingCustomCategory);

        d.custom_category = " Rest ".to_string();
        let timer = validate(&d, &[], &presets(), 1).unwrap();
        assert_eq!(timer.category, "Rest");
    }

    #[test]
    fn test_category_must_be_chosen_from_the_list() {
        let err = validate(&draft("Nap", None, Some(30), "  "), &[], &presets(), 1).unwrap_err();
        assert_eq!(err, ValidationError::MissingCategory);
        assert_eq!(err.to_string(), "Please choose a category");

        let err = validate(&draft("Nap", None, Some(30), "Chores"), &[], &presets(), 1).unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory("Chores".to_string()));

        let mut known = presets();
        known.push("Chores".to_string());
        let timer = validate(&draft("Nap", None, Some(30), "Chores"), &[], &known, 1).unwrap();
        assert_eq!(timer.category, "Chores");
    }

    #[test]
    fn test_duplicate_is_case_insensitive_on_name_only() {
        let existing = validate(&draft("Run", Some(1), None, "Workout"), &[], &presets(), 1).unwrap();
        let active = vec![existing];

        let err = validate(&draft("run", Some(2), None, "Workout"), &active, &presets(), 2).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));

        assert!(validate(&draft("Run", Some(2), None, "Study"), &active, &presets(), 2).is_ok());
    }

    #[test]
    fn test_clock_field_range() {
        assert!(ClockField::try_from(59).is_ok());
        assert_eq!(ClockField::try_from(60), Err(ClockFieldError(60)));
        assert!(serde_json::from_str::<TimerDraft>(r#"{"name":"x","minutes":75}"#).is_err());
    }

    #[test]
    fn test_draft_defaults_to_first_preset() {
        let d: TimerDraft = serde_json::from_str(r#"{"name":"x","seconds":5}"#).unwrap();
        assert_eq!(d.category, "Workout");
        assert_eq!(d.total_seconds(), 5);
    }

    #[test]
    fn test_suggestions_learn_new_categories_once() {
        let mut suggestions = CategorySuggestions::new();
        assert_eq!(suggestions.names().len(), 4);
        assert!(suggestions.learn("Chores"));
        assert!(!suggestions.learn("Chores"));
        assert!(!suggestions.learn("Study"));
        assert_eq!(suggestions.names().last().map(String::as_str), Some("Chores"));
    }
}
