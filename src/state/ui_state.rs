//! Presentation state owned by the board: theme and per-category expansion flags

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Display theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Saved preference wins; otherwise follow the host's dark-mode signal
    pub fn resolve(saved: Option<Theme>, prefers_dark: bool) -> Self {
        match saved {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// UI flags that used to live as ambient page state
#[derive(Debug, Clone)]
pub struct UiState {
    pub theme: Theme,
    expanded_categories: HashMap<String, bool>,
    expanded_history: HashMap<String, bool>,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            expanded_categories: HashMap::new(),
            expanded_history: HashMap::new(),
        }
    }

    pub fn is_category_expanded(&self, category: &str) -> bool {
        self.expanded_categories.get(category).copied().unwrap_or(false)
    }

    pub fn is_history_expanded(&self, category: &str) -> bool {
        self.expanded_history.get(category).copied().unwrap_or(false)
    }

    pub fn expand_category(&mut self, category: &str) {
        self.expanded_categories.insert(category.to_string(), true);
    }

    /// Flip a category's expansion, returning the new value
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let expanded = !self.is_category_expanded(category);
        self.expanded_categories.insert(category.to_string(), expanded);
        expanded
    }

    /// Flip a category's history panel, returning the new value
    pub fn toggle_history(&mut self, category: &str) -> bool {
        let expanded = !self.is_history_expanded(category);
        self.expanded_history.insert(category.to_string(), expanded);
        expanded
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_resolution() {
        assert_eq!(Theme::resolve(Some(Theme::Light), true), Theme::Light);
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
    }

    #[test]
    fn test_theme_parses_stored_values() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Dark".parse::<Theme>().is_err());
    }

    #[test]
    fn test_toggles_are_per_category() {
        let mut ui = UiState::new(Theme::Light);
        assert!(ui.toggle_category("Study"));
        assert!(!ui.is_category_expanded("Workout"));
        assert!(!ui.toggle_category("Study"));

        assert!(ui.toggle_history("Study"));
        assert!(!ui.is_category_expanded("Study"));
        assert_eq!(ui.toggle_theme(), Theme::Dark);
    }
}
