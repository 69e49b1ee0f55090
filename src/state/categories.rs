//! Category grouping and category-wide commands
//!
//! Groupings are derived on every read from the active and completed lists;
//! nothing here is stored.

use serde::{Deserialize, Serialize};

use super::{
    board::{ActiveTimer, TimerView},
    timer::{Categorized, CompletedTimer, TimerId},
    ui_state::UiState,
};

/// Items grouped by category, in order of first appearance
#[derive(Debug)]
pub struct CategoryGroups<'a, T> {
    groups: Vec<(&'a str, Vec<&'a T>)>,
}

impl<'a, T> CategoryGroups<'a, T> {
    /// Members of `category`, in source order
    pub fn get(&self, category: &str) -> &[&'a T] {
        self.groups
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, members)| members.as_slice())
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group a list by category, keeping each member's relative order
pub fn group_by_category<T: Categorized>(items: &[T]) -> CategoryGroups<'_, T> {
    let mut groups: Vec<(&str, Vec<&T>)> = Vec::new();
    for item in items {
        let category = item.category();
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category, vec![item])),
        }
    }
    CategoryGroups { groups }
}

/// Union of categories from both lists, active ones first
pub fn all_categories<A: Categorized, C: Categorized>(active: &[A], completed: &[C]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let active_groups = group_by_category(active);
    let completed_groups = group_by_category(completed);
    for name in active_groups.keys().chain(completed_groups.keys()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Everything shown for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub name: String,
    pub active: Vec<TimerView>,
    pub completed: Vec<CompletedTimer>,
    pub expanded: bool,
    pub history_expanded: bool,
}

pub fn category_views(active: &[ActiveTimer], completed: &[CompletedTimer], ui: &UiState) -> Vec<CategoryView> {
    let active_groups = group_by_category(active);
    let completed_groups = group_by_category(completed);

    all_categories(active, completed)
        .into_iter()
        .map(|name| CategoryView {
            active: active_groups.get(&name).iter().map(|entry| entry.view()).collect(),
            completed: completed_groups.get(&name).iter().map(|t| (*t).clone()).collect(),
            expanded: ui.is_category_expanded(&name),
            history_expanded: ui.is_history_expanded(&name),
            name,
        })
        .collect()
}

/// Command applied to every active timer in a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkCommand {
    Start,
    Pause,
    Reset,
}

/// Which members a category command actually moved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub category: String,
    pub changed: Vec<TimerId>,
    pub unchanged: Vec<TimerId>,
}

/// Dispatch `command` to each active member of `category` independently.
///
/// Each countdown decides on its own whether the command applies; a member
/// that refuses does not affect its siblings. Completed timers are never touched.
pub fn apply_bulk(active: &mut [ActiveTimer], category: &str, command: BulkCommand) -> BulkReport {
    let mut report = BulkReport {
        category: category.to_string(),
        ..BulkReport::default()
    };

    for entry in active.iter_mut().filter(|entry| entry.category() == category) {
        let changed = match command {
            BulkCommand::Start => entry.countdown.start(),
            BulkCommand::Pause => entry.countdown.pause(),
            BulkCommand::Reset => {
                let was_fresh = !entry.countdown.is_running()
                    && entry.countdown.remaining_ms() == entry.countdown.duration_ms();
                entry.countdown.reset();
                !was_fresh
            }
        };
        if changed {
            report.changed.push(entry.timer.id);
        } else {
            report.unchanged.push(entry.timer.id);
        }
    }

    report
}
