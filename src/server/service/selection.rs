use std::collections::{BTreeMap, BTreeSet, HashMap};
use crate::server::model::menu::{GroupId, MenuItemId, OptionId};

/// Options currently ticked for each menu item, before the item is added.
///
/// Each chosen option remembers its group so single-select groups can be
/// enforced on every toggle: at most one option of such a group is ever held
/// for an item.
#[derive(Debug, Default)]
pub(crate) struct SelectionState {
    chosen: HashMap<MenuItemId, BTreeMap<OptionId, GroupId>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-select flips membership. Single-select drops every option of the
    /// group first and then selects `option_id`, radio button style.
    pub fn toggle(&mut self, item_id: &str, option_id: &str, group_id: &str, is_multi: bool) {
        let chosen = self.chosen.entry(item_id.to_string()).or_default();
        if is_multi {
            if chosen.remove(option_id).is_none() {
                chosen.insert(option_id.to_string(), group_id.to_string());
            }
            return;
        }
        chosen.retain(|_, group| group.as_str() != group_id);
        chosen.insert(option_id.to_string(), group_id.to_string());
    }

    pub fn selections_for(&self, item_id: &str) -> BTreeSet<OptionId> {
        self.chosen
            .get(item_id)
            .map(|chosen| chosen.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self, item_id: &str) {
        self.chosen.remove(item_id);
    }

    pub fn clear_all(&mut self) {
        self.chosen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> BTreeSet<OptionId> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_when_nothing_recorded() {
        let state = SelectionState::new();
        assert!(state.selections_for("it-caesar").is_empty());
    }

    #[test]
    fn multi_select_flips_membership() {
        let mut state = SelectionState::new();
        state.toggle("it-caesar", "op-chicken", "g-addons", true);
        state.toggle("it-caesar", "op-tofu", "g-addons", true);
        assert_eq!(state.selections_for("it-caesar"), ids(&["op-chicken", "op-tofu"]));

        state.toggle("it-caesar", "op-chicken", "g-addons", true);
        assert_eq!(state.selections_for("it-caesar"), ids(&["op-tofu"]));
    }

    #[test]
    fn single_select_keeps_only_latest() {
        let mut state = SelectionState::new();
        state.toggle("it-club", "op-fries", "g-side", false);
        state.toggle("it-club", "op-side-soup", "g-side", false);
        assert_eq!(state.selections_for("it-club"), ids(&["op-side-soup"]));

        // re-selecting the current choice keeps it selected
        state.toggle("it-club", "op-side-soup", "g-side", false);
        assert_eq!(state.selections_for("it-club"), ids(&["op-side-soup"]));
    }

    #[test]
    fn single_select_leaves_other_groups_alone() {
        let mut state = SelectionState::new();
        state.toggle("it-club", "op-gf-bun", "g-gf-bun", true);
        state.toggle("it-club", "op-fries", "g-side", false);
        state.toggle("it-club", "op-side-soup", "g-side", false);
        assert_eq!(state.selections_for("it-club"), ids(&["op-gf-bun", "op-side-soup"]));
    }

    #[test]
    fn single_select_invariant_over_toggle_sequence() {
        let side = ["op-a", "op-b", "op-c"];
        let mut state = SelectionState::new();
        for step in 0..30 {
            let option = side[(step * 7 + 3) % side.len()];
            state.toggle("it-club", option, "g-side", false);
            if step % 4 == 0 {
                state.toggle("it-club", "op-gf-bun", "g-gf-bun", true);
            }
            let in_group = state
                .selections_for("it-club")
                .iter()
                .filter(|id| side.contains(&id.as_str()))
                .count();
            assert_eq!(in_group, 1, "after step {}", step);
        }
    }

    #[test]
    fn selections_are_per_item() {
        let mut state = SelectionState::new();
        state.toggle("it-caesar", "op-chicken", "g-addons", true);
        state.toggle("it-club", "op-fries", "g-side", false);
        state.clear("it-caesar");
        assert!(state.selections_for("it-caesar").is_empty());
        assert_eq!(state.selections_for("it-club"), ids(&["op-fries"]));

        state.clear_all();
        assert!(state.selections_for("it-club").is_empty());
    }
}
