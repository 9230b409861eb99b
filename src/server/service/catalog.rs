use std::collections::{BTreeSet, HashMap};
use log::warn;
use crate::server::model::menu::{
    CatalogRows, GroupId, MenuItem, MenuItemId, MenuOption, MenuSection, OptionGroup, OptionId, SectionId,
};

/// Read-only menu snapshot, fetched once per page load.
///
/// Besides the raw rows it keeps two derived lookups: the option groups that
/// apply to each item (through the item/group links) and the options of each
/// group, both in display order.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    sections: Vec<MenuSection>,
    items: Vec<MenuItem>,
    item_index: HashMap<MenuItemId, usize>,
    groups: HashMap<GroupId, OptionGroup>,
    options: HashMap<OptionId, MenuOption>,
    group_options: HashMap<GroupId, Vec<OptionId>>,
    item_groups: HashMap<MenuItemId, Vec<GroupId>>,
}

impl Catalog {
    pub fn new(rows: CatalogRows) -> Self {
        let CatalogRows { mut sections, mut items, groups, mut options, links } = rows;
        sections.sort_by_key(|s| s.sort);
        items.sort_by_key(|i| i.sort);
        options.sort_by_key(|o| o.sort);

        let item_index = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect::<HashMap<_, _>>();
        let groups = groups
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect::<HashMap<_, _>>();

        let mut group_options: HashMap<GroupId, Vec<OptionId>> = HashMap::new();
        let mut option_map = HashMap::with_capacity(options.len());
        for option in options {
            if !groups.contains_key(&option.group_id) {
                warn!("option {} points at unknown group {}, skipped", option.id, option.group_id);
                continue;
            }
            group_options.entry(option.group_id.clone()).or_default().push(option.id.clone());
            option_map.insert(option.id.clone(), option);
        }

        let mut item_groups: HashMap<MenuItemId, Vec<GroupId>> = HashMap::new();
        for link in links {
            if !item_index.contains_key(&link.menu_item_id) || !groups.contains_key(&link.group_id) {
                warn!("dangling item/group link {} -> {}, skipped", link.menu_item_id, link.group_id);
                continue;
            }
            let linked = item_groups.entry(link.menu_item_id).or_default();
            if !linked.contains(&link.group_id) {
                linked.push(link.group_id);
            }
        }
        for linked in item_groups.values_mut() {
            linked.sort_by_key(|id| groups.get(id).map(|g| g.sort).unwrap_or_default());
        }

        Self {
            sections,
            items,
            item_index,
            groups,
            options: option_map,
            group_options,
            item_groups,
        }
    }

    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    pub fn items_in<'a>(&'a self, section_id: &'a SectionId) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.iter().filter(move |item| &item.section_id == section_id)
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.item_index.get(id).map(|&idx| &self.items[idx])
    }

    pub fn option(&self, id: &str) -> Option<&MenuOption> {
        self.options.get(id)
    }

    pub fn groups_for(&self, item_id: &str) -> Vec<&OptionGroup> {
        self.item_groups
            .get(item_id)
            .map(|ids| ids.iter().filter_map(|id| self.groups.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn options_in(&self, group_id: &str) -> Vec<&MenuOption> {
        self.group_options
            .get(group_id)
            .map(|ids| ids.iter().filter_map(|id| self.options.get(id)).collect())
            .unwrap_or_default()
    }

    /// Group of `option_id`, provided that group is linked to `item_id`.
    pub fn applicable_group(&self, item_id: &str, option_id: &str) -> Option<&OptionGroup> {
        let option = self.options.get(option_id)?;
        let linked = self.item_groups.get(item_id)?;
        if !linked.contains(&option.group_id) {
            return None;
        }
        self.groups.get(&option.group_id)
    }

    /// Options of `selected` that apply to `item_id`, in display order
    /// (group order, then option order) whatever order they were picked in.
    pub fn resolve(&self, item_id: &str, selected: &BTreeSet<OptionId>) -> Vec<&MenuOption> {
        self.groups_for(item_id)
            .into_iter()
            .flat_map(|group| self.options_in(&group.id))
            .filter(|option| selected.contains(&option.id))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::lunch_menu;
    use super::*;
    use crate::server::model::menu::ItemGroupLink;

    #[test]
    fn rows_are_ordered_by_sort() {
        let catalog = Catalog::new(lunch_menu());
        let names = catalog.sections().iter().map(|s| s.name_en.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Salads", "Sandwiches", "Pizza"]);

        let salads = "sec-salads".to_string();
        let ids = catalog.items_in(&salads).map(|i| i.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["it-caesar", "it-soup"]);
    }

    #[test]
    fn item_groups_follow_group_order() {
        let catalog = Catalog::new(lunch_menu());
        let groups = catalog.groups_for("it-club").iter().map(|g| g.id.as_str()).collect::<Vec<_>>();
        assert_eq!(groups, vec!["g-side", "g-gf-bun"]);
        assert!(catalog.groups_for("it-soup").is_empty());
        assert!(catalog.groups_for("it-missing").is_empty());
    }

    #[test]
    fn applicable_group_requires_link() {
        let catalog = Catalog::new(lunch_menu());
        assert_eq!(catalog.applicable_group("it-caesar", "op-chicken").map(|g| g.id.as_str()), Some("g-addons"));
        assert!(catalog.applicable_group("it-club", "op-chicken").is_none());
        assert!(catalog.applicable_group("it-caesar", "op-unknown").is_none());
    }

    #[test]
    fn resolve_uses_display_order_and_drops_foreign_options() {
        let catalog = Catalog::new(lunch_menu());
        let selected = ["op-tofu", "op-chicken", "op-gf-crust"]
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>();
        let resolved = catalog.resolve("it-caesar", &selected).iter().map(|o| o.id.as_str()).collect::<Vec<_>>();
        assert_eq!(resolved, vec!["op-chicken", "op-tofu"]);
    }

    #[test]
    fn dangling_links_are_skipped() {
        let mut rows = lunch_menu();
        rows.links.push(ItemGroupLink { menu_item_id: "it-ghost".into(), group_id: "g-addons".into() });
        rows.links.push(ItemGroupLink { menu_item_id: "it-soup".into(), group_id: "g-ghost".into() });
        rows.links.push(ItemGroupLink { menu_item_id: "it-caesar".into(), group_id: "g-addons".into() });
        let catalog = Catalog::new(rows);
        assert!(catalog.groups_for("it-soup").is_empty());
        assert_eq!(catalog.groups_for("it-caesar").len(), 1);
    }
}
