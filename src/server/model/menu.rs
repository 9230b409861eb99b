use serde::{Deserialize, Serialize};
use crate::server::model::money::Money;

pub(crate) type SectionId = String;
pub(crate) type MenuItemId = String;
pub(crate) type GroupId = String;
pub(crate) type OptionId = String;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct MenuSection {
    pub id: SectionId,
    pub sort: i32,
    pub name_en: String,
    pub name_zh: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct MenuItem {
    pub id: MenuItemId,
    pub section_id: SectionId,
    pub sort: i32,
    pub title_en: String,
    pub title_zh: String,
    #[serde(rename = "base_price_cents")]
    pub base_price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SelectionMode {
    Single,
    Multi,
}

impl SelectionMode {
    pub fn is_multi(self) -> bool {
        matches!(self, SelectionMode::Multi)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct OptionGroup {
    pub id: GroupId,
    pub name_en: String,
    pub name_zh: String,
    pub selection_mode: SelectionMode,
    pub sort: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct MenuOption {
    pub id: OptionId,
    pub group_id: GroupId,
    pub label_en: String,
    pub label_zh: String,
    #[serde(rename = "price_delta_cents")]
    pub price_delta: Money,
    pub sort: i32,
}

/// Many-to-many link between a menu item and a reusable option group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ItemGroupLink {
    pub menu_item_id: MenuItemId,
    pub group_id: GroupId,
}

/// Raw catalog tables as fetched from the remote store.
#[derive(Debug, Default, Clone)]
pub(crate) struct CatalogRows {
    pub sections: Vec<MenuSection>,
    pub items: Vec<MenuItem>,
    pub groups: Vec<OptionGroup>,
    pub options: Vec<MenuOption>,
    pub links: Vec<ItemGroupLink>,
}
