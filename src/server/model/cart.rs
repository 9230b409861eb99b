use serde::Serialize;
use uuid::Uuid;
use crate::server::model::menu::{MenuItemId, OptionId};
use crate::server::model::money::Money;

pub(crate) type LineId = Uuid;

/// Option chosen on a line, label frozen at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LineOption {
    pub id: OptionId,
    pub label: String,
}

/// A priced cart line. Titles and prices are copies of the catalog values at
/// the moment the line was added; nothing on a line is recomputed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CartLine {
    pub id: LineId,
    pub menu_item_id: MenuItemId,
    pub title_en: String,
    pub title_zh: String,
    pub base_price: Money,
    pub options: Vec<LineOption>,
    pub note: String,
    pub qty: u32,
    /// base price plus every selected option delta
    pub unit_price: Money,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.scale(self.qty)
    }

    pub fn option_ids(&self) -> Vec<OptionId> {
        self.options.iter().map(|o| o.id.clone()).collect()
    }

    pub fn title(&self) -> String {
        format!("{} / {}", self.title_en, self.title_zh)
    }
}
