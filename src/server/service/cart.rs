use std::collections::BTreeSet;
use uuid::Uuid;
use crate::server::model::cart::{CartLine, LineId, LineOption};
use crate::server::model::menu::{MenuItem, MenuOption, OptionId};
use crate::server::model::money::Money;
use crate::server::service::catalog::Catalog;

/// Build an immutable priced line for `item` with the options in `selected`.
///
/// `unit_price = base_price + sum(price_delta)` over the options that apply
/// to the item. Every add produces a fresh quantity 1 line; identical lines
/// are never merged.
pub(crate) fn price_line(catalog: &Catalog, item: &MenuItem, selected: &BTreeSet<OptionId>, note: &str) -> CartLine {
    let options = catalog.resolve(&item.id, selected);
    let option_delta: Money = options.iter().map(|o| o.price_delta).sum();

    CartLine {
        id: Uuid::new_v4(),
        menu_item_id: item.id.clone(),
        title_en: item.title_en.clone(),
        title_zh: item.title_zh.clone(),
        base_price: item.base_price,
        options: options
            .into_iter()
            .map(|o| LineOption { id: o.id.clone(), label: option_label(o) })
            .collect(),
        note: note.trim().to_string(),
        qty: 1,
        unit_price: item.base_price + option_delta,
    }
}

/// `Chicken/鸡肉 (+$6.00)`, or just `Fries/薯条` when the option is free.
fn option_label(option: &MenuOption) -> String {
    if option.price_delta.is_positive() {
        return format!("{}/{} (+${})", option.label_en, option.label_zh, option.price_delta);
    }
    format!("{}/{}", option.label_en, option.label_zh)
}

/// Lines in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: CartLine) -> &CartLine {
        self.lines.push(line);
        &self.lines[self.lines.len() - 1]
    }

    /// Removing an unknown id is a no-op; the return value only says whether
    /// anything changed.
    pub fn remove_line(&mut self, id: LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        before != self.lines.len()
    }

    /// Recomputed on every call.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
