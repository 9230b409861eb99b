use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::server::model::cart::{CartLine, LineId};
use crate::server::model::form::{
    FormId, FormView, GroupView, ItemView, LineView, MenuView, OptionView, SectionView, SubmissionStatus,
};
use crate::server::model::menu::{MenuItemId, OptionId};
use crate::server::model::order::SubmitReceipt;
use crate::server::service::cart::{price_line, Cart};
use crate::server::service::catalog::Catalog;
use crate::server::service::error::OrderError;
use crate::server::service::selection::SelectionState;
use crate::server::util::time::helper::get_utc_now;

const NAME_REQUIRED_MSG: &str = "enter your name before ordering";
const SUBMITTING_MSG: &str = "submission already in progress";
const SUBMITTED_MSG: &str = "order already submitted, start a new order to add more";

/// Everything one customer's open order page holds: catalog snapshot, name,
/// pending option picks and notes, the cart and the submission status.
#[derive(Debug)]
pub(crate) struct OrderForm {
    session_id: String,
    catalog: Arc<Catalog>,
    display_name: String,
    selections: SelectionState,
    notes: HashMap<MenuItemId, String>,
    cart: Cart,
    status: SubmissionStatus,
    last_touched: DateTime<Utc>,
}

/// Snapshot handed to the remote submission while the form is `Submitting`.
#[derive(Debug)]
pub(crate) struct SubmitTicket {
    pub session_id: String,
    pub display_name: String,
    pub lines: Vec<CartLine>,
}

impl OrderForm {
    pub fn new(session_id: String, catalog: Arc<Catalog>) -> Self {
        Self {
            session_id,
            catalog,
            display_name: String::new(),
            selections: SelectionState::new(),
            notes: HashMap::new(),
            cart: Cart::new(),
            status: SubmissionStatus::default(),
            last_touched: get_utc_now(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        self.last_touched
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }

    /// Ordering is only possible once a non-blank name is set.
    pub fn can_order(&self) -> bool {
        !self.display_name.trim().is_empty()
    }

    pub fn set_display_name(&mut self, name: &str) {
        self.touch();
        self.display_name = name.to_string();
    }

    /// Toggle `option_id` for `item_id`, taking group and selection mode from
    /// the catalog. Returns the item's selection afterwards.
    pub fn toggle_option(&mut self, item_id: &str, option_id: &str) -> Result<BTreeSet<OptionId>, OrderError> {
        self.touch();
        let catalog = Arc::clone(&self.catalog);
        if catalog.item(item_id).is_none() {
            return Err(OrderError::validation(format!("unknown menu item {}", item_id)));
        }
        let group = catalog
            .applicable_group(item_id, option_id)
            .ok_or_else(|| OrderError::validation(format!("option {} does not apply to {}", option_id, item_id)))?;
        self.selections
            .toggle(item_id, option_id, &group.id, group.selection_mode.is_multi());
        Ok(self.selections.selections_for(item_id))
    }

    pub fn selections_for(&self, item_id: &str) -> BTreeSet<OptionId> {
        self.selections.selections_for(item_id)
    }

    pub fn set_note(&mut self, item_id: &str, note: &str) -> Result<(), OrderError> {
        self.touch();
        if self.catalog.item(item_id).is_none() {
            return Err(OrderError::validation(format!("unknown menu item {}", item_id)));
        }
        self.notes.insert(item_id.to_string(), note.to_string());
        Ok(())
    }

    /// Price the item with its current selection and note, append the line,
    /// then reset that item's selection and note buffer.
    pub fn add_to_cart(&mut self, item_id: &str) -> Result<&CartLine, OrderError> {
        self.touch();
        if !self.can_order() {
            return Err(OrderError::validation(NAME_REQUIRED_MSG));
        }
        self.ensure_editable()?;
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| OrderError::validation(format!("unknown menu item {}", item_id)))?;
        let selected = self.selections.selections_for(item_id);
        let note = self.notes.get(item_id).map(String::as_str).unwrap_or_default();
        let line = price_line(&self.catalog, item, &selected, note);

        self.selections.clear(item_id);
        self.notes.remove(item_id);
        Ok(self.cart.push(line))
    }

    /// No-op when `line_id` is not in the cart.
    pub fn remove_line(&mut self, line_id: LineId) -> Result<bool, OrderError> {
        self.touch();
        self.ensure_editable()?;
        Ok(self.cart.remove_line(line_id))
    }

    /// Move to `Submitting` and hand out what the remote calls need.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, OrderError> {
        self.touch();
        self.ensure_editable()?;
        if !self.can_order() {
            return Err(OrderError::validation(NAME_REQUIRED_MSG));
        }
        if self.cart.is_empty() {
            return Err(OrderError::validation("cart is empty"));
        }
        self.status = SubmissionStatus::Submitting;
        Ok(SubmitTicket {
            session_id: self.session_id.clone(),
            display_name: self.display_name.trim().to_string(),
            lines: self.cart.lines().to_vec(),
        })
    }

    /// Record the outcome of the remote calls. The cart is cleared only when
    /// every call succeeded; on failure it stays as it was so the customer
    /// can retry.
    pub fn finish_submit(
        &mut self,
        outcome: Result<SubmitReceipt, OrderError>,
    ) -> Result<SubmitReceipt, OrderError> {
        self.touch();
        match &outcome {
            Ok(receipt) => {
                self.cart.clear();
                self.status = SubmissionStatus::Submitted { receipt: receipt.clone() };
            }
            Err(e) => {
                self.status = SubmissionStatus::Idle { last_error: Some(e.to_string()) };
            }
        }
        outcome
    }

    /// "Order more": back to `Idle` with an empty cart. The name stays; the
    /// previous receipt is forgotten.
    pub fn reset(&mut self) -> Result<(), OrderError> {
        self.touch();
        if self.is_submitting() {
            return Err(OrderError::validation(SUBMITTING_MSG));
        }
        self.cart.clear();
        self.selections.clear_all();
        self.notes.clear();
        self.status = SubmissionStatus::default();
        Ok(())
    }

    pub fn view(&self, form_id: FormId) -> FormView {
        let total = self.cart.total();
        FormView {
            form_id,
            session_id: self.session_id.clone(),
            display_name: self.display_name.clone(),
            can_order: self.can_order(),
            lines: self.cart.lines().iter().map(LineView::from).collect(),
            total,
            total_display: total.format(),
            status: self.status.clone(),
        }
    }

    pub fn menu_view(&self) -> MenuView {
        let catalog = &self.catalog;
        let sections = catalog
            .sections()
            .iter()
            .map(|section| SectionView {
                id: section.id.clone(),
                name_en: section.name_en.clone(),
                name_zh: section.name_zh.clone(),
                items: catalog
                    .items_in(&section.id)
                    .map(|item| ItemView {
                        id: item.id.clone(),
                        title_en: item.title_en.clone(),
                        title_zh: item.title_zh.clone(),
                        base_price: item.base_price,
                        price_display: item.base_price.format(),
                        groups: catalog
                            .groups_for(&item.id)
                            .into_iter()
                            .map(|group| GroupView {
                                id: group.id.clone(),
                                name_en: group.name_en.clone(),
                                name_zh: group.name_zh.clone(),
                                selection_mode: group.selection_mode,
                                options: catalog
                                    .options_in(&group.id)
                                    .into_iter()
                                    .map(|option| OptionView {
                                        id: option.id.clone(),
                                        label_en: option.label_en.clone(),
                                        label_zh: option.label_zh.clone(),
                                        price_delta: option.price_delta,
                                        price_delta_display: option.price_delta.format(),
                                    })
                                    .collect(),
                            })
                            .collect(),
                        selected: self.selections.selections_for(&item.id).into_iter().collect(),
                        note: self.notes.get(&item.id).cloned().unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();
        MenuView { sections }
    }

    fn ensure_editable(&self) -> Result<(), OrderError> {
        match self.status {
            SubmissionStatus::Idle { .. } => Ok(()),
            SubmissionStatus::Submitting => Err(OrderError::validation(SUBMITTING_MSG)),
            SubmissionStatus::Submitted { .. } => Err(OrderError::validation(SUBMITTED_MSG)),
        }
    }

    fn touch(&mut self) {
        self.last_touched = get_utc_now();
    }
}
