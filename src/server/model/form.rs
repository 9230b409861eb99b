use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::server::model::cart::{CartLine, LineId};
use crate::server::model::menu::{GroupId, MenuItemId, OptionId, SectionId, SelectionMode};
use crate::server::model::money::Money;
use crate::server::model::order::SubmitReceipt;

pub(crate) type FormId = Uuid;

/// `Idle -> Submitting -> Submitted | Idle(with error)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub(crate) enum SubmissionStatus {
    Idle { last_error: Option<String> },
    Submitting,
    Submitted { receipt: SubmitReceipt },
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        SubmissionStatus::Idle { last_error: None }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateFormRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFormResponse {
    pub form_id: FormId,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetNameRequest {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleOptionRequest {
    pub item_id: MenuItemId,
    pub option_id: OptionId,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionResponse {
    pub item_id: MenuItemId,
    pub option_ids: Vec<OptionId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetNoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddToCartRequest {
    pub item_id: MenuItemId,
}

#[derive(Debug, Serialize)]
pub(crate) struct FormView {
    pub form_id: FormId,
    pub session_id: String,
    pub display_name: String,
    pub can_order: bool,
    pub lines: Vec<LineView>,
    pub total: Money,
    pub total_display: String,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct LineView {
    pub id: LineId,
    pub menu_item_id: MenuItemId,
    pub title: String,
    pub options: Vec<String>,
    pub note: String,
    pub qty: u32,
    pub unit_price: Money,
    pub line_total_display: String,
}

impl From<&CartLine> for LineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            menu_item_id: line.menu_item_id.clone(),
            title: line.title(),
            options: line.options.iter().map(|o| o.label.clone()).collect(),
            note: line.note.clone(),
            qty: line.qty,
            unit_price: line.unit_price,
            line_total_display: line.line_total().format(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MenuView {
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SectionView {
    pub id: SectionId,
    pub name_en: String,
    pub name_zh: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemView {
    pub id: MenuItemId,
    pub title_en: String,
    pub title_zh: String,
    pub base_price: Money,
    pub price_display: String,
    pub groups: Vec<GroupView>,
    pub selected: Vec<OptionId>,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupView {
    pub id: GroupId,
    pub name_en: String,
    pub name_zh: String,
    pub selection_mode: SelectionMode,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionView {
    pub id: OptionId,
    pub label_en: String,
    pub label_zh: String,
    pub price_delta: Money,
    pub price_delta_display: String,
}
