use std::fmt;
use serde::{Deserialize, Serialize};
use crate::server::model::menu::{MenuItemId, OptionId};

pub(crate) type OrderId = String;
pub(crate) type OrderItemId = String;

/// `rpc_get_or_create_draft_order` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DraftOrderRequest {
    #[serde(rename = "p_session_id")]
    pub session_id: String,
    #[serde(rename = "p_display_name")]
    pub display_name: String,
}

/// Draft order handle. `edit_token` authorizes every later mutation of the
/// order, so it never leaves the process and is redacted from `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct DraftOrder {
    pub order_id: OrderId,
    pub edit_token: String,
}

impl fmt::Debug for DraftOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftOrder")
            .field("order_id", &self.order_id)
            .field("edit_token", &"<redacted>")
            .finish()
    }
}

/// `rpc_upsert_order_item` parameters. `order_item_id = None` asks the remote
/// to create a new line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UpsertOrderItemRequest {
    #[serde(rename = "p_order_id")]
    pub order_id: OrderId,
    #[serde(rename = "p_edit_token")]
    pub edit_token: String,
    #[serde(rename = "p_order_item_id")]
    pub order_item_id: Option<OrderItemId>,
    #[serde(rename = "p_menu_item_id")]
    pub menu_item_id: MenuItemId,
    #[serde(rename = "p_qty")]
    pub qty: u32,
    #[serde(rename = "p_note")]
    pub note: String,
    #[serde(rename = "p_option_ids")]
    pub option_ids: Vec<OptionId>,
}

/// Set-returning functions come back as arrays, scalar ones as a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(t) => Some(t),
            OneOrMany::Many(rows) => rows.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderItemRow {
    pub order_item_id: OrderItemId,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UpsertOrderItemResponse {
    Id(OrderItemId),
    Row(OneOrMany<OrderItemRow>),
}

impl UpsertOrderItemResponse {
    pub fn into_id(self) -> Option<OrderItemId> {
        match self {
            UpsertOrderItemResponse::Id(id) => Some(id),
            UpsertOrderItemResponse::Row(rows) => rows.into_first().map(|r| r.order_item_id),
        }
    }
}

/// Outcome of a fully successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SubmitReceipt {
    pub order_id: OrderId,
    pub order_item_ids: Vec<OrderItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_response_accepts_object_or_rows() {
        let one: OneOrMany<DraftOrder> =
            serde_json::from_str(r#"{"order_id":"o-1","edit_token":"t-1"}"#).unwrap();
        let many: OneOrMany<DraftOrder> =
            serde_json::from_str(r#"[{"order_id":"o-1","edit_token":"t-1"}]"#).unwrap();
        assert_eq!(one.into_first().unwrap().order_id, "o-1");
        assert_eq!(many.into_first().unwrap().edit_token, "t-1");

        let empty: OneOrMany<DraftOrder> = serde_json::from_str("[]").unwrap();
        assert!(empty.into_first().is_none());
    }

    #[test]
    fn upsert_response_shapes() {
        let bare: UpsertOrderItemResponse = serde_json::from_str(r#""oi-9""#).unwrap();
        assert_eq!(bare.into_id().as_deref(), Some("oi-9"));

        let row: UpsertOrderItemResponse = serde_json::from_str(r#"{"order_item_id":"oi-1"}"#).unwrap();
        assert_eq!(row.into_id().as_deref(), Some("oi-1"));

        let rows: UpsertOrderItemResponse = serde_json::from_str(r#"[{"order_item_id":"oi-2"}]"#).unwrap();
        assert_eq!(rows.into_id().as_deref(), Some("oi-2"));

        assert!(serde_json::from_str::<UpsertOrderItemResponse>("42").is_err());
    }

    #[test]
    fn upsert_request_uses_rpc_parameter_names() {
        let req = UpsertOrderItemRequest {
            order_id: "o-1".to_string(),
            edit_token: "t-1".to_string(),
            order_item_id: None,
            menu_item_id: "it-1".to_string(),
            qty: 1,
            note: String::new(),
            option_ids: vec!["op-1".to_string()],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["p_order_item_id"], serde_json::Value::Null);
        assert_eq!(json["p_option_ids"][0], "op-1");
        assert_eq!(json["p_qty"], 1);
    }

    #[test]
    fn draft_debug_hides_token() {
        let draft = DraftOrder { order_id: "o-1".to_string(), edit_token: "secret".to_string() };
        assert!(!format!("{:?}", draft).contains("secret"));
    }
}
