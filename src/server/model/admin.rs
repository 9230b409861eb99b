use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::server::model::money::Money;
use crate::server::model::null_as_default;
use crate::server::model::order::OrderItemId;

/// `rpc_admin_get_session_orders` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AdminSessionRequest {
    #[serde(rename = "p_session_id")]
    pub session_id: String,
    #[serde(rename = "p_admin_token")]
    pub admin_token: String,
}

/// `rpc_set_session_lock` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SessionLockRequest {
    #[serde(rename = "p_session_id")]
    pub session_id: String,
    #[serde(rename = "p_admin_token")]
    pub admin_token: String,
    #[serde(rename = "p_is_locked")]
    pub is_locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct SessionOrders {
    pub session: Option<SessionInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<AdminOrder>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct SessionInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct AdminOrder {
    pub display_name: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<AdminOrderItem>,
    /// server computed total, when the remote reports one
    #[serde(default)]
    pub total_cents: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct AdminOrderItem {
    pub order_item_id: OrderItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_zh: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qty: u32,
    #[serde(rename = "unit_base_price_cents", default, deserialize_with = "null_as_default")]
    pub unit_base_price: Money,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<AdminOrderOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct AdminOrderOption {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label_zh: String,
    #[serde(rename = "price_delta_cents", default, deserialize_with = "null_as_default")]
    pub price_delta: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PersonTotal {
    pub display_name: String,
    pub total: Money,
    pub server_total: Option<Money>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersonTotal {
    /// true when the remote reported a total that disagrees with ours
    pub fn divergent(&self) -> bool {
        self.server_total.is_some_and(|server| server != self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct AuditTotals {
    pub grand_total: Money,
    pub per_person: Vec<PersonTotal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetLockRequest {
    pub is_locked: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminOrdersResponse {
    pub session: Option<SessionInfo>,
    pub orders: Vec<AdminOrder>,
    pub totals: AuditTotals,
    pub grand_total_display: String,
}
