//! RPC boundary to the hosted backend.
//!
//! The remote store owns persistence, validation and multi-writer
//! coordination. In particular `get_or_create_draft_order` is trusted to be
//! idempotent per (session, display name); nothing on this side deduplicates.

pub(crate) mod error;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod postgrest;

use crate::server::model::admin::{AdminSessionRequest, SessionLockRequest, SessionOrders};
use crate::server::model::menu::CatalogRows;
use crate::server::model::order::{DraftOrder, DraftOrderRequest, OrderItemId, UpsertOrderItemRequest};
use crate::server::remote::error::RemoteError;

pub(crate) trait RemoteStore {
    /// Read every catalog table, each in its `sort` order.
    async fn fetch_catalog(&self) -> Result<CatalogRows, RemoteError>;

    async fn get_or_create_draft_order(
        &self,
        req: &DraftOrderRequest,
    ) -> Result<DraftOrder, RemoteError>;

    async fn upsert_order_item(
        &self,
        req: &UpsertOrderItemRequest,
    ) -> Result<OrderItemId, RemoteError>;

    /// Admin read. The token is forwarded untouched; only the remote checks it.
    async fn admin_get_session_orders(
        &self,
        req: &AdminSessionRequest,
    ) -> Result<SessionOrders, RemoteError>;

    async fn set_session_lock(&self, req: &SessionLockRequest) -> Result<(), RemoteError>;
}
