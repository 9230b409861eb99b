//! Test double for the remote boundary.

use std::sync::Mutex;
use std::time::Duration;
use crate::server::model::admin::{AdminSessionRequest, SessionLockRequest, SessionOrders};
use crate::server::model::menu::CatalogRows;
use crate::server::model::order::{DraftOrder, DraftOrderRequest, OrderItemId, UpsertOrderItemRequest};
use crate::server::remote::error::RemoteError;
use crate::server::remote::RemoteStore;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchCatalog,
    DraftOrder(DraftOrderRequest),
    UpsertOrderItem(UpsertOrderItemRequest),
    AdminSessionOrders(AdminSessionRequest),
    SetSessionLock(SessionLockRequest),
}

/// In-memory remote store that records every call it receives.
#[derive(Default)]
pub(crate) struct MockStore {
    calls: Mutex<Vec<Call>>,
    catalog: CatalogRows,
    draft_error: Option<String>,
    draft_delay: Option<Duration>,
    /// 1-based index of the upsert call that fails
    upsert_failure: Option<(usize, String)>,
    admin_error: Option<String>,
    session_orders: Mutex<SessionOrders>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: CatalogRows) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn failing_draft(mut self, message: &str) -> Self {
        self.draft_error = Some(message.to_string());
        self
    }

    /// hold the draft call for `delay` before answering
    pub fn stalling_draft(mut self, delay: Duration) -> Self {
        self.draft_delay = Some(delay);
        self
    }

    pub fn failing_upsert_at(mut self, nth: usize, message: &str) -> Self {
        self.upsert_failure = Some((nth, message.to_string()));
        self
    }

    pub fn failing_admin(mut self, message: &str) -> Self {
        self.admin_error = Some(message.to_string());
        self
    }

    pub fn with_session_orders(self, orders: SessionOrders) -> Self {
        *self.session_orders.lock().unwrap() = orders;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upserts(&self) -> Vec<UpsertOrderItemRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UpsertOrderItem(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RemoteStore for MockStore {
    async fn fetch_catalog(&self) -> Result<CatalogRows, RemoteError> {
        self.record(Call::FetchCatalog);
        Ok(self.catalog.clone())
    }

    async fn get_or_create_draft_order(&self, req: &DraftOrderRequest) -> Result<DraftOrder, RemoteError> {
        self.record(Call::DraftOrder(req.clone()));
        if let Some(delay) = self.draft_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.draft_error {
            return Err(RemoteError::new(message.clone()));
        }
        // same name, same draft
        Ok(DraftOrder {
            order_id: format!("order-{}", req.display_name),
            edit_token: format!("token-{}", req.display_name),
        })
    }

    async fn upsert_order_item(&self, req: &UpsertOrderItemRequest) -> Result<OrderItemId, RemoteError> {
        self.record(Call::UpsertOrderItem(req.clone()));
        let nth = self.upserts().len();
        match &self.upsert_failure {
            Some((fail_at, message)) if *fail_at == nth => Err(RemoteError::new(message.clone())),
            _ => Ok(format!("oi-{}", nth)),
        }
    }

    async fn admin_get_session_orders(&self, req: &AdminSessionRequest) -> Result<SessionOrders, RemoteError> {
        self.record(Call::AdminSessionOrders(req.clone()));
        if let Some(message) = &self.admin_error {
            return Err(RemoteError::new(message.clone()));
        }
        Ok(self.session_orders.lock().unwrap().clone())
    }

    async fn set_session_lock(&self, req: &SessionLockRequest) -> Result<(), RemoteError> {
        self.record(Call::SetSessionLock(req.clone()));
        if let Some(message) = &self.admin_error {
            return Err(RemoteError::new(message.clone()));
        }
        if let Some(session) = self.session_orders.lock().unwrap().session.as_mut() {
            session.is_locked = req.is_locked;
        }
        Ok(())
    }
}
