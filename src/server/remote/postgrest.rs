use anyhow::Context;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::server::model::admin::{AdminSessionRequest, SessionLockRequest, SessionOrders};
use crate::server::model::config::RemoteConfig;
use crate::server::model::menu::{CatalogRows, ItemGroupLink, MenuItem, MenuOption, MenuSection, OptionGroup};
use crate::server::model::order::{
    DraftOrder, DraftOrderRequest, OneOrMany, OrderItemId, UpsertOrderItemRequest, UpsertOrderItemResponse,
};
use crate::server::remote::error::RemoteError;
use crate::server::remote::RemoteStore;

const RPC_DRAFT_ORDER: &str = "rpc_get_or_create_draft_order";
const RPC_UPSERT_ORDER_ITEM: &str = "rpc_upsert_order_item";
const RPC_ADMIN_SESSION_ORDERS: &str = "rpc_admin_get_session_orders";
const RPC_SET_SESSION_LOCK: &str = "rpc_set_session_lock";

const TABLE_SECTIONS: &str = "menu_sections";
const TABLE_ITEMS: &str = "menu_items";
const TABLE_GROUPS: &str = "option_groups";
const TABLE_OPTIONS: &str = "menu_options";
const TABLE_ITEM_GROUPS: &str = "menu_item_option_groups";

/// Remote store reached over the hosted backend's REST surface:
/// tables under `/rest/v1/{table}`, stored procedures under `/rest/v1/rpc/{name}`.
#[derive(Clone)]
pub(crate) struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Error body returned by the REST layer on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build remote http client")?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn call_rpc<B: Serialize + ?Sized>(&self, name: &str, body: &B) -> Result<Response, RemoteError> {
        debug!("calling {}", name);
        let res = self
            .authorize(self.client.post(format!("{}/rest/v1/rpc/{}", self.base_url, name)))
            .json(body)
            .send()
            .await
            .inspect_err(|e| warn!("{} transport failure, {}", name, e))?;
        check_status(name, res).await
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, ordered: bool) -> Result<Vec<T>, RemoteError> {
        let order = if ordered { "&order=sort.asc" } else { "" };
        let res = self
            .authorize(self.client.get(format!("{}/rest/v1/{}?select=*{}", self.base_url, table, order)))
            .send()
            .await
            .inspect_err(|e| warn!("reading {} failed, {}", table, e))?;
        let res = check_status(table, res).await?;
        decode(table, res).await
    }
}

impl RemoteStore for PostgrestStore {
    async fn fetch_catalog(&self) -> Result<CatalogRows, RemoteError> {
        let (sections, items, groups, options, links) = tokio::try_join!(
            self.select::<MenuSection>(TABLE_SECTIONS, true),
            self.select::<MenuItem>(TABLE_ITEMS, true),
            self.select::<OptionGroup>(TABLE_GROUPS, true),
            self.select::<MenuOption>(TABLE_OPTIONS, true),
            self.select::<ItemGroupLink>(TABLE_ITEM_GROUPS, false),
        )?;
        debug!(
            "catalog fetched, sections={} items={} groups={} options={} links={}",
            sections.len(), items.len(), groups.len(), options.len(), links.len()
        );
        Ok(CatalogRows { sections, items, groups, options, links })
    }

    async fn get_or_create_draft_order(&self, req: &DraftOrderRequest) -> Result<DraftOrder, RemoteError> {
        let res = self.call_rpc(RPC_DRAFT_ORDER, req).await?;
        let rows: OneOrMany<DraftOrder> = decode(RPC_DRAFT_ORDER, res).await?;
        rows.into_first()
            .ok_or_else(|| RemoteError::new(format!("{} returned no draft order", RPC_DRAFT_ORDER)))
    }

    async fn upsert_order_item(&self, req: &UpsertOrderItemRequest) -> Result<OrderItemId, RemoteError> {
        let res = self.call_rpc(RPC_UPSERT_ORDER_ITEM, req).await?;
        let body: UpsertOrderItemResponse = decode(RPC_UPSERT_ORDER_ITEM, res).await?;
        body.into_id()
            .ok_or_else(|| RemoteError::new(format!("{} returned no order item id", RPC_UPSERT_ORDER_ITEM)))
    }

    async fn admin_get_session_orders(&self, req: &AdminSessionRequest) -> Result<SessionOrders, RemoteError> {
        let res = self.call_rpc(RPC_ADMIN_SESSION_ORDERS, req).await?;
        decode(RPC_ADMIN_SESSION_ORDERS, res).await
    }

    async fn set_session_lock(&self, req: &SessionLockRequest) -> Result<(), RemoteError> {
        // void function, body is empty or `null`
        self.call_rpc(RPC_SET_SESSION_LOCK, req).await.map(|_| ())
    }
}

async fn check_status(call: &str, res: Response) -> Result<Response, RemoteError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let err = error_from_body(status, &body);
    warn!("{} rejected with status={}, {}", call, status, err);
    Err(err)
}

fn error_from_body(status: StatusCode, body: &str) -> RemoteError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(message) }) if !message.is_empty() => RemoteError::new(message),
        _ => RemoteError::new(format!("remote returned {}", status)),
    }
}

async fn decode<T: DeserializeOwned>(call: &str, res: Response) -> Result<T, RemoteError> {
    let bytes = res.bytes().await?;
    parse_body(call, &bytes)
}

fn parse_body<T: DeserializeOwned>(call: &str, bytes: &[u8]) -> Result<T, RemoteError> {
    serde_json::from_slice(bytes).map_err(|e| {
        warn!("{} returned an unexpected shape, {}", call, e);
        RemoteError::new(format!("unexpected response from {}: {}", call, e))
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use super::*;

    #[test]
    fn error_message_is_passed_through() {
        let err = error_from_body(
            StatusCode::BAD_REQUEST,
            r#"{"code":"P0001","message":"session is locked","details":null,"hint":null}"#,
        );
        assert_eq!(err.message, "session is locked");
    }

    #[test]
    fn error_without_message_falls_back_to_status() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.message, "remote returned 502 Bad Gateway");

        let err = error_from_body(StatusCode::UNAUTHORIZED, r#"{"message":""}"#);
        assert_eq!(err.message, "remote returned 401 Unauthorized");
    }

    #[test]
    fn shape_mismatch_fails_fast() {
        let err = parse_body::<SessionOrders>(RPC_ADMIN_SESSION_ORDERS, br#"{"orders": 3}"#).unwrap_err();
        assert!(err.message.starts_with("unexpected response from rpc_admin_get_session_orders"));

        let ok = parse_body::<Vec<ItemGroupLink>>(TABLE_ITEM_GROUPS, br#"[{"menu_item_id":"a","group_id":"g"}]"#);
        assert_eq!(ok.unwrap().len(), 1);
    }

    #[test]
    fn base_url_is_normalized() {
        let store = PostgrestStore::new(&RemoteConfig {
            url: "https://example.supabase.co/".to_string(),
            api_key: "anon".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(store.base_url, "https://example.supabase.co");
    }
}
