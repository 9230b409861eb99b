use log::{info, warn};
use crate::server::model::cart::CartLine;
use crate::server::model::order::{DraftOrderRequest, SubmitReceipt, UpsertOrderItemRequest};
use crate::server::remote::RemoteStore;
use crate::server::service::error::OrderError;

/// Persist a cart remotely in two serial phases.
///
/// 1. get or create the draft order for `(session_id, display_name)`;
/// 2. create one remote order item per line with the draft's edit token.
///
/// Local validation failures return before any remote call. The first
/// remote failure aborts the remaining calls and is returned as-is; items
/// already created stay on the remote side. Nothing is retried.
pub(crate) async fn submit_order<S: RemoteStore>(
    store: &S,
    session_id: &str,
    display_name: &str,
    lines: &[CartLine],
) -> Result<SubmitReceipt, OrderError> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(OrderError::validation("a display name is required to submit"));
    }
    if session_id.trim().is_empty() {
        return Err(OrderError::validation("no order session selected"));
    }
    if lines.is_empty() {
        return Err(OrderError::validation("cart is empty"));
    }

    let draft = store
        .get_or_create_draft_order(&DraftOrderRequest {
            session_id: session_id.to_string(),
            display_name: display_name.to_string(),
        })
        .await
        .inspect_err(|e| warn!("draft order for session={} failed, {}", session_id, e))?;
    info!("draft order {} ready, submitting {} lines", draft.order_id, lines.len());

    let mut order_item_ids = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let req = UpsertOrderItemRequest {
            order_id: draft.order_id.clone(),
            edit_token: draft.edit_token.clone(),
            order_item_id: None,
            menu_item_id: line.menu_item_id.clone(),
            qty: line.qty,
            note: line.note.clone(),
            option_ids: line.option_ids(),
        };
        let id = store.upsert_order_item(&req).await.inspect_err(|e| {
            warn!("order item {}/{} of order {} failed, {}", idx + 1, lines.len(), draft.order_id, e)
        })?;
        order_item_ids.push(id);
    }

    Ok(SubmitReceipt {
        order_id: draft.order_id,
        order_item_ids,
    })
}
