use actix_web::{get, put, web, HttpRequest, Responder};
use log::info;
use crate::server::controller::error::CustomError;
use crate::server::model::admin::{AdminOrdersResponse, SessionOrders, SetLockRequest};
use crate::server::service::admin;
use crate::server::state::AppState;

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The remote store decides whether the token is any good, a missing header
/// is passed on as an empty token.
fn admin_token(req: &HttpRequest) -> String {
    req.headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn to_response(payload: SessionOrders) -> Result<AdminOrdersResponse, CustomError> {
    let totals = admin::recompute_totals(&payload.orders)?;
    Ok(AdminOrdersResponse {
        session: payload.session,
        orders: payload.orders,
        grand_total_display: totals.grand_total.format(),
        totals,
    })
}

#[get("/v1/admin/sessions/{session_id}/orders")]
/// every order in a session with recomputed totals
pub(crate) async fn get_session_orders(
    req: HttpRequest,
    session_id: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let payload = admin::load(data.get_store(), &session_id, &admin_token(&req)).await?;
    info!("session {} has {} orders", session_id, payload.orders.len());
    Ok(web::Json(to_response(payload)?))
}

#[put("/v1/admin/sessions/{session_id}/lock")]
/// lock or unlock a session, answers with the reloaded orders
pub(crate) async fn put_session_lock(
    req: HttpRequest,
    session_id: web::Path<String>,
    body: web::Json<SetLockRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let payload = admin::set_lock(data.get_store(), &session_id, &admin_token(&req), body.is_locked).await?;
    Ok(web::Json(to_response(payload)?))
}
