use std::sync::Arc;
use actix_web::{delete, get, post, put, rt, web, Responder};
use log::{error, info, warn};
use uuid::Uuid;
use crate::server::controller::error::CustomError;
use crate::server::model::cart::LineId;
use crate::server::model::form::{
    AddToCartRequest, CreateFormRequest, CreateFormResponse, FormId, LineView, SelectionResponse, SetNameRequest,
    SetNoteRequest, ToggleOptionRequest,
};
use crate::server::model::order::SubmitReceipt;
use crate::server::remote::RemoteStore;
use crate::server::service::catalog::Catalog;
use crate::server::service::error::OrderError;
use crate::server::service::form::{OrderForm, SubmitTicket};
use crate::server::service::submission::submit_order;
use crate::server::state::AppState;

/// Run `f` against one form while holding the form map.
async fn with_form<T>(
    data: &AppState,
    id: FormId,
    f: impl FnOnce(&mut OrderForm) -> Result<T, CustomError>,
) -> Result<T, CustomError> {
    let mut forms = data.lock_forms().await.ok_or(CustomError::ServerIsBusy)?;
    let form = forms.get_mut(&id).ok_or(CustomError::ResourceNotFound)?;
    f(form)
}

#[post("/v1/forms")]
/// open a form, loading a fresh catalog snapshot
pub(crate) async fn post_form(
    body: Option<web::Json<CreateFormRequest>>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let requested = body.and_then(|b| b.into_inner().session_id);
    let session_id = requested
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(data.default_session_id())
        .map(str::to_string)
        .ok_or_else(|| CustomError::BadRequest("no order session given".to_string()))?;

    let catalog = Catalog::new(data.get_store().fetch_catalog().await?);
    let form_id = Uuid::new_v4();
    let form = OrderForm::new(session_id.clone(), Arc::new(catalog));
    data.lock_forms()
        .await
        .ok_or(CustomError::ServerIsBusy)?
        .insert(form_id, form);
    info!("form {} opened for session {}", form_id, session_id);

    Ok(web::Json(CreateFormResponse { form_id, session_id }))
}

#[get("/v1/forms/{id}")]
pub(crate) async fn get_form(id: web::Path<FormId>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let view = with_form(&data, id, |form| Ok(form.view(id))).await?;
    Ok(web::Json(view))
}

#[get("/v1/forms/{id}/menu")]
pub(crate) async fn get_menu(id: web::Path<FormId>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let view = with_form(&data, id.into_inner(), |form| Ok(form.menu_view())).await?;
    Ok(web::Json(view))
}

#[put("/v1/forms/{id}/name")]
pub(crate) async fn put_name(
    id: web::Path<FormId>,
    body: web::Json<SetNameRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let view = with_form(&data, id, |form| {
        form.set_display_name(&body.display_name);
        Ok(form.view(id))
    })
    .await?;
    Ok(web::Json(view))
}

#[post("/v1/forms/{id}/selections")]
/// toggle one option for one item
pub(crate) async fn post_selection(
    id: web::Path<FormId>,
    body: web::Json<ToggleOptionRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let ToggleOptionRequest { item_id, option_id } = body.into_inner();
    let selected = with_form(&data, id.into_inner(), |form| {
        form.toggle_option(&item_id, &option_id).map_err(CustomError::from)
    })
    .await?;
    Ok(web::Json(SelectionResponse {
        item_id,
        option_ids: selected.into_iter().collect(),
    }))
}

#[put("/v1/forms/{id}/notes/{item_id}")]
pub(crate) async fn put_note(
    path: web::Path<(FormId, String)>,
    body: web::Json<SetNoteRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let (id, item_id) = path.into_inner();
    with_form(&data, id, |form| form.set_note(&item_id, &body.note).map_err(CustomError::from)).await?;
    Ok(actix_web::HttpResponse::Ok())
}

#[post("/v1/forms/{id}/cart")]
/// add an item with its current selection as a new line
pub(crate) async fn post_cart_line(
    id: web::Path<FormId>,
    body: web::Json<AddToCartRequest>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let line = with_form(&data, id.into_inner(), |form| {
        form.add_to_cart(&body.item_id)
            .map(LineView::from)
            .map_err(CustomError::from)
    })
    .await?;
    Ok(web::Json(line))
}

#[delete("/v1/forms/{id}/cart/{line_id}")]
/// remove a line, unknown ids are ignored
pub(crate) async fn delete_cart_line(
    path: web::Path<(FormId, LineId)>,
    data: web::Data<AppState>,
) -> Result<impl Responder, CustomError> {
    let (id, line_id) = path.into_inner();
    let view = with_form(&data, id, |form| {
        form.remove_line(line_id)?;
        Ok(form.view(id))
    })
    .await?;
    Ok(web::Json(view))
}

#[post("/v1/forms/{id}/submit")]
/// persist the cart remotely
pub(crate) async fn post_submit(id: web::Path<FormId>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let ticket = with_form(&data, id, |form| form.begin_submit().map_err(CustomError::from)).await?;

    // the remote calls and the outcome run on their own task, a dropped
    // request must not strand the form in `Submitting`
    let receipt = rt::spawn(run_submission(data.get_ref().clone(), id, ticket))
        .await
        .map_err(|e| {
            error!("submission task for form {} died, {}", id, e);
            CustomError::ServerIsBusy
        })??;
    Ok(web::Json(receipt))
}

async fn run_submission(state: AppState, id: FormId, ticket: SubmitTicket) -> Result<SubmitReceipt, CustomError> {
    // the form map is not held across the remote calls
    let outcome = submit_order(state.get_store(), &ticket.session_id, &ticket.display_name, &ticket.lines).await;
    if let Err(e) = &outcome {
        warn!("form {} submission failed, {}", id, e);
    }
    let receipt = record_outcome(&state, id, outcome).await?;
    info!("form {} submitted as order {}", id, receipt.order_id);
    Ok(receipt)
}

/// Waits for the form map as long as it takes; the outcome is never dropped.
async fn record_outcome(
    state: &AppState,
    id: FormId,
    outcome: Result<SubmitReceipt, OrderError>,
) -> Result<SubmitReceipt, CustomError> {
    loop {
        if let Some(mut forms) = state.lock_forms().await {
            let form = forms.get_mut(&id).ok_or(CustomError::ResourceNotFound)?;
            return Ok(form.finish_submit(outcome)?);
        }
        warn!("outcome for form {} still waiting on the form map", id);
    }
}

#[post("/v1/forms/{id}/reset")]
/// start over after a submission
pub(crate) async fn post_reset(id: web::Path<FormId>, data: web::Data<AppState>) -> Result<impl Responder, CustomError> {
    let id = id.into_inner();
    let view = with_form(&data, id, |form| {
        form.reset()?;
        Ok(form.view(id))
    })
    .await?;
    Ok(web::Json(view))
}
