pub(crate) mod admin;
pub(crate) mod error;
pub(crate) mod form;

use actix_web::web;

/// Mount every handler on the app.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(form::post_form)
        .service(form::get_form)
        .service(form::get_menu)
        .service(form::put_name)
        .service(form::post_selection)
        .service(form::put_note)
        .service(form::post_cart_line)
        .service(form::delete_cart_line)
        .service(form::post_submit)
        .service(form::post_reset)
        .service(admin::get_session_orders)
        .service(admin::put_session_lock);
}
