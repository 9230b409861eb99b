use actix_web::{error, HttpResponse};
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use derive_more::{Display, Error};
use crate::server::remote::error::RemoteError;
use crate::server::service::error::OrderError;

#[derive(Debug, Display, Error)]
pub(crate) enum CustomError {
    #[display("server is busy")]
    ServerIsBusy,
    #[display("{_0}")]
    BadRequest(#[error(not(source))] String),
    #[display("resource not found")]
    ResourceNotFound,
    /// remote message, passed on verbatim
    #[display("{_0}")]
    Remote(RemoteError),
}

impl From<OrderError> for CustomError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Validation(message) => CustomError::BadRequest(message),
            OrderError::Remote(e) => CustomError::Remote(e),
        }
    }
}

impl From<RemoteError> for CustomError {
    fn from(e: RemoteError) -> Self {
        CustomError::Remote(e)
    }
}

impl error::ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ServerIsBusy => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CustomError::ResourceNotFound => StatusCode::NOT_FOUND,
            CustomError::Remote(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}
