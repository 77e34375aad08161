use actix_web::{
  error::ResponseError,
  http::StatusCode,
  HttpResponse
};
use derive_more::Display;
use log::error;

// The full error message is never shown to random
// internet people, it only appears in logs. What's
// displayed is deliberately generic, "not found" in
// particular never says why something is hidden.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Internal Server Error")]
  InternalServerError(String),
  #[display(fmt = "Database Error")]
  DatabaseError(String),
  #[display(fmt = "Not Found")]
  NotFound(String),
  #[display(fmt = "Bad Request (check request params)")]
  BadRequest(String),
  #[display(fmt = "Too Many Requests")]
  TooManyRequests
}

// I'm using plain text for error responses because it's
// easy. Validation errors are not in there, the forms are
// re-rendered with their messages instead.
impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::InternalServerError(_) | Error::DatabaseError(_) => 
        StatusCode::INTERNAL_SERVER_ERROR,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::TooManyRequests => StatusCode::TOO_MANY_REQUESTS
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code())
      .content_type("text/plain; charset=utf-8")
      .body(self.to_string())
  }
}

// Database functions return eyre reports. Log the whole
// chain here and keep the response generic.
pub fn map_db_error(e: eyre::Report) -> Error {
  error!("Database error: {:?}", e);
  Error::DatabaseError(e.to_string())
}
