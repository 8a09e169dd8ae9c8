use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    HttpRequest, HttpResponse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::AppError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
    pub deleted_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedAllResponse {
    pub message: String,
    pub deleted_count: u64,
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let app_err = match err {
        JsonPayloadError::ContentType => AppError::param_error("content type must be application/json"),
        JsonPayloadError::Deserialize(e) => AppError::param_error(format!("invalid request body: {}", e)),
        _ => AppError::param_error("invalid request body"),
    };
    app_err.into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::param_error(format!("invalid query string: {}", err)).into()
}

pub fn response_from_error(err: &AppError) -> HttpResponse {
    HttpResponse::build(actix_web::ResponseError::status_code(err)).json(ErrorBody {
        error: err.msg().to_string(),
    })
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
