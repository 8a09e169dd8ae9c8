use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::entity::Category;
use crate::error::AppError;
use crate::tagger;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/preview").route(web::post().to(preview)));
}

#[derive(Deserialize)]
struct PreviewRequest {
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    content: String,
    suggested_tags: Vec<String>,
    suggested_category: Category,
    preview: bool,
}

async fn preview(
    _auth: AuthUser,
    payload: web::Json<PreviewRequest>,
) -> Result<HttpResponse, AppError> {
    let content = payload
        .into_inner()
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::param_error("content is required"))?;

    let result = tagger::auto_tag(&content);
    Ok(HttpResponse::Ok().json(PreviewResponse {
        content,
        suggested_tags: result.tags,
        suggested_category: result.suggested_category,
        preview: true,
    }))
}
