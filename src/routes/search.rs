use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::entity::memo;
use crate::error::{db_error, AppError};
use crate::routes::memo::{to_memo_dto, MemoDto};
use crate::search::SearchService;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/vector").route(web::post().to(vector_search)))
        .service(web::resource("/reindex").route(web::post().to(reindex)));
}

#[derive(Deserialize)]
struct VectorSearchRequest {
    query: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ScoredMemoDto {
    #[serde(flatten)]
    memo: MemoDto,
    similarity: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchResponse {
    memos: Vec<ScoredMemoDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReindexResponse {
    message: String,
    indexed_count: usize,
}

async fn vector_search(
    db: web::Data<DatabaseConnection>,
    search: web::Data<SearchService>,
    auth: AuthUser,
    payload: web::Json<VectorSearchRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let query = payload
        .query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::param_error("query is required"))?;
    let limit = payload.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let hits = search
        .search(auth.user_id, &query, limit)
        .await
        .map_err(|e| {
            error!("vector search failed: {}", e);
            AppError::fail("vector search failed")
        })?;
    if hits.is_empty() {
        return Ok(HttpResponse::Ok().json(VectorSearchResponse {
            memos: Vec::new(),
            query: None,
            total_results: None,
            message: Some("no similar memos found".to_string()),
        }));
    }

    let ids: Vec<String> = hits.iter().map(|h| h.id.clone()).collect();
    let mut rows = memo::Entity::find()
        .filter(memo::Column::UserId.eq(auth.user_id))
        .filter(memo::Column::Id.is_in(ids))
        .all(db.get_ref())
        .await
        .map_err(db_error("vector search memo fetch failed"))?;

    // keep similarity order; hits whose row vanished are skipped
    let memos: Vec<ScoredMemoDto> = hits
        .into_iter()
        .filter_map(|hit| {
            let pos = rows.iter().position(|m| m.id == hit.id)?;
            Some(ScoredMemoDto {
                memo: to_memo_dto(rows.swap_remove(pos)),
                similarity: hit.similarity,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(VectorSearchResponse {
        total_results: Some(memos.len()),
        memos,
        query: Some(query),
        message: None,
    }))
}

async fn reindex(
    db: web::Data<DatabaseConnection>,
    search: web::Data<SearchService>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let rows = memo::Entity::find()
        .filter(memo::Column::UserId.eq(auth.user_id))
        .all(db.get_ref())
        .await
        .map_err(db_error("reindex memo fetch failed"))?;

    search.clear_user(auth.user_id).await;
    let mut indexed_count = 0;
    for m in rows.iter().filter(|m| !m.content.trim().is_empty()) {
        match search.index_memo(auth.user_id, &m.id, &m.content).await {
            Ok(()) => indexed_count += 1,
            Err(e) => warn!("reindex of memo {} failed: {}", m.id, e),
        }
    }
    info!("reindexed {} memos for user {}", indexed_count, auth.user_id);

    Ok(HttpResponse::Ok().json(ReindexResponse {
        message: "index rebuilt".to_string(),
        indexed_count,
    }))
}
