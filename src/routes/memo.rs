use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Select,
    Set,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::entity::{decode_tags, encode_tags, memo, merge_tags, new_id, Category};
use crate::error::{db_error, is_unique_violation, AppError};
use crate::response::{to_rfc3339, DeletedAllResponse, DeletedResponse};
use crate::search::SearchService;
use crate::tagger::{self, AutoTagResult};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list))
            .route(web::post().to(create))
            .route(web::delete().to(remove_all)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get))
            .route(web::put().to(update))
            .route(web::delete().to(remove)),
    );
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMemoRequest {
    id: Option<String>,
    content: Option<String>,
    category: Option<Category>,
    tags: Option<Vec<String>>,
    is_favorite: Option<bool>,
    created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMemoRequest {
    content: Option<String>,
    category: Option<Category>,
    tags: Option<Vec<String>>,
    is_favorite: Option<bool>,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MemoSort {
    #[default]
    Updated,
    Created,
    Alphabetical,
    Favorites,
}

#[derive(Deserialize)]
struct ListMemoQuery {
    category: Option<Category>,
    favorite: Option<bool>,
    q: Option<String>,
    sort: Option<MemoSort>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemoDto {
    pub id: String,
    pub user_id: i32,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedMemoResponse {
    #[serde(flatten)]
    memo: MemoDto,
    auto_generated_tags: Vec<String>,
}

async fn list(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    query: web::Query<ListMemoQuery>,
) -> Result<HttpResponse, AppError> {
    let mut select = memo::Entity::find().filter(memo::Column::UserId.eq(auth.user_id));
    if let Some(category) = query.category {
        select = select.filter(memo::Column::Category.eq(category));
    }
    if let Some(favorite) = query.favorite {
        select = select.filter(memo::Column::IsFavorite.eq(favorite));
    }
    let rows = sorted(select, query.sort.unwrap_or_default())
        .all(db.get_ref())
        .await
        .map_err(db_error("memo list failed"))?;

    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let items: Vec<MemoDto> = rows
        .into_iter()
        .map(to_memo_dto)
        .filter(|m| needle.as_deref().map_or(true, |n| matches_query(m, n)))
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn get(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let memo_item = find_owned(db.get_ref(), auth.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(to_memo_dto(memo_item)))
}

async fn create(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    search: web::Data<SearchService>,
    auth: AuthUser,
    payload: web::Json<CreateMemoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let content = payload.content.unwrap_or_default();
    let auto = if config.auto_tag_enabled && !content.trim().is_empty() {
        tagger::auto_tag(&content)
    } else {
        AutoTagResult::empty()
    };

    let given_tags = payload.tags.unwrap_or_default();
    let tags = merge_tags([given_tags.as_slice(), auto.tags.as_slice()]);
    let category = payload.category.unwrap_or(auto.suggested_category);
    let id = payload
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| new_id("memo"));
    let now = Utc::now();
    let created_at = payload
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now);

    let memo_model = memo::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(auth.user_id),
        content: Set(content.clone()),
        category: Set(category),
        tags: Set(encode_tags(&tags)),
        is_favorite: Set(payload.is_favorite.unwrap_or(false)),
        created_at: Set(created_at),
        updated_at: Set(now),
    };

    let inserted = match memo_model.insert(db.get_ref()).await {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::param_error(format!("memo id {} already exists", id)));
        }
        Err(err) => {
            error!("memo insert failed: {}", err);
            return Err(AppError::system_exception());
        }
    };
    debug!("memo saved id={} user={}", inserted.id, auth.user_id);

    search.sync_memo(auth.user_id, &inserted.id, &inserted.content).await;

    Ok(HttpResponse::Created().json(CreatedMemoResponse {
        memo: to_memo_dto(inserted),
        auto_generated_tags: auto.tags,
    }))
}

async fn update(
    db: web::Data<DatabaseConnection>,
    search: web::Data<SearchService>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<UpdateMemoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let exist = find_owned(db.get_ref(), auth.user_id, &path).await?;
    let content_changed = payload.content.as_ref().is_some_and(|c| *c != exist.content);

    let mut active: memo::ActiveModel = exist.into();
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(encode_tags(&merge_tags([tags.as_slice()])));
    }
    if let Some(is_favorite) = payload.is_favorite {
        active.is_favorite = Set(is_favorite);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(db.get_ref())
        .await
        .map_err(db_error("memo update failed"))?;

    if content_changed {
        search.sync_memo(auth.user_id, &updated.id, &updated.content).await;
    }

    Ok(HttpResponse::Ok().json(to_memo_dto(updated)))
}

async fn remove(
    db: web::Data<DatabaseConnection>,
    search: web::Data<SearchService>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let memo_id = path.into_inner();
    let result = memo::Entity::delete_many()
        .filter(memo::Column::Id.eq(memo_id.clone()))
        .filter(memo::Column::UserId.eq(auth.user_id))
        .exec(db.get_ref())
        .await
        .map_err(db_error("memo delete failed"))?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("memo not found"));
    }

    search.remove_memo(&memo_id).await;
    Ok(HttpResponse::Ok().json(DeletedResponse {
        message: "memo deleted".to_string(),
        deleted_id: memo_id,
    }))
}

async fn remove_all(
    db: web::Data<DatabaseConnection>,
    search: web::Data<SearchService>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let result = memo::Entity::delete_many()
        .filter(memo::Column::UserId.eq(auth.user_id))
        .exec(db.get_ref())
        .await
        .map_err(db_error("memo bulk delete failed"))?;

    let dropped = search.clear_user(auth.user_id).await;
    info!(
        "deleted {} memos ({} indexed) for user {}",
        result.rows_affected, dropped, auth.user_id
    );
    Ok(HttpResponse::Ok().json(DeletedAllResponse {
        message: "all memos deleted".to_string(),
        deleted_count: result.rows_affected,
    }))
}

async fn find_owned(db: &DatabaseConnection, user_id: i32, id: &str) -> Result<memo::Model, AppError> {
    memo::Entity::find_by_id(id.to_string())
        .filter(memo::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_error("memo lookup failed"))?
        .ok_or_else(|| AppError::not_found("memo not found"))
}

pub(crate) fn sorted(select: Select<memo::Entity>, sort: MemoSort) -> Select<memo::Entity> {
    match sort {
        MemoSort::Updated => select.order_by_desc(memo::Column::UpdatedAt),
        MemoSort::Created => select.order_by_desc(memo::Column::CreatedAt),
        MemoSort::Alphabetical => select
            .order_by(Expr::cust("LOWER(content)"), Order::Asc)
            .order_by_desc(memo::Column::UpdatedAt),
        MemoSort::Favorites => select
            .order_by_desc(memo::Column::IsFavorite)
            .order_by_desc(memo::Column::UpdatedAt),
    }
}

/// Case-insensitive match against the content or any tag.
fn matches_query(memo: &MemoDto, needle: &str) -> bool {
    memo.content.to_lowercase().contains(needle)
        || memo.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub(crate) fn to_memo_dto(model: memo::Model) -> MemoDto {
    MemoDto {
        tags: decode_tags(&model.tags),
        id: model.id,
        user_id: model.user_id,
        content: model.content,
        category: model.category,
        is_favorite: model.is_favorite,
        created_at: to_rfc3339(model.created_at),
        updated_at: to_rfc3339(model.updated_at),
    }
}
