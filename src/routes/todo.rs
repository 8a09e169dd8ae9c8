use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, info};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::entity::{decode_tags, encode_tags, merge_tags, new_id, todo, Category, Priority, TodoStatus};
use crate::error::{db_error, is_unique_violation, AppError};
use crate::response::{to_rfc3339, DeletedAllResponse, DeletedResponse};

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
struct TodoRequest {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
    status: Option<TodoStatus>,
    priority: Option<Priority>,
    due_date: Option<String>,
    category: Option<Category>,
    tags: Option<Vec<String>>,
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct ListTodoQuery {
    status: Option<TodoStatus>,
    priority: Option<Priority>,
    category: Option<Category>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TodoDto {
    pub id: String,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub status: TodoStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

async fn list(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    query: web::Query<ListTodoQuery>,
) -> Result<HttpResponse, AppError> {
    let mut select = todo::Entity::find().filter(todo::Column::UserId.eq(auth.user_id));
    if let Some(status) = query.status {
        select = select.filter(todo::Column::Status.eq(status));
    }
    if let Some(priority) = query.priority {
        select = select.filter(todo::Column::Priority.eq(priority));
    }
    if let Some(category) = query.category {
        select = select.filter(todo::Column::Category.eq(category));
    }
    let rows = select
        .order_by_desc(todo::Column::CreatedAt)
        .all(db.get_ref())
        .await
        .map_err(db_error("todo list failed"))?;
    let items: Vec<TodoDto> = rows.into_iter().map(to_todo_dto).collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn get(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let todo_item = find_owned(db.get_ref(), auth.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(to_todo_dto(todo_item)))
}

async fn create(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    payload: web::Json<TodoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let title = require_title(payload.title.as_deref())?;
    let due_date = normalize_due_date(payload.due_date.as_deref())?;
    let (status, completed) = TodoStatus::reconcile(payload.status, payload.completed, TodoStatus::Todo);
    let id = payload
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| new_id("todo"));
    let now = Utc::now();
    let created_at = payload
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);

    let todo_model = todo::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(auth.user_id),
        title: Set(title),
        description: Set(payload.description.unwrap_or_default()),
        completed: Set(completed),
        status: Set(status),
        priority: Set(payload.priority.unwrap_or_default()),
        due_date: Set(due_date),
        category: Set(payload.category.unwrap_or_default()),
        tags: Set(encode_tags(&merge_tags([payload.tags.unwrap_or_default().as_slice()]))),
        created_at: Set(created_at),
        updated_at: Set(now),
    };

    let inserted = match todo_model.insert(db.get_ref()).await {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::param_error(format!("todo id {} already exists", id)));
        }
        Err(err) => {
            error!("todo insert failed: {}", err);
            return Err(AppError::system_exception());
        }
    };
    debug!("todo saved id={} user={}", inserted.id, auth.user_id);
    Ok(HttpResponse::Created().json(to_todo_dto(inserted)))
}

async fn update(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
    payload: web::Json<TodoRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    let exist = find_owned(db.get_ref(), auth.user_id, &path).await?;
    let (status, completed) = TodoStatus::reconcile(payload.status, payload.completed, exist.status);

    let mut active: todo::ActiveModel = exist.into();
    if payload.title.is_some() {
        active.title = Set(require_title(payload.title.as_deref())?);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if payload.due_date.is_some() {
        active.due_date = Set(normalize_due_date(payload.due_date.as_deref())?);
    }
    if let Some(priority) = payload.priority {
        active.priority = Set(priority);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(encode_tags(&merge_tags([tags.as_slice()])));
    }
    active.status = Set(status);
    active.completed = Set(completed);
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(db.get_ref())
        .await
        .map_err(db_error("todo update failed"))?;
    Ok(HttpResponse::Ok().json(to_todo_dto(updated)))
}

async fn remove(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let todo_id = path.into_inner();
    let result = todo::Entity::delete_many()
        .filter(todo::Column::Id.eq(todo_id.clone()))
        .filter(todo::Column::UserId.eq(auth.user_id))
        .exec(db.get_ref())
        .await
        .map_err(db_error("todo delete failed"))?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("todo not found"));
    }
    Ok(HttpResponse::Ok().json(DeletedResponse {
        message: "todo deleted".to_string(),
        deleted_id: todo_id,
    }))
}

async fn remove_all(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let result = todo::Entity::delete_many()
        .filter(todo::Column::UserId.eq(auth.user_id))
        .exec(db.get_ref())
        .await
        .map_err(db_error("todo bulk delete failed"))?;
    info!("deleted {} todos for user {}", result.rows_affected, auth.user_id);
    Ok(HttpResponse::Ok().json(DeletedAllResponse {
        message: "all todos deleted".to_string(),
        deleted_count: result.rows_affected,
    }))
}

async fn find_owned(db: &DatabaseConnection, user_id: i32, id: &str) -> Result<todo::Model, AppError> {
    todo::Entity::find_by_id(id.to_string())
        .filter(todo::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_error("todo lookup failed"))?
        .ok_or_else(|| AppError::not_found("todo not found"))
}

fn require_title(title: Option<&str>) -> Result<String, AppError> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::param_error("title is required"))
}

/// Accepts `YYYY-MM-DD` or RFC 3339; blank clears the due date.
fn normalize_due_date(input: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(raw).is_ok() {
        return Ok(Some(raw.to_string()));
    }
    Err(AppError::param_error("dueDate must be YYYY-MM-DD or RFC 3339"))
}

pub(crate) fn to_todo_dto(model: todo::Model) -> TodoDto {
    TodoDto {
        tags: decode_tags(&model.tags),
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        completed: model.completed,
        status: model.status,
        priority: model.priority,
        due_date: model.due_date,
        category: model.category,
        created_at: to_rfc3339(model.created_at),
        updated_at: to_rfc3339(model.updated_at),
    }
}
