use actix_web::{web, HttpResponse};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::entity::{memo, todo};
use crate::error::{db_error, AppError};
use crate::response::to_rfc3339;
use crate::routes::memo::{sorted, to_memo_dto, MemoDto, MemoSort};
use crate::routes::todo::{to_todo_dto, TodoDto};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(export)));
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportResponse {
    user: String,
    export_date: String,
    memos: Vec<MemoDto>,
    todos: Vec<TodoDto>,
    total_count: usize,
}

async fn export(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let memos = sorted(
        memo::Entity::find().filter(memo::Column::UserId.eq(auth.user_id)),
        MemoSort::Updated,
    )
    .all(db.get_ref())
    .await
    .map_err(db_error("memo export failed"))?;

    let todos = todo::Entity::find()
        .filter(todo::Column::UserId.eq(auth.user_id))
        .order_by_desc(todo::Column::CreatedAt)
        .all(db.get_ref())
        .await
        .map_err(db_error("todo export failed"))?;

    let memos: Vec<MemoDto> = memos.into_iter().map(to_memo_dto).collect();
    Ok(HttpResponse::Ok().json(ExportResponse {
        user: auth.username,
        export_date: to_rfc3339(Utc::now()),
        total_count: memos.len(),
        memos,
        todos: todos.into_iter().map(to_todo_dto).collect(),
    }))
}
