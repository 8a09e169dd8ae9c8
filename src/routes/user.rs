use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{error, info};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::config::AppConfig;
use crate::entity::user;
use crate::error::{db_error, is_unique_violation, AppError};
use crate::response::to_rfc3339;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/me").route(web::get().to(me)));
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    id: i32,
    username: String,
    email: String,
    display_name: String,
    created_at: String,
}

#[derive(Serialize)]
struct AuthResponse {
    message: String,
    token: String,
    user: UserDto,
}

#[derive(Serialize)]
struct MeResponse {
    user: UserDto,
}

async fn register(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let username = payload.username.clone().unwrap_or_default().trim().to_string();
    let email = payload.email.clone().unwrap_or_default().trim().to_string();
    let password = payload.password.clone().unwrap_or_default();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::param_error("username, email and password are required"));
    }

    let display_name = payload
        .display_name
        .clone()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| username.clone());

    let password_hash = hash_password(&config, &password)?;
    let now = Utc::now();
    let user_model = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(password_hash),
        display_name: Set(Some(display_name)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let inserted = match user_model.insert(db.get_ref()).await {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::param_error("username or email is already in use"));
        }
        Err(err) => {
            error!("user insert failed: {}", err);
            return Err(AppError::system_exception());
        }
    };
    info!("registered user id={}", inserted.id);

    let token = issue_token(&config, inserted.id, &inserted.username)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "registration complete".to_string(),
        token,
        user: to_user_dto(inserted),
    }))
}

async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = payload.username.clone().unwrap_or_default().trim().to_string();
    let password = payload.password.clone().unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::param_error("username and password are required"));
    }

    let found = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(username.clone()))
                .add(user::Column::Email.eq(username.clone())),
        )
        .one(db.get_ref())
        .await
        .map_err(db_error("login lookup failed"))?;
    let user = found.ok_or_else(AppError::bad_credentials)?;

    if !verify_password(&password, &user.password)? {
        return Err(AppError::bad_credentials());
    }

    let token = issue_token(&config, user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "logged in".to_string(),
        token,
        user: to_user_dto(user),
    }))
}

async fn me(
    db: web::Data<DatabaseConnection>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let user = user::Entity::find_by_id(auth.user_id)
        .one(db.get_ref())
        .await
        .map_err(db_error("current user lookup failed"))?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    Ok(HttpResponse::Ok().json(MeResponse {
        user: to_user_dto(user),
    }))
}

pub(crate) fn to_user_dto(model: user::Model) -> UserDto {
    let display_name = model.display_name.unwrap_or_else(|| model.username.clone());
    UserDto {
        id: model.id,
        username: model.username,
        email: model.email,
        display_name,
        created_at: to_rfc3339(model.created_at),
    }
}
