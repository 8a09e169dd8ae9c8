use sea_orm::entity::prelude::*;

use super::{Category, Priority, TodoStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub status: TodoStatus,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub category: Category,
    /// JSON array of tag names.
    pub tags: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
