use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[sea_orm(string_value = "work")]
    #[serde(alias = "仕事")]
    Work,
    #[sea_orm(string_value = "private")]
    #[serde(alias = "プライベート")]
    Private,
    #[sea_orm(string_value = "idea")]
    #[serde(alias = "アイデア")]
    Idea,
    #[sea_orm(string_value = "shopping")]
    #[serde(alias = "買い物")]
    Shopping,
    #[default]
    #[sea_orm(string_value = "other")]
    #[serde(alias = "その他")]
    Other,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    #[sea_orm(string_value = "todo")]
    Todo,
    #[sea_orm(string_value = "in-progress")]
    #[serde(alias = "inprogress", alias = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "done")]
    Done,
}

impl TodoStatus {
    /// Resolves the stored status from an optional requested status and
    /// completed flag. `completed` is always `status == Done` afterwards.
    pub fn reconcile(
        requested: Option<TodoStatus>,
        completed: Option<bool>,
        current: TodoStatus,
    ) -> (TodoStatus, bool) {
        let status = match (requested, completed) {
            (Some(status), _) => status,
            (None, Some(true)) => TodoStatus::Done,
            (None, Some(false)) if current == TodoStatus::Done => TodoStatus::Todo,
            (None, _) => current,
        };
        (status, status == TodoStatus::Done)
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}
