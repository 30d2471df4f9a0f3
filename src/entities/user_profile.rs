//! User profile entity - Extra personal details, one row per user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; one profile per user
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional date of birth
    pub birth_date: Option<Date>,
    /// Optional path of an uploaded profile photo
    pub photo_path: Option<String>,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `UserProfile` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
