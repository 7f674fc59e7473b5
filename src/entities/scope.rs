use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single granted permission (action + account) under a consent.
/// Immutable once created; cascade-deleted with its consent.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scopes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub consent_id: String,
    pub action: String,
    pub account_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consent::Entity",
        from = "Column::ConsentId",
        to = "super::consent::Column::Id",
        on_delete = "Cascade"
    )]
    Consent,
}

impl Related<super::consent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
