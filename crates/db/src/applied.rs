//! Bookkeeping table recording which migrations have run.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "_migrations")]
pub struct Model {
    /// `{module}/{migration id}`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub applied_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
