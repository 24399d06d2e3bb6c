use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, Select};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a pet record. `Disabled` is the soft-deleted state and
/// is terminal: nothing moves a pet back to `Active`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "disabled")]
    Disabled,
}

impl PetStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pet")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub birth_date: Option<Date>,

    /// External cross-reference id. Used as a lookup key but not unique.
    #[sea_orm(indexed)]
    pub nft_id: String,

    /// Free-text name of the real-world owner, unrelated to `user_id`.
    pub owner_name: String,
    /// Free-text identity document of the real-world owner.
    pub owner_id: String,

    /// Account that created the record. Never changes after insert.
    #[sea_orm(indexed)]
    pub user_id: Uuid,

    #[sea_orm(indexed)]
    pub status: PetStatus,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Entity {
    /// Query root for every read. Disabled pets never leave this select.
    pub fn find_active() -> Select<Entity> {
        Self::find().filter(Column::Status.eq(PetStatus::Active))
    }
}

impl ActiveModel {
    /// A fresh, unsaved pet owned by `user_id`, with every default applied.
    pub fn new_for_owner(user_id: Uuid) -> Self {
        Self {
            user_id: Set(user_id),
            ..<Self as ActiveModelBehavior>::new()
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::now_v7()),
            name: Set(String::new()),
            description: Set(String::new()),
            birth_date: Set(None),
            nft_id: Set(String::new()),
            owner_name: Set(String::new()),
            owner_id: Set(String::new()),
            status: Set(PetStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
