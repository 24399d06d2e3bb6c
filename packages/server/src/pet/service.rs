use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, IntoActiveModel, QueryFilter, Set,
};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::entity::pet::{self, PetStatus};
use crate::error::FieldError;
use crate::models::pet::{PetRequest, validate_pet_request};

#[derive(Debug, Error)]
pub enum PetError {
    /// No active pet matches. Wrong owner, unknown id and disabled pets all
    /// end up here so ownership is not revealed.
    #[error("Pet not found")]
    NotFound,

    #[error("Invalid pet fields: {0:?}")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Storage(#[from] DbErr),
}

/// Per-user pet operations over a borrowed connection.
///
/// Every read starts from [`pet::Entity::find_active`], so disabled pets are
/// invisible to all operations.
pub struct PetService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PetService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All active pets owned by `user_id`, in storage order.
    #[instrument(skip(self))]
    pub async fn find_by_current_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<pet::Model>, PetError> {
        let pets = pet::Entity::find_active()
            .filter(pet::Column::UserId.eq(user_id))
            .all(self.conn)
            .await?;
        debug!(count = pets.len(), "Listed pets");
        Ok(pets)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: Uuid, pet_id: Uuid) -> Result<pet::Model, PetError> {
        self.find_owned(user_id, pet_id).await
    }

    /// Look up an active pet by its external id, across all owners.
    ///
    /// `user_id` is only recorded on the span.
    #[instrument(skip(self))]
    pub async fn find_by_nft_id(
        &self,
        user_id: Uuid,
        nft_id: &str,
    ) -> Result<pet::Model, PetError> {
        pet::Entity::find_active()
            .filter(pet::Column::NftId.eq(nft_id))
            .one(self.conn)
            .await?
            .ok_or(PetError::NotFound)
    }

    /// Create a pet when `pet_id` is `None`, otherwise update the caller's pet.
    ///
    /// Fields absent or empty in `body` keep their stored value. The body is
    /// validated in full before anything is written.
    #[instrument(skip(self, body))]
    pub async fn update(
        &self,
        pet_id: Option<Uuid>,
        user_id: Uuid,
        body: &PetRequest,
    ) -> Result<pet::Model, PetError> {
        let mut current = match pet_id {
            Some(id) => self.find_owned(user_id, id).await?.into_active_model(),
            None => pet::ActiveModel::new_for_owner(user_id),
        };

        validate_pet_request(body, pet_id.is_none()).map_err(PetError::Validation)?;

        if let Some(name) = body.name() {
            current.name = Set(name.to_string());
        }
        if let Some(description) = body.description() {
            current.description = Set(description.to_string());
        }
        if let Some(birth_date) = body.birth_date {
            current.birth_date = Set(Some(birth_date));
        }
        if let Some(nft_id) = body.nft_id() {
            current.nft_id = Set(nft_id.to_string());
        }
        if let Some(owner_name) = body.owner_name() {
            current.owner_name = Set(owner_name.to_string());
        }
        if let Some(owner_id) = body.owner_id() {
            current.owner_id = Set(owner_id.to_string());
        }

        let saved = match pet_id {
            Some(_) => current.update(self.conn).await?,
            None => current.insert(self.conn).await?,
        };
        info!(pet_id = %saved.id, created = pet_id.is_none(), "Saved pet");
        Ok(saved)
    }

    /// Soft-delete the caller's pet. A second call for the same id fails with
    /// [`PetError::NotFound`].
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: Uuid, pet_id: Uuid) -> Result<(), PetError> {
        let mut target = self.find_owned(user_id, pet_id).await?.into_active_model();
        target.status = Set(PetStatus::Disabled);
        target.update(self.conn).await?;
        info!(%pet_id, "Disabled pet");
        Ok(())
    }

    async fn find_owned(&self, user_id: Uuid, pet_id: Uuid) -> Result<pet::Model, PetError> {
        pet::Entity::find_active()
            .filter(pet::Column::Id.eq(pet_id))
            .filter(pet::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?
            .ok_or(PetError::NotFound)
    }
}
