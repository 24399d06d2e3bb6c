use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::pet;
use crate::error::{AppError, FieldError};

pub const NAME_MAX_CHARS: usize = 256;
pub const DESCRIPTION_MAX_CHARS: usize = 1024;
pub const NFT_ID_MAX_CHARS: usize = 100;
pub const OWNER_NAME_MAX_CHARS: usize = 100;
pub const OWNER_ID_MAX_CHARS: usize = 100;

/// Request body for creating or updating a pet.
///
/// Every field is optional. On update, a field that is absent or empty keeps
/// the stored value, so a field cannot be cleared once set.
#[derive(Deserialize, Default, Debug, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetRequest {
    /// Pet name (required on create, at most 256 characters).
    #[schema(example = "Rex")]
    pub name: Option<String>,
    /// Free-form description (at most 1024 characters).
    #[schema(example = "Brown labrador, very friendly")]
    pub description: Option<String>,
    /// Calendar date of birth.
    #[schema(example = "2020-05-17")]
    pub birth_date: Option<NaiveDate>,
    /// External NFT identifier (at most 100 characters).
    #[schema(example = "nft-42")]
    pub nft_id: Option<String>,
    /// Real-world owner's name (at most 100 characters).
    #[schema(example = "Ana")]
    pub owner_name: Option<String>,
    /// Real-world owner's identity document (at most 100 characters).
    #[schema(example = "DNI123")]
    pub owner_id: Option<String>,
}

impl PetRequest {
    /// Trimmed name, if one was supplied.
    pub fn name(&self) -> Option<&str> {
        trimmed(&self.name)
    }

    /// Trimmed description, if one was supplied.
    pub fn description(&self) -> Option<&str> {
        trimmed(&self.description)
    }

    pub fn nft_id(&self) -> Option<&str> {
        non_empty(&self.nft_id)
    }

    pub fn owner_name(&self) -> Option<&str> {
        non_empty(&self.owner_name)
    }

    pub fn owner_id(&self) -> Option<&str> {
        non_empty(&self.owner_id)
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Check every field of `req` and report all violations at once.
///
/// `creating` adds the required-name rule, which only applies to new pets
/// since stored pets always have a name.
pub fn validate_pet_request(req: &PetRequest, creating: bool) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    match req.name() {
        Some(name) => check_length(&mut errors, "name", name, NAME_MAX_CHARS),
        None if creating => errors.push(FieldError::new("name", "Name is required")),
        None => {}
    }
    if let Some(description) = req.description() {
        check_length(
            &mut errors,
            "description",
            description,
            DESCRIPTION_MAX_CHARS,
        );
    }
    if let Some(nft_id) = req.nft_id() {
        check_length(&mut errors, "nftId", nft_id, NFT_ID_MAX_CHARS);
    }
    if let Some(owner_name) = req.owner_name() {
        check_length(&mut errors, "ownerName", owner_name, OWNER_NAME_MAX_CHARS);
    }
    if let Some(owner_id) = req.owner_id() {
        check_length(&mut errors, "ownerId", owner_id, OWNER_ID_MAX_CHARS);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_length(errors: &mut Vec<FieldError>, path: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(path, format!("At most {max} characters")));
    }
}

/// Parse a pet id taken from the request path.
pub fn parse_pet_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid pet id '{raw}'")))
}

/// Full pet projection, returned by list and read endpoints.
#[derive(Serialize, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: Uuid,
    #[schema(example = "Rex")]
    pub name: String,
    #[schema(example = "")]
    pub description: String,
    pub birth_date: Option<NaiveDate>,
    #[schema(example = "nft-42")]
    pub nft_id: String,
    #[schema(example = "Ana")]
    pub owner_name: String,
    #[schema(example = "DNI123")]
    pub owner_id: String,
}

impl From<pet::Model> for PetResponse {
    fn from(m: pet::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            birth_date: m.birth_date,
            nft_id: m.nft_id,
            owner_name: m.owner_name,
            owner_id: m.owner_id,
        }
    }
}

/// Returned after creating a pet.
#[derive(Serialize, Debug, utoipa::ToSchema)]
pub struct PetCreatedResponse {
    /// ID of the new pet.
    pub id: Uuid,
}

impl From<pet::Model> for PetCreatedResponse {
    fn from(m: pet::Model) -> Self {
        Self { id: m.id }
    }
}

/// Returned after updating a pet. Does not include `nftId`.
#[derive(Serialize, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetUpdatedResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub birth_date: Option<NaiveDate>,
    pub owner_name: String,
    pub owner_id: String,
}

impl From<pet::Model> for PetUpdatedResponse {
    fn from(m: pet::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            birth_date: m.birth_date,
            owner_name: m.owner_name,
            owner_id: m.owner_id,
        }
    }
}
