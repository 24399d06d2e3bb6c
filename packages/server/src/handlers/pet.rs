use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::pet::*;
use crate::pet::pet_service;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/pet",
    tag = "Pets",
    operation_id = "listPets",
    summary = "List the current user's pets",
    description = "Returns every active pet owned by the authenticated user, in storage order. Soft-deleted pets are never listed.",
    responses(
        (status = 200, description = "The caller's pets", body = Vec<PetResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_pets(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PetResponse>>, AppError> {
    let pets = pet_service(&state.db)
        .find_by_current_user(auth_user.user_id)
        .await?;

    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/pet",
    tag = "Pets",
    operation_id = "createPet",
    summary = "Create a pet",
    description = "Creates a pet owned by the authenticated user. `name` is required; every field is length-checked and all violations are reported together.",
    request_body = PetRequest,
    responses(
        (status = 201, description = "Pet created", body = PetCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = pet_service(&state.db)
        .update(None, auth_user.user_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(PetCreatedResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/pet/{pet_id}",
    tag = "Pets",
    operation_id = "getPet",
    summary = "Get one of the current user's pets",
    description = "Returns an active pet owned by the authenticated user. Pets of other users and soft-deleted pets are reported as not found.",
    params(("pet_id" = String, Path, description = "Pet ID (UUID)")),
    responses(
        (status = 200, description = "Pet details", body = PetResponse),
        (status = 400, description = "Malformed pet ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<PetResponse>, AppError> {
    let pet_id = parse_pet_id(&pet_id)?;
    let model = pet_service(&state.db)
        .find_by_id(auth_user.user_id, pet_id)
        .await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/pet/nft/{nft_id}",
    tag = "Pets",
    operation_id = "getPetByNftId",
    summary = "Find a pet by its NFT identifier",
    description = "Returns the active pet whose `nftId` matches exactly, regardless of which user owns it.",
    params(("nft_id" = String, Path, description = "External NFT identifier")),
    responses(
        (status = 200, description = "Pet details", body = PetResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_pet_by_nft_id(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(nft_id): Path<String>,
) -> Result<Json<PetResponse>, AppError> {
    let model = pet_service(&state.db)
        .find_by_nft_id(auth_user.user_id, &nft_id)
        .await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/pet/{pet_id}",
    tag = "Pets",
    operation_id = "updatePet",
    summary = "Update one of the current user's pets",
    description = "Overwrites each field that is present and non-empty in the body; absent or empty fields keep their stored value. The response omits `nftId`.",
    params(("pet_id" = String, Path, description = "Pet ID (UUID)")),
    request_body = PetRequest,
    responses(
        (status = 200, description = "Pet updated", body = PetUpdatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn update_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    AppJson(payload): AppJson<PetRequest>,
) -> Result<Json<PetUpdatedResponse>, AppError> {
    let pet_id = parse_pet_id(&pet_id)?;
    let model = pet_service(&state.db)
        .update(Some(pet_id), auth_user.user_id, &payload)
        .await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/pet/{pet_id}",
    tag = "Pets",
    operation_id = "deletePet",
    summary = "Soft-delete one of the current user's pets",
    description = "Disables the pet so it no longer appears in any read. Deleting an already deleted pet returns 404.",
    params(("pet_id" = String, Path, description = "Pet ID (UUID)")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 400, description = "Malformed pet ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let pet_id = parse_pet_id(&pet_id)?;
    pet_service(&state.db)
        .remove(auth_user.user_id, pet_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
