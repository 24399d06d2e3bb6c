use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().merge(pet_routes())
}

fn pet_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::pet::list_pets,
            handlers::pet::create_pet
        ))
        .routes(routes!(
            handlers::pet::get_pet,
            handlers::pet::update_pet,
            handlers::pet::delete_pet
        ))
        .routes(routes!(handlers::pet::get_pet_by_nft_id))
}
