pub mod service;

pub use service::{PetError, PetService};

use sea_orm::DatabaseConnection;

/// Build a [`PetService`] over the shared connection pool.
pub fn pet_service(db: &DatabaseConnection) -> PetService<'_, DatabaseConnection> {
    PetService::new(db)
}
