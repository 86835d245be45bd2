mod models;
mod schema;
mod seed;
mod store;
mod trait_def;

pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use seed::load_seed_if_empty;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
