pub mod models;
pub mod store;

pub use models::VideoRecord;
pub use store::CatalogStore;
