mod migrations;
mod storage;
mod store;

pub use migrations::{TasksDocument, FALLBACK_OWNER, SCHEMA_VERSION};
pub use storage::{JsonFileStorage, Storage};
pub use store::StoreService;
