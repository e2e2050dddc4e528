mod schema;
mod sqlite_repository;

pub use schema::initialize_database;
pub use sqlite_repository::SqliteRepository;
