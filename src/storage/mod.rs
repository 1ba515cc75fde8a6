// ============================================================================
// STORAGE - persistencia de rutas como blob JSON sobre un store clave-valor
// ============================================================================

pub mod kv;
pub mod local_data_source;

pub use kv::{load_from_store, save_to_store, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use local_data_source::LocalDataSource;
