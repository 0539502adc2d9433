//! Persistence module split across logical submodules. The SQLite pieces only
//! exist on targets that can build the bundled engine.

#[cfg(not(target_family = "wasm"))]
mod connection;
#[cfg(not(target_family = "wasm"))]
mod records;
mod store;

#[cfg(not(target_family = "wasm"))]
pub use connection::{ensure_schema, open_database};
#[cfg(not(target_family = "wasm"))]
pub use records::{dump_records, fetch_record, fetch_records, insert_record};
#[cfg(not(target_family = "wasm"))]
pub use store::SqliteStore;
pub use store::{open_store, storage_supported, NullStore, RecordStore};
