//! MongoDB-backed implementation of the result store.

mod config;
mod error;
mod models;
/// The collection-backed store itself.
pub mod store;

pub use error::MongoDaoError;
pub use store::MongoResultStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
