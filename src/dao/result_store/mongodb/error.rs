use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB store operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures specific to the MongoDB result store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Client construction from parsed options failed.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The server never answered the initial ping.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Ping attempts made before giving up.
        attempts: u32,
        /// Driver error from the last attempt.
        #[source]
        source: MongoError,
    },
    /// A routine health ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Index key description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Insertion of a result document failed.
    #[error("failed to insert result for `{username}`")]
    InsertResult {
        /// Participant whose record was being stored.
        username: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Listing stored results failed.
    #[error("failed to list results")]
    ListResults {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An acknowledged insert returned no object id.
    #[error("inserted result came back without an object id")]
    MissingDocumentId,
}
