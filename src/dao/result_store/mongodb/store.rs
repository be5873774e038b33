use std::time::Duration;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::time::sleep;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::MongoResultDocument,
};
use crate::dao::{
    models::{NewResultRecord, ResultRecordEntity},
    result_store::ResultStore,
    storage::StorageResult,
};

const RESULT_COLLECTION_NAME: &str = "quiz_results";

// Initial-connection ping schedule: the driver connects lazily, so the
// first ping is what actually proves the server is reachable.
const CONNECT_PING_ATTEMPTS: u32 = 10;
const CONNECT_PING_BASE_DELAY: Duration = Duration::from_millis(250);
const CONNECT_PING_MAX_DELAY: Duration = Duration::from_secs(5);

/// [`ResultStore`] implementation backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoResultStore {
    database: Database,
}

impl MongoResultStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let config = MongoConfig::from_uri(uri, db_name).await?;
        let client = Client::with_options(config.options)
            .map_err(|source| MongoDaoError::ClientConstruction { source })?;

        let store = Self {
            database: client.database(&config.database_name),
        };
        store.ping_until_reachable().await?;
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Ping with exponential backoff until the server answers or the
    /// attempt budget runs out.
    async fn ping_until_reachable(&self) -> MongoResult<()> {
        let mut delay = CONNECT_PING_BASE_DELAY;
        let mut attempts = 0;

        loop {
            let Err(err) = self.database.run_command(doc! { "ping": 1 }).await else {
                return Ok(());
            };

            attempts += 1;
            if attempts >= CONNECT_PING_ATTEMPTS {
                return Err(MongoDaoError::InitialPing {
                    attempts,
                    source: err,
                });
            }
            sleep(delay).await;
            delay = (delay * 2).min(CONNECT_PING_MAX_DELAY);
        }
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self
            .database
            .collection::<mongodb::bson::Document>(RESULT_COLLECTION_NAME);
        // Listing is always sorted by score descending with `_id` as the
        // stable tie-breaker, so keep a matching index.
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"score": -1, "_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("result_score_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: RESULT_COLLECTION_NAME,
                index: "score,_id",
                source,
            })?;

        Ok(())
    }

    fn collection(&self) -> Collection<MongoResultDocument> {
        self.database
            .collection::<MongoResultDocument>(RESULT_COLLECTION_NAME)
    }

    async fn ping(&self) -> MongoResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn insert_result(&self, record: NewResultRecord) -> MongoResult<ResultRecordEntity> {
        let mut document = MongoResultDocument::from(record);
        let inserted = self.collection().insert_one(&document).await.map_err(|source| {
            MongoDaoError::InsertResult {
                username: document.username.clone(),
                source,
            }
        })?;

        document.id = inserted.inserted_id.as_object_id();
        document.into_entity()
    }

    async fn list_results(&self) -> MongoResult<Vec<ResultRecordEntity>> {
        // ObjectIds grow monotonically with insertion time, so the `_id`
        // tie-breaker preserves first-inserted-first among equal scores.
        let documents: Vec<MongoResultDocument> = self
            .collection()
            .find(doc! {})
            .sort(doc! {"score": -1, "_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListResults { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListResults { source })?;

        documents
            .into_iter()
            .map(MongoResultDocument::into_entity)
            .collect()
    }
}

impl ResultStore for MongoResultStore {
    fn insert_result(
        &self,
        record: NewResultRecord,
    ) -> BoxFuture<'static, StorageResult<ResultRecordEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_result(record).await.map_err(Into::into) })
    }

    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<ResultRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_results().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
