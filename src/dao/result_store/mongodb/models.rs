use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::dao::models::{NewResultRecord, ResultRecordEntity};

use super::error::{MongoDaoError, MongoResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoResultDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub score: i32,
    pub total_questions: i32,
}

impl From<NewResultRecord> for MongoResultDocument {
    fn from(value: NewResultRecord) -> Self {
        Self {
            id: None,
            username: value.username,
            score: value.score,
            total_questions: value.total_questions,
        }
    }
}

impl MongoResultDocument {
    /// Convert into the shared entity; the document must carry an `_id`.
    pub fn into_entity(self) -> MongoResult<ResultRecordEntity> {
        let id = self.id.ok_or(MongoDaoError::MissingDocumentId)?;
        Ok(ResultRecordEntity {
            id: id.to_hex(),
            username: self.username,
            score: self.score,
            total_questions: self.total_questions,
        })
    }
}
