//! GraphQL surface mirroring the REST submission path.
//!
//! The mutation funnels into the same [`result_service::submit_result`] as
//! `POST /submit-quiz`, so both write paths validate identically and
//! produce identical stored records.

use async_graphql::{
    Context, EmptySubscription, ID, Object, Result as GraphQLResult, Schema, SimpleObject,
};

use crate::{
    dao::models::ResultRecordEntity, error::ServiceError, services::result_service,
    state::SharedState,
};

/// Schema type served at `/graphql`.
pub type QuizSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the shared application state attached.
pub fn build_schema(state: SharedState) -> QuizSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// A stored quiz result as exposed over GraphQL.
#[derive(Debug, SimpleObject)]
pub struct QuizResult {
    /// Store-assigned identifier.
    pub id: ID,
    /// Name the participant submitted under.
    pub username: String,
    /// Final score; zero is valid.
    pub score: i32,
    /// Size of the question set.
    pub total_questions: i32,
}

impl From<ResultRecordEntity> for QuizResult {
    fn from(value: ResultRecordEntity) -> Self {
        Self {
            id: ID(value.id),
            username: value.username,
            score: value.score,
            total_questions: value.total_questions,
        }
    }
}

/// Root query object.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All stored results ordered by score descending.
    async fn get_results(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<QuizResult>> {
        let state = ctx.data::<SharedState>()?;
        let records = result_service::list_results(state)
            .await
            .map_err(to_graphql_error)?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

/// Root mutation object.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Persist a finished session's tally and return the created record.
    async fn save_result(
        &self,
        ctx: &Context<'_>,
        username: String,
        score: i32,
        total_questions: i32,
    ) -> GraphQLResult<QuizResult> {
        let state = ctx.data::<SharedState>()?;
        let record =
            result_service::submit_result(state, Some(username), Some(score), Some(total_questions))
                .await
                .map_err(to_graphql_error)?;
        Ok(record.into())
    }
}

fn to_graphql_error(err: ServiceError) -> async_graphql::Error {
    async_graphql::Error::new(err.to_string())
}
