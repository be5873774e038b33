use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the quiz backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::results::submit_quiz,
        crate::routes::session::start_session,
        crate::routes::session::get_session,
        crate::routes::session::select_option,
        crate::routes::session::advance_session,
        crate::routes::session::go_back,
        crate::routes::session::restart_session,
        crate::routes::session::submit_session,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::result::SubmitQuizRequest,
            crate::dto::result::SubmitQuizResponse,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::SelectOptionRequest,
            crate::dto::session::SessionPhaseDto,
            crate::dto::session::QuestionView,
            crate::dto::session::SessionView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "results", description = "Direct result submission"),
        (name = "sessions", description = "Hosted quiz session flow"),
    )
)]
pub struct ApiDoc;
