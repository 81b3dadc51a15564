use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod repository;
pub mod slug;
pub mod storage;
pub mod totp;

// Routers split by access level (public, admin).
pub mod routes;
use auth::AdminSession;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{LocalDiskStorage, MockStorageService, StorageState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` and
/// browsable under `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::blog::list_blogs, handlers::blog::get_blog, handlers::blog::create_blog,
        handlers::blog::update_blog, handlers::blog::delete_blog,
        handlers::events::list_events, handlers::events::upcoming_events,
        handlers::events::get_event_by_slug, handlers::events::get_event,
        handlers::events::create_event, handlers::events::update_event,
        handlers::events::delete_event,
        handlers::gallery::list_gallery_events, handlers::gallery::get_gallery_event,
        handlers::gallery::create_gallery_event, handlers::gallery::update_gallery_event,
        handlers::gallery::delete_gallery_event,
        handlers::timeline::list_timeline_events, handlers::timeline::get_timeline_event,
        handlers::timeline::create_timeline_event, handlers::timeline::update_timeline_event,
        handlers::timeline::delete_timeline_event,
        handlers::journey::list_journey, handlers::journey::create_journey_person,
        handlers::journey::update_journey_person, handlers::journey::delete_journey_person,
        handlers::crew::list_crew, handlers::crew::create_crew_member,
        handlers::crew::update_crew_member, handlers::crew::delete_crew_member,
        handlers::teams::list_teams, handlers::teams::featured_teams, handlers::teams::get_team,
        handlers::teams::get_team_by_slug, handlers::teams::create_team,
        handlers::teams::update_team, handlers::teams::delete_team,
        handlers::community::apply, handlers::community::list_applications,
        handlers::community::get_application, handlers::community::update_application_status,
        handlers::community::delete_application,
        handlers::suggestions::create_suggestion, handlers::suggestions::list_suggestions,
        handlers::suggestions::get_suggestion, handlers::suggestions::update_suggestion_status,
        handlers::suggestions::delete_suggestion,
        handlers::posters::list_posters, handlers::posters::get_poster,
        handlers::posters::create_poster, handlers::posters::update_poster,
        handlers::posters::delete_poster, handlers::posters::reorder_posters,
        handlers::uploads::upload_image,
        handlers::admin::login, handlers::admin::me, handlers::admin::logout,
        handlers::admin::dashboard, handlers::admin::setup_two_factor,
        handlers::admin::enable_two_factor, handlers::admin::disable_two_factor,
    ),
    components(
        schemas(
            models::ReviewStatus, models::StatusUpdateRequest,
            models::Blog, models::CreateBlogRequest, models::UpdateBlogRequest, models::BlogPage,
            models::Event, models::CreateEventRequest, models::UpdateEventRequest,
            models::GalleryEvent, models::CreateGalleryEventRequest, models::UpdateGalleryEventRequest,
            models::TimelineEvent, models::CreateTimelineEventRequest,
            models::UpdateTimelineEventRequest,
            models::JourneyPerson, models::CreateJourneyPersonRequest,
            models::UpdateJourneyPersonRequest,
            models::CrewMember, models::CreateCrewMemberRequest, models::UpdateCrewMemberRequest,
            models::Team, models::TeamMember, models::TeamWithMembers, models::TeamMemberInput,
            models::CreateTeamRequest, models::UpdateTeamRequest,
            models::CommunityApplication, models::CreateApplicationRequest,
            models::EventSuggestion, models::CreateSuggestionRequest,
            models::Poster, models::CreatePosterRequest, models::UpdatePosterRequest,
            models::ReorderRequest,
            handlers::posters::PosterForm, handlers::uploads::UploadForm, models::UploadResponse,
            models::AdminProfile, models::LoginRequest, models::LoginResponse,
            models::TwoFactorSetupResponse, models::EnableTwoFactorRequest,
            models::DisableTwoFactorRequest, models::MessageResponse, models::DashboardStats,
        )
    ),
    tags(
        (name = "ayzek", description = "Community site API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Persistence (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Where uploaded images are written.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Extractors such as `AdminSession` only ask for the slices they need.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// require_admin
///
/// Route layer for the admin router. Resolving `AdminSession` rejects the
/// request (401/403) before the handler runs; the resolved admin rides along
/// in the request extensions for handlers that need it.
async fn require_admin(
    AdminSession(admin): AdminSession,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(admin);
    next.run(request).await
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Cookies travel cross-origin, so origins, methods and headers are explicit.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// create_router
///
/// Assembles the public and admin routers, Swagger UI, and the request-id,
/// tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Admin routes: every method is guarded; public methods on the same
        // paths come from the router above.
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, tagged with its `x-request-id` so every log line of
/// the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
