use super::UPLOAD_BODY_LIMIT;
use crate::{
    AppState,
    handlers::{
        admin, blog, community, crew, events, gallery, journey, posters, suggestions, teams,
        timeline, uploads,
    },
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
};

/// Admin Router Module
///
/// Content management, moderation queues, uploads and the admin's own
/// account. The caller wraps this router in the `require_admin` route layer,
/// so no handler here runs without a valid session.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Account ---
        .route("/admin/me", get(admin::me))
        .route("/admin/logout", post(admin::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/2fa/setup", post(admin::setup_two_factor))
        .route("/admin/2fa/enable", post(admin::enable_two_factor))
        .route("/admin/2fa/disable", post(admin::disable_two_factor))
        // --- Content CRUD ---
        .route("/blogs", post(blog::create_blog))
        .route("/blogs/{id}", put(blog::update_blog).delete(blog::delete_blog))
        .route("/events", post(events::create_event))
        .route("/events/{id}", put(events::update_event).delete(events::delete_event))
        .route("/gallery-events", post(gallery::create_gallery_event))
        .route(
            "/gallery-events/{id}",
            put(gallery::update_gallery_event).delete(gallery::delete_gallery_event),
        )
        .route("/timeline", post(timeline::create_timeline_event))
        .route(
            "/timeline/{id}",
            put(timeline::update_timeline_event).delete(timeline::delete_timeline_event),
        )
        .route("/journey", post(journey::create_journey_person))
        .route(
            "/journey/{id}",
            put(journey::update_journey_person).delete(journey::delete_journey_person),
        )
        // POST/PUT /crew
        // Order index assignment and category moves happen in the repository.
        .route("/crew", post(crew::create_crew_member))
        .route("/crew/{id}", put(crew::update_crew_member).delete(crew::delete_crew_member))
        .route("/teams", post(teams::create_team))
        .route("/teams/{id}", put(teams::update_team).delete(teams::delete_team))
        // --- Posters ---
        .route(
            "/posters",
            post(posters::create_poster).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/posters/reorder", post(posters::reorder_posters))
        .route("/posters/{id}", put(posters::update_poster).delete(posters::delete_poster))
        // --- Moderation queues ---
        .route("/community/applications", get(community::list_applications))
        .route(
            "/community/applications/{id}",
            get(community::get_application).delete(community::delete_application),
        )
        .route(
            "/community/applications/{id}/status",
            patch(community::update_application_status),
        )
        .route("/event-suggestions", get(suggestions::list_suggestions))
        .route(
            "/event-suggestions/{id}",
            get(suggestions::get_suggestion).delete(suggestions::delete_suggestion),
        )
        .route(
            "/event-suggestions/{id}/status",
            patch(suggestions::update_suggestion_status),
        )
        // POST /uploads
        // Stores an image on disk and returns its public URL.
        .route(
            "/uploads",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
