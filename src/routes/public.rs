use crate::{
    AppState,
    handlers::{
        admin, blog, community, crew, events, gallery, journey, posters, suggestions, teams,
        timeline,
    },
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session: every read of published content,
/// the two public forms (join application, event suggestion) and the admin
/// login itself.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // --- Content ---
        .route("/blogs", get(blog::list_blogs))
        .route("/blogs/{id}", get(blog::get_blog))
        // `/events/upcoming` and `/events/slug/{slug}` are static segments and
        // win over `/events/{id}`.
        .route("/events", get(events::list_events))
        .route("/events/upcoming", get(events::upcoming_events))
        .route("/events/slug/{slug}", get(events::get_event_by_slug))
        .route("/events/{id}", get(events::get_event))
        .route("/gallery-events", get(gallery::list_gallery_events))
        .route("/gallery-events/{id}", get(gallery::get_gallery_event))
        .route("/timeline", get(timeline::list_timeline_events))
        .route("/timeline/{id}", get(timeline::get_timeline_event))
        .route("/journey", get(journey::list_journey))
        .route("/crew", get(crew::list_crew))
        .route("/teams", get(teams::list_teams))
        .route("/teams/featured", get(teams::featured_teams))
        .route("/teams/slug/{slug}", get(teams::get_team_by_slug))
        .route("/teams/{id}", get(teams::get_team))
        .route("/posters", get(posters::list_posters))
        .route("/posters/{id}", get(posters::get_poster))
        // --- Public submissions ---
        // Both land as `pending` and show up in the admin queues.
        .route("/community/apply", post(community::apply))
        .route("/event-suggestions", post(suggestions::create_suggestion))
        // POST /admin/login
        // The only `/admin` endpoint that is reachable without a token.
        .route("/admin/login", post(admin::login))
}
