use crate::models::{
    Admin, ApplicationFilter, Blog, BlogFilter, CommunityApplication, CreateApplicationRequest,
    CreateBlogRequest, CreateCrewMemberRequest, CreateEventRequest, CreateGalleryEventRequest,
    CreateJourneyPersonRequest, CreatePosterRequest, CreateSuggestionRequest, CreateTeamRequest,
    CreateTimelineEventRequest, CrewMember, DashboardStats, Event, EventSuggestion, GalleryEvent,
    JourneyPerson, Poster, PosterFilter, ReviewStatus, Team, TeamWithMembers, TimelineEvent,
    UpdateBlogRequest, UpdateCrewMemberRequest, UpdateEventRequest, UpdateGalleryEventRequest,
    UpdateJourneyPersonRequest, UpdatePosterRequest, UpdateTeamRequest,
    UpdateTimelineEventRequest,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// Result of every repository call. Absence is reported as `Ok(None)` or
/// `Ok(false)`; the handler decides whether that is a 404.
pub type RepoResult<T> = Result<T, sqlx::Error>;

/// Repository Trait
///
/// Persistence contract for every resource of the site. Handlers only see
/// `Arc<dyn Repository>`, so tests can run the full HTTP stack against
/// [`InMemoryRepository`] while production uses [`PostgresRepository`].
///
/// Write methods that touch more than one row (team + members, order-index
/// assignment, poster reorder) are atomic in both implementations.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Blogs ---
    /// Returns one page of posts (newest `date` first, then id desc) and the
    /// total number of matches.
    async fn list_blogs(&self, filter: &BlogFilter) -> RepoResult<(Vec<Blog>, i64)>;
    async fn get_blog(&self, id: i64) -> RepoResult<Option<Blog>>;
    async fn create_blog(&self, req: CreateBlogRequest) -> RepoResult<Blog>;
    async fn update_blog(&self, id: i64, req: UpdateBlogRequest) -> RepoResult<Option<Blog>>;
    async fn delete_blog(&self, id: i64) -> RepoResult<bool>;

    // --- Events ---
    async fn list_events(&self, skip: i64, limit: i64) -> RepoResult<Vec<Event>>;
    /// Events starting at or after `now`, soonest first.
    async fn upcoming_events(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Event>>;
    async fn get_event(&self, id: i64) -> RepoResult<Option<Event>>;
    async fn get_event_by_slug(&self, slug: &str) -> RepoResult<Option<Event>>;
    /// Inserts the event under `slug`. Callers resolve collisions first.
    async fn create_event(&self, req: CreateEventRequest, slug: String) -> RepoResult<Event>;
    /// Partial update; `slug`, when given, replaces the stored one.
    async fn update_event(
        &self,
        id: i64,
        req: UpdateEventRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<Event>>;
    async fn delete_event(&self, id: i64) -> RepoResult<bool>;

    // --- Gallery ---
    async fn list_gallery_events(&self) -> RepoResult<Vec<GalleryEvent>>;
    async fn get_gallery_event(&self, id: i64) -> RepoResult<Option<GalleryEvent>>;
    async fn create_gallery_event(&self, req: CreateGalleryEventRequest)
    -> RepoResult<GalleryEvent>;
    async fn update_gallery_event(
        &self,
        id: i64,
        req: UpdateGalleryEventRequest,
    ) -> RepoResult<Option<GalleryEvent>>;
    async fn delete_gallery_event(&self, id: i64) -> RepoResult<bool>;

    // --- Timeline ---
    async fn list_timeline_events(&self) -> RepoResult<Vec<TimelineEvent>>;
    async fn get_timeline_event(&self, id: i64) -> RepoResult<Option<TimelineEvent>>;
    async fn create_timeline_event(
        &self,
        req: CreateTimelineEventRequest,
    ) -> RepoResult<TimelineEvent>;
    async fn update_timeline_event(
        &self,
        id: i64,
        req: UpdateTimelineEventRequest,
    ) -> RepoResult<Option<TimelineEvent>>;
    async fn delete_timeline_event(&self, id: i64) -> RepoResult<bool>;

    // --- Journey ---
    /// All people ordered by year desc, then creation time asc, then id.
    async fn list_journey_people(&self) -> RepoResult<Vec<JourneyPerson>>;
    async fn create_journey_person(
        &self,
        req: CreateJourneyPersonRequest,
    ) -> RepoResult<JourneyPerson>;
    async fn update_journey_person(
        &self,
        id: i64,
        req: UpdateJourneyPersonRequest,
    ) -> RepoResult<Option<JourneyPerson>>;
    async fn delete_journey_person(&self, id: i64) -> RepoResult<bool>;

    // --- Crew ---
    /// All members ordered by category, then `(order_index, created_at, id)`.
    async fn list_crew_members(&self) -> RepoResult<Vec<CrewMember>>;
    /// Appends to the end of the category unless `order_index` is given.
    async fn create_crew_member(&self, req: CreateCrewMemberRequest) -> RepoResult<CrewMember>;
    /// Moving to another category without an explicit index appends there.
    async fn update_crew_member(
        &self,
        id: i64,
        req: UpdateCrewMemberRequest,
    ) -> RepoResult<Option<CrewMember>>;
    async fn delete_crew_member(&self, id: i64) -> RepoResult<bool>;

    // --- Teams ---
    async fn list_teams(&self) -> RepoResult<Vec<TeamWithMembers>>;
    async fn featured_teams(&self, limit: i64) -> RepoResult<Vec<TeamWithMembers>>;
    async fn get_team(&self, id: i64) -> RepoResult<Option<TeamWithMembers>>;
    async fn get_team_by_slug(&self, slug: &str) -> RepoResult<Option<TeamWithMembers>>;
    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>>;
    /// Inserts the team and its members in one transaction.
    async fn create_team(&self, req: CreateTeamRequest, slug: String)
    -> RepoResult<TeamWithMembers>;
    /// Partial update. `slug` accompanies a rename; `req.members` replaces the roster.
    async fn update_team(
        &self,
        id: i64,
        req: UpdateTeamRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<TeamWithMembers>>;
    /// Members go with the team.
    async fn delete_team(&self, id: i64) -> RepoResult<bool>;

    // --- Community Applications ---
    async fn create_application(
        &self,
        req: CreateApplicationRequest,
    ) -> RepoResult<CommunityApplication>;
    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> RepoResult<Vec<CommunityApplication>>;
    async fn get_application(&self, id: i64) -> RepoResult<Option<CommunityApplication>>;
    async fn set_application_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<CommunityApplication>>;
    async fn delete_application(&self, id: i64) -> RepoResult<bool>;

    // --- Event Suggestions ---
    async fn create_suggestion(&self, req: CreateSuggestionRequest)
    -> RepoResult<EventSuggestion>;
    async fn list_suggestions(&self, skip: i64, limit: i64) -> RepoResult<Vec<EventSuggestion>>;
    async fn get_suggestion(&self, id: i64) -> RepoResult<Option<EventSuggestion>>;
    async fn set_suggestion_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<EventSuggestion>>;
    async fn delete_suggestion(&self, id: i64) -> RepoResult<bool>;

    // --- Posters ---
    async fn list_posters(&self, filter: &PosterFilter) -> RepoResult<Vec<Poster>>;
    async fn get_poster(&self, id: i64) -> RepoResult<Option<Poster>>;
    /// Appends after the current last poster unless `order_index` is given.
    async fn create_poster(&self, req: CreatePosterRequest) -> RepoResult<Poster>;
    async fn update_poster(&self, id: i64, req: UpdatePosterRequest)
    -> RepoResult<Option<Poster>>;
    async fn delete_poster(&self, id: i64) -> RepoResult<bool>;
    /// Applies `(id, order_index)` pairs atomically and returns every poster
    /// in display order. Unknown ids are ignored.
    async fn reorder_posters(&self, positions: &[(i64, i32)]) -> RepoResult<Vec<Poster>>;

    // --- Admins ---
    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>>;
    /// Creates the admin or replaces the password of an existing one.
    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin>;
    /// `None` disables two-factor login.
    async fn set_admin_totp_secret(&self, id: i64, secret: Option<String>) -> RepoResult<bool>;
    async fn dashboard_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats>;
}

/// RepositoryState
///
/// The persistence layer as shared through the application state.
pub type RepositoryState = Arc<dyn Repository>;
