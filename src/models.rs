use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

// --- Shared Types ---

/// ReviewStatus
///
/// Moderation state shared by community applications and event suggestions.
/// Stored as the Postgres enum `review_status`; any other string is rejected
/// while the request body is deserialized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[ts(export)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

/// StatusUpdateRequest
///
/// Body of the admin `PATCH .../status` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct StatusUpdateRequest {
    pub status: ReviewStatus,
}

/// Pagination
///
/// `skip`/`limit` query parameters used by the plain list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: default_list_limit() }
    }
}

fn default_list_limit() -> i64 {
    100
}

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("this field cannot be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` as well as the `DD.MM.YYYY` form the admin panel sends.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn deserialize_flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible_date(&raw).ok_or_else(|| {
        de::Error::custom("invalid date format, expected YYYY-MM-DD or DD.MM.YYYY")
    })
}

fn deserialize_optional_flexible_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_flexible_date(&raw).map(Some).ok_or_else(|| {
            de::Error::custom("invalid date format, expected YYYY-MM-DD or DD.MM.YYYY")
        }),
    }
}

// --- Blog ---

/// Blog
///
/// A blog post from the `blogs` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub cover_image: Option<String>,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[validate(length(min = 1, max = 120))]
    pub author: String,
    #[validate(length(min = 1, max = 80))]
    pub category: String,
    #[validate(length(max = 400))]
    pub cover_image: Option<String>,
    #[serde(deserialize_with = "deserialize_flexible_date")]
    #[schema(value_type = String, example = "2025-05-13")]
    pub date: NaiveDate,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub category: Option<String>,
    #[validate(length(max = 400))]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_flexible_date")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub preview: Option<String>,
}

/// BlogFilter
///
/// Query parameters of `GET /blogs`. `q` searches title, preview and content
/// case-insensitively.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BlogFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: i64,
}

impl Default for BlogFilter {
    fn default() -> Self {
        Self { q: None, category: None, page: default_page(), page_size: default_page_size() }
    }
}

impl BlogFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    12
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogPage {
    pub items: Vec<Blog>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// --- Events ---

/// Event
///
/// A scheduled community event. `slug` is unique and used in public URLs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Event {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    #[ts(type = "string")]
    pub start_at: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub registered: i32,
    pub whatsapp_link: String,
    pub tags: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub cover_image_url: Option<String>,
    #[ts(type = "string")]
    pub start_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 0))]
    pub capacity: i32,
    pub whatsapp_link: Option<String>,
    #[validate(length(max = 200))]
    pub tags: Option<String>,
    /// Optional explicit slug. Derived from the title when absent.
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
}

fn default_capacity() -> i32 {
    60
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[ts(type = "string | null")]
    pub start_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub whatsapp_link: Option<String>,
    #[validate(length(max = 200))]
    pub tags: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct UpcomingParams {
    #[serde(default = "default_upcoming_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

fn default_upcoming_limit() -> i64 {
    3
}

// --- Gallery ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct GalleryEvent {
    pub id: i64,
    pub category: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub location: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateGalleryEventRequest {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1))]
    pub image_url: String,
    #[validate(length(min = 1, max = 150))]
    pub title: String,
    pub description: String,
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateGalleryEventRequest {
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
}

// --- Timeline ---

/// TimelineEvent
///
/// A milestone on the "our story" timeline. `date_label` is free text such as
/// "March 2024" or "2022 Q2-Q3".
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct TimelineEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date_label: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateTimelineEventRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub date_label: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateTimelineEventRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(length(min = 1))]
    pub date_label: Option<String>,
    pub image_url: Option<String>,
}

// --- Journey ---

/// JourneyPerson
///
/// Someone featured on the yearly "journey" page. Within a year, people are
/// listed in creation order.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct JourneyPerson {
    pub id: i64,
    pub year: i32,
    pub name: String,
    pub role: String,
    pub description: String,
    pub photo_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateJourneyPersonRequest {
    pub year: i32,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 100))]
    pub role: String,
    #[validate(length(min = 5, max = 255))]
    pub description: String,
    #[validate(length(max = 255))]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateJourneyPersonRequest {
    pub year: Option<i32>,
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub role: Option<String>,
    #[validate(length(min = 5, max = 255))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub photo_url: Option<String>,
}

// --- Crew ---

/// CrewMember
///
/// A member of the organizing crew. Members are grouped by `category` and
/// displayed by `(order_index, created_at, id)` inside their group.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub category: String,
    pub order_index: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateCrewMemberRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 100))]
    pub role: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(max = 255))]
    pub photo_url: Option<String>,
    #[validate(length(max = 255))]
    pub linkedin_url: Option<String>,
    #[validate(length(max = 255))]
    pub github_url: Option<String>,
    /// When absent the member is appended to the end of its category.
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateCrewMemberRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub role: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 255))]
    pub photo_url: Option<String>,
    #[validate(length(max = 255))]
    pub linkedin_url: Option<String>,
    #[validate(length(max = 255))]
    pub github_url: Option<String>,
    pub order_index: Option<i32>,
}

// --- Teams ---

/// Team
///
/// Raw row of the `teams` table. `name` and `slug` are both unique; the slug
/// is always derived from the name.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub project_name: String,
    pub category: String,
    pub description: String,
    pub is_featured: bool,
    pub photo_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct TeamMember {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub role: String,
    pub linkedin_url: Option<String>,
}

/// TeamWithMembers
///
/// Response shape of every team endpoint: the team row plus its roster.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TeamWithMembers {
    #[serde(flatten)]
    #[ts(flatten)]
    #[schema(inline)]
    pub team: Team,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct TeamMemberInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    #[validate(length(max = 255))]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateTeamRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 150))]
    pub project_name: String,
    #[validate(length(min = 2, max = 100))]
    pub category: String,
    #[validate(length(min = 10))]
    pub description: String,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    #[validate(nested)]
    pub members: Vec<TeamMemberInput>,
}

/// UpdateTeamRequest
///
/// Partial update. When `members` is present it replaces the whole roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 150))]
    pub project_name: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub is_featured: Option<bool>,
    pub members: Option<Vec<TeamMemberInput>>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct FeaturedParams {
    #[serde(default = "default_featured_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: i64,
}

fn default_featured_limit() -> i64 {
    4
}

// --- Community Applications ---

/// CommunityApplication
///
/// A request to join the community, reviewed by admins.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CommunityApplication {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interests: Vec<String>,
    pub heard_from: String,
    pub motivation: String,
    pub contribution: String,
    pub status: ReviewStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateApplicationRequest {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(email, length(max = 150))]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub interests: Vec<String>,
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub heard_from: String,
    #[validate(custom(function = "not_blank"))]
    pub motivation: String,
    #[validate(custom(function = "not_blank"))]
    pub contribution: String,
}

impl CreateApplicationRequest {
    /// Trims free-text fields and drops blank interests before storage.
    pub fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.heard_from = self.heard_from.trim().to_string();
        self.motivation = self.motivation.trim().to_string();
        self.contribution = self.contribution.trim().to_string();
        self.interests = self
            .interests
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        self
    }
}

/// ApplicationFilter
///
/// Admin listing filter: `q` matches first name, last name or email.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ApplicationFilter {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i64,
    pub status: Option<ReviewStatus>,
    pub q: Option<String>,
}

impl Default for ApplicationFilter {
    fn default() -> Self {
        Self { skip: 0, limit: default_list_limit(), status: None, q: None }
    }
}

// --- Event Suggestions ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct EventSuggestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub contact: String,
    pub status: ReviewStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateSuggestionRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub contact: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SuggestionParams {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_suggestion_limit")]
    #[validate(range(min = 1, max = 200))]
    pub limit: i64,
}

impl Default for SuggestionParams {
    fn default() -> Self {
        Self { skip: 0, limit: default_suggestion_limit() }
    }
}

fn default_suggestion_limit() -> i64 {
    50
}

// --- Posters ---

/// Poster
///
/// Homepage slider entry. Posters form one global ordered collection sorted
/// by `(order_index, id)`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Poster {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub order_index: i32,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreatePosterRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 250))]
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    /// When absent the poster is appended after the current last one.
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct UpdatePosterRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 250))]
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub order_index: Option<i32>,
}

/// Body of `POST /posters/reorder`: poster ids in the desired order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ReorderRequest(pub Vec<i64>);

impl Validate for ReorderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PosterFilter {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
    pub active: Option<bool>,
}

impl Default for PosterFilter {
    fn default() -> Self {
        Self { skip: 0, limit: default_list_limit(), active: None }
    }
}

// --- Admin & Auth ---

/// Admin
///
/// Row of the `admins` table. Never serialized: it carries the password hash
/// and the TOTP secret. Use [`AdminProfile`] for responses.
#[derive(Clone, FromRow, Default)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    /// Base32 TOTP secret. Present means two-factor login is enabled.
    pub totp_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn is_2fa_enabled(&self) -> bool {
        self.totp_secret.is_some()
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
            is_2fa_enabled: self.is_2fa_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
    pub is_2fa_enabled: bool,
}

/// LoginRequest
///
/// `code` is the six digit TOTP code; required only once 2FA is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub admin_info: AdminProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TwoFactorSetupResponse {
    /// Base32 secret; must be sent back with a valid code to `/admin/2fa/enable`.
    pub secret: String,
    pub otpauth_url: String,
    /// PNG QR code as a `data:` URL.
    pub qr_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct EnableTwoFactorRequest {
    #[validate(length(min = 16))]
    pub secret: String,
    #[validate(length(min = 6, max = 8))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct DisableTwoFactorRequest {
    #[validate(length(min = 6, max = 8))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// DashboardStats
///
/// Counters shown on the admin dashboard (GET /admin/dashboard).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct DashboardStats {
    pub total_events: i64,
    pub upcoming_events: i64,
    pub total_blogs: i64,
    pub pending_applications: i64,
    pub pending_suggestions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UploadResponse {
    /// Public path of the stored file, e.g. `/public/uploads/<uuid>.png`.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flexible_date_accepts_both_formats() {
        let iso = parse_flexible_date("2025-05-13").unwrap();
        let dotted = parse_flexible_date(" 13.05.2025 ").unwrap();
        assert_eq!(iso, dotted);
        assert!(parse_flexible_date("05/13/2025").is_none());
    }

    #[test]
    fn blog_request_rejects_bad_date() {
        let body = r#"{"title":"t","content":"c","author":"a","category":"Web","date":"yesterday"}"#;
        assert!(serde_json::from_str::<CreateBlogRequest>(body).is_err());

        let body = r#"{"title":"t","content":"c","author":"a","category":"Web","date":"01.02.2024"}"#;
        let req: CreateBlogRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn review_status_rejects_unknown_values() {
        let ok: StatusUpdateRequest = serde_json::from_str(r#"{"status":"accepted"}"#).unwrap();
        assert_eq!(ok.status, ReviewStatus::Accepted);
        assert!(serde_json::from_str::<StatusUpdateRequest>(r#"{"status":"archived"}"#).is_err());
    }

    #[test]
    fn application_validation_requires_an_interest() {
        let req = CreateApplicationRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            interests: vec![],
            heard_from: "Instagram".into(),
            motivation: "Learning".into(),
            contribution: "Workshops".into(),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = CreateApplicationRequest { interests: vec!["AI".into()], ..req };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_names_fail_validation() {
        let req = CreateApplicationRequest {
            first_name: "   ".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            interests: vec!["AI".into()],
            heard_from: "Instagram".into(),
            motivation: "Learning".into(),
            contribution: "Workshops".into(),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn team_member_validation_is_nested() {
        let req = CreateTeamRequest {
            name: "Vision Lab".into(),
            project_name: "Drone Tracking".into(),
            category: "Computer Vision".into(),
            description: "Tracks drones from ground cameras.".into(),
            members: vec![TeamMemberInput { name: "".into(), role: "Lead".into(), linkedin_url: None }],
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
