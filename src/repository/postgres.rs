use super::{RepoResult, Repository};
use crate::{
    models::{
        Admin, ApplicationFilter, Blog, BlogFilter, CommunityApplication,
        CreateApplicationRequest, CreateBlogRequest, CreateCrewMemberRequest, CreateEventRequest,
        CreateGalleryEventRequest, CreateJourneyPersonRequest, CreatePosterRequest,
        CreateSuggestionRequest, CreateTeamRequest, CreateTimelineEventRequest, CrewMember,
        DashboardStats, Event, EventSuggestion, GalleryEvent, JourneyPerson, Poster, PosterFilter,
        ReviewStatus, Team, TeamMember, TeamMemberInput, TeamWithMembers, TimelineEvent,
        UpdateBlogRequest, UpdateCrewMemberRequest, UpdateEventRequest, UpdateGalleryEventRequest,
        UpdateJourneyPersonRequest, UpdatePosterRequest, UpdateTeamRequest,
        UpdateTimelineEventRequest,
    },
    ordering::{OrderIndexChange, crew_order_change, next_order_index},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;

const BLOG_COLUMNS: &str = "id, title, content, author, category, cover_image, date, preview";
const EVENT_COLUMNS: &str = "id, slug, title, description, cover_image_url, start_at, location, \
     category, capacity, registered, whatsapp_link, tags, created_at, updated_at";
const GALLERY_COLUMNS: &str =
    "id, category, image_url, title, description, date, location, created_at";
const TIMELINE_COLUMNS: &str = "id, title, description, category, date_label, image_url";
const JOURNEY_COLUMNS: &str = "id, year, name, role, description, photo_url, created_at";
const CREW_COLUMNS: &str = "id, name, role, description, photo_url, linkedin_url, github_url, \
     category, order_index, created_at";
const TEAM_COLUMNS: &str = "id, name, slug, project_name, category, description, is_featured, \
     photo_url, created_at, updated_at";
const APPLICATION_COLUMNS: &str = "id, first_name, last_name, email, phone, interests, \
     heard_from, motivation, contribution, status, created_at, updated_at";
const SUGGESTION_COLUMNS: &str =
    "id, title, description, contact, status, created_at, updated_at";
const POSTER_COLUMNS: &str = "id, title, subtitle, content, image_url, order_index, is_active, \
     created_at, updated_at";
const ADMIN_COLUMNS: &str = "id, email, password_hash, totp_secret, created_at";

// Advisory lock scope for the global poster ordering.
const POSTER_ORDER_SCOPE: &str = "posters.order_index";

/// PostgresRepository
///
/// The production implementation of [`Repository`], backed by a sqlx pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the rosters of `teams` with a single query, preserving team order.
    async fn with_members(&self, teams: Vec<Team>) -> RepoResult<Vec<TeamWithMembers>> {
        if teams.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = teams.iter().map(|t| t.id).collect();
        let members = sqlx::query_as::<_, TeamMember>(
            "SELECT id, team_id, name, role, linkedin_url FROM team_members \
             WHERE team_id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_team: HashMap<i64, Vec<TeamMember>> = HashMap::new();
        for member in members {
            by_team.entry(member.team_id).or_default().push(member);
        }

        Ok(teams
            .into_iter()
            .map(|team| {
                let members = by_team.remove(&team.id).unwrap_or_default();
                TeamWithMembers { team, members }
            })
            .collect())
    }
}

/// Serialises `max(order_index) + 1` assignments within one scope until the
/// surrounding transaction ends.
async fn lock_order_scope(tx: &mut Transaction<'_, Postgres>, scope: &str) -> RepoResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(scope)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_team_members(
    tx: &mut Transaction<'_, Postgres>,
    team_id: i64,
    members: Vec<TeamMemberInput>,
) -> RepoResult<()> {
    if members.is_empty() {
        return Ok(());
    }
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO team_members (team_id, name, role, linkedin_url) ");
    builder.push_values(members, |mut row, member| {
        row.push_bind(team_id)
            .push_bind(member.name)
            .push_bind(member.role)
            .push_bind(member.linkedin_url);
    });
    builder.build().execute(&mut **tx).await?;
    Ok(())
}

fn push_blog_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogFilter) {
    builder.push(" WHERE TRUE");
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR preview ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        builder.push(" AND category = ").push_bind(category.to_string());
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Blogs ---

    async fn list_blogs(&self, filter: &BlogFilter) -> RepoResult<(Vec<Blog>, i64)> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM blogs");
        push_blog_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {BLOG_COLUMNS} FROM blogs"));
        push_blog_filters(&mut builder, filter);
        builder
            .push(" ORDER BY date DESC, id DESC LIMIT ")
            .push_bind(filter.page_size)
            .push(" OFFSET ")
            .push_bind(filter.offset());
        let items = builder.build_query_as::<Blog>().fetch_all(&self.pool).await?;

        Ok((items, total))
    }

    async fn get_blog(&self, id: i64) -> RepoResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_blog(&self, req: CreateBlogRequest) -> RepoResult<Blog> {
        sqlx::query_as::<_, Blog>(&format!(
            "INSERT INTO blogs (title, content, author, category, cover_image, date, preview) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BLOG_COLUMNS}"
        ))
        .bind(req.title)
        .bind(req.content)
        .bind(req.author)
        .bind(req.category)
        .bind(req.cover_image)
        .bind(req.date)
        .bind(req.preview)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_blog(&self, id: i64, req: UpdateBlogRequest) -> RepoResult<Option<Blog>> {
        sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                author = COALESCE($4, author), \
                category = COALESCE($5, category), \
                cover_image = COALESCE($6, cover_image), \
                date = COALESCE($7, date), \
                preview = COALESCE($8, preview) \
             WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.author)
        .bind(req.category)
        .bind(req.cover_image)
        .bind(req.date)
        .bind(req.preview)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_blog(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Events ---

    async fn list_events(&self, skip: i64, limit: i64) -> RepoResult<Vec<Event>> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_at DESC, id DESC \
             OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn upcoming_events(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Event>> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE start_at >= $1 \
             ORDER BY start_at ASC, id ASC LIMIT $2"
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_event(&self, id: i64) -> RepoResult<Option<Event>> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_event_by_slug(&self, slug: &str) -> RepoResult<Option<Event>> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_event(&self, req: CreateEventRequest, slug: String) -> RepoResult<Event> {
        sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (slug, title, description, cover_image_url, start_at, location, \
                category, capacity, registered, whatsapp_link, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9, $10) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(slug)
        .bind(req.title)
        .bind(req.description)
        .bind(req.cover_image_url)
        .bind(req.start_at)
        .bind(req.location)
        .bind(req.category)
        .bind(req.capacity)
        .bind(req.whatsapp_link.unwrap_or_default())
        .bind(req.tags.map(|t| t.trim().to_string()))
        .fetch_one(&self.pool)
        .await
    }

    async fn update_event(
        &self,
        id: i64,
        req: UpdateEventRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<Event>> {
        sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET \
                slug = COALESCE($2, slug), \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                cover_image_url = COALESCE($5, cover_image_url), \
                start_at = COALESCE($6, start_at), \
                location = COALESCE($7, location), \
                category = COALESCE($8, category), \
                capacity = COALESCE($9, capacity), \
                whatsapp_link = COALESCE($10, whatsapp_link), \
                tags = COALESCE($11, tags), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(slug)
        .bind(req.title)
        .bind(req.description)
        .bind(req.cover_image_url)
        .bind(req.start_at)
        .bind(req.location)
        .bind(req.category)
        .bind(req.capacity)
        .bind(req.whatsapp_link)
        .bind(req.tags.map(|t| t.trim().to_string()))
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_event(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Gallery ---

    async fn list_gallery_events(&self) -> RepoResult<Vec<GalleryEvent>> {
        sqlx::query_as::<_, GalleryEvent>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM gallery_events ORDER BY date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_gallery_event(&self, id: i64) -> RepoResult<Option<GalleryEvent>> {
        sqlx::query_as::<_, GalleryEvent>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM gallery_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_gallery_event(
        &self,
        req: CreateGalleryEventRequest,
    ) -> RepoResult<GalleryEvent> {
        sqlx::query_as::<_, GalleryEvent>(&format!(
            "INSERT INTO gallery_events (category, image_url, title, description, date, location) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {GALLERY_COLUMNS}"
        ))
        .bind(req.category)
        .bind(req.image_url)
        .bind(req.title)
        .bind(req.description)
        .bind(req.date)
        .bind(req.location)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_gallery_event(
        &self,
        id: i64,
        req: UpdateGalleryEventRequest,
    ) -> RepoResult<Option<GalleryEvent>> {
        sqlx::query_as::<_, GalleryEvent>(&format!(
            "UPDATE gallery_events SET \
                category = COALESCE($2, category), \
                image_url = COALESCE($3, image_url), \
                title = COALESCE($4, title), \
                description = COALESCE($5, description), \
                date = COALESCE($6, date), \
                location = COALESCE($7, location) \
             WHERE id = $1 RETURNING {GALLERY_COLUMNS}"
        ))
        .bind(id)
        .bind(req.category)
        .bind(req.image_url)
        .bind(req.title)
        .bind(req.description)
        .bind(req.date)
        .bind(req.location)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_gallery_event(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM gallery_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Timeline ---

    async fn list_timeline_events(&self) -> RepoResult<Vec<TimelineEvent>> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            "SELECT {TIMELINE_COLUMNS} FROM timeline_events ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_timeline_event(&self, id: i64) -> RepoResult<Option<TimelineEvent>> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            "SELECT {TIMELINE_COLUMNS} FROM timeline_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_timeline_event(
        &self,
        req: CreateTimelineEventRequest,
    ) -> RepoResult<TimelineEvent> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            "INSERT INTO timeline_events (title, description, category, date_label, image_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TIMELINE_COLUMNS}"
        ))
        .bind(req.title)
        .bind(req.description)
        .bind(req.category)
        .bind(req.date_label)
        .bind(req.image_url.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_timeline_event(
        &self,
        id: i64,
        req: UpdateTimelineEventRequest,
    ) -> RepoResult<Option<TimelineEvent>> {
        sqlx::query_as::<_, TimelineEvent>(&format!(
            "UPDATE timeline_events SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                date_label = COALESCE($5, date_label), \
                image_url = COALESCE($6, image_url) \
             WHERE id = $1 RETURNING {TIMELINE_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.category)
        .bind(req.date_label)
        .bind(req.image_url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_timeline_event(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM timeline_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Journey ---

    async fn list_journey_people(&self) -> RepoResult<Vec<JourneyPerson>> {
        sqlx::query_as::<_, JourneyPerson>(&format!(
            "SELECT {JOURNEY_COLUMNS} FROM journey_people \
             ORDER BY year DESC, created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn create_journey_person(
        &self,
        req: CreateJourneyPersonRequest,
    ) -> RepoResult<JourneyPerson> {
        sqlx::query_as::<_, JourneyPerson>(&format!(
            "INSERT INTO journey_people (year, name, role, description, photo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {JOURNEY_COLUMNS}"
        ))
        .bind(req.year)
        .bind(req.name)
        .bind(req.role)
        .bind(req.description)
        .bind(req.photo_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_journey_person(
        &self,
        id: i64,
        req: UpdateJourneyPersonRequest,
    ) -> RepoResult<Option<JourneyPerson>> {
        sqlx::query_as::<_, JourneyPerson>(&format!(
            "UPDATE journey_people SET \
                year = COALESCE($2, year), \
                name = COALESCE($3, name), \
                role = COALESCE($4, role), \
                description = COALESCE($5, description), \
                photo_url = COALESCE($6, photo_url) \
             WHERE id = $1 RETURNING {JOURNEY_COLUMNS}"
        ))
        .bind(id)
        .bind(req.year)
        .bind(req.name)
        .bind(req.role)
        .bind(req.description)
        .bind(req.photo_url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_journey_person(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM journey_people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Crew ---

    async fn list_crew_members(&self) -> RepoResult<Vec<CrewMember>> {
        sqlx::query_as::<_, CrewMember>(&format!(
            "SELECT {CREW_COLUMNS} FROM crew_members \
             ORDER BY category ASC, order_index ASC, created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// create_crew_member
    ///
    /// The max lookup and the insert share a transaction holding the
    /// category's advisory lock, so concurrent appends get distinct indices.
    async fn create_crew_member(&self, req: CreateCrewMemberRequest) -> RepoResult<CrewMember> {
        let mut tx = self.pool.begin().await?;

        let order_index = match req.order_index {
            Some(index) => index,
            None => {
                lock_order_scope(&mut tx, &format!("crew.{}", req.category)).await?;
                let max: Option<i32> = sqlx::query_scalar(
                    "SELECT MAX(order_index) FROM crew_members WHERE category = $1",
                )
                .bind(&req.category)
                .fetch_one(&mut *tx)
                .await?;
                next_order_index(max)
            }
        };

        let member = sqlx::query_as::<_, CrewMember>(&format!(
            "INSERT INTO crew_members \
                (name, role, description, photo_url, linkedin_url, github_url, category, order_index) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CREW_COLUMNS}"
        ))
        .bind(req.name)
        .bind(req.role)
        .bind(req.description)
        .bind(req.photo_url)
        .bind(req.linkedin_url)
        .bind(req.github_url)
        .bind(req.category)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(member)
    }

    async fn update_crew_member(
        &self,
        id: i64,
        req: UpdateCrewMemberRequest,
    ) -> RepoResult<Option<CrewMember>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, CrewMember>(&format!(
            "SELECT {CREW_COLUMNS} FROM crew_members WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let order_index =
            match crew_order_change(&current.category, req.category.as_deref(), req.order_index) {
                OrderIndexChange::Keep => current.order_index,
                OrderIndexChange::Explicit(index) => index,
                OrderIndexChange::AppendTo(category) => {
                    lock_order_scope(&mut tx, &format!("crew.{category}")).await?;
                    // The moving row counts as already in the new category.
                    let max: Option<i32> = sqlx::query_scalar(
                        "SELECT MAX(order_index) FROM crew_members \
                         WHERE category = $1 OR id = $2",
                    )
                    .bind(&category)
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
                    next_order_index(max)
                }
            };

        let member = sqlx::query_as::<_, CrewMember>(&format!(
            "UPDATE crew_members SET \
                name = COALESCE($2, name), \
                role = COALESCE($3, role), \
                description = COALESCE($4, description), \
                photo_url = COALESCE($5, photo_url), \
                linkedin_url = COALESCE($6, linkedin_url), \
                github_url = COALESCE($7, github_url), \
                category = COALESCE($8, category), \
                order_index = $9 \
             WHERE id = $1 RETURNING {CREW_COLUMNS}"
        ))
        .bind(id)
        .bind(req.name)
        .bind(req.role)
        .bind(req.description)
        .bind(req.photo_url)
        .bind(req.linkedin_url)
        .bind(req.github_url)
        .bind(req.category)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(member))
    }

    async fn delete_crew_member(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM crew_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Teams ---

    async fn list_teams(&self) -> RepoResult<Vec<TeamWithMembers>> {
        let teams = sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        self.with_members(teams).await
    }

    async fn featured_teams(&self, limit: i64) -> RepoResult<Vec<TeamWithMembers>> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE is_featured ORDER BY id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        self.with_members(teams).await
    }

    async fn get_team(&self, id: i64) -> RepoResult<Option<TeamWithMembers>> {
        let team = sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(self.with_members(team.into_iter().collect()).await?.pop())
    }

    async fn get_team_by_slug(&self, slug: &str) -> RepoResult<Option<TeamWithMembers>> {
        let team =
            sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(self.with_members(team.into_iter().collect()).await?.pop())
    }

    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_team(
        &self,
        req: CreateTeamRequest,
        slug: String,
    ) -> RepoResult<TeamWithMembers> {
        let mut tx = self.pool.begin().await?;

        let team_id: i64 = sqlx::query_scalar(
            "INSERT INTO teams (name, slug, project_name, category, description, is_featured, photo_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(req.name)
        .bind(slug)
        .bind(req.project_name)
        .bind(req.category)
        .bind(req.description)
        .bind(req.is_featured)
        .bind(req.photo_url)
        .fetch_one(&mut *tx)
        .await?;

        insert_team_members(&mut tx, team_id, req.members).await?;
        tx.commit().await?;

        self.get_team(team_id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_team(
        &self,
        id: i64,
        req: UpdateTeamRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<TeamWithMembers>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE teams SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                project_name = COALESCE($4, project_name), \
                category = COALESCE($5, category), \
                description = COALESCE($6, description), \
                is_featured = COALESCE($7, is_featured), \
                photo_url = COALESCE($8, photo_url), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(req.name)
        .bind(slug)
        .bind(req.project_name)
        .bind(req.category)
        .bind(req.description)
        .bind(req.is_featured)
        .bind(req.photo_url)
        .fetch_optional(&mut *tx)
        .await?;
        if updated.is_none() {
            return Ok(None);
        }

        if let Some(members) = req.members {
            sqlx::query("DELETE FROM team_members WHERE team_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_team_members(&mut tx, id, members).await?;
        }

        tx.commit().await?;
        self.get_team(id).await
    }

    async fn delete_team(&self, id: i64) -> RepoResult<bool> {
        // team_members rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Community Applications ---

    async fn create_application(
        &self,
        req: CreateApplicationRequest,
    ) -> RepoResult<CommunityApplication> {
        sqlx::query_as::<_, CommunityApplication>(&format!(
            "INSERT INTO community_applications \
                (first_name, last_name, email, phone, interests, heard_from, motivation, contribution) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(req.first_name)
        .bind(req.last_name)
        .bind(req.email)
        .bind(req.phone)
        .bind(req.interests)
        .bind(req.heard_from)
        .bind(req.motivation)
        .bind(req.contribution)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> RepoResult<Vec<CommunityApplication>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {APPLICATION_COLUMNS} FROM community_applications WHERE TRUE"
        ));
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{q}%");
            builder
                .push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC OFFSET ")
            .push_bind(filter.skip)
            .push(" LIMIT ")
            .push_bind(filter.limit);

        builder
            .build_query_as::<CommunityApplication>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_application(&self, id: i64) -> RepoResult<Option<CommunityApplication>> {
        sqlx::query_as::<_, CommunityApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM community_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_application_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<CommunityApplication>> {
        sqlx::query_as::<_, CommunityApplication>(&format!(
            "UPDATE community_applications SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_application(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM community_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Event Suggestions ---

    async fn create_suggestion(
        &self,
        req: CreateSuggestionRequest,
    ) -> RepoResult<EventSuggestion> {
        sqlx::query_as::<_, EventSuggestion>(&format!(
            "INSERT INTO event_suggestions (title, description, contact) \
             VALUES ($1, $2, $3) RETURNING {SUGGESTION_COLUMNS}"
        ))
        .bind(req.title)
        .bind(req.description)
        .bind(req.contact)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_suggestions(&self, skip: i64, limit: i64) -> RepoResult<Vec<EventSuggestion>> {
        sqlx::query_as::<_, EventSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM event_suggestions \
             ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_suggestion(&self, id: i64) -> RepoResult<Option<EventSuggestion>> {
        sqlx::query_as::<_, EventSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM event_suggestions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_suggestion_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<EventSuggestion>> {
        sqlx::query_as::<_, EventSuggestion>(&format!(
            "UPDATE event_suggestions SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {SUGGESTION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_suggestion(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM event_suggestions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Posters ---

    async fn list_posters(&self, filter: &PosterFilter) -> RepoResult<Vec<Poster>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POSTER_COLUMNS} FROM posters"));
        if let Some(active) = filter.active {
            builder.push(" WHERE is_active = ").push_bind(active);
        }
        builder
            .push(" ORDER BY order_index ASC, id ASC OFFSET ")
            .push_bind(filter.skip)
            .push(" LIMIT ")
            .push_bind(filter.limit);
        builder.build_query_as::<Poster>().fetch_all(&self.pool).await
    }

    async fn get_poster(&self, id: i64) -> RepoResult<Option<Poster>> {
        sqlx::query_as::<_, Poster>(&format!("SELECT {POSTER_COLUMNS} FROM posters WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_poster(&self, req: CreatePosterRequest) -> RepoResult<Poster> {
        let mut tx = self.pool.begin().await?;

        let order_index = match req.order_index {
            Some(index) => index,
            None => {
                lock_order_scope(&mut tx, POSTER_ORDER_SCOPE).await?;
                let max: Option<i32> = sqlx::query_scalar("SELECT MAX(order_index) FROM posters")
                    .fetch_one(&mut *tx)
                    .await?;
                next_order_index(max)
            }
        };

        let poster = sqlx::query_as::<_, Poster>(&format!(
            "INSERT INTO posters (title, subtitle, content, image_url, order_index, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {POSTER_COLUMNS}"
        ))
        .bind(req.title)
        .bind(req.subtitle)
        .bind(req.content)
        .bind(req.image_url)
        .bind(order_index)
        .bind(req.is_active.unwrap_or(true))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(poster)
    }

    async fn update_poster(
        &self,
        id: i64,
        req: UpdatePosterRequest,
    ) -> RepoResult<Option<Poster>> {
        sqlx::query_as::<_, Poster>(&format!(
            "UPDATE posters SET \
                title = COALESCE($2, title), \
                subtitle = COALESCE($3, subtitle), \
                content = COALESCE($4, content), \
                image_url = COALESCE($5, image_url), \
                is_active = COALESCE($6, is_active), \
                order_index = COALESCE($7, order_index), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {POSTER_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title)
        .bind(req.subtitle)
        .bind(req.content)
        .bind(req.image_url)
        .bind(req.is_active)
        .bind(req.order_index)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_poster(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reorder_posters(&self, positions: &[(i64, i32)]) -> RepoResult<Vec<Poster>> {
        let mut tx = self.pool.begin().await?;
        lock_order_scope(&mut tx, POSTER_ORDER_SCOPE).await?;

        for (id, order_index) in positions {
            sqlx::query("UPDATE posters SET order_index = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(order_index)
                .execute(&mut *tx)
                .await?;
        }

        let posters = sqlx::query_as::<_, Poster>(&format!(
            "SELECT {POSTER_COLUMNS} FROM posters ORDER BY order_index ASC, id ASC"
        ))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(posters)
    }

    // --- Admins ---

    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>(&format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin> {
        sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (email, password_hash) VALUES ($1, $2) \
             ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_admin_totp_secret(&self, id: i64, secret: Option<String>) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE admins SET totp_secret = $2 WHERE id = $1")
            .bind(id)
            .bind(secret)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT \
                (SELECT COUNT(*) FROM events) AS total_events, \
                (SELECT COUNT(*) FROM events WHERE start_at >= $1) AS upcoming_events, \
                (SELECT COUNT(*) FROM blogs) AS total_blogs, \
                (SELECT COUNT(*) FROM community_applications WHERE status = 'pending') \
                    AS pending_applications, \
                (SELECT COUNT(*) FROM event_suggestions WHERE status = 'pending') \
                    AS pending_suggestions",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }
}
