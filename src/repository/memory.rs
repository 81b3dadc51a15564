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
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    last_id: i64,
    blogs: Vec<Blog>,
    events: Vec<Event>,
    gallery: Vec<GalleryEvent>,
    timeline: Vec<TimelineEvent>,
    journey: Vec<JourneyPerson>,
    crew: Vec<CrewMember>,
    teams: Vec<Team>,
    team_members: Vec<TeamMember>,
    applications: Vec<CommunityApplication>,
    suggestions: Vec<EventSuggestion>,
    posters: Vec<Poster>,
    admins: Vec<Admin>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn team_with_members(&self, team: &Team) -> TeamWithMembers {
        TeamWithMembers {
            team: team.clone(),
            members: self
                .team_members
                .iter()
                .filter(|m| m.team_id == team.id)
                .cloned()
                .collect(),
        }
    }

    fn insert_team_members(&mut self, team_id: i64, members: Vec<TeamMemberInput>) {
        for member in members {
            let id = self.next_id();
            self.team_members.push(TeamMember {
                id,
                team_id,
                name: member.name,
                role: member.role,
                linkedin_url: member.linkedin_url,
            });
        }
    }
}

/// InMemoryRepository
///
/// A [`Repository`] held entirely in process memory. Behaves like the
/// Postgres implementation (ordering, order-index assignment, cascades) and
/// backs the integration tests. Every write takes the single write lock, so
/// multi-row operations are atomic.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(usize::try_from(skip).unwrap_or(0))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

fn blog_matches(blog: &Blog, filter: &BlogFilter) -> bool {
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        if blog.category != category {
            return false;
        }
    }
    match filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let q = q.to_lowercase();
            contains_ci(&blog.title, &q)
                || blog.preview.as_deref().is_some_and(|p| contains_ci(p, &q))
                || contains_ci(&blog.content, &q)
        }
        None => true,
    }
}

fn max_crew_index(crew: &[CrewMember], category: &str) -> Option<i32> {
    crew.iter().filter(|m| m.category == category).map(|m| m.order_index).max()
}

fn sorted_posters(posters: &[Poster]) -> Vec<Poster> {
    let mut sorted = posters.to_vec();
    sorted.sort_by_key(|p| (p.order_index, p.id));
    sorted
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- Blogs ---

    async fn list_blogs(&self, filter: &BlogFilter) -> RepoResult<(Vec<Blog>, i64)> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Blog> =
            tables.blogs.iter().filter(|b| blog_matches(b, filter)).cloned().collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        let total = matches.len() as i64;
        Ok((window(matches.into_iter(), filter.offset(), filter.page_size), total))
    }

    async fn get_blog(&self, id: i64) -> RepoResult<Option<Blog>> {
        Ok(self.tables.read().await.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create_blog(&self, req: CreateBlogRequest) -> RepoResult<Blog> {
        let mut tables = self.tables.write().await;
        let blog = Blog {
            id: tables.next_id(),
            title: req.title,
            content: req.content,
            author: req.author,
            category: req.category,
            cover_image: req.cover_image,
            date: req.date,
            preview: req.preview,
        };
        tables.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, id: i64, req: UpdateBlogRequest) -> RepoResult<Option<Blog>> {
        let mut tables = self.tables.write().await;
        let Some(blog) = tables.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.title {
            blog.title = v;
        }
        if let Some(v) = req.content {
            blog.content = v;
        }
        if let Some(v) = req.author {
            blog.author = v;
        }
        if let Some(v) = req.category {
            blog.category = v;
        }
        if let Some(v) = req.cover_image {
            blog.cover_image = Some(v);
        }
        if let Some(v) = req.date {
            blog.date = v;
        }
        if let Some(v) = req.preview {
            blog.preview = Some(v);
        }
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.blogs, |b| b.id == id))
    }

    // --- Events ---

    async fn list_events(&self, skip: i64, limit: i64) -> RepoResult<Vec<Event>> {
        let mut events = self.tables.read().await.events.clone();
        events.sort_by(|a, b| b.start_at.cmp(&a.start_at).then(b.id.cmp(&a.id)));
        Ok(window(events.into_iter(), skip, limit))
    }

    async fn upcoming_events(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .await
            .events
            .iter()
            .filter(|e| e.start_at >= now)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.start_at, e.id));
        Ok(window(events.into_iter(), 0, limit))
    }

    async fn get_event(&self, id: i64) -> RepoResult<Option<Event>> {
        Ok(self.tables.read().await.events.iter().find(|e| e.id == id).cloned())
    }

    async fn get_event_by_slug(&self, slug: &str) -> RepoResult<Option<Event>> {
        Ok(self.tables.read().await.events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn create_event(&self, req: CreateEventRequest, slug: String) -> RepoResult<Event> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let event = Event {
            id: tables.next_id(),
            slug,
            title: req.title,
            description: req.description,
            cover_image_url: req.cover_image_url,
            start_at: req.start_at,
            location: req.location,
            category: req.category,
            capacity: req.capacity,
            registered: 0,
            whatsapp_link: req.whatsapp_link.unwrap_or_default(),
            tags: req.tags.map(|t| t.trim().to_string()),
            created_at: now,
            updated_at: now,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        id: i64,
        req: UpdateEventRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<Event>> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(v) = slug {
            event.slug = v;
        }
        if let Some(v) = req.title {
            event.title = v;
        }
        if let Some(v) = req.description {
            event.description = v;
        }
        if let Some(v) = req.cover_image_url {
            event.cover_image_url = Some(v);
        }
        if let Some(v) = req.start_at {
            event.start_at = v;
        }
        if let Some(v) = req.location {
            event.location = v;
        }
        if let Some(v) = req.category {
            event.category = v;
        }
        if let Some(v) = req.capacity {
            event.capacity = v;
        }
        if let Some(v) = req.whatsapp_link {
            event.whatsapp_link = v;
        }
        if let Some(v) = req.tags {
            event.tags = Some(v.trim().to_string());
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.events, |e| e.id == id))
    }

    // --- Gallery ---

    async fn list_gallery_events(&self) -> RepoResult<Vec<GalleryEvent>> {
        let mut items = self.tables.read().await.gallery.clone();
        items.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn get_gallery_event(&self, id: i64) -> RepoResult<Option<GalleryEvent>> {
        Ok(self.tables.read().await.gallery.iter().find(|g| g.id == id).cloned())
    }

    async fn create_gallery_event(
        &self,
        req: CreateGalleryEventRequest,
    ) -> RepoResult<GalleryEvent> {
        let mut tables = self.tables.write().await;
        let item = GalleryEvent {
            id: tables.next_id(),
            category: req.category,
            image_url: req.image_url,
            title: req.title,
            description: req.description,
            date: req.date,
            location: req.location,
            created_at: Utc::now(),
        };
        tables.gallery.push(item.clone());
        Ok(item)
    }

    async fn update_gallery_event(
        &self,
        id: i64,
        req: UpdateGalleryEventRequest,
    ) -> RepoResult<Option<GalleryEvent>> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.gallery.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.category {
            item.category = v;
        }
        if let Some(v) = req.image_url {
            item.image_url = v;
        }
        if let Some(v) = req.title {
            item.title = v;
        }
        if let Some(v) = req.description {
            item.description = v;
        }
        if let Some(v) = req.date {
            item.date = v;
        }
        if let Some(v) = req.location {
            item.location = v;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_gallery_event(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.gallery, |g| g.id == id))
    }

    // --- Timeline ---

    async fn list_timeline_events(&self) -> RepoResult<Vec<TimelineEvent>> {
        let mut items = self.tables.read().await.timeline.clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(items)
    }

    async fn get_timeline_event(&self, id: i64) -> RepoResult<Option<TimelineEvent>> {
        Ok(self.tables.read().await.timeline.iter().find(|t| t.id == id).cloned())
    }

    async fn create_timeline_event(
        &self,
        req: CreateTimelineEventRequest,
    ) -> RepoResult<TimelineEvent> {
        let mut tables = self.tables.write().await;
        let item = TimelineEvent {
            id: tables.next_id(),
            title: req.title,
            description: req.description,
            category: req.category,
            date_label: req.date_label,
            image_url: req.image_url.unwrap_or_default(),
        };
        tables.timeline.push(item.clone());
        Ok(item)
    }

    async fn update_timeline_event(
        &self,
        id: i64,
        req: UpdateTimelineEventRequest,
    ) -> RepoResult<Option<TimelineEvent>> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.timeline.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.title {
            item.title = v;
        }
        if let Some(v) = req.description {
            item.description = v;
        }
        if let Some(v) = req.category {
            item.category = v;
        }
        if let Some(v) = req.date_label {
            item.date_label = v;
        }
        if let Some(v) = req.image_url {
            item.image_url = v;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_timeline_event(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.timeline, |t| t.id == id))
    }

    // --- Journey ---

    async fn list_journey_people(&self) -> RepoResult<Vec<JourneyPerson>> {
        let mut people = self.tables.read().await.journey.clone();
        people.sort_by(|a, b| {
            b.year.cmp(&a.year).then(a.created_at.cmp(&b.created_at)).then(a.id.cmp(&b.id))
        });
        Ok(people)
    }

    async fn create_journey_person(
        &self,
        req: CreateJourneyPersonRequest,
    ) -> RepoResult<JourneyPerson> {
        let mut tables = self.tables.write().await;
        let person = JourneyPerson {
            id: tables.next_id(),
            year: req.year,
            name: req.name,
            role: req.role,
            description: req.description,
            photo_url: req.photo_url,
            created_at: Utc::now(),
        };
        tables.journey.push(person.clone());
        Ok(person)
    }

    async fn update_journey_person(
        &self,
        id: i64,
        req: UpdateJourneyPersonRequest,
    ) -> RepoResult<Option<JourneyPerson>> {
        let mut tables = self.tables.write().await;
        let Some(person) = tables.journey.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.year {
            person.year = v;
        }
        if let Some(v) = req.name {
            person.name = v;
        }
        if let Some(v) = req.role {
            person.role = v;
        }
        if let Some(v) = req.description {
            person.description = v;
        }
        if let Some(v) = req.photo_url {
            person.photo_url = Some(v);
        }
        Ok(Some(person.clone()))
    }

    async fn delete_journey_person(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.journey, |p| p.id == id))
    }

    // --- Crew ---

    async fn list_crew_members(&self) -> RepoResult<Vec<CrewMember>> {
        let mut crew = self.tables.read().await.crew.clone();
        crew.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.order_index.cmp(&b.order_index))
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(crew)
    }

    async fn create_crew_member(&self, req: CreateCrewMemberRequest) -> RepoResult<CrewMember> {
        let mut tables = self.tables.write().await;
        let order_index = req
            .order_index
            .unwrap_or_else(|| next_order_index(max_crew_index(&tables.crew, &req.category)));
        let member = CrewMember {
            id: tables.next_id(),
            name: req.name,
            role: req.role,
            description: req.description,
            photo_url: req.photo_url,
            linkedin_url: req.linkedin_url,
            github_url: req.github_url,
            category: req.category,
            order_index,
            created_at: Utc::now(),
        };
        tables.crew.push(member.clone());
        Ok(member)
    }

    async fn update_crew_member(
        &self,
        id: i64,
        req: UpdateCrewMemberRequest,
    ) -> RepoResult<Option<CrewMember>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.crew.iter().find(|m| m.id == id) else {
            return Ok(None);
        };

        let order_index =
            match crew_order_change(&current.category, req.category.as_deref(), req.order_index) {
                OrderIndexChange::Keep => current.order_index,
                OrderIndexChange::Explicit(index) => index,
                OrderIndexChange::AppendTo(category) => {
                    next_order_index(max_crew_index(&tables.crew, &category))
                }
            };

        let Some(member) = tables.crew.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.name {
            member.name = v;
        }
        if let Some(v) = req.role {
            member.role = v;
        }
        if let Some(v) = req.description {
            member.description = Some(v);
        }
        if let Some(v) = req.photo_url {
            member.photo_url = Some(v);
        }
        if let Some(v) = req.linkedin_url {
            member.linkedin_url = Some(v);
        }
        if let Some(v) = req.github_url {
            member.github_url = Some(v);
        }
        if let Some(v) = req.category {
            member.category = v;
        }
        member.order_index = order_index;
        Ok(Some(member.clone()))
    }

    async fn delete_crew_member(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.crew, |m| m.id == id))
    }

    // --- Teams ---

    async fn list_teams(&self) -> RepoResult<Vec<TeamWithMembers>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().map(|t| tables.team_with_members(t)).collect())
    }

    async fn featured_teams(&self, limit: i64) -> RepoResult<Vec<TeamWithMembers>> {
        let tables = self.tables.read().await;
        let featured = tables.teams.iter().filter(|t| t.is_featured);
        Ok(window(featured, 0, limit).into_iter().map(|t| tables.team_with_members(t)).collect())
    }

    async fn get_team(&self, id: i64) -> RepoResult<Option<TeamWithMembers>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.id == id).map(|t| tables.team_with_members(t)))
    }

    async fn get_team_by_slug(&self, slug: &str) -> RepoResult<Option<TeamWithMembers>> {
        let tables = self.tables.read().await;
        Ok(tables.teams.iter().find(|t| t.slug == slug).map(|t| tables.team_with_members(t)))
    }

    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>> {
        Ok(self.tables.read().await.teams.iter().find(|t| t.name == name).cloned())
    }

    async fn create_team(
        &self,
        req: CreateTeamRequest,
        slug: String,
    ) -> RepoResult<TeamWithMembers> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let team = Team {
            id: tables.next_id(),
            name: req.name,
            slug,
            project_name: req.project_name,
            category: req.category,
            description: req.description,
            is_featured: req.is_featured,
            photo_url: req.photo_url,
            created_at: now,
            updated_at: now,
        };
        tables.insert_team_members(team.id, req.members);
        tables.teams.push(team.clone());
        Ok(tables.team_with_members(&team))
    }

    async fn update_team(
        &self,
        id: i64,
        req: UpdateTeamRequest,
        slug: Option<String>,
    ) -> RepoResult<Option<TeamWithMembers>> {
        let mut tables = self.tables.write().await;
        let Some(team) = tables.teams.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.name {
            team.name = v;
        }
        if let Some(v) = slug {
            team.slug = v;
        }
        if let Some(v) = req.project_name {
            team.project_name = v;
        }
        if let Some(v) = req.category {
            team.category = v;
        }
        if let Some(v) = req.description {
            team.description = v;
        }
        if let Some(v) = req.is_featured {
            team.is_featured = v;
        }
        if let Some(v) = req.photo_url {
            team.photo_url = Some(v);
        }
        team.updated_at = Utc::now();
        let team = team.clone();

        if let Some(members) = req.members {
            tables.team_members.retain(|m| m.team_id != id);
            tables.insert_team_members(id, members);
        }
        Ok(Some(tables.team_with_members(&team)))
    }

    async fn delete_team(&self, id: i64) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = remove_where(&mut tables.teams, |t| t.id == id);
        if removed {
            tables.team_members.retain(|m| m.team_id != id);
        }
        Ok(removed)
    }

    // --- Community Applications ---

    async fn create_application(
        &self,
        req: CreateApplicationRequest,
    ) -> RepoResult<CommunityApplication> {
        let mut tables = self.tables.write().await;
        let application = CommunityApplication {
            id: tables.next_id(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            interests: req.interests,
            heard_from: req.heard_from,
            motivation: req.motivation,
            contribution: req.contribution,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> RepoResult<Vec<CommunityApplication>> {
        let q = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let mut items: Vec<CommunityApplication> = self
            .tables
            .read()
            .await
            .applications
            .iter()
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| {
                q.as_deref().is_none_or(|q| {
                    contains_ci(&a.first_name, q)
                        || contains_ci(&a.last_name, q)
                        || contains_ci(&a.email, q)
                })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(window(items.into_iter(), filter.skip, filter.limit))
    }

    async fn get_application(&self, id: i64) -> RepoResult<Option<CommunityApplication>> {
        Ok(self.tables.read().await.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn set_application_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<CommunityApplication>> {
        let mut tables = self.tables.write().await;
        Ok(tables.applications.iter_mut().find(|a| a.id == id).map(|a| {
            a.status = status;
            a.updated_at = Some(Utc::now());
            a.clone()
        }))
    }

    async fn delete_application(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.applications, |a| a.id == id))
    }

    // --- Event Suggestions ---

    async fn create_suggestion(
        &self,
        req: CreateSuggestionRequest,
    ) -> RepoResult<EventSuggestion> {
        let mut tables = self.tables.write().await;
        let suggestion = EventSuggestion {
            id: tables.next_id(),
            title: req.title,
            description: req.description,
            contact: req.contact,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.suggestions.push(suggestion.clone());
        Ok(suggestion)
    }

    async fn list_suggestions(&self, skip: i64, limit: i64) -> RepoResult<Vec<EventSuggestion>> {
        let mut items = self.tables.read().await.suggestions.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(window(items.into_iter(), skip, limit))
    }

    async fn get_suggestion(&self, id: i64) -> RepoResult<Option<EventSuggestion>> {
        Ok(self.tables.read().await.suggestions.iter().find(|s| s.id == id).cloned())
    }

    async fn set_suggestion_status(
        &self,
        id: i64,
        status: ReviewStatus,
    ) -> RepoResult<Option<EventSuggestion>> {
        let mut tables = self.tables.write().await;
        Ok(tables.suggestions.iter_mut().find(|s| s.id == id).map(|s| {
            s.status = status;
            s.updated_at = Some(Utc::now());
            s.clone()
        }))
    }

    async fn delete_suggestion(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.suggestions, |s| s.id == id))
    }

    // --- Posters ---

    async fn list_posters(&self, filter: &PosterFilter) -> RepoResult<Vec<Poster>> {
        let tables = self.tables.read().await;
        let sorted = sorted_posters(&tables.posters);
        let visible = sorted.into_iter().filter(|p| filter.active.is_none_or(|a| p.is_active == a));
        Ok(window(visible, filter.skip, filter.limit))
    }

    async fn get_poster(&self, id: i64) -> RepoResult<Option<Poster>> {
        Ok(self.tables.read().await.posters.iter().find(|p| p.id == id).cloned())
    }

    async fn create_poster(&self, req: CreatePosterRequest) -> RepoResult<Poster> {
        let mut tables = self.tables.write().await;
        let order_index = req.order_index.unwrap_or_else(|| {
            next_order_index(tables.posters.iter().map(|p| p.order_index).max())
        });
        let now = Utc::now();
        let poster = Poster {
            id: tables.next_id(),
            title: req.title,
            subtitle: req.subtitle,
            content: req.content,
            image_url: req.image_url,
            order_index,
            is_active: req.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        tables.posters.push(poster.clone());
        Ok(poster)
    }

    async fn update_poster(
        &self,
        id: i64,
        req: UpdatePosterRequest,
    ) -> RepoResult<Option<Poster>> {
        let mut tables = self.tables.write().await;
        let Some(poster) = tables.posters.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.title {
            poster.title = v;
        }
        if let Some(v) = req.subtitle {
            poster.subtitle = Some(v);
        }
        if let Some(v) = req.content {
            poster.content = Some(v);
        }
        if let Some(v) = req.image_url {
            poster.image_url = Some(v);
        }
        if let Some(v) = req.is_active {
            poster.is_active = v;
        }
        if let Some(v) = req.order_index {
            poster.order_index = v;
        }
        poster.updated_at = Utc::now();
        Ok(Some(poster.clone()))
    }

    async fn delete_poster(&self, id: i64) -> RepoResult<bool> {
        Ok(remove_where(&mut self.tables.write().await.posters, |p| p.id == id))
    }

    async fn reorder_posters(&self, positions: &[(i64, i32)]) -> RepoResult<Vec<Poster>> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        for (id, order_index) in positions {
            if let Some(poster) = tables.posters.iter_mut().find(|p| p.id == *id) {
                poster.order_index = *order_index;
                poster.updated_at = now;
            }
        }
        Ok(sorted_posters(&tables.posters))
    }

    // --- Admins ---

    async fn get_admin_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        Ok(self.tables.read().await.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn upsert_admin(&self, email: &str, password_hash: &str) -> RepoResult<Admin> {
        let mut tables = self.tables.write().await;
        if let Some(admin) = tables.admins.iter_mut().find(|a| a.email == email) {
            admin.password_hash = password_hash.to_string();
            return Ok(admin.clone());
        }
        let admin = Admin {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            totp_secret: None,
            created_at: Utc::now(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }

    async fn set_admin_totp_secret(&self, id: i64, secret: Option<String>) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.admins.iter_mut().find(|a| a.id == id) {
            Some(admin) => {
                admin.totp_secret = secret;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats> {
        let tables = self.tables.read().await;
        let count = |n: usize| n as i64;
        Ok(DashboardStats {
            total_events: count(tables.events.len()),
            upcoming_events: count(tables.events.iter().filter(|e| e.start_at >= now).count()),
            total_blogs: count(tables.blogs.len()),
            pending_applications: count(
                tables.applications.iter().filter(|a| a.status == ReviewStatus::Pending).count(),
            ),
            pending_suggestions: count(
                tables.suggestions.iter().filter(|s| s.status == ReviewStatus::Pending).count(),
            ),
        })
    }
}
