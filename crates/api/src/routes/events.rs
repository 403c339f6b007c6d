//! Event routes: listing, detail, creation, edits and seat registration.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    Attendee, CreateEventRequest, DateFilter, Event, EventDetail, EventListResponse, EventSummary,
    EventType, MyEventsResponse, OrganizerKind, RegistrationAck, SkillLevel, UpdateEventRequest,
};
use persistence::entities::EventWithStatsEntity;
use persistence::repositories::{
    EventListQuery, EventRepository, RegistrationRepository,
};
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, OptionalCurrentUser};
use crate::middleware::metrics::{record_event_created, record_registration};

/// Query parameters for the event listing. All filters are optional and
/// compose with AND.
#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    pub city: Option<String>,
    pub date_filter: Option<DateFilter>,
    pub skill_level: Option<SkillLevel>,
    pub event_type: Option<EventType>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

fn summary_from(entity: EventWithStatsEntity) -> EventSummary {
    EventSummary {
        id: entity.id,
        organizer_id: entity.organizer_id,
        organizer_kind: entity.organizer_kind.into(),
        organizer_name: entity.organizer_name,
        title: entity.title,
        city: entity.city,
        date: entity.date,
        time: entity.time,
        event_type: entity.event_type.into(),
        skill_level: entity.skill_level.into(),
        max_seats: entity.max_seats,
        seats_taken: entity.seats_taken,
        user_joined: entity.user_joined,
        image_url: entity.image_url,
    }
}

fn detail_from(entity: EventWithStatsEntity, attendees: Vec<Attendee>) -> EventDetail {
    EventDetail {
        id: entity.id,
        organizer_id: entity.organizer_id,
        organizer_kind: entity.organizer_kind.into(),
        organizer_name: entity.organizer_name,
        title: entity.title,
        description: entity.description,
        city: entity.city,
        address: entity.address,
        date: entity.date,
        time: entity.time,
        event_type: entity.event_type.into(),
        skill_level: entity.skill_level.into(),
        max_seats: entity.max_seats,
        seats_taken: entity.seats_taken,
        user_joined: entity.user_joined,
        image_url: entity.image_url,
        attendees,
    }
}

/// List events with optional filters and cursor pagination.
///
/// GET /api/events
///
/// Anonymous callers get `user_joined = false` everywhere; a valid
/// session personalizes it.
pub async fn list_events(
    State(state): State<AppState>,
    viewer: OptionalCurrentUser,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<EventListResponse>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(state.config.limits.default_page_size)
        .clamp(1, state.config.limits.max_page_size);

    let after = match params.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|e| ApiError::Validation(format!("cursor: {}", e)))?,
        ),
        None => None,
    };

    let (date_from, date_to) = match params.date_filter {
        Some(filter) => {
            let (from, to) = filter.range(Utc::now().date_naive());
            (Some(from), Some(to))
        }
        None => (None, None),
    };

    let query = EventListQuery {
        city: params.city.filter(|c| !c.trim().is_empty()),
        date_from,
        date_to,
        skill_level: params.skill_level.map(Into::into),
        event_type: params.event_type.map(Into::into),
        after,
        limit,
    };

    let repo = EventRepository::new(state.pool.clone());
    let mut rows = repo.list(&query, viewer.user_id()).await?;

    // The repository fetches one extra row to detect a next page.
    let next_cursor = if rows.len() as i64 > limit {
        rows.truncate(limit as usize);
        rows.last().map(|last| encode_cursor(last.date, last.id))
    } else {
        None
    };

    Ok(Json(EventListResponse {
        data: rows.into_iter().map(summary_from).collect(),
        next_cursor,
    }))
}

/// Full event detail including the attendee list.
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    viewer: OptionalCurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetail>, ApiError> {
    let events = EventRepository::new(state.pool.clone());
    let registrations = RegistrationRepository::new(state.pool.clone());

    let event = events
        .find_with_stats(event_id, viewer.user_id())
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let attendees = registrations
        .list_attendees(event_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(detail_from(event, attendees)))
}

/// Create a new event on behalf of the authenticated organizer.
///
/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDetail>), ApiError> {
    request.validate()?;

    if request.max_seats > state.config.limits.max_seats_limit {
        return Err(ApiError::Validation(format!(
            "max_seats: cannot exceed {}",
            state.config.limits.max_seats_limit
        )));
    }

    let organizer_kind = request.organizer_kind.unwrap_or(OrganizerKind::Individual);

    let events = EventRepository::new(state.pool.clone());
    let created = events
        .create(
            current.user_id(),
            organizer_kind.into(),
            &request.title,
            &request.description,
            &request.city,
            &request.address,
            request.date,
            &request.time,
            request.event_type.into(),
            request.skill_level.into(),
            request.max_seats,
            request.image_url.as_deref(),
        )
        .await?;

    record_event_created();

    info!(
        event_id = %created.id,
        organizer_id = %current.user_id(),
        event_type = %request.event_type,
        "Event created"
    );

    // A fresh event has no registrations; build the detail directly.
    let event: Event = created.into();
    let detail = EventDetail {
        id: event.id,
        organizer_id: event.organizer_id,
        organizer_kind: event.organizer_kind,
        organizer_name: current.user.display_name.clone(),
        title: event.title,
        description: event.description,
        city: event.city,
        address: event.address,
        date: event.date,
        time: event.time,
        event_type: event.event_type,
        skill_level: event.skill_level,
        max_seats: event.max_seats,
        seats_taken: 0,
        user_joined: false,
        image_url: event.image_url,
        attendees: Vec::new(),
    };

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Organizer-restricted edit of an event.
///
/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventDetail>, ApiError> {
    request.validate()?;

    let events = EventRepository::new(state.pool.clone());
    let registrations = RegistrationRepository::new(state.pool.clone());

    let existing = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    if existing.organizer_id != current.user_id() {
        return Err(ApiError::Forbidden(
            "Only the organizer can edit this event".to_string(),
        ));
    }

    events
        .update(
            event_id,
            request.title.as_deref(),
            request.description.as_deref(),
            request.city.as_deref(),
            request.address.as_deref(),
            request.date,
            request.time.as_deref(),
            request.image_url.as_deref(),
        )
        .await?;

    info!(event_id = %event_id, organizer_id = %current.user_id(), "Event updated");

    let event = events
        .find_with_stats(event_id, Some(current.user_id()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let attendees = registrations
        .list_attendees(event_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(detail_from(event, attendees)))
}

/// Take a seat at an event.
///
/// POST /api/events/:id/join
pub async fn join_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationAck>, ApiError> {
    let registrations = RegistrationRepository::new(state.pool.clone());

    let seats_taken = registrations.join(event_id, current.user_id()).await?;

    record_registration("join");

    info!(
        event_id = %event_id,
        user_id = %current.user_id(),
        seats_taken,
        "User joined event"
    );

    Ok(Json(RegistrationAck {
        event_id,
        seats_taken,
        user_joined: true,
    }))
}

/// Release a held seat.
///
/// DELETE /api/events/:id/leave
pub async fn leave_event(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationAck>, ApiError> {
    let registrations = RegistrationRepository::new(state.pool.clone());

    let seats_taken = registrations.leave(event_id, current.user_id()).await?;

    record_registration("leave");

    info!(
        event_id = %event_id,
        user_id = %current.user_id(),
        seats_taken,
        "User left event"
    );

    Ok(Json(RegistrationAck {
        event_id,
        seats_taken,
        user_joined: false,
    }))
}

/// Events the caller organizes or attends.
///
/// GET /api/events/mine
pub async fn my_events(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<MyEventsResponse>, ApiError> {
    let events = EventRepository::new(state.pool.clone());

    let organized = events.list_organized_by(current.user_id()).await?;
    let joined = events.list_joined_by(current.user_id()).await?;

    Ok(Json(MyEventsResponse {
        organized: organized.into_iter().map(summary_from).collect(),
        joined: joined.into_iter().map(summary_from).collect(),
    }))
}
