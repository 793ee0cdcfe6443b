/*
 * Responsibility
 * - /lectures 系 handler (query / create / get / update)
 * - 認可は handler 内で authorize() を明示的に呼ぶ (role は route の metadata ではなくデータ)
 * - response の _links は compute_affordances() の結果だけから組み立てる
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::{
        dto::{
            hal::{self, LECTURES_PATH},
            lectures::{
                EmbeddedLectures, LectureCollection, LectureRequest, LectureResource,
                LectureResponse,
            },
        },
        extractors::{AuthCtxExtractor, public_id::PublicLectureId},
    },
    domain::lecture::{Lecture, NewLecture},
    error::AppError,
    services::auth::{
        affordances::{ResourceState, compute_affordances},
        authorization::{AuthorizationDecision, authorize},
        context::AuthCtx,
        principal::Role,
    },
    state::AppState,
};

const LIST_LIMIT: i64 = 50;

// Run `authorize` and turn a denial into 401/403.
fn require(
    ctx: &AuthCtx,
    role: Option<Role>,
    owner: Option<&str>,
) -> Result<AuthorizationDecision, AppError> {
    let decision = authorize(ctx, role, owner);

    if let Err(reason) = decision.into_result() {
        tracing::info!(
            identity = ctx.identity().unwrap_or("-"),
            required_role = ?role,
            reason = ?reason,
            "authorization denied"
        );
        return Err(reason.into());
    }

    Ok(decision)
}

fn to_resource(
    state: &AppState,
    ctx: &AuthCtx,
    decision: &AuthorizationDecision,
    lecture: Lecture,
) -> Result<LectureResource, AppError> {
    let public_id = state.id_codec.encode(lecture.id)?;
    let self_href = hal::lecture_href(&public_id);

    let actions = compute_affordances(decision, &ResourceState::of_lecture(&lecture, ctx));

    Ok(LectureResource {
        links: hal::links_for(&actions, Some(&self_href)),
        lecture: LectureResponse::new(public_id, lecture),
    })
}

// Collection members only link to themselves.
fn to_member(state: &AppState, lecture: Lecture) -> Result<LectureResource, AppError> {
    let public_id = state.id_codec.encode(lecture.id)?;
    let self_href = hal::lecture_href(&public_id);

    Ok(LectureResource {
        links: hal::links_for(&Default::default(), Some(&self_href)),
        lecture: LectureResponse::new(public_id, lecture),
    })
}

pub async fn query_lectures(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<LectureCollection>, AppError> {
    let decision = require(&ctx, Some(Role::Admin), None)?;

    let lectures = state.lectures.list(LIST_LIMIT, 0).await?;

    let mut members = Vec::with_capacity(lectures.len());
    for lecture in lectures {
        members.push(to_member(&state, lecture)?);
    }

    let actions = compute_affordances(&decision, &ResourceState::of_collection(&ctx));

    Ok(Json(LectureCollection {
        embedded: EmbeddedLectures { lectures: members },
        links: hal::links_for(&actions, Some(LECTURES_PATH)),
    }))
}

pub async fn create_lecture(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    body: Result<Json<LectureRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let decision = require(&ctx, Some(Role::User), None)?;
    // `require` with a role guarantees a principal
    let owner = ctx.identity().map(str::to_string).ok_or(AppError::Unauthorized)?;

    let Json(req) = body?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LECTURE", msg))?;

    let new = NewLecture::draft(req.into_details(), Some(owner)).publish();
    let lecture = state.lectures.create(new).await?;

    tracing::info!(lecture_id = lecture.id, owner = ?lecture.owner, "lecture created");

    let resource = to_resource(&state, &ctx, &decision, lecture)?;
    let location = hal::lecture_href(&resource.lecture.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(resource),
    )
        .into_response())
}

pub async fn get_lecture(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    lecture_id: PublicLectureId,
) -> Result<Json<LectureResource>, AppError> {
    let decision = require(&ctx, Some(Role::User), None)?;

    let lecture = state
        .lectures
        .get(lecture_id.id)
        .await?
        .ok_or(AppError::not_found("lecture"))?;

    Ok(Json(to_resource(&state, &ctx, &decision, lecture)?))
}

pub async fn update_lecture(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    lecture_id: PublicLectureId,
    body: Result<Json<LectureRequest>, JsonRejection>,
) -> Result<Json<LectureResource>, AppError> {
    let existing = state
        .lectures
        .get(lecture_id.id)
        .await?
        .ok_or(AppError::not_found("lecture"))?;

    let decision = require(&ctx, Some(Role::User), existing.owner.as_deref())?;

    let Json(req) = body?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LECTURE", msg))?;

    let lecture = state
        .lectures
        .update(existing.id, req.into_details())
        .await?
        .ok_or(AppError::not_found("lecture"))?;

    Ok(Json(to_resource(&state, &ctx, &decision, lecture)?))
}
