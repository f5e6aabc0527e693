//! Tags API endpoints.

use api_types::tag::{TagRequest, TagView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Tag, TagCmd, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn tag_view(tag: Tag) -> TagView {
    TagView {
        id: tag.id,
        name: tag.name,
        color: tag.color,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
    }
}

fn tag_cmd(payload: TagRequest) -> TagCmd {
    TagCmd {
        name: payload.name,
        color: payload.color,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TagView>>, ServerError> {
    let tags = state.engine.tags(user.id).await?;
    Ok(Json(tags.into_iter().map(tag_view).collect()))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TagView>, ServerError> {
    let tag = state.engine.tag(id, user.id).await?;
    Ok(Json(tag_view(tag)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TagRequest>,
) -> Result<(StatusCode, Json<TagView>), ServerError> {
    let tag = state.engine.create_tag(tag_cmd(payload), user.id).await?;
    Ok((StatusCode::CREATED, Json(tag_view(tag))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagRequest>,
) -> Result<Json<TagView>, ServerError> {
    let tag = state
        .engine
        .update_tag(id, tag_cmd(payload), user.id)
        .await?;
    Ok(Json(tag_view(tag)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_tag(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
