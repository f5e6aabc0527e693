//! Categories API endpoints.
//!
//! Lists include global categories; those can be read but not changed.

use api_types::category::{CategoryRequest, CategoryType, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Category, CategoryCmd, CategoryKind, CategoryListFilter, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn kind_from_api(value: CategoryType) -> CategoryKind {
    match value {
        CategoryType::Income => CategoryKind::Income,
        CategoryType::Expense => CategoryKind::Expense,
        CategoryType::Both => CategoryKind::Both,
    }
}

fn kind_to_api(value: CategoryKind) -> CategoryType {
    match value {
        CategoryKind::Income => CategoryType::Income,
        CategoryKind::Expense => CategoryType::Expense,
        CategoryKind::Both => CategoryType::Both,
    }
}

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        global: category.is_global(),
        id: category.id,
        name: category.name,
        transaction_type: kind_to_api(category.kind),
        description: category.description,
        color: category.color,
        icon: category.icon,
        parent_id: category.parent_id,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

fn category_cmd(payload: CategoryRequest) -> CategoryCmd {
    CategoryCmd {
        name: payload.name,
        kind: kind_from_api(payload.transaction_type),
        description: payload.description,
        color: payload.color,
        icon: payload.icon,
        parent_id: payload.parent_id,
    }
}

async fn list_filtered(
    state: &ServerState,
    user: &User,
    filter: CategoryListFilter,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories(&filter, user.id).await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    list_filtered(&state, &user, CategoryListFilter::default()).await
}

pub async fn list_roots(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let filter = CategoryListFilter {
        roots_only: true,
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_type(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_type): Path<CategoryType>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let filter = CategoryListFilter {
        kind: Some(kind_from_api(category_type)),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_children(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(parent_id): Path<Uuid>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let filter = CategoryListFilter {
        parent_id: Some(parent_id),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(id, user.id).await?;
    Ok(Json(category_view(category)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(category_cmd(payload), user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(id, category_cmd(payload), user.id)
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
