//! Budgets API endpoints.

use api_types::budget::{BudgetRequest, BudgetView, CurrentQuery, PeriodType as ApiPeriod};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Budget, BudgetCmd, BudgetListFilter, PeriodType, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn period_from_api(value: ApiPeriod) -> PeriodType {
    match value {
        ApiPeriod::Daily => PeriodType::Daily,
        ApiPeriod::Weekly => PeriodType::Weekly,
        ApiPeriod::Monthly => PeriodType::Monthly,
        ApiPeriod::Yearly => PeriodType::Yearly,
    }
}

fn period_to_api(value: PeriodType) -> ApiPeriod {
    match value {
        PeriodType::Daily => ApiPeriod::Daily,
        PeriodType::Weekly => ApiPeriod::Weekly,
        PeriodType::Monthly => ApiPeriod::Monthly,
        PeriodType::Yearly => ApiPeriod::Yearly,
    }
}

fn budget_view(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        account_id: budget.account_id,
        amount: budget.amount,
        period_type: period_to_api(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        is_active: budget.is_active,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

fn budget_cmd(payload: BudgetRequest) -> BudgetCmd {
    BudgetCmd {
        category_id: payload.category_id,
        account_id: payload.account_id,
        amount: payload.amount,
        period: period_from_api(payload.period_type),
        start_date: payload.start_date,
        end_date: payload.end_date,
        is_active: payload.is_active,
    }
}

async fn list_filtered(
    state: &ServerState,
    user: &User,
    filter: BudgetListFilter,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state.engine.budgets(&filter, user.id).await?;
    Ok(Json(budgets.into_iter().map(budget_view).collect()))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    list_filtered(&state, &user, BudgetListFilter::default()).await
}

pub async fn list_active(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let filter = BudgetListFilter {
        active_only: true,
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

/// Budgets covering `?date=` (today, UTC, when omitted).
pub async fn list_current(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CurrentQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let filter = BudgetListFilter {
        covering: Some(query.date.unwrap_or_else(|| Utc::now().date_naive())),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let filter = BudgetListFilter {
        category_id: Some(category_id),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_account(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let filter = BudgetListFilter {
        account_id: Some(account_id),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_period(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(period): Path<ApiPeriod>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let filter = BudgetListFilter {
        period: Some(period_from_api(period)),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(id, user.id).await?;
    Ok(Json(budget_view(budget)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetRequest>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(budget_cmd(payload), user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(budget_view(budget))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetRequest>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(id, budget_cmd(payload), user.id)
        .await?;
    Ok(Json(budget_view(budget)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
