//! Transactions API endpoints.

use api_types::transaction::{RangeQuery, TransactionRequest, TransactionType, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Transaction, TransactionCmd, TransactionKind, TransactionListFilter, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn kind_from_api(value: TransactionType) -> TransactionKind {
    match value {
        TransactionType::Income => TransactionKind::Income,
        TransactionType::Expense => TransactionKind::Expense,
        TransactionType::Transfer => TransactionKind::Transfer,
    }
}

fn kind_to_api(value: TransactionKind) -> TransactionType {
    match value {
        TransactionKind::Income => TransactionType::Income,
        TransactionKind::Expense => TransactionType::Expense,
        TransactionKind::Transfer => TransactionType::Transfer,
    }
}

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        transaction_date: tx.date,
        description: tx.description,
        amount: tx.amount,
        transaction_type: kind_to_api(tx.kind),
        category_id: tx.category_id,
        account_id: tx.account_id,
        target_account_id: tx.target_account_id,
        notes: tx.notes,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn transaction_cmd(payload: TransactionRequest) -> TransactionCmd {
    TransactionCmd {
        date: payload.transaction_date,
        description: payload.description,
        amount: payload.amount,
        kind: kind_from_api(payload.transaction_type),
        account_id: payload.account_id,
        category_id: payload.category_id,
        target_account_id: payload.target_account_id,
        notes: payload.notes,
    }
}

async fn list_filtered(
    state: &ServerState,
    user: &User,
    filter: TransactionListFilter,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state.engine.transactions(&filter, user.id).await?;
    Ok(Json(transactions.into_iter().map(transaction_view).collect()))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    list_filtered(&state, &user, TransactionListFilter::default()).await
}

pub async fn list_by_type(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(transaction_type): Path<TransactionType>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        kind: Some(kind_from_api(transaction_type)),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_category(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        category_id: Some(category_id),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

/// Transactions touching the account on either side.
pub async fn list_by_account(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        account_id: Some(account_id),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_range(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        from: Some(range.from),
        to: Some(range.to),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, user.id).await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(transaction_cmd(payload), user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionRequest>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(id, transaction_cmd(payload), user.id)
        .await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
