//! Accounts API endpoints.

use api_types::account::{AccountRequest, AccountType, AccountView, BalanceRequest};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Account, AccountCmd, AccountKind, AccountListFilter, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn kind_from_api(value: AccountType) -> AccountKind {
    match value {
        AccountType::Cash => AccountKind::Cash,
        AccountType::Bank => AccountKind::Bank,
        AccountType::Checking => AccountKind::Checking,
        AccountType::Savings => AccountKind::Savings,
        AccountType::Card => AccountKind::Card,
        AccountType::CreditCard => AccountKind::CreditCard,
        AccountType::Investment => AccountKind::Investment,
    }
}

fn kind_to_api(value: AccountKind) -> AccountType {
    match value {
        AccountKind::Cash => AccountType::Cash,
        AccountKind::Bank => AccountType::Bank,
        AccountKind::Checking => AccountType::Checking,
        AccountKind::Savings => AccountType::Savings,
        AccountKind::Card => AccountType::Card,
        AccountKind::CreditCard => AccountType::CreditCard,
        AccountKind::Investment => AccountType::Investment,
    }
}

fn account_view(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        account_type: kind_to_api(account.kind),
        balance: account.balance,
        currency: account.currency,
        description: account.description,
        is_active: account.is_active,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

fn account_cmd(payload: AccountRequest) -> AccountCmd {
    AccountCmd {
        name: payload.name,
        kind: kind_from_api(payload.account_type),
        balance: payload.balance,
        currency: payload.currency,
        description: payload.description,
        is_active: payload.is_active,
    }
}

async fn list_filtered(
    state: &ServerState,
    user: &User,
    filter: AccountListFilter,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts(&filter, user.id).await?;
    Ok(Json(accounts.into_iter().map(account_view).collect()))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    list_filtered(&state, &user, AccountListFilter::default()).await
}

pub async fn list_active(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let filter = AccountListFilter {
        active: Some(true),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_inactive(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let filter = AccountListFilter {
        active: Some(false),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn list_by_type(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(account_type): Path<AccountType>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let filter = AccountListFilter {
        kind: Some(kind_from_api(account_type)),
        ..Default::default()
    };
    list_filtered(&state, &user, filter).await
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(id, user.id).await?;
    Ok(Json(account_view(account)))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountRequest>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .create_account(account_cmd(payload), user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(account_view(account))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountRequest>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account(id, account_cmd(payload), user.id)
        .await?;
    Ok(Json(account_view(account)))
}

pub async fn update_balance(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BalanceRequest>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account_balance(id, payload.balance, user.id)
        .await?;
    Ok(Json(account_view(account)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
