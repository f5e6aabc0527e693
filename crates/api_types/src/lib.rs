//! Request and response bodies of the HTTP API.
//!
//! Field names are camelCase on the wire, enum values SCREAMING_SNAKE_CASE,
//! decimals strings (`"100.00"`) and dates `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginRequest {
        pub username_or_email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AuthResponse {
        pub token: String,
        pub user_id: Uuid,
        pub username: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub email: String,
        pub roles: Vec<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum AccountType {
        Cash,
        Bank,
        Checking,
        Savings,
        Card,
        CreditCard,
        Investment,
    }

    /// Full state of an account, used by both create and update.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountRequest {
        pub name: String,
        pub account_type: AccountType,
        #[serde(default)]
        pub balance: Decimal,
        pub currency: Option<String>,
        pub description: Option<String>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceRequest {
        pub balance: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub account_type: AccountType,
        pub balance: Decimal,
        pub currency: String,
        pub description: Option<String>,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum CategoryType {
        Income,
        Expense,
        Both,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryRequest {
        pub name: String,
        pub transaction_type: CategoryType,
        pub description: Option<String>,
        /// `#RRGGBB`
        pub color: Option<String>,
        pub icon: Option<String>,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub transaction_type: CategoryType,
        pub description: Option<String>,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub parent_id: Option<Uuid>,
        /// Shared by every user and read-only.
        pub global: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod tag {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagRequest {
        pub name: String,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TagView {
        pub id: Uuid,
        pub name: String,
        pub color: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum PeriodType {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetRequest {
        pub category_id: Uuid,
        pub account_id: Option<Uuid>,
        pub amount: Decimal,
        pub period_type: PeriodType,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub account_id: Option<Uuid>,
        pub amount: Decimal,
        pub period_type: PeriodType,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// `GET /api/budgets/current?date=`; today when omitted.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CurrentQuery {
        pub date: Option<NaiveDate>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionType {
        Income,
        Expense,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRequest {
        pub transaction_date: NaiveDate,
        pub description: String,
        pub amount: Decimal,
        pub transaction_type: TransactionType,
        pub category_id: Option<Uuid>,
        pub account_id: Uuid,
        pub target_account_id: Option<Uuid>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub transaction_date: NaiveDate,
        pub description: String,
        pub amount: Decimal,
        pub transaction_type: TransactionType,
        pub category_id: Option<Uuid>,
        pub account_id: Uuid,
        pub target_account_id: Option<Uuid>,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// `GET /api/transactions/range?from=&to=`, both ends inclusive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RangeQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }
}
