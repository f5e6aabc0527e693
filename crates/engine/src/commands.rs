//! Command structs for engine write operations.
//!
//! Each command carries the full state of a record: `create_*` and `update_*`
//! take the same command, and an update replaces every field. Optional
//! fields left unset are stored as NULL.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{AccountKind, CategoryKind, PeriodType, TransactionKind};

/// Create or replace an account.
#[derive(Clone, Debug)]
pub struct AccountCmd {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    /// Defaults to `KRW`.
    pub currency: Option<String>,
    pub description: Option<String>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

impl AccountCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AccountKind, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            kind,
            balance,
            currency: None,
            description: None,
            is_active: None,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Create or replace a category.
#[derive(Clone, Debug)]
pub struct CategoryCmd {
    pub name: String,
    pub kind: CategoryKind,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl CategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            color: None,
            icon: None,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Create or replace a tag.
#[derive(Clone, Debug)]
pub struct TagCmd {
    pub name: String,
    pub color: Option<String>,
}

impl TagCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Create or replace a budget.
#[derive(Clone, Debug)]
pub struct BudgetCmd {
    pub category_id: Uuid,
    pub account_id: Option<Uuid>,
    pub amount: Decimal,
    pub period: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

impl BudgetCmd {
    #[must_use]
    pub fn new(
        category_id: Uuid,
        amount: Decimal,
        period: PeriodType,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            category_id,
            account_id: None,
            amount,
            period,
            start_date,
            end_date: None,
            is_active: None,
        }
    }

    #[must_use]
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Create or replace a transaction.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub target_account_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        account_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            kind,
            account_id,
            category_id: None,
            target_account_id: None,
            notes: None,
        }
    }

    /// Shortcut for a transfer from `account_id` to `target_account_id`.
    #[must_use]
    pub fn transfer(
        account_id: Uuid,
        target_account_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            TransactionKind::Transfer,
            account_id,
            amount,
            date,
            description,
        )
        .target_account(target_account_id)
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn target_account(mut self, target_account_id: Uuid) -> Self {
        self.target_account_id = Some(target_account_id);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
