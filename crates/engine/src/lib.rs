//! Personal-finance ledger engine.
//!
//! Every operation takes the caller's user id explicitly and only ever sees
//! records owned by that user (plus global categories, which are read-only).

pub use accounts::{Account, AccountKind};
pub use budgets::{Budget, PeriodType};
pub use categories::{Category, CategoryKind};
pub use commands::{AccountCmd, BudgetCmd, CategoryCmd, TagCmd, TransactionCmd};
pub use error::EngineError;
pub use ops::{
    AccountListFilter, BudgetListFilter, CategoryListFilter, Engine, EngineBuilder,
    TransactionListFilter,
};
pub use roles::DEFAULT_ROLE;
pub use tags::Tag;
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

mod accounts;
mod budgets;
mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod password;
mod roles;
mod tags;
mod transactions;
mod user_roles;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
