//! The module contains `Account` struct and its implementation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use crate::{EngineError, money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Cash,
    Bank,
    Checking,
    Savings,
    Card,
    CreditCard,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::Checking => "CHECKING",
            Self::Savings => "SAVINGS",
            Self::Card => "CARD",
            Self::CreditCard => "CREDIT_CARD",
            Self::Investment => "INVESTMENT",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CASH" => Ok(Self::Cash),
            "BANK" => Ok(Self::Bank),
            "CHECKING" => Ok(Self::Checking),
            "SAVINGS" => Ok(Self::Savings),
            "CARD" => Ok(Self::Card),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "INVESTMENT" => Ok(Self::Investment),
            other => Err(EngineError::InvalidValue(format!(
                "invalid account type: {other}"
            ))),
        }
    }
}

/// An account.
///
/// A representation of a real wallet, a bank account, a card or anything
/// else where money is kept. The balance is only changed explicitly; creating
/// transactions against the account leaves it untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: AccountKind::try_from(model.account_type.as_str())?,
            balance: money::from_storage(&model.balance)?,
            name: model.name,
            currency: model.currency,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub account_type: String,
    pub balance: String,
    pub currency: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Checking".to_string(),
            account_type: "CHECKING".to_string(),
            balance: "100.00".to_string(),
            currency: "KRW".to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn model_into_account() {
        let account = Account::try_from(model()).unwrap();
        assert_eq!(account.kind, AccountKind::Checking);
        assert_eq!(account.balance, Decimal::new(10000, 2));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut model = model();
        model.account_type = "PIGGY_BANK".to_string();
        assert_eq!(
            Account::try_from(model).unwrap_err(),
            EngineError::InvalidValue("invalid account type: PIGGY_BANK".to_string())
        );
    }

    #[test]
    fn kind_round_trip() {
        for kind in [
            AccountKind::Cash,
            AccountKind::Bank,
            AccountKind::Checking,
            AccountKind::Savings,
            AccountKind::Card,
            AccountKind::CreditCard,
            AccountKind::Investment,
        ] {
            assert_eq!(AccountKind::try_from(kind.as_str()).unwrap(), kind);
        }
    }
}
