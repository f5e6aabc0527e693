use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Account, AccountCmd, AccountKind, EngineError, ResultEngine, accounts, budgets, money,
    transactions,
    util::{normalize_currency, normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

/// Filters for listing accounts. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct AccountListFilter {
    pub kind: Option<AccountKind>,
    pub active: Option<bool>,
}

/// Validate `cmd` and copy it onto `model`, replacing every editable field.
fn apply_account_cmd(cmd: &AccountCmd, model: &mut accounts::ActiveModel) -> ResultEngine<()> {
    model.name = ActiveValue::Set(normalize_required_name(&cmd.name, "account")?);
    model.account_type = ActiveValue::Set(cmd.kind.as_str().to_string());
    model.balance = ActiveValue::Set(money::to_storage(money::normalize_amount(
        cmd.balance,
        "balance",
    )?));
    model.currency = ActiveValue::Set(normalize_currency(cmd.currency.as_deref())?);
    model.description = ActiveValue::Set(normalize_optional_text(cmd.description.as_deref()));
    model.is_active = ActiveValue::Set(cmd.is_active.unwrap_or(true));
    Ok(())
}

impl Engine {
    /// List the user's accounts ordered by name.
    pub async fn accounts(
        &self,
        filter: &AccountListFilter,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Account>> {
        let mut query = accounts::Entity::find().filter(accounts::Column::UserId.eq(user_id));
        if let Some(kind) = filter.kind {
            query = query.filter(accounts::Column::AccountType.eq(kind.as_str()));
        }
        if let Some(active) = filter.active {
            query = query.filter(accounts::Column::IsActive.eq(active));
        }
        query
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    pub async fn account(&self, account_id: Uuid, user_id: Uuid) -> ResultEngine<Account> {
        let model = self
            .require_account(&self.database, account_id, user_id)
            .await?;
        Account::try_from(model)
    }

    pub async fn create_account(&self, cmd: AccountCmd, user_id: Uuid) -> ResultEngine<Account> {
        let now = Utc::now();
        let mut active = accounts::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        apply_account_cmd(&cmd, &mut active)?;
        with_tx!(self, |db_tx| {
            let model = active.insert(&db_tx).await?;
            tracing::debug!(account_id = %model.id, "account created");
            Account::try_from(model)
        })
    }

    /// Replace every editable field of an account.
    pub async fn update_account(
        &self,
        account_id: Uuid,
        cmd: AccountCmd,
        user_id: Uuid,
    ) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id, user_id).await?;
            let mut active: accounts::ActiveModel = model.into();
            apply_account_cmd(&cmd, &mut active)?;
            active.updated_at = ActiveValue::Set(Utc::now());
            Account::try_from(active.update(&db_tx).await?)
        })
    }

    /// Set the balance of an account. This is the only way balances change.
    pub async fn update_account_balance(
        &self,
        account_id: Uuid,
        balance: Decimal,
        user_id: Uuid,
    ) -> ResultEngine<Account> {
        let balance = money::normalize_amount(balance, "balance")?;
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id, user_id).await?;
            let mut active: accounts::ActiveModel = model.into();
            active.balance = ActiveValue::Set(money::to_storage(balance));
            active.updated_at = ActiveValue::Set(Utc::now());
            Account::try_from(active.update(&db_tx).await?)
        })
    }

    /// Delete an account that no transaction or budget points to.
    pub async fn delete_account(&self, account_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id, user_id).await?;

            let referenced_by_tx = transactions::Entity::find()
                .filter(
                    Condition::any()
                        .add(transactions::Column::AccountId.eq(account_id))
                        .add(transactions::Column::TargetAccountId.eq(account_id)),
                )
                .one(&db_tx)
                .await?
                .is_some();
            let referenced_by_budget = budgets::Entity::find()
                .filter(budgets::Column::AccountId.eq(account_id))
                .one(&db_tx)
                .await?
                .is_some();
            if referenced_by_tx || referenced_by_budget {
                return Err(EngineError::InUse(format!("account '{}'", model.name)));
            }

            accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
