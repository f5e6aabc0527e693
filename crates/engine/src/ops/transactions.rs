use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionCmd, TransactionKind, money,
    transactions,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive. `account_id` matches either side of a
/// transfer.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidDate(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

/// Transfers need a second, different account; everything else must not
/// carry one.
fn validate_target_account(cmd: &TransactionCmd) -> ResultEngine<()> {
    match (cmd.kind, cmd.target_account_id) {
        (TransactionKind::Transfer, None) => Err(EngineError::InvalidReference(
            "transfer requires a target account".to_string(),
        )),
        (TransactionKind::Transfer, Some(target)) if target == cmd.account_id => {
            Err(EngineError::InvalidReference(
                "transfer target must differ from the source account".to_string(),
            ))
        }
        (TransactionKind::Income | TransactionKind::Expense, Some(_)) => {
            Err(EngineError::InvalidReference(format!(
                "{} cannot have a target account",
                cmd.kind.as_str()
            )))
        }
        _ => Ok(()),
    }
}

struct ValidTransaction {
    description: String,
    amount: String,
    notes: Option<String>,
}

impl TryFrom<&TransactionCmd> for ValidTransaction {
    type Error = EngineError;

    fn try_from(cmd: &TransactionCmd) -> Result<Self, Self::Error> {
        validate_target_account(cmd)?;
        let amount = money::normalize_positive_amount(cmd.amount, "amount")?;
        Ok(Self {
            description: normalize_required_text(&cmd.description, "description")?,
            amount: money::to_storage(amount),
            notes: normalize_optional_text(cmd.notes.as_deref()),
        })
    }
}

impl Engine {
    /// List the user's transactions, newest first.
    ///
    /// Ties on the same day are broken by the last update time.
    pub async fn transactions(
        &self,
        filter: &TransactionListFilter,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;

        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::TransactionType.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::AccountId.eq(account_id))
                    .add(transactions::Column::TargetAccountId.eq(account_id)),
            );
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::TransactionDate.lte(to));
        }

        query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let model = self
            .require_transaction(&self.database, transaction_id, user_id)
            .await?;
        Transaction::try_from(model)
    }

    /// Record a transaction. Account balances are left untouched.
    pub async fn create_transaction(
        &self,
        cmd: TransactionCmd,
        user_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let valid = ValidTransaction::try_from(&cmd)?;
        with_tx!(self, |db_tx| {
            self.require_transaction_references(&db_tx, &cmd, user_id)
                .await?;
            let now = Utc::now();
            let active = transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id),
                transaction_date: ActiveValue::Set(cmd.date),
                description: ActiveValue::Set(valid.description),
                amount: ActiveValue::Set(valid.amount),
                transaction_type: ActiveValue::Set(cmd.kind.as_str().to_string()),
                category_id: ActiveValue::Set(cmd.category_id),
                account_id: ActiveValue::Set(cmd.account_id),
                target_account_id: ActiveValue::Set(cmd.target_account_id),
                notes: ActiveValue::Set(valid.notes),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            tracing::debug!(
                transaction_id = %model.id,
                kind = cmd.kind.as_str(),
                "transaction created"
            );
            Transaction::try_from(model)
        })
    }

    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        cmd: TransactionCmd,
        user_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let valid = ValidTransaction::try_from(&cmd)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            self.require_transaction_references(&db_tx, &cmd, user_id)
                .await?;
            let mut active: transactions::ActiveModel = model.into();
            active.transaction_date = ActiveValue::Set(cmd.date);
            active.description = ActiveValue::Set(valid.description);
            active.amount = ActiveValue::Set(valid.amount);
            active.transaction_type = ActiveValue::Set(cmd.kind.as_str().to_string());
            active.category_id = ActiveValue::Set(cmd.category_id);
            active.account_id = ActiveValue::Set(cmd.account_id);
            active.target_account_id = ActiveValue::Set(cmd.target_account_id);
            active.notes = ActiveValue::Set(valid.notes);
            active.updated_at = ActiveValue::Set(Utc::now());
            Transaction::try_from(active.update(&db_tx).await?)
        })
    }

    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_transaction_references<C: ConnectionTrait>(
        &self,
        db: &C,
        cmd: &TransactionCmd,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        self.require_account(db, cmd.account_id, user_id).await?;
        if let Some(target) = cmd.target_account_id {
            self.require_account(db, target, user_id).await?;
        }
        if let Some(category_id) = cmd.category_id {
            self.require_visible_category(db, category_id, user_id)
                .await?;
        }
        Ok(())
    }
}
