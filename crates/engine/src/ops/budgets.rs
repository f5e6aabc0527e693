use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Budget, BudgetCmd, EngineError, PeriodType, ResultEngine, budgets, money};

use super::{Engine, with_tx};

/// Filters for listing budgets. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct BudgetListFilter {
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    /// Only budgets with the active flag set.
    pub active_only: bool,
    pub period: Option<PeriodType>,
    /// Only budgets whose `[start_date, end_date]` contains this day.
    pub covering: Option<NaiveDate>,
}

fn validate_budget_dates(start: NaiveDate, end: Option<NaiveDate>) -> ResultEngine<()> {
    if let Some(end) = end
        && end < start
    {
        return Err(EngineError::InvalidDate(
            "end date must not be before start date".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// List the user's budgets, newest start date first.
    pub async fn budgets(
        &self,
        filter: &BudgetListFilter,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Budget>> {
        let mut query = budgets::Entity::find().filter(budgets::Column::UserId.eq(user_id));
        if let Some(category_id) = filter.category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(budgets::Column::AccountId.eq(account_id));
        }
        if filter.active_only {
            query = query.filter(budgets::Column::IsActive.eq(true));
        }
        if let Some(period) = filter.period {
            query = query.filter(budgets::Column::PeriodType.eq(period.as_str()));
        }
        if let Some(day) = filter.covering {
            query = query.filter(budgets::Column::StartDate.lte(day)).filter(
                Condition::any()
                    .add(budgets::Column::EndDate.is_null())
                    .add(budgets::Column::EndDate.gte(day)),
            );
        }
        query
            .order_by_desc(budgets::Column::StartDate)
            .order_by_desc(budgets::Column::UpdatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    pub async fn budget(&self, budget_id: Uuid, user_id: Uuid) -> ResultEngine<Budget> {
        let model = self
            .require_budget(&self.database, budget_id, user_id)
            .await?;
        Budget::try_from(model)
    }

    pub async fn create_budget(&self, cmd: BudgetCmd, user_id: Uuid) -> ResultEngine<Budget> {
        let amount = money::normalize_positive_amount(cmd.amount, "budget amount")?;
        validate_budget_dates(cmd.start_date, cmd.end_date)?;
        with_tx!(self, |db_tx| {
            self.require_budget_references(&db_tx, &cmd, user_id)
                .await?;
            let now = Utc::now();
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id),
                category_id: ActiveValue::Set(cmd.category_id),
                account_id: ActiveValue::Set(cmd.account_id),
                amount: ActiveValue::Set(money::to_storage(amount)),
                period_type: ActiveValue::Set(cmd.period.as_str().to_string()),
                start_date: ActiveValue::Set(cmd.start_date),
                end_date: ActiveValue::Set(cmd.end_date),
                is_active: ActiveValue::Set(cmd.is_active.unwrap_or(true)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            Budget::try_from(active.insert(&db_tx).await?)
        })
    }

    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        cmd: BudgetCmd,
        user_id: Uuid,
    ) -> ResultEngine<Budget> {
        let amount = money::normalize_positive_amount(cmd.amount, "budget amount")?;
        validate_budget_dates(cmd.start_date, cmd.end_date)?;
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, budget_id, user_id).await?;
            self.require_budget_references(&db_tx, &cmd, user_id)
                .await?;
            let mut active: budgets::ActiveModel = model.into();
            active.category_id = ActiveValue::Set(cmd.category_id);
            active.account_id = ActiveValue::Set(cmd.account_id);
            active.amount = ActiveValue::Set(money::to_storage(amount));
            active.period_type = ActiveValue::Set(cmd.period.as_str().to_string());
            active.start_date = ActiveValue::Set(cmd.start_date);
            active.end_date = ActiveValue::Set(cmd.end_date);
            active.is_active = ActiveValue::Set(cmd.is_active.unwrap_or(true));
            active.updated_at = ActiveValue::Set(Utc::now());
            Budget::try_from(active.update(&db_tx).await?)
        })
    }

    pub async fn delete_budget(&self, budget_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, budget_id, user_id).await?;
            budgets::Entity::delete_by_id(budget_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_budget_references<C: ConnectionTrait>(
        &self,
        db: &C,
        cmd: &BudgetCmd,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        self.require_visible_category(db, cmd.category_id, user_id)
            .await?;
        if let Some(account_id) = cmd.account_id {
            self.require_account(db, account_id, user_id).await?;
        }
        Ok(())
    }
}
