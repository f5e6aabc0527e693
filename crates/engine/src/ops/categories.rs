use chrono::Utc;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryCmd, CategoryKind, EngineError, ResultEngine, budgets, categories,
    transactions,
    util::{normalize_color, normalize_name_key, normalize_optional_text, normalize_required_name},
};

use super::{Engine, access::visible_categories, with_tx};

/// Filters for listing categories.
///
/// `roots_only` and `parent_id` are mutually exclusive; `roots_only` wins.
#[derive(Clone, Debug, Default)]
pub struct CategoryListFilter {
    pub kind: Option<CategoryKind>,
    pub parent_id: Option<Uuid>,
    pub roots_only: bool,
}

struct ValidCategory {
    name: String,
    name_norm: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
}

impl TryFrom<&CategoryCmd> for ValidCategory {
    type Error = EngineError;

    fn try_from(cmd: &CategoryCmd) -> Result<Self, Self::Error> {
        let name = normalize_required_name(&cmd.name, "category")?;
        Ok(Self {
            name_norm: normalize_name_key(&name)?,
            name,
            description: normalize_optional_text(cmd.description.as_deref()),
            color: normalize_color(cmd.color.as_deref())?,
            icon: normalize_optional_text(cmd.icon.as_deref()),
        })
    }
}

impl Engine {
    /// List own and global categories ordered by name.
    pub async fn categories(
        &self,
        filter: &CategoryListFilter,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().filter(visible_categories(user_id));
        if let Some(kind) = filter.kind {
            query = query.filter(categories::Column::TransactionType.eq(kind.as_str()));
        }
        if filter.roots_only {
            query = query.filter(categories::Column::ParentId.is_null());
        } else if let Some(parent_id) = filter.parent_id {
            query = query.filter(categories::Column::ParentId.eq(parent_id));
        }
        query
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    pub async fn category(&self, category_id: Uuid, user_id: Uuid) -> ResultEngine<Category> {
        let model = self
            .require_visible_category(&self.database, category_id, user_id)
            .await?;
        Category::try_from(model)
    }

    pub async fn create_category(
        &self,
        cmd: CategoryCmd,
        user_id: Uuid,
    ) -> ResultEngine<Category> {
        self.insert_category(cmd, Some(user_id)).await
    }

    /// Create a category without an owner, visible to every user.
    pub async fn create_global_category(&self, cmd: CategoryCmd) -> ResultEngine<Category> {
        self.insert_category(cmd, None).await
    }

    async fn insert_category(
        &self,
        cmd: CategoryCmd,
        owner: Option<Uuid>,
    ) -> ResultEngine<Category> {
        let valid = ValidCategory::try_from(&cmd)?;
        let category_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.ensure_category_name_free(&db_tx, owner, &valid, None)
                .await?;
            if let Some(parent_id) = cmd.parent_id {
                self.require_parent(&db_tx, parent_id, owner).await?;
            }

            let now = Utc::now();
            let key = valid.name.clone();
            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                user_id: ActiveValue::Set(owner),
                name: ActiveValue::Set(valid.name),
                name_norm: ActiveValue::Set(valid.name_norm),
                description: ActiveValue::Set(valid.description),
                color: ActiveValue::Set(valid.color),
                icon: ActiveValue::Set(valid.icon),
                parent_id: ActiveValue::Set(cmd.parent_id),
                transaction_type: ActiveValue::Set(cmd.kind.as_str().to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::from_unique_violation(err, &key))?;
            Category::try_from(model)
        })
    }

    /// Replace every editable field of one of the user's own categories.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        cmd: CategoryCmd,
        user_id: Uuid,
    ) -> ResultEngine<Category> {
        let valid = ValidCategory::try_from(&cmd)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_own_category(&db_tx, category_id, user_id)
                .await?;
            self.ensure_category_name_free(&db_tx, Some(user_id), &valid, Some(category_id))
                .await?;
            if let Some(parent_id) = cmd.parent_id {
                self.require_parent(&db_tx, parent_id, Some(user_id))
                    .await?;
                self.ensure_no_category_cycle(&db_tx, category_id, parent_id)
                    .await?;
            }

            let mut active: categories::ActiveModel = model.into();
            let key = valid.name.clone();
            active.name = ActiveValue::Set(valid.name);
            active.name_norm = ActiveValue::Set(valid.name_norm);
            active.description = ActiveValue::Set(valid.description);
            active.color = ActiveValue::Set(valid.color);
            active.icon = ActiveValue::Set(valid.icon);
            active.parent_id = ActiveValue::Set(cmd.parent_id);
            active.transaction_type = ActiveValue::Set(cmd.kind.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_unique_violation(err, &key))?;
            Category::try_from(model)
        })
    }

    /// Delete one of the user's own categories.
    ///
    /// Fails with [`EngineError::InUse`] while children, budgets or
    /// transactions still point to it.
    pub async fn delete_category(&self, category_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_own_category(&db_tx, category_id, user_id)
                .await?;

            let has_children = categories::Entity::find()
                .filter(categories::Column::ParentId.eq(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            let has_budgets = budgets::Entity::find()
                .filter(budgets::Column::CategoryId.eq(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            let has_transactions = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            if has_children || has_budgets || has_transactions {
                return Err(EngineError::InUse(format!("category '{}'", model.name)));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn ensure_category_name_free<C: ConnectionTrait>(
        &self,
        db: &C,
        owner: Option<Uuid>,
        valid: &ValidCategory,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let owner_cond = match owner {
            Some(user_id) => categories::Column::UserId.eq(user_id),
            None => categories::Column::UserId.is_null(),
        };
        let mut query = categories::Entity::find()
            .filter(owner_cond)
            .filter(categories::Column::NameNorm.eq(valid.name_norm.as_str()));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(valid.name.clone()));
        }
        Ok(())
    }

    /// A user's category may hang under its own or a global category; a
    /// global category only under another global one.
    async fn require_parent<C: ConnectionTrait>(
        &self,
        db: &C,
        parent_id: Uuid,
        owner: Option<Uuid>,
    ) -> ResultEngine<()> {
        let visible = match owner {
            Some(user_id) => visible_categories(user_id),
            None => Condition::all().add(categories::Column::UserId.is_null()),
        };
        let exists = categories::Entity::find_by_id(parent_id)
            .filter(visible)
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound(
                "parent category not exists".to_string(),
            ));
        }
        Ok(())
    }
}
