use sea_orm::{Condition, ConnectionTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, accounts, budgets, categories, tags, transactions};

use super::Engine;

/// Generates a `require_*` lookup that only returns rows owned by `user_id`.
///
/// A row owned by somebody else is reported exactly like a missing one.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
            user_id: Uuid,
        ) -> ResultEngine<$entity::Model> {
            $entity::Entity::find_by_id(id)
                .filter($entity::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

/// Longest parent chain walked before giving up on a category tree.
const MAX_CATEGORY_DEPTH: usize = 64;

/// Own categories plus global ones.
pub(super) fn visible_categories(user_id: Uuid) -> Condition {
    Condition::any()
        .add(categories::Column::UserId.eq(user_id))
        .add(categories::Column::UserId.is_null())
}

impl Engine {
    impl_owned_lookup!(require_account, accounts, "account not exists");
    impl_owned_lookup!(require_tag, tags, "tag not exists");
    impl_owned_lookup!(require_budget, budgets, "budget not exists");
    impl_owned_lookup!(require_transaction, transactions, "transaction not exists");
    // Global categories have no owner, so they never match here.
    impl_owned_lookup!(require_own_category, categories, "category not exists");

    /// Categories the user may read or reference.
    pub(super) async fn require_visible_category<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(id)
            .filter(visible_categories(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    /// Fails if making `parent_id` the parent of `category_id` would close a
    /// loop in the tree.
    pub(super) async fn ensure_no_category_cycle<C: ConnectionTrait>(
        &self,
        db: &C,
        category_id: Uuid,
        parent_id: Uuid,
    ) -> ResultEngine<()> {
        let mut current = Some(parent_id);
        for _ in 0..MAX_CATEGORY_DEPTH {
            let Some(id) = current else {
                return Ok(());
            };
            if id == category_id {
                return Err(EngineError::InvalidReference(
                    "category cannot be its own ancestor".to_string(),
                ));
            }
            current = categories::Entity::find_by_id(id)
                .one(db)
                .await?
                .and_then(|model| model.parent_id);
        }
        Err(EngineError::InvalidReference(
            "category tree is too deep".to_string(),
        ))
    }
}
