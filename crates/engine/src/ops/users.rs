use chrono::Utc;
use email_address::EmailAddress;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    DEFAULT_ROLE, EngineError, ResultEngine, User,
    password::{hash_password, verify_password},
    roles, user_roles, users,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

fn normalize_email(raw: &str) -> ResultEngine<String> {
    let email = raw.trim();
    if !EmailAddress::is_valid(email) {
        return Err(EngineError::InvalidValue(format!("invalid email: '{email}'")));
    }
    Ok(email.to_string())
}

impl Engine {
    /// Register a new user with the default role.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        let email = normalize_email(email)?;
        let hash = hash_password(password, self.password_cost)?;

        with_tx!(self, |db_tx| {
            let username_taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if username_taken {
                return Err(EngineError::ExistingKey(username));
            }
            let email_taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::ExistingKey(email));
            }

            let now = Utc::now();
            let key = username.clone();
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(hash),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_unique_violation(err, &key))?;
            self.assign_role(&db_tx, model.id, DEFAULT_ROLE).await?;
            tracing::info!(user_id = %model.id, username = %model.username, "user registered");

            let roles = self.role_names(&db_tx, model.id).await?;
            Ok(User::from_model(model, roles))
        })
    }

    /// Authenticate by username, falling back to email.
    ///
    /// Unknown identifiers and wrong passwords yield the same error.
    pub async fn login(&self, username_or_email: &str, password: &str) -> ResultEngine<User> {
        let identifier = username_or_email.trim();
        let by_username = users::Entity::find()
            .filter(users::Column::Username.eq(identifier))
            .one(&self.database)
            .await?;
        let model = match by_username {
            Some(model) => Some(model),
            None => {
                users::Entity::find()
                    .filter(users::Column::Email.eq(identifier))
                    .one(&self.database)
                    .await?
            }
        };
        let Some(model) = model else {
            return Err(EngineError::InvalidCredentials);
        };
        if !verify_password(password, &model.password)? {
            return Err(EngineError::InvalidCredentials);
        }
        let roles = self.role_names(&self.database, model.id).await?;
        Ok(User::from_model(model, roles))
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let roles = self.role_names(&self.database, model.id).await?;
        Ok(User::from_model(model, roles))
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let roles = self.role_names(&self.database, model.id).await?;
        Ok(User::from_model(model, roles))
    }

    pub async fn change_password(&self, user_id: Uuid, new_password: &str) -> ResultEngine<()> {
        let hash = hash_password(new_password, self.password_cost)?;
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            let mut active: users::ActiveModel = model.into();
            active.password = ActiveValue::Set(hash);
            active.updated_at = ActiveValue::Set(Utc::now());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Grant a role, creating it if needed. Granting twice is a no-op.
    pub async fn grant_role(&self, user_id: Uuid, role: &str) -> ResultEngine<User> {
        let role = normalize_required_text(role, "role")?.to_uppercase();
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
            self.assign_role(&db_tx, user_id, &role).await?;
            let roles = self.role_names(&db_tx, user_id).await?;
            Ok(User::from_model(model, roles))
        })
    }

    async fn assign_role<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        role: &str,
    ) -> ResultEngine<()> {
        let existing = roles::Entity::find()
            .filter(roles::Column::Name.eq(role))
            .one(db)
            .await?;
        let role_id = match existing {
            Some(model) => model.id,
            None => {
                roles::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4()),
                    name: ActiveValue::Set(role.to_string()),
                    description: ActiveValue::Set(None),
                }
                .insert(db)
                .await?
                .id
            }
        };

        let granted = user_roles::Entity::find_by_id((user_id, role_id))
            .one(db)
            .await?
            .is_some();
        if !granted {
            user_roles::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                role_id: ActiveValue::Set(role_id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    async fn role_names<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<Vec<String>> {
        let rows = roles::Entity::find()
            .inner_join(user_roles::Entity)
            .filter(user_roles::Column::UserId.eq(user_id))
            .order_by_asc(roles::Column::Name)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|role| role.name).collect())
    }
}
