use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Tag, TagCmd, tags,
    util::{normalize_color, normalize_name_key, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn tags(&self, user_id: Uuid) -> ResultEngine<Vec<Tag>> {
        let models = tags::Entity::find()
            .filter(tags::Column::UserId.eq(user_id))
            .order_by_asc(tags::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    pub async fn tag(&self, tag_id: Uuid, user_id: Uuid) -> ResultEngine<Tag> {
        let model = self.require_tag(&self.database, tag_id, user_id).await?;
        Ok(Tag::from(model))
    }

    pub async fn create_tag(&self, cmd: TagCmd, user_id: Uuid) -> ResultEngine<Tag> {
        let name = normalize_required_name(&cmd.name, "tag")?;
        let name_norm = normalize_name_key(&name)?;
        let color = normalize_color(cmd.color.as_deref())?;
        with_tx!(self, |db_tx| {
            self.ensure_tag_name_free(&db_tx, user_id, &name, &name_norm, None)
                .await?;
            let now = Utc::now();
            let key = name.clone();
            let active = tags::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                color: ActiveValue::Set(color),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active
                .insert(&db_tx)
                .await
                .map_err(|err| EngineError::from_unique_violation(err, &key))?;
            Ok(Tag::from(model))
        })
    }

    pub async fn update_tag(&self, tag_id: Uuid, cmd: TagCmd, user_id: Uuid) -> ResultEngine<Tag> {
        let name = normalize_required_name(&cmd.name, "tag")?;
        let name_norm = normalize_name_key(&name)?;
        let color = normalize_color(cmd.color.as_deref())?;
        with_tx!(self, |db_tx| {
            let model = self.require_tag(&db_tx, tag_id, user_id).await?;
            self.ensure_tag_name_free(&db_tx, user_id, &name, &name_norm, Some(tag_id))
                .await?;
            let mut active: tags::ActiveModel = model.into();
            let key = name.clone();
            active.name = ActiveValue::Set(name);
            active.name_norm = ActiveValue::Set(name_norm);
            active.color = ActiveValue::Set(color);
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_unique_violation(err, &key))?;
            Ok(Tag::from(model))
        })
    }

    pub async fn delete_tag(&self, tag_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_tag(&db_tx, tag_id, user_id).await?;
            tags::Entity::delete_by_id(tag_id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn ensure_tag_name_free<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        name: &str,
        name_norm: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = tags::Entity::find()
            .filter(tags::Column::UserId.eq(user_id))
            .filter(tags::Column::NameNorm.eq(name_norm));
        if let Some(id) = exclude {
            query = query.filter(tags::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
