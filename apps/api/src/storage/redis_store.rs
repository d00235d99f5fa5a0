use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;
use crate::portfolio::suggestions::remember;
use crate::storage::drafts::{
    decode_draft, decode_suggestions, draft_key, encode_draft, suggestions_key, DraftStore,
};

/// Redis-backed draft store. One string key per workspace holding the
/// portfolio JSON, plus one for the remembered skill suggestions.
pub struct RedisDraftStore {
    client: redis::Client,
    prefix: String,
}

impl RedisDraftStore {
    pub fn new(client: redis::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn load(&self, workspace_id: Uuid) -> Result<Option<Portfolio>, AppError> {
        let key = draft_key(&self.prefix, workspace_id);
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(&key).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match decode_draft(workspace_id, &raw) {
            Some(portfolio) => Ok(Some(portfolio)),
            None => {
                conn.del::<_, ()>(&key).await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<(), AppError> {
        let key = draft_key(&self.prefix, workspace_id);
        let value = encode_draft(portfolio)?;
        self.conn().await?.set::<_, _, ()>(&key, value).await?;
        debug!(%workspace_id, "draft written to redis");
        Ok(())
    }

    async fn clear(&self, workspace_id: Uuid) -> Result<(), AppError> {
        let key = draft_key(&self.prefix, workspace_id);
        self.conn().await?.del::<_, ()>(&key).await?;
        Ok(())
    }

    async fn suggestions(&self, workspace_id: Uuid) -> Result<Vec<String>, AppError> {
        let key = suggestions_key(&self.prefix, workspace_id);
        let raw: Option<String> = self.conn().await?.get(&key).await?;
        Ok(decode_suggestions(raw.as_deref()))
    }

    async fn remember_skill(&self, workspace_id: Uuid, skill: &str) -> Result<(), AppError> {
        let key = suggestions_key(&self.prefix, workspace_id);
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(&key).await?;
        let mut list = decode_suggestions(raw.as_deref());
        if remember(&mut list, skill) {
            let value = serde_json::to_string(&list)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("{e}")))?;
            conn.set::<_, _, ()>(&key, value).await?;
        }
        Ok(())
    }
}
