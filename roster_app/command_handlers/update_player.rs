use std::sync::Arc;

use roster_types::Result;
use roster_types::errors::DbError;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::UpdatePlayer},
    images::{ImageStore, discard_image, store_upload},
    uow::UnitOfWork,
};

pub struct UpdatePlayerCommandHandler {
    images: Arc<dyn ImageStore>,
    replaced_image: Mutex<Option<String>>,
}

impl UpdatePlayerCommandHandler {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self {
            images,
            replaced_image: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl CommandHandler<UpdatePlayer> for UpdatePlayerCommandHandler {
    async fn handle(
        &self,
        command: UpdatePlayer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<()> {
        let repo = uow.players();
        let player_id = command.player_id;

        let existing = repo
            .get_by_id(player_id)
            .await?
            .ok_or(DbError::PlayerNotFound(player_id))?;

        let mut changes = command.changes;
        if let Some(upload) = command.image {
            changes.image = Some(store_upload(self.images.as_ref(), upload).await?);
        }

        let updated = match repo.update(player_id, &changes).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(image) = &changes.image {
                    discard_image(self.images.as_ref(), &image.filename).await;
                }
                return Err(e);
            }
        };

        if updated.is_none() {
            if let Some(image) = &changes.image {
                discard_image(self.images.as_ref(), &image.filename).await;
            }
            return Err(DbError::PlayerNotFound(player_id).into());
        }

        // The previous file stays until the new reference is committed.
        if changes.image.is_some() {
            if let Some(previous) = existing.image {
                *self.replaced_image.lock().await = Some(previous.filename);
            }
        }

        tracing::info!("Updated player {}", player_id);
        Ok(())
    }

    async fn after_commit(&self) {
        let replaced = self.replaced_image.lock().await.take();
        if let Some(filename) = replaced {
            discard_image(self.images.as_ref(), &filename).await;
        }
    }
}
