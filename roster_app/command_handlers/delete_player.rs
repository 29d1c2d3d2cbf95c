use std::sync::Arc;

use roster_types::Result;
use roster_types::errors::DbError;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::DeletePlayer},
    images::{ImageStore, discard_image},
    uow::UnitOfWork,
};

pub struct DeletePlayerCommandHandler {
    images: Arc<dyn ImageStore>,
    orphaned_image: Mutex<Option<String>>,
}

impl DeletePlayerCommandHandler {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self {
            images,
            orphaned_image: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl CommandHandler<DeletePlayer> for DeletePlayerCommandHandler {
    async fn handle(
        &self,
        command: DeletePlayer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<()> {
        let repo = uow.players();
        let player_id = command.player_id;

        let existing = repo
            .get_by_id(player_id)
            .await?
            .ok_or(DbError::PlayerNotFound(player_id))?;

        if !repo.delete(player_id).await? {
            return Err(DbError::PlayerNotFound(player_id).into());
        }

        if let Some(image) = existing.image {
            *self.orphaned_image.lock().await = Some(image.filename);
        }

        tracing::info!("Deleted player {}", player_id);
        Ok(())
    }

    async fn after_commit(&self) {
        let orphaned = self.orphaned_image.lock().await.take();
        if let Some(filename) = orphaned {
            discard_image(self.images.as_ref(), &filename).await;
        }
    }
}
