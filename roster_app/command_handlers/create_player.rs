use std::sync::Arc;

use roster_types::Result;
use roster_types::player::Player;

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::CreatePlayer},
    images::{ImageStore, discard_image, store_upload},
    uow::UnitOfWork,
};

pub struct CreatePlayerCommandHandler {
    images: Arc<dyn ImageStore>,
}

impl CreatePlayerCommandHandler {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self { images }
    }
}

#[async_trait::async_trait]
impl CommandHandler<CreatePlayer> for CreatePlayerCommandHandler {
    async fn handle(
        &self,
        command: CreatePlayer,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<()> {
        let image = match command.image {
            Some(upload) => Some(store_upload(self.images.as_ref(), upload).await?),
            None => None,
        };

        let player = Player::new(command.id, command.fields, image);

        if let Err(e) = uow.players().create(&player).await {
            if let Some(image) = &player.image {
                discard_image(self.images.as_ref(), &image.filename).await;
            }
            return Err(e);
        }

        tracing::info!("Created player {} ({})", player.id, player.name);
        Ok(())
    }
}
