use async_trait::async_trait;
use std::sync::Arc;

use roster_types::errors::{AppError, ApplicationError, DbError};

use crate::{
    config::Config,
    cqrs::{
        Query, QueryHandler,
        queries::{GetPlayerImage, PlayerImage},
    },
    images::ImageStore,
    uow::UnitOfWork,
};

pub struct GetPlayerImageHandler {
    images: Arc<dyn ImageStore>,
}

impl GetPlayerImageHandler {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self { images }
    }
}

#[async_trait]
impl QueryHandler<GetPlayerImage> for GetPlayerImageHandler {
    async fn handle(
        &self,
        query: GetPlayerImage,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<<GetPlayerImage as Query>::Output, ApplicationError> {
        let player_id = query.player_id;
        let player = uow
            .players()
            .get_by_id(player_id)
            .await?
            .ok_or(DbError::PlayerNotFound(player_id))?;

        let image = player.image.ok_or(AppError::ImageNotFound(player_id))?;

        let Some(bytes) = self.images.load(&image.filename).await? else {
            tracing::warn!(
                "Player {} references missing image file {}",
                player_id,
                image.filename
            );
            return Err(AppError::ImageNotFound(player_id).into());
        };

        Ok(PlayerImage {
            bytes,
            content_type: image.content_type,
        })
    }
}
