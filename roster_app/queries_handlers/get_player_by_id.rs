use async_trait::async_trait;
use std::sync::Arc;

use roster_types::errors::{ApplicationError, DbError};

use crate::{
    config::Config,
    cqrs::{Query, QueryHandler, queries::GetPlayerById},
    uow::UnitOfWork,
};

pub struct GetPlayerByIdHandler {}

impl GetPlayerByIdHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetPlayerById> for GetPlayerByIdHandler {
    async fn handle(
        &self,
        query: GetPlayerById,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<<GetPlayerById as Query>::Output, ApplicationError> {
        uow.players()
            .get_by_id(query.player_id)
            .await?
            .ok_or_else(|| DbError::PlayerNotFound(query.player_id).into())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use roster_types::player::Player;

    use super::*;
    use crate::test_utils::tests::{MockUnitOfWork, player_fields, test_config};

    #[tokio::test]
    async fn test_get_player_by_id_returns_stored_fields() {
        let uow: Box<dyn UnitOfWork<'static>> = Box::new(MockUnitOfWork::new());
        let player = Player::new(Uuid::new_v4(), player_fields("Virat Kohli", "RCB", 6000), None);
        uow.players().create(&player).await.unwrap();

        let found = GetPlayerByIdHandler::new()
            .handle(
                GetPlayerById {
                    player_id: player.id,
                },
                &uow,
                &test_config(),
            )
            .await
            .unwrap();

        assert_eq!(found, player);
    }

    #[tokio::test]
    async fn test_get_unknown_player_is_not_found() {
        let uow: Box<dyn UnitOfWork<'static>> = Box::new(MockUnitOfWork::new());

        let result = GetPlayerByIdHandler::new()
            .handle(
                GetPlayerById {
                    player_id: Uuid::new_v4(),
                },
                &uow,
                &test_config(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Db(DbError::PlayerNotFound(_)))
        ));
    }
}
