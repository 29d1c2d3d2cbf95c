use uuid::Uuid;

use roster_types::player::{PlayerChanges, PlayerFields};

use crate::{cqrs::Command, images::ImageUpload};

#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub id: Uuid,
    pub fields: PlayerFields,
    pub image: Option<ImageUpload>,
}

impl CreatePlayer {
    pub fn new(fields: PlayerFields, image: Option<ImageUpload>) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
            image,
        }
    }
}

impl Command for CreatePlayer {}

/// Covers both partial (PATCH) and full (PUT) updates: a full update
/// simply carries every field in `changes`.
#[derive(Debug, Clone)]
pub struct UpdatePlayer {
    pub player_id: Uuid,
    pub changes: PlayerChanges,
    /// Replaces the current image, which is then removed from the store.
    pub image: Option<ImageUpload>,
}

impl Command for UpdatePlayer {}

#[derive(Debug, Clone)]
pub struct DeletePlayer {
    pub player_id: Uuid,
}

impl Command for DeletePlayer {}
