use crate::{
    repositories::{
        game_version::{GameVersion, GameVersionFilter, GameVersionRepository},
        record::Record,
    },
    services::error::ServiceError,
};
use model::pagination::{page::Page, request::PageRequest};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct GameVersionService {
    repository: GameVersionRepository,
}

impl GameVersionService {
    pub fn new(repository: GameVersionRepository) -> Self {
        GameVersionService { repository }
    }

    pub async fn get_all(
        &self,
        filter: &GameVersionFilter,
        request: &PageRequest,
    ) -> Result<Page<GameVersion>, ServiceError> {
        debug!(
            "Looking up game versions in search mode. Using parameters: {:?}, {:?}",
            filter, request
        );
        let page = self.repository.find_all_by(filter, request).await?;
        if page.is_empty() {
            return Err(ServiceError::NoEntriesFound(GameVersion::ENTITY));
        }
        Ok(page)
    }

    pub async fn get_by(&self, id: Uuid) -> Result<GameVersion, ServiceError> {
        debug!("Looking up game version by id: {}", id);
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EntryNotFound {
                id,
                entity: GameVersion::ENTITY,
            })
    }
}
