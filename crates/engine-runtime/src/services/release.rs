use crate::{
    repositories::{
        record::Record,
        release::{Release, ReleaseFilter, ReleaseRepository},
    },
    services::error::ServiceError,
};
use model::pagination::{page::Page, request::PageRequest};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReleaseService {
    repository: ReleaseRepository,
}

impl ReleaseService {
    pub fn new(repository: ReleaseRepository) -> Self {
        ReleaseService { repository }
    }

    pub async fn get_all(
        &self,
        filter: &ReleaseFilter,
        request: &PageRequest,
    ) -> Result<Page<Release>, ServiceError> {
        debug!(
            "Looking up releases in search mode. Using parameters: {:?}, {:?}",
            filter, request
        );
        let page = self.repository.find_all_by(filter, request).await?;
        if page.is_empty() {
            return Err(ServiceError::NoEntriesFound(Release::ENTITY));
        }
        Ok(page)
    }

    pub async fn get_by(&self, id: Uuid) -> Result<Release, ServiceError> {
        debug!("Looking up release by id: {}", id);
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::EntryNotFound {
                id,
                entity: Release::ENTITY,
            })
    }
}
