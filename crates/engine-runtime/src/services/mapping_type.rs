use crate::{
    repositories::{
        mapping_type::{MappingType, MappingTypeFilter, MappingTypeRepository},
        record::Record,
    },
    services::error::ServiceError,
};
use model::pagination::{page::Page, request::PageRequest};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct MappingTypeService {
    repository: MappingTypeRepository,
}

impl MappingTypeService {
    pub fn new(repository: MappingTypeRepository) -> Self {
        MappingTypeService { repository }
    }

    /// Mapping types matching `filter`, newest first unless the request
    /// asks for another order.
    pub async fn get_all(
        &self,
        filter: &MappingTypeFilter,
        request: &PageRequest,
    ) -> Result<Page<MappingType>, ServiceError> {
        debug!(
            "Looking up mapping types in search mode. Using parameters: {:?}, {:?}",
            filter, request
        );
        let page = self.repository.find_all_by(filter, request).await?;
        if page.is_empty() {
            return Err(ServiceError::NoEntriesFound(MappingType::ENTITY));
        }
        Ok(page)
    }

    /// A mapping type hidden from external callers is reported as missing
    /// when `externally_visible_only` is set.
    pub async fn get_by(
        &self,
        id: Uuid,
        externally_visible_only: bool,
    ) -> Result<MappingType, ServiceError> {
        debug!("Looking up mapping type by id: {}", id);
        self.repository
            .find_by_id(id, externally_visible_only)
            .await?
            .ok_or(ServiceError::EntryNotFound {
                id,
                entity: MappingType::ENTITY,
            })
    }
}
