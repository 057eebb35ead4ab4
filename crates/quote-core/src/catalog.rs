//! # Catalog Lookup
//!
//! Read-only, indexed access to the service catalog.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::ServiceCatalogItem;
use crate::validation::{validate_amount, validate_service_id};

/// The service catalog, in configuration order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ServiceCatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting malformed ids, negative fees and
    /// duplicate ids.
    pub fn new(items: Vec<ServiceCatalogItem>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            validate_service_id(&item.id)?;
            validate_amount("professional_fee", item.professional_fee)?;
            validate_amount("government_fee", item.government_fee)?;

            if index.insert(item.id.clone(), position).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "service id".to_string(),
                    value: item.id.clone(),
                }
                .into());
            }
        }

        Ok(Catalog { items, index })
    }

    /// Looks up a service by id.
    pub fn get(&self, id: &str) -> Option<&ServiceCatalogItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    /// Looks up a service by id, failing with `UnknownService`.
    pub fn require(&self, id: &str) -> CoreResult<&ServiceCatalogItem> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownService(id.to_string()))
    }

    /// Checks whether the catalog offers a service.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All services in configuration order.
    pub fn items(&self) -> &[ServiceCatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
