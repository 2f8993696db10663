use crate::core::errors::Result;
use crate::core::json;
use crate::core::service_tag::ServiceTag;
use std::collections::BTreeSet;

/*-------------------------------------------------------------------------------------------------
  Service Tags
-------------------------------------------------------------------------------------------------*/

/// All Service Tag records published in one version of the Azure Service Tags document.
#[derive(Clone, Debug, Default)]
pub struct ServiceTags {
    pub(crate) change_number: Option<u64>,
    pub(crate) cloud: Option<String>,
    pub(crate) values: Vec<ServiceTag>,
}

/*--------------------------------------------------------------------------------------
  Service Tags Implementation
--------------------------------------------------------------------------------------*/

impl ServiceTags {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Version number of the Service Tags document.
    pub fn change_number(&self) -> Option<u64> {
        self.change_number
    }

    /// Cloud the document was published for (e.g. `Public`).
    pub fn cloud(&self) -> Option<&str> {
        self.cloud.as_deref()
    }

    /// Service Tag records in document order.
    pub fn values(&self) -> &[ServiceTag] {
        &self.values
    }

    /// Get the first Service Tag record with the provided name.
    pub fn get(&self, name: &str) -> Option<&ServiceTag> {
        self.values.iter().find(|service_tag| service_tag.name == name)
    }

    /// Region names carried by the Service Tag records.
    pub fn regions(&self) -> BTreeSet<&str> {
        self.values
            .iter()
            .filter_map(|service_tag| service_tag.region.as_deref())
            .filter(|region| !region.is_empty())
            .collect()
    }

    /// Names of all Service Tag records.
    pub fn names(&self) -> BTreeSet<&str> {
        self.values
            .iter()
            .map(|service_tag| service_tag.name.as_str())
            .collect()
    }

    /*-------------------------------------------------------------------------
      Parse from JSON
    -------------------------------------------------------------------------*/

    pub fn from_json(json: &str) -> Result<Box<ServiceTags>> {
        let json_service_tags = json::parse(json)?;

        Ok(Box::new(ServiceTags {
            change_number: json_service_tags.change_number,
            cloud: json_service_tags.cloud.as_ref().map(|cloud| cloud.to_string()),
            values: json_service_tags
                .values
                .iter()
                .map(ServiceTag::from)
                .collect(),
        }))
    }
}

impl From<Vec<ServiceTag>> for ServiceTags {
    fn from(values: Vec<ServiceTag>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
