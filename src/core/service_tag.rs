use crate::core::errors::Result;
use crate::core::json::JsonServiceTag;
use crate::core::utils;
use ipnetwork::Ipv4Network;

/*-------------------------------------------------------------------------------------------------
  Service Tag
-------------------------------------------------------------------------------------------------*/

/// A named group of Azure IP prefixes (a region's `AzureCloud.<region>` tag or a service tag such
/// as `PowerBI`), as published in the Service Tags document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServiceTag {
    pub name: String,
    pub region: Option<String>,

    /// Address prefixes exactly as published (IPv4 and IPv6 mixed), in document order.
    pub address_prefixes: Vec<String>,
}

/*--------------------------------------------------------------------------------------
  Service Tag Implementation
--------------------------------------------------------------------------------------*/

impl ServiceTag {
    /// The tag's IPv4 prefixes paired with the published prefix string, in document order.
    /// IPv6 prefixes are skipped.
    pub fn ipv4_networks(&self) -> Result<Vec<(&str, Ipv4Network)>> {
        self.address_prefixes
            .iter()
            .map(String::as_str)
            .filter(|prefix| !utils::ipnetwork::is_ipv6_prefix(prefix))
            .map(|prefix| {
                utils::ipnetwork::parse_ipv4_prefix(prefix).map(|network| (prefix, network))
            })
            .collect()
    }

    /// `true` when the tag's region is one of `regions` (exact, case-sensitive match).
    pub fn in_region<S: AsRef<str>>(&self, regions: &[S]) -> bool {
        self.region
            .as_deref()
            .is_some_and(|region| regions.iter().any(|target| target.as_ref() == region))
    }
}

impl From<&JsonServiceTag<'_>> for ServiceTag {
    fn from(json_service_tag: &JsonServiceTag<'_>) -> Self {
        let properties = &json_service_tag.properties;
        Self {
            name: json_service_tag.name.to_string(),
            region: properties.region.as_ref().map(|region| region.to_string()),
            address_prefixes: properties
                .address_prefixes
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
