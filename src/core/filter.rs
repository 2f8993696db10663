use crate::core::errors::Result;
use crate::core::service_tag::ServiceTag;
use ipnetwork::Ipv4Network;
use log::{debug, trace};
use std::collections::BTreeMap;

/*-------------------------------------------------------------------------------------------------
  Constants
-------------------------------------------------------------------------------------------------*/

/// Name prefix of the Service Tags that describe an Azure region's address space
/// (`AzureCloud.<region>`).
pub const AZURE_CLOUD_REGION_PREFIX: &str = "AzureCloud.";

/*-------------------------------------------------------------------------------------------------
  Filter
-------------------------------------------------------------------------------------------------*/

/// The regions and services requested by the caller, plus the name prefix that identifies region
/// Service Tags.
#[derive(Clone, Debug)]
pub struct Filter {
    pub region_prefix: String,
    pub regions: Vec<String>,
    pub services: Vec<String>,
}

impl Filter {
    /// Create a [Filter] for the provided regions and services using the
    /// [AZURE_CLOUD_REGION_PREFIX] region prefix.
    pub fn new<R, S>(regions: R, services: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            region_prefix: AZURE_CLOUD_REGION_PREFIX.to_string(),
            regions: regions.into_iter().map(Into::into).collect(),
            services: services.into_iter().map(Into::into).collect(),
        }
    }

    /// Override the name prefix used to identify region Service Tags.
    pub fn region_prefix(mut self, region_prefix: &str) -> Self {
        self.region_prefix = region_prefix.to_string();
        self
    }
}

/*-------------------------------------------------------------------------------------------------
  Filter Functions
-------------------------------------------------------------------------------------------------*/

/// Select the region Service Tags: records whose name starts with `region_prefix` and whose
/// region is one of `regions`. Document order is preserved.
pub fn filter_regions<'t, S: AsRef<str>>(
    service_tags: &'t [ServiceTag],
    regions: &[S],
    region_prefix: &str,
) -> Vec<&'t ServiceTag> {
    let matches: Vec<&ServiceTag> = service_tags
        .iter()
        .filter(|service_tag| {
            service_tag.name.starts_with(region_prefix) && service_tag.in_region(regions)
        })
        .collect();
    debug!("Matched {} region Service Tag(s)", matches.len());
    matches
}

/// Select the Service Tags whose name is one of `services`. Document order is preserved;
/// requested names with no record are dropped.
pub fn filter_services<'t, S: AsRef<str>>(
    service_tags: &'t [ServiceTag],
    services: &[S],
) -> Vec<&'t ServiceTag> {
    let matches: Vec<&ServiceTag> = service_tags
        .iter()
        .filter(|service_tag| {
            services
                .iter()
                .any(|service| service.as_ref() == service_tag.name)
        })
        .collect();
    debug!("Matched {} service Service Tag(s)", matches.len());
    matches
}

/// Build the region map: region name to the IPv4 networks of that region's Service Tag(s).
/// Networks from several records for the same region are concatenated in document order.
pub fn region_networks(region_tags: &[&ServiceTag]) -> Result<BTreeMap<String, Vec<Ipv4Network>>> {
    let mut region_networks: BTreeMap<String, Vec<Ipv4Network>> = BTreeMap::new();

    for region_tag in region_tags {
        let Some(region) = region_tag.region.as_ref() else {
            continue;
        };
        let networks = region_tag.ipv4_networks()?;
        trace!(
            "Region {region}: {} IPv4 prefix(es) from {}",
            networks.len(),
            region_tag.name
        );
        region_networks
            .entry(region.clone())
            .or_default()
            .extend(networks.into_iter().map(|(_, network)| network));
    }

    Ok(region_networks)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
