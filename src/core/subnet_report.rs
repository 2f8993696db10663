use crate::core::errors::Result;
use crate::core::filter::{self, Filter};
use crate::core::service_tag::ServiceTag;
use crate::core::service_tags::ServiceTags;
use crate::core::utils;
use ipnetwork::Ipv4Network;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Subnet Report
-------------------------------------------------------------------------------------------------*/

/// Service name to region name to the service's subnets contained in that region's address
/// space. Subnets are the published prefix strings, in the service's document order.
///
/// A service with no Service Tag record has no entry. A matched service has an entry for every
/// requested region found in the Service Tags (possibly an empty list); requested regions with no
/// region Service Tag have no entry.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubnetReport {
    services: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/*--------------------------------------------------------------------------------------
  Subnet Report Implementation
--------------------------------------------------------------------------------------*/

impl SubnetReport {
    /// Build the report for the regions and services in `filter`.
    pub fn build(service_tags: &ServiceTags, filter: &Filter) -> Result<Self> {
        let region_tags = filter::filter_regions(
            service_tags.values(),
            filter.regions.as_slice(),
            &filter.region_prefix,
        );
        let service_matches =
            filter::filter_services(service_tags.values(), filter.services.as_slice());
        let region_networks = filter::region_networks(&region_tags)?;

        let mut services: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
        for service_tag in service_matches {
            let regions = service_regions(service_tag, &region_networks)?;
            services.insert(service_tag.name.clone(), regions);
        }

        let report = Self { services };
        info!(
            "Found {} subnet(s) for {} service(s) across {} region(s)",
            report.subnet_count(),
            report.services.len(),
            region_networks.len()
        );
        Ok(report)
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Map of service name to region name to contained subnets.
    pub fn services(&self) -> &BTreeMap<String, BTreeMap<String, Vec<String>>> {
        &self.services
    }

    /// Contained subnets for one service in one region.
    pub fn get(&self, service: &str, region: &str) -> Option<&Vec<String>> {
        self.services
            .get(service)
            .and_then(|regions| regions.get(region))
    }

    /// Total number of subnets across all services and regions.
    pub fn subnet_count(&self) -> usize {
        self.services
            .values()
            .flat_map(|regions| regions.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Display for SubnetReport {
    /// Compact, single-line JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.services).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/*-------------------------------------------------------------------------------------------------
  Subnet Containment
-------------------------------------------------------------------------------------------------*/

/// Keep the service subnets that are a subnet of (or equal to) any of the region's networks,
/// preserving the service's order.
pub fn contained_subnets<'s>(
    service_networks: &[(&'s str, Ipv4Network)],
    region_networks: &[Ipv4Network],
) -> Vec<&'s str> {
    service_networks
        .iter()
        .filter(|(_, subnet)| {
            region_networks
                .iter()
                .any(|network| utils::ipnetwork::is_subnet_of(*subnet, *network))
        })
        .map(|(prefix, _)| *prefix)
        .collect()
}

fn service_regions(
    service_tag: &ServiceTag,
    region_networks: &BTreeMap<String, Vec<Ipv4Network>>,
) -> Result<BTreeMap<String, Vec<String>>> {
    let service_networks = service_tag.ipv4_networks()?;

    Ok(region_networks
        .iter()
        .map(|(region, networks)| {
            let subnets: Vec<String> = contained_subnets(&service_networks, networks)
                .into_iter()
                .map(String::from)
                .collect();
            debug!(
                "{}: {} of {} IPv4 subnet(s) in {region}",
                service_tag.name,
                subnets.len(),
                service_networks.len()
            );
            (region.clone(), subnets)
        })
        .collect())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
