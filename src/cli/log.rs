use azureipranges::{Filter, ServiceTags, SubnetReport};
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Service Tags
--------------------------------------------------------------------------------------*/

pub fn service_tags(service_tags: &ServiceTags) {
    let count_service_tags = service_tags.values().len();
    match (service_tags.cloud(), service_tags.change_number()) {
        (Some(cloud), Some(change_number)) => info!(
            "Loaded {count_service_tags} Service Tag(s) for the {cloud} cloud (change number {change_number})"
        ),
        _ => info!("Loaded {count_service_tags} Service Tag(s)"),
    }
}

/*--------------------------------------------------------------------------------------
  Requested Regions and Services Not Found
--------------------------------------------------------------------------------------*/

pub fn not_found(filter: &Filter, service_tags: &ServiceTags) {
    let regions = service_tags.regions();
    for region in filter.regions.iter() {
        if !regions.contains(region.as_str()) {
            warn!("Region not found in the Service Tags: {region:?}");
        }
    }

    let names = service_tags.names();
    for service in filter.services.iter() {
        if !names.contains(service.as_str()) {
            warn!("Service not found in the Service Tags: {service:?}");
        }
    }
}

/*--------------------------------------------------------------------------------------
  Subnet Report
--------------------------------------------------------------------------------------*/

pub fn subnet_report(subnet_report: &SubnetReport) {
    let count_services = subnet_report.services().len();
    let count_subnets = subnet_report.subnet_count();
    info!("Reporting {count_subnets} subnet(s) for {count_services} service(s)");

    for (service, regions) in subnet_report.services() {
        for (region, subnets) in regions {
            if subnets.is_empty() {
                info!("{service}: no subnets in {region}");
            }
        }
    }
}
