//! Find which Azure service subnets fall within which Azure regions.
//!
//! Microsoft publishes the Azure IP Ranges and Service Tags as a JSON document: named groups of IP
//! prefixes for each Azure region (`AzureCloud.<region>`) and each Azure service (`PowerBI`,
//! `Storage`, ...). This crate locates and loads that document, filters it to the requested
//! regions and services, and reports the service subnets contained in each region's address
//! space.
//!
//! ```no_run
//! # fn main() -> azureipranges::Result<()> {
//! let service_tags = azureipranges::get_service_tags()?;
//!
//! let filter = azureipranges::Filter::new(["northeurope", "westeurope"], ["PowerBI"]);
//! let report = azureipranges::SubnetReport::build(&service_tags, &filter)?;
//!
//! for (service, regions) in report.services() {
//!     for (region, subnets) in regions {
//!         println!("{service} {region}: {}", subnets.join(", "));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod core;

/*-------------------------------------------------------------------------------------------------
  Primary Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::client::{
    find_download_url, get_service_tags, Client, ClientBuilder, Source,
    DEFAULT_DOWNLOAD_URL_PATTERN, DEFAULT_URL, DEFAULT_USER_AGENT,
};
pub use crate::core::errors::{Error, Result};
pub use crate::core::json;
pub use crate::core::filter::{
    filter_regions, filter_services, region_networks, Filter, AZURE_CLOUD_REGION_PREFIX,
};
pub use crate::core::service_tag::ServiceTag;
pub use crate::core::service_tags::ServiceTags;
pub use crate::core::subnet_report::{contained_subnets, SubnetReport};

/*-------------------------------------------------------------------------------------------------
  Re-exports
-------------------------------------------------------------------------------------------------*/

pub use ipnetwork;
pub use regex;
