/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod client;
pub mod errors;
pub mod filter;
pub mod json;
pub mod service_tag;
pub mod service_tags;
pub mod subnet_report;
pub mod utils;
