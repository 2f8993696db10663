use crate::cli;
use azureipranges::{Client, ClientBuilder, Filter};

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the Service Tags client from CLI arguments
--------------------------------------------------------------------------------------*/

/// Environment configuration plus the `--source_file_path` override.
pub fn build_client(args: &cli::Args) -> Client {
    let mut client_builder = ClientBuilder::new();
    if let Some(source_file_path) = &args.source_file_path {
        client_builder.source_file(source_file_path);
    }
    client_builder.build()
}

/*--------------------------------------------------------------------------------------
  Build the region and service filter from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_filter(args: &cli::Args) -> Filter {
    Filter::new(
        args.target_regions.iter().cloned(),
        args.target_services.iter().cloned(),
    )
}
