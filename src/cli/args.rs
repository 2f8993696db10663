use clap::Parser;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

const AFTER_HELP: &str = "\
Examples:
  azureipranges --target_regions northeurope northeurope2 --target_services PowerBI PowerQueryOnline
  azureipranges --target_regions westeurope --target_services PowerBI --source_file_path 'tests/testfiles/ServiceTags_Public_test.json'

License: MIT";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Retrieve Azure service IP ranges for specified regions and services.",
    long_about = None,
    after_help = AFTER_HELP
)]
pub struct Args {
    /// List of target regions to filter (e.g., northeurope northeurope2)
    #[arg(long = "target_regions", value_name = "REGION", num_args = 1.., required = true)]
    pub target_regions: Vec<String>,

    /// List of target service names to filter (e.g., PowerBI PowerQueryOnline)
    #[arg(long = "target_services", value_name = "SERVICE", num_args = 1.., required = true)]
    pub target_services: Vec<String>,

    /// Path to service tag file to read from
    #[arg(long = "source_file_path", value_name = "PATH")]
    pub source_file_path: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
