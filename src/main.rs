mod cli;

use azureipranges::{Result, SubnetReport};
use clap::Parser;
use std::process::ExitCode;

/*-------------------------------------------------------------------------------------------------
  Main CLI Function
-------------------------------------------------------------------------------------------------*/

fn main() -> ExitCode {
    let args = cli::Args::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .init()
        .unwrap_or_else(|error| eprintln!("Unable to initialize logging: {error}"));

    match run(&args) {
        Ok(subnet_report) => {
            cli::output::subnet_report(&subnet_report);
            cli::log::subnet_report(&subnet_report);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Load the Service Tags and build the subnet report; nothing is printed to stdout on error.
fn run(args: &cli::Args) -> Result<SubnetReport> {
    let client = cli::build_client(args);
    let service_tags = client.get_service_tags()?;
    cli::log::service_tags(&service_tags);

    let filter = cli::build_filter(args);
    cli::log::not_found(&filter, &service_tags);

    SubnetReport::build(&service_tags, &filter)
}
