use azureipranges::SubnetReport;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Subnet Report
--------------------------------------------------------------------------------------*/

/// Print the report to stdout as a single line of JSON:
/// `{"<service>":{"<region>":["<subnet>",...]}}`.
pub fn subnet_report(subnet_report: &SubnetReport) {
    println!("{subnet_report}");
}
