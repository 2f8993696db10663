/*-------------------------------------------------------------------------------------------------
  Utilities
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  IP Network Supplemental Functions
--------------------------------------------------------------------------------------*/

pub mod ipnetwork {
    use crate::core::errors::{Error, Result};
    use ipnetwork::Ipv4Network;

    /// Service Tag address prefixes mix IPv4 and IPv6 CIDRs; any prefix containing a `:` is
    /// treated as IPv6.
    pub fn is_ipv6_prefix(prefix: &str) -> bool {
        prefix.contains(':')
    }

    /*
        Ipv4Network accepts interface-style CIDRs (e.g. `10.0.1.5/24`) and keeps
        the host bits. Service Tag prefixes are network prefixes, so a prefix
        with host bits set is rejected as malformed input.
    */

    pub fn parse_ipv4_prefix(prefix: &str) -> Result<Ipv4Network> {
        let network: Ipv4Network = prefix
            .parse()
            .map_err(|error| Error::MalformedInput(format!("Invalid IPv4 prefix {prefix:?}: {error}")))?;

        if network.ip() != network.network() {
            return Err(Error::MalformedInput(format!(
                "Invalid IPv4 prefix {prefix:?}: has host bits set"
            )));
        }

        Ok(network)
    }

    /*
        The Ipv4Network and Ipv6Network types implement an is_subnet_of() method;
        containment includes equality.
    */

    pub fn is_subnet_of(subnet: Ipv4Network, supernet: Ipv4Network) -> bool {
        subnet.is_subnet_of(supernet)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
