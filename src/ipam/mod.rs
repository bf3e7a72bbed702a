// Network ranges that can be passed to SecurityGroupResourceBuilder::allow_access_from

use crate::domain::model::DEFAULT_PROTOCOL;
use crate::domain::ports::IpAddressManagement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeOffice {
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
}

impl HomeOffice {
    pub const CIDR: &'static str = "192.168.1.0/24";
    pub const DESCRIPTION: &'static str = "My Home Network";

    pub fn new() -> Self {
        Self {
            from_port: None,
            to_port: None,
        }
    }

    pub fn with_port(self, port: i32) -> Self {
        self.with_ports(port, port)
    }

    pub fn with_ports(mut self, from_port: i32, to_port: i32) -> Self {
        self.from_port = Some(from_port);
        self.to_port = Some(to_port);
        self
    }
}

impl Default for HomeOffice {
    fn default() -> Self {
        Self::new()
    }
}

impl IpAddressManagement for HomeOffice {
    fn cidr(&self) -> &str {
        Self::CIDR
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn from_port(&self) -> Option<i32> {
        self.from_port
    }

    fn to_port(&self) -> Option<i32> {
        self.to_port
    }
}

/// Any other range: office VPN, partner network, a single /32 ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedNetwork {
    pub cidr: String,
    pub description: String,
    pub protocol: String,
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
}

impl NamedNetwork {
    pub fn new(cidr: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            description: description.into(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            from_port: None,
            to_port: None,
        }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_port(self, port: i32) -> Self {
        self.with_ports(port, port)
    }

    pub fn with_ports(mut self, from_port: i32, to_port: i32) -> Self {
        self.from_port = Some(from_port);
        self.to_port = Some(to_port);
        self
    }
}

impl IpAddressManagement for NamedNetwork {
    fn cidr(&self) -> &str {
        &self.cidr
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn from_port(&self) -> Option<i32> {
        self.from_port
    }

    fn to_port(&self) -> Option<i32> {
        self.to_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_office_defaults_to_all_tcp_ports() {
        let home = HomeOffice::new();
        assert_eq!(home.cidr(), "192.168.1.0/24");
        assert_eq!(home.description(), "My Home Network");
        assert_eq!(home.protocol(), "tcp");
        assert_eq!(home.from_port(), None);
        assert_eq!(home.to_port(), None);
    }

    #[test]
    fn test_named_network_overrides() {
        let vpn = NamedNetwork::new("10.8.0.0/16", "Office VPN")
            .with_protocol("udp")
            .with_ports(1194, 1195);

        assert_eq!(vpn.protocol(), "udp");
        assert_eq!(vpn.from_port(), Some(1194));
        assert_eq!(vpn.to_port(), Some(1195));
    }
}
