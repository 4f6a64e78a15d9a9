//! Static pre-load documents.
//!
//! The launcher can hand each switch a YAML document enumerating VLANs,
//! interface settings, routes, and VRFs, applied at boot through the same
//! mutators the CLI uses. The JunOS NETCONF adapter reuses the same
//! document type as its `edit-config` payload.
//!
//! ```yaml
//! vlans:
//!   - number: 1000
//!     name: some-lan
//! interfaces:
//!   - name: FastEthernet0/1
//!     description: uplink
//!     mode: access
//!     access_vlan: 1000
//! routes:
//!   - destination: 10.0.0.0/24
//!     next_hop: 192.168.1.1
//! vrfs:
//!   - SOME-LAN
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ip::{StaticRoute, parse_addr, parse_mask};
use crate::config::{InterfaceIp, PortKind, PortMode, SwitchConfiguration};
use crate::error::ConfigError;

/// A static pre-load document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// VLANs to create.
    pub vlans: Vec<VlanDecl>,

    /// Interface settings to apply.
    pub interfaces: Vec<InterfaceDecl>,

    /// Static routes.
    pub routes: Vec<RouteDecl>,

    /// VRFs to create.
    pub vrfs: Vec<String>,
}

/// One VLAN declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanDecl {
    /// VLAN number.
    pub number: i64,

    /// Optional name.
    pub name: Option<String>,
}

/// One interface declaration. The interface is created if the switch
/// does not already carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceDecl {
    /// Vendor-canonical interface name.
    pub name: String,

    /// Description line.
    pub description: Option<String>,

    /// Administratively down.
    pub shutdown: bool,

    /// Switchport mode: `access`, `trunk`, or `general`.
    pub mode: Option<String>,

    /// Access VLAN; must be declared in `vlans` or already exist.
    pub access_vlan: Option<u16>,

    /// Trunk native VLAN.
    pub trunk_native_vlan: Option<u16>,

    /// Trunk allowed VLANs in `a-b,c` form.
    pub trunk_vlans: Option<String>,

    /// Addresses: `A.B.C.D/L`, first entry primary.
    pub ips: Vec<String>,

    /// Bound VRF.
    pub vrf: Option<String>,
}

/// One static route declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteDecl {
    /// Destination in `A.B.C.D/L` or `A.B.C.D M.M.M.M` form.
    pub destination: String,

    /// Next-hop address.
    pub next_hop: String,
}

/// Parse a document from YAML.
pub fn from_yaml(text: &str) -> Result<StaticConfig, ConfigError> {
    serde_yaml::from_str(text).map_err(|err| ConfigError::InvalidValue(err.to_string()))
}

/// Apply a document to a switch configuration through the shared
/// mutators. Declarations are applied in order: vrfs, vlans, interfaces,
/// routes.
pub fn apply(config: &mut SwitchConfiguration, doc: &StaticConfig) -> Result<(), ConfigError> {
    for vrf in &doc.vrfs {
        config.ensure_vrf(vrf);
    }

    for vlan in &doc.vlans {
        let entry = config.ensure_vlan(vlan.number)?;
        if vlan.name.is_some() {
            entry.name = vlan.name.clone();
        }
    }

    for decl in &doc.interfaces {
        apply_interface(config, decl)?;
    }

    for route in &doc.routes {
        let (destination, mask) = parse_destination(&route.destination)?;
        let next_hop = parse_addr(&route.next_hop)?;
        config.add_route(StaticRoute {
            destination,
            mask,
            next_hop,
        });
    }

    Ok(())
}

fn apply_interface(
    config: &mut SwitchConfiguration,
    decl: &InterfaceDecl,
) -> Result<(), ConfigError> {
    if decl.name.is_empty() {
        return Err(ConfigError::InvalidValue("interface without name".into()));
    }
    config.ensure_port(&decl.name, PortKind::Physical);

    if let Some(vrf) = &decl.vrf {
        config.bind_port_vrf(&decl.name, vrf)?;
    }
    if let Some(vlan) = decl.access_vlan {
        config.set_access_vlan(&decl.name, vlan)?;
    }

    for (index, spec) in decl.ips.iter().enumerate() {
        let (address, mask) = parse_destination(spec)?;
        let entry = if index == 0 {
            InterfaceIp::primary(address, mask)
        } else {
            InterfaceIp::secondary(address, mask)
        };
        config.add_port_ip(&decl.name, entry)?;
    }

    let port = config
        .port_mut(&decl.name)
        .ok_or_else(|| ConfigError::PortNotFound(decl.name.clone()))?;
    if decl.description.is_some() {
        port.description = decl.description.clone();
    }
    port.shutdown = decl.shutdown;
    if let Some(mode) = &decl.mode {
        port.mode = match mode.as_str() {
            "access" => PortMode::Access,
            "trunk" => PortMode::Trunk,
            "general" => PortMode::General,
            other => return Err(ConfigError::InvalidValue(other.to_string())),
        };
    }
    if let Some(native) = decl.trunk_native_vlan {
        port.trunk_native_vlan = Some(native);
    }
    if let Some(spec) = &decl.trunk_vlans {
        port.trunk_vlans = Some(crate::config::port::parse_vlan_ranges(spec)?);
    }

    Ok(())
}

/// Parse `A.B.C.D/L` or `A.B.C.D M.M.M.M` into address and mask.
fn parse_destination(spec: &str) -> Result<(std::net::Ipv4Addr, std::net::Ipv4Addr), ConfigError> {
    if let Some((address, len)) = spec.split_once('/') {
        let address = parse_addr(address)?;
        let len: u8 = len
            .parse()
            .map_err(|_| ConfigError::InvalidValue(spec.to_string()))?;
        if len > 32 {
            return Err(ConfigError::InvalidValue(spec.to_string()));
        }
        let mask = if len == 0 { 0 } else { u32::MAX << (32 - len) };
        return Ok((address, mask.into()));
    }
    if let Some((address, mask)) = spec.split_once(' ') {
        return Ok((parse_addr(address)?, parse_mask(mask.trim())?));
    }
    Err(ConfigError::InvalidValue(spec.to_string()))
}

/// The config paths a document touches, in NETCONF terms. Used for the
/// JunOS commit-conflict rule.
pub fn touched_paths(doc: &StaticConfig) -> Vec<String> {
    let mut paths = Vec::new();
    for vlan in &doc.vlans {
        paths.push(format!("vlans/{}", vlan.number));
    }
    for iface in &doc.interfaces {
        paths.push(format!("interfaces/{}", iface.name));
    }
    if !doc.routes.is_empty() {
        paths.push("routing-options/static".to_string());
    }
    for vrf in &doc.vrfs {
        paths.push(format!("routing-instances/{vrf}"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
vlans:
  - number: 1000
    name: some-lan
interfaces:
  - name: FastEthernet0/1
    description: uplink
    mode: access
    access_vlan: 1000
  - name: Vlan1000
    ips:
      - 1.1.1.1/24
routes:
  - destination: 10.0.0.0/24
    next_hop: 192.168.1.1
vrfs:
  - SOME-LAN
"#;

    #[test]
    fn test_yaml_round_trip_apply() {
        let doc = from_yaml(DOC).unwrap();
        let mut config = SwitchConfiguration::new("sw");
        apply(&mut config, &doc).unwrap();

        assert_eq!(config.vlan(1000).unwrap().name.as_deref(), Some("some-lan"));
        let port = config.port("FastEthernet0/1").unwrap();
        assert_eq!(port.description.as_deref(), Some("uplink"));
        assert_eq!(port.access_vlan, Some(1000));
        assert_eq!(
            config
                .port("Vlan1000")
                .unwrap()
                .primary_ip()
                .unwrap()
                .to_string(),
            "1.1.1.1/24"
        );
        assert_eq!(config.static_routes.len(), 1);
        assert!(config.has_vrf("SOME-LAN"));
    }

    #[test]
    fn test_unknown_access_vlan_fails() {
        let doc = from_yaml(
            "interfaces:\n  - name: FastEthernet0/1\n    access_vlan: 999\n",
        )
        .unwrap();
        let mut config = SwitchConfiguration::new("sw");
        assert!(matches!(
            apply(&mut config, &doc),
            Err(ConfigError::VlanNotFound(999))
        ));
    }

    #[test]
    fn test_touched_paths() {
        let doc = from_yaml(DOC).unwrap();
        let paths = touched_paths(&doc);
        assert!(paths.contains(&"vlans/1000".to_string()));
        assert!(paths.contains(&"interfaces/FastEthernet0/1".to_string()));
        assert!(paths.contains(&"routing-options/static".to_string()));
        assert!(paths.contains(&"routing-instances/SOME-LAN".to_string()));
    }
}
