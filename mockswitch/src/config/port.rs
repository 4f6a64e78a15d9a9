//! Port model: physical ports, aggregated ports, and VLAN interfaces.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::ip::InterfaceIp;
use crate::error::ConfigError;

/// Port variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// A physical front-panel port.
    Physical,
    /// An aggregated port (port-channel / LAG).
    Aggregated,
    /// A VLAN interface (SVI) bound to a VLAN number.
    Vlan(u16),
}

/// Switchport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortMode {
    /// Mode never configured.
    #[default]
    Unset,
    /// Untagged access port.
    Access,
    /// 802.1Q trunk.
    Trunk,
    /// Dell "general" mode (tagged + untagged with PVID).
    General,
}

/// One HSRP standby group on an L3 interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandbyGroup {
    /// Virtual IP.
    pub ip: Option<Ipv4Addr>,

    /// Secondary virtual IPs.
    pub secondaries: BTreeSet<Ipv4Addr>,

    /// Hello and hold timers, seconds.
    pub timers: Option<(u32, u32)>,

    /// Priority.
    pub priority: Option<u16>,

    /// Preempt enabled.
    pub preempt: bool,

    /// Preempt minimum delay, seconds.
    pub preempt_delay_minimum: Option<u32>,

    /// Authentication string.
    pub authentication: Option<String>,

    /// Tracked objects: object id to priority decrement.
    pub tracks: BTreeMap<String, u16>,
}

impl StandbyGroup {
    /// Whether nothing is configured on the group anymore.
    pub fn is_empty(&self) -> bool {
        self.ip.is_none()
            && self.secondaries.is_empty()
            && self.timers.is_none()
            && self.priority.is_none()
            && !self.preempt
            && self.preempt_delay_minimum.is_none()
            && self.authentication.is_none()
            && self.tracks.is_empty()
    }
}

/// A port in the switch configuration.
///
/// All variants share the same attribute set; vendor processors only expose
/// the commands that make sense for the variant, and the running-config
/// renderers only print non-default attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Vendor-canonical name, e.g. `FastEthernet0/1`, `ethernet 1/g1`,
    /// `ge-0/0/1`, `Vlan1000`, `Port-channel1`.
    pub name: String,

    /// Variant.
    pub kind: PortKind,

    /// Administratively down.
    pub shutdown: bool,

    /// Description line.
    pub description: Option<String>,

    /// Switchport mode.
    pub mode: PortMode,

    /// Access VLAN number. Only ever references an existing VLAN.
    pub access_vlan: Option<u16>,

    /// Trunk encapsulation, e.g. `dot1q`.
    pub trunk_encapsulation: Option<String>,

    /// Trunk native VLAN.
    pub trunk_native_vlan: Option<u16>,

    /// Allowed VLANs on a trunk. `None` means all VLANs (the default);
    /// `Some(empty)` means none.
    pub trunk_vlans: Option<BTreeSet<u16>>,

    /// Dell general-mode PVID.
    pub general_pvid: Option<u16>,

    /// Dell general-mode allowed VLANs.
    pub general_vlans: BTreeSet<u16>,

    /// Interface addresses; at most one primary.
    pub ips: Vec<InterfaceIp>,

    /// DHCP helper addresses, configuration order, duplicates ignored.
    pub ip_helpers: Vec<Ipv4Addr>,

    /// Inbound access group.
    pub access_group_in: Option<String>,

    /// Outbound access group.
    pub access_group_out: Option<String>,

    /// Bound VRF name.
    pub vrf: Option<String>,

    /// `None` is the vendor default (redirects enabled, nothing rendered).
    pub ip_redirects: Option<bool>,

    /// HSRP groups by group number.
    pub standby: BTreeMap<u16, StandbyGroup>,

    /// Aggregation membership: (port-channel id, mode).
    pub channel_group: Option<(u16, String)>,

    /// cisco6500: NTP disabled on the interface.
    pub ntp_disable: bool,

    /// cisco6500: uRPF check enabled.
    pub unicast_rpf: bool,
}

impl Port {
    /// Create a port of the given variant with all attributes at defaults.
    pub fn new(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            kind,
            shutdown: false,
            description: None,
            mode: PortMode::Unset,
            access_vlan: None,
            trunk_encapsulation: None,
            trunk_native_vlan: None,
            trunk_vlans: None,
            general_pvid: None,
            general_vlans: BTreeSet::new(),
            ips: Vec::new(),
            ip_helpers: Vec::new(),
            access_group_in: None,
            access_group_out: None,
            vrf: None,
            ip_redirects: None,
            standby: BTreeMap::new(),
            channel_group: None,
            ntp_disable: false,
            unicast_rpf: false,
        }
    }

    /// Create a physical port.
    pub fn physical(name: impl Into<String>) -> Self {
        Self::new(name, PortKind::Physical)
    }

    /// Create an aggregated port.
    pub fn aggregated(name: impl Into<String>) -> Self {
        Self::new(name, PortKind::Aggregated)
    }

    /// Create a VLAN interface.
    pub fn vlan_interface(name: impl Into<String>, vlan: u16) -> Self {
        Self::new(name, PortKind::Vlan(vlan))
    }

    /// The primary address, if configured.
    pub fn primary_ip(&self) -> Option<&InterfaceIp> {
        self.ips.iter().find(|ip| !ip.secondary)
    }

    /// All secondary addresses, configuration order.
    pub fn secondary_ips(&self) -> impl Iterator<Item = &InterfaceIp> {
        self.ips.iter().filter(|ip| ip.secondary)
    }

    /// Add a helper address; duplicates are ignored.
    pub fn add_ip_helper(&mut self, helper: Ipv4Addr) {
        if !self.ip_helpers.contains(&helper) {
            self.ip_helpers.push(helper);
        }
    }

    /// Remove a helper address.
    pub fn remove_ip_helper(&mut self, helper: Ipv4Addr) -> Result<(), ConfigError> {
        let before = self.ip_helpers.len();
        self.ip_helpers.retain(|h| *h != helper);
        if self.ip_helpers.len() == before {
            return Err(ConfigError::AddressNotFound(helper));
        }
        Ok(())
    }

    /// Remove every address; used by `ip vrf forwarding`.
    pub fn clear_ips(&mut self) {
        self.ips.clear();
    }

    /// Get or create a standby group.
    pub fn standby_group(&mut self, group: u16) -> &mut StandbyGroup {
        self.standby.entry(group).or_default()
    }

    /// Drop a standby group once nothing is configured on it.
    pub fn prune_standby_group(&mut self, group: u16) {
        if self.standby.get(&group).is_some_and(StandbyGroup::is_empty) {
            self.standby.remove(&group);
        }
    }
}

/// Render a VLAN set in the canonical coalesced form: sorted, with runs
/// collapsed into ranges, e.g. `123,124` stays flat but `126,127,128`
/// becomes `126-128`.
pub fn render_vlan_ranges(vlans: &BTreeSet<u16>) -> String {
    let mut out = String::new();
    let mut iter = vlans.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end = iter.next().unwrap();
        }
        if !out.is_empty() {
            out.push(',');
        }
        if end == start {
            out.push_str(&start.to_string());
        } else if end == start + 1 {
            // A two-element run renders flat, not as a range.
            out.push_str(&format!("{},{}", start, end));
        } else {
            out.push_str(&format!("{}-{}", start, end));
        }
    }

    out
}

/// Parse a VLAN list in `a-b,c` form into a set.
pub fn parse_vlan_ranges(spec: &str) -> Result<BTreeSet<u16>, ConfigError> {
    let mut vlans = BTreeSet::new();

    for part in spec.split(',').filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: u16 = lo
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(part.to_string()))?;
                let hi: u16 = hi
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(part.to_string()))?;
                if lo > hi {
                    return Err(ConfigError::InvalidValue(part.to_string()));
                }
                vlans.extend(lo..=hi);
            }
            None => {
                let v: u16 = part
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(part.to_string()))?;
                vlans.insert(v);
            }
        }
    }

    Ok(vlans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_vlan_ranges() {
        let vlans: BTreeSet<u16> = [123, 124, 126, 127, 128].into_iter().collect();
        assert_eq!(render_vlan_ranges(&vlans), "123,124,126-128");

        let single: BTreeSet<u16> = [5].into_iter().collect();
        assert_eq!(render_vlan_ranges(&single), "5");

        let long_run: BTreeSet<u16> = (10..=14).collect();
        assert_eq!(render_vlan_ranges(&long_run), "10-14");

        assert_eq!(render_vlan_ranges(&BTreeSet::new()), "");
    }

    #[test]
    fn test_parse_vlan_ranges() {
        let parsed = parse_vlan_ranges("124,126-128").unwrap();
        assert_eq!(parsed, [124, 126, 127, 128].into_iter().collect());

        assert!(parse_vlan_ranges("10-2").is_err());
        assert!(parse_vlan_ranges("abc").is_err());
    }

    #[test]
    fn test_parse_render_round_trip() {
        let parsed = parse_vlan_ranges("1,3-5,7").unwrap();
        assert_eq!(render_vlan_ranges(&parsed), "1,3-5,7");
    }

    #[test]
    fn test_ip_helper_idempotent() {
        let mut port = Port::physical("FastEthernet0/1");
        let helper = "10.10.10.1".parse().unwrap();
        port.add_ip_helper(helper);
        port.add_ip_helper(helper);
        assert_eq!(port.ip_helpers.len(), 1);

        port.remove_ip_helper(helper).unwrap();
        assert!(port.ip_helpers.is_empty());
        assert!(port.remove_ip_helper(helper).is_err());
    }

    #[test]
    fn test_standby_group_pruning() {
        let mut port = Port::vlan_interface("Vlan1000", 1000);
        port.standby_group(1).priority = Some(110);
        assert_eq!(port.standby.len(), 1);

        port.standby_group(1).priority = None;
        port.prune_standby_group(1);
        assert!(port.standby.is_empty());
    }
}
