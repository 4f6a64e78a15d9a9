//! Typed switch configuration model.
//!
//! One [`SwitchConfiguration`] exists per emulated switch. It is shared by
//! every session of that switch behind a per-switch lock and mutated only
//! through the methods here, so the CLI processors, the static pre-load,
//! and the RPC adapters all enforce the same invariants:
//!
//! - VLAN 1 always exists and cannot be renamed or removed
//! - VLAN numbers and port names are unique
//! - a port's access VLAN always references an existing VLAN
//! - at most one primary address per port; overlapping subnets are
//!   rejected across interfaces

pub mod ip;
pub mod port;
pub mod vlan;
pub mod vrf;

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::Mutex;

pub use ip::{InterfaceIp, StaticRoute};
pub use port::{Port, PortKind, PortMode, StandbyGroup};
pub use vlan::{DEFAULT_VLAN, VLAN_MAX, VLAN_MIN, UnicastRpfMode, Vlan};
pub use vrf::{DEFAULT_VRF, Vrf};

use crate::error::ConfigError;

/// A switch configuration shared between sessions, guarded by the
/// per-switch config lock. The lock is held for the duration of a single
/// command's effect, including any commit-delay sleep.
pub type SharedConfig = Arc<Mutex<SwitchConfiguration>>;

/// The central mutable state of one emulated switch.
#[derive(Debug, Clone)]
pub struct SwitchConfiguration {
    /// Hostname.
    pub name: String,

    /// Administrative IP.
    pub ip: Option<Ipv4Addr>,

    /// Accepted enable passwords. The empty string is always accepted.
    pub privileged_passwords: Vec<String>,

    /// Sessions start already privileged.
    pub auto_enabled: bool,

    /// Artificial delay applied to `write memory` and JunOS `commit`.
    pub commit_delay: Duration,

    /// VLAN table, kept sorted by number.
    vlans: IndexMap<u16, Vlan>,

    /// Port table in canonical order: seeded ports first, then created
    /// aggregates and VLAN interfaces in creation order.
    ports: IndexMap<String, Port>,

    /// VRF table.
    vrfs: IndexMap<String, Vrf>,

    /// Static routes in configuration order.
    pub static_routes: Vec<StaticRoute>,

    /// Bumped on every committed JunOS transaction.
    generation: u64,

    /// JunOS conflict tracking: config path to the generation that last
    /// committed it.
    path_generations: HashMap<String, u64>,
}

impl SwitchConfiguration {
    /// Create a configuration seeded with VLAN 1 and the default VRF.
    pub fn new(name: impl Into<String>) -> Self {
        let mut vlans = IndexMap::new();
        vlans.insert(DEFAULT_VLAN, Vlan::new(i64::from(DEFAULT_VLAN)).unwrap());

        let mut vrfs = IndexMap::new();
        vrfs.insert(DEFAULT_VRF.to_string(), Vrf::new(DEFAULT_VRF));

        Self {
            name: name.into(),
            ip: None,
            privileged_passwords: Vec::new(),
            auto_enabled: false,
            commit_delay: Duration::ZERO,
            vlans,
            ports: IndexMap::new(),
            vrfs,
            static_routes: Vec::new(),
            generation: 0,
            path_generations: HashMap::new(),
        }
    }

    /// Seed the port table. Intended for `SwitchCore` construction; panics
    /// if a name repeats.
    pub fn seed_ports(&mut self, ports: Vec<Port>) {
        for port in ports {
            let name = port.name.clone();
            assert!(
                self.ports.insert(name.clone(), port).is_none(),
                "duplicate seeded port {name}"
            );
        }
    }

    // -- VLANs ---------------------------------------------------------

    /// VLANs in ascending number order.
    pub fn vlans(&self) -> impl Iterator<Item = &Vlan> {
        self.vlans.values()
    }

    /// Look up a VLAN.
    pub fn vlan(&self, number: u16) -> Option<&Vlan> {
        self.vlans.get(&number)
    }

    /// Look up a VLAN mutably.
    pub fn vlan_mut(&mut self, number: u16) -> Option<&mut Vlan> {
        self.vlans.get_mut(&number)
    }

    /// Whether a VLAN exists.
    pub fn has_vlan(&self, number: u16) -> bool {
        self.vlans.contains_key(&number)
    }

    /// Get or create a VLAN, validating the number range.
    pub fn ensure_vlan(&mut self, number: i64) -> Result<&mut Vlan, ConfigError> {
        let vlan = Vlan::new(number)?;
        let number = vlan.number;
        if !self.vlans.contains_key(&number) {
            self.vlans.insert(number, vlan);
            self.vlans.sort_keys();
        }
        Ok(self.vlans.get_mut(&number).unwrap())
    }

    /// Remove a VLAN. VLAN 1 is protected; ports referencing the removed
    /// VLAN as their access VLAN are reset to unset.
    pub fn remove_vlan(&mut self, number: u16) -> Result<Vlan, ConfigError> {
        if number == DEFAULT_VLAN {
            return Err(ConfigError::DefaultVlanImmutable);
        }
        let vlan = self
            .vlans
            .shift_remove(&number)
            .ok_or(ConfigError::VlanNotFound(number))?;
        for port in self.ports.values_mut() {
            if port.access_vlan == Some(number) {
                port.access_vlan = None;
            }
        }
        Ok(vlan)
    }

    // -- Ports ---------------------------------------------------------

    /// Ports in canonical order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Look up a port by canonical name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Look up a port mutably by canonical name.
    pub fn port_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.get_mut(name)
    }

    /// Add a port; the name must be unused.
    pub fn add_port(&mut self, port: Port) -> &mut Port {
        let name = port.name.clone();
        debug_assert!(!self.ports.contains_key(&name), "duplicate port {name}");
        self.ports.entry(name).or_insert(port)
    }

    /// Get or create a port, e.g. an SVI or an auto-created port-channel.
    pub fn ensure_port(&mut self, name: &str, kind: PortKind) -> &mut Port {
        if !self.ports.contains_key(name) {
            self.ports.insert(name.to_string(), Port::new(name, kind));
        }
        self.ports.get_mut(name).unwrap()
    }

    /// Remove a created port (SVI or aggregate).
    pub fn remove_port(&mut self, name: &str) -> Result<Port, ConfigError> {
        self.ports
            .shift_remove(name)
            .ok_or_else(|| ConfigError::PortNotFound(name.to_string()))
    }

    /// Set a port's access VLAN; the VLAN must exist.
    pub fn set_access_vlan(&mut self, port: &str, vlan: u16) -> Result<(), ConfigError> {
        if !self.has_vlan(vlan) {
            return Err(ConfigError::VlanNotFound(vlan));
        }
        let port = self
            .port_mut(port)
            .ok_or_else(|| ConfigError::PortNotFound(port.to_string()))?;
        port.access_vlan = Some(vlan);
        Ok(())
    }

    // -- Interface addressing ------------------------------------------

    /// Add an address to a port, enforcing the overlap and primary rules.
    ///
    /// A primary whose address equals one of the port's secondaries
    /// promotes that secondary and drops the former primary. Re-adding an
    /// existing secondary updates its mask in place.
    pub fn add_port_ip(&mut self, port_name: &str, new: InterfaceIp) -> Result<(), ConfigError> {
        // Overlap exclusion across interfaces, checked before any change.
        for port in self.ports.values() {
            if port.name == port_name {
                continue;
            }
            for owned in &port.ips {
                if owned.overlaps(&new) {
                    return Err(ConfigError::AddressOverlap {
                        network: new.network(),
                        owner: port.name.clone(),
                        secondary: owned.secondary,
                    });
                }
            }
        }

        let port = self
            .port_mut(port_name)
            .ok_or_else(|| ConfigError::PortNotFound(port_name.to_string()))?;

        if new.secondary {
            if port.primary_ip().is_some_and(|p| p.address == new.address) {
                return Err(ConfigError::SecondaryIsPrimary(new.address));
            }
            if let Some(existing) = port
                .ips
                .iter_mut()
                .find(|ip| ip.secondary && ip.address == new.address)
            {
                existing.mask = new.mask;
            } else {
                port.ips.push(new);
            }
        } else {
            // Promotion: the new primary may name an existing secondary.
            port.ips
                .retain(|ip| !(ip.secondary && ip.address == new.address));
            match port.ips.iter_mut().find(|ip| !ip.secondary) {
                Some(primary) => *primary = new,
                None => port.ips.insert(0, new),
            }
        }

        Ok(())
    }

    /// Remove an address from a port.
    ///
    /// `None` removes everything. A specific primary is refused while
    /// secondaries remain.
    pub fn remove_port_ip(
        &mut self,
        port_name: &str,
        which: Option<InterfaceIp>,
    ) -> Result<(), ConfigError> {
        let port = self
            .port_mut(port_name)
            .ok_or_else(|| ConfigError::PortNotFound(port_name.to_string()))?;

        let Some(which) = which else {
            port.ips.clear();
            return Ok(());
        };

        let found = port
            .ips
            .iter()
            .position(|ip| {
                ip.address == which.address
                    && ip.mask == which.mask
                    && ip.secondary == which.secondary
            })
            .ok_or(ConfigError::AddressNotFound(which.address))?;

        if !which.secondary && port.ips.iter().any(|ip| ip.secondary) {
            return Err(ConfigError::SecondariesPresent);
        }

        port.ips.remove(found);
        Ok(())
    }

    /// Bind a port to a VRF, wiping its addresses.
    pub fn bind_port_vrf(&mut self, port_name: &str, vrf: &str) -> Result<(), ConfigError> {
        if !self.vrfs.contains_key(vrf) {
            return Err(ConfigError::VrfNotFound(vrf.to_string()));
        }
        let port = self
            .port_mut(port_name)
            .ok_or_else(|| ConfigError::PortNotFound(port_name.to_string()))?;
        port.vrf = Some(vrf.to_string());
        port.clear_ips();
        Ok(())
    }

    // -- VRFs ----------------------------------------------------------

    /// VRFs in insertion order.
    pub fn vrfs(&self) -> impl Iterator<Item = &Vrf> {
        self.vrfs.values()
    }

    /// Whether a VRF exists.
    pub fn has_vrf(&self, name: &str) -> bool {
        self.vrfs.contains_key(name)
    }

    /// Get or create a VRF.
    pub fn ensure_vrf(&mut self, name: &str) -> &mut Vrf {
        if !self.vrfs.contains_key(name) {
            self.vrfs.insert(name.to_string(), Vrf::new(name));
        }
        self.vrfs.get_mut(name).unwrap()
    }

    /// Remove a VRF, unbinding any port that references it.
    pub fn remove_vrf(&mut self, name: &str) -> Result<Vrf, ConfigError> {
        if name == DEFAULT_VRF {
            return Err(ConfigError::VrfNotFound(name.to_string()));
        }
        let vrf = self
            .vrfs
            .shift_remove(name)
            .ok_or_else(|| ConfigError::VrfNotFound(name.to_string()))?;
        for port in self.ports.values_mut() {
            if port.vrf.as_deref() == Some(name) {
                port.vrf = None;
            }
        }
        Ok(vrf)
    }

    // -- Static routes -------------------------------------------------

    /// Add a static route; an existing route to the same destination is
    /// replaced.
    pub fn add_route(&mut self, route: StaticRoute) {
        self.static_routes
            .retain(|r| !(r.destination == route.destination && r.mask == route.mask));
        self.static_routes.push(route);
    }

    /// Remove a static route.
    pub fn remove_route(&mut self, destination: Ipv4Addr, mask: Ipv4Addr) -> Result<(), ConfigError> {
        let before = self.static_routes.len();
        self.static_routes
            .retain(|r| !(r.destination == destination && r.mask == mask));
        if self.static_routes.len() == before {
            return Err(ConfigError::RouteNotFound(destination));
        }
        Ok(())
    }

    // -- Passwords -----------------------------------------------------

    /// Whether an enable password is accepted. The empty string always is.
    pub fn password_accepted(&self, candidate: &str) -> bool {
        candidate.is_empty() || self.privileged_passwords.iter().any(|p| p == candidate)
    }

    // -- JunOS commit tracking -----------------------------------------

    /// Current committed generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation that last committed `path`, if any.
    pub fn path_generation(&self, path: &str) -> Option<u64> {
        self.path_generations.get(path).copied()
    }

    /// Record a committed transaction touching `paths`.
    pub fn record_commit<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.generation += 1;
        for path in paths {
            self.path_generations.insert(path, self.generation);
        }
    }

    /// Take over another configuration's commit history. Used when a
    /// candidate (whose copy of the history is stale) is swapped into
    /// the running config.
    pub fn clone_commit_tracking_from(&mut self, other: &SwitchConfiguration) {
        self.generation = other.generation;
        self.path_generations = other.path_generations.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn config_with_svis() -> SwitchConfiguration {
        let mut config = SwitchConfiguration::new("my_switch");
        config.ensure_vlan(1000).unwrap();
        config.ensure_vlan(2000).unwrap();
        config.ensure_port("Vlan1000", PortKind::Vlan(1000));
        config.ensure_port("Vlan2000", PortKind::Vlan(2000));
        config
    }

    #[test]
    fn test_default_vlan_always_present() {
        let mut config = SwitchConfiguration::new("sw");
        assert!(config.has_vlan(1));
        assert!(matches!(
            config.remove_vlan(1),
            Err(ConfigError::DefaultVlanImmutable)
        ));
        assert_eq!(config.vlan(1).unwrap().display_name(), "default");
    }

    #[test]
    fn test_vlan_ordering() {
        let mut config = SwitchConfiguration::new("sw");
        config.ensure_vlan(300).unwrap();
        config.ensure_vlan(20).unwrap();
        let numbers: Vec<u16> = config.vlans().map(|v| v.number).collect();
        assert_eq!(numbers, vec![1, 20, 300]);
    }

    #[test]
    fn test_vlan_removal_resets_access_vlan() {
        let mut config = SwitchConfiguration::new("sw");
        config.ensure_vlan(123).unwrap();
        config.add_port(Port::physical("FastEthernet0/1"));
        config.set_access_vlan("FastEthernet0/1", 123).unwrap();

        config.remove_vlan(123).unwrap();
        assert_eq!(config.port("FastEthernet0/1").unwrap().access_vlan, None);
    }

    #[test]
    fn test_access_vlan_requires_existing_vlan() {
        let mut config = SwitchConfiguration::new("sw");
        config.add_port(Port::physical("FastEthernet0/1"));
        assert!(matches!(
            config.set_access_vlan("FastEthernet0/1", 999),
            Err(ConfigError::VlanNotFound(999))
        ));
    }

    #[test]
    fn test_overlap_rejected_across_interfaces() {
        let mut config = config_with_svis();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary(ip("2.2.2.2"), ip("255.255.255.0")),
            )
            .unwrap();

        let err = config
            .add_port_ip(
                "Vlan2000",
                InterfaceIp::primary(ip("2.2.2.75"), ip("255.255.255.128")),
            )
            .unwrap_err();
        match err {
            ConfigError::AddressOverlap {
                network,
                owner,
                secondary,
            } => {
                assert_eq!(network, ip("2.2.2.0"));
                assert_eq!(owner, "Vlan1000");
                assert!(!secondary);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_primary_removal_blocked_by_secondaries() {
        let mut config = config_with_svis();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary(ip("1.1.1.1"), ip("255.255.255.0")),
            )
            .unwrap();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::secondary(ip("2.2.2.2"), ip("255.255.255.0")),
            )
            .unwrap();

        let err = config
            .remove_port_ip(
                "Vlan1000",
                Some(InterfaceIp::primary(ip("1.1.1.1"), ip("255.255.255.0"))),
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::SecondariesPresent));

        config
            .remove_port_ip(
                "Vlan1000",
                Some(InterfaceIp::secondary(ip("2.2.2.2"), ip("255.255.255.0"))),
            )
            .unwrap();
        config
            .remove_port_ip(
                "Vlan1000",
                Some(InterfaceIp::primary(ip("1.1.1.1"), ip("255.255.255.0"))),
            )
            .unwrap();
        assert!(config.port("Vlan1000").unwrap().ips.is_empty());
    }

    #[test]
    fn test_secondary_promotion() {
        let mut config = config_with_svis();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary(ip("1.1.1.1"), ip("255.255.255.0")),
            )
            .unwrap();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::secondary(ip("2.2.2.2"), ip("255.255.255.0")),
            )
            .unwrap();

        // Promoting the secondary to primary drops the old primary.
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary(ip("2.2.2.2"), ip("255.255.255.0")),
            )
            .unwrap();

        let port = config.port("Vlan1000").unwrap();
        assert_eq!(port.ips.len(), 1);
        assert_eq!(port.primary_ip().unwrap().address, ip("2.2.2.2"));
    }

    #[test]
    fn test_vrf_forwarding_wipes_ips() {
        let mut config = config_with_svis();
        config.ensure_vrf("SOME-LAN");
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary(ip("1.1.1.1"), ip("255.255.255.0")),
            )
            .unwrap();

        config.bind_port_vrf("Vlan1000", "SOME-LAN").unwrap();
        let port = config.port("Vlan1000").unwrap();
        assert!(port.ips.is_empty());
        assert_eq!(port.vrf.as_deref(), Some("SOME-LAN"));

        // Removing the VRF unbinds the port.
        config.remove_vrf("SOME-LAN").unwrap();
        assert_eq!(config.port("Vlan1000").unwrap().vrf, None);
    }

    #[test]
    fn test_password_acceptance() {
        let mut config = SwitchConfiguration::new("sw");
        config.privileged_passwords.push("CiSc000".to_string());
        assert!(config.password_accepted("CiSc000"));
        assert!(config.password_accepted(""));
        assert!(!config.password_accepted("wrong"));
    }

    #[test]
    fn test_commit_tracking() {
        let mut config = SwitchConfiguration::new("sw");
        assert_eq!(config.generation(), 0);
        config.record_commit(vec!["vlans/VLAN123".to_string()]);
        assert_eq!(config.generation(), 1);
        assert_eq!(config.path_generation("vlans/VLAN123"), Some(1));
        assert_eq!(config.path_generation("interfaces/ge-0/0/1"), None);
    }
}
