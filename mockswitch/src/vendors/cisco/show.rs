//! Cisco IOS `show` output rendering.
//!
//! Entities render only their non-default attributes, in a fixed order,
//! so that replaying the rendered text through the config processors
//! reproduces the same state.

use crate::config::{Port, PortKind, SwitchConfiguration, Vlan, port::render_vlan_ranges};

use super::short_name;

/// `show running-config`.
pub fn running_config(config: &SwitchConfiguration) -> Vec<String> {
    let body = running_config_body(config);
    let bytes: usize = body.iter().map(|l| l.len() + 1).sum();

    let mut out = vec![
        "Building configuration...".to_string(),
        String::new(),
        format!("Current configuration : {bytes} bytes"),
        "!".to_string(),
    ];
    out.extend(body);
    out
}

fn running_config_body(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "version 12.1".to_string(),
        "!".to_string(),
        format!("hostname {}", config.name),
        "!".to_string(),
    ];

    for vlan in config.vlans().filter(|v| !v.is_default()) {
        out.extend(vlan_lines(vlan));
        out.push("!".to_string());
    }

    for port in config.ports() {
        out.extend(interface_lines(port));
        out.push("!".to_string());
    }

    for route in &config.static_routes {
        out.push(format!(
            "ip route {} {} {}",
            route.destination, route.mask, route.next_hop
        ));
    }
    if !config.static_routes.is_empty() {
        out.push("!".to_string());
    }

    out.push("end".to_string());
    out
}

/// `show running-config vlan N`.
pub fn running_config_vlan(config: &SwitchConfiguration, number: u16) -> Option<Vec<String>> {
    let vlan = config.vlan(number)?;
    let mut out = vec![
        "Building configuration...".to_string(),
        String::new(),
        "Current configuration:".to_string(),
        "!".to_string(),
    ];
    out.extend(vlan_lines(vlan));
    out.push("end".to_string());
    out.push(String::new());
    Some(out)
}

/// `show running-config interface X`.
pub fn running_config_interface(config: &SwitchConfiguration, name: &str) -> Option<Vec<String>> {
    let port = config.port(name)?;
    let body = interface_lines(port);
    let bytes: usize = body.iter().map(|l| l.len() + 1).sum();

    let mut out = vec![
        "Building configuration...".to_string(),
        String::new(),
        format!("Current configuration : {bytes} bytes"),
        "!".to_string(),
    ];
    out.extend(body);
    out.push("end".to_string());
    out.push(String::new());
    Some(out)
}

fn vlan_lines(vlan: &Vlan) -> Vec<String> {
    let mut out = vec![format!("vlan {}", vlan.number)];
    if let Some(name) = &vlan.name {
        out.push(format!(" name {name}"));
    }
    out
}

/// The `interface …` block for one port, non-default attributes only.
pub fn interface_lines(port: &Port) -> Vec<String> {
    use crate::config::PortMode;

    let mut out = vec![format!("interface {}", port.name)];

    if let Some(description) = &port.description {
        out.push(format!(" description {description}"));
    }
    if let Some(vlan) = port.access_vlan {
        out.push(format!(" switchport access vlan {vlan}"));
    }
    if let Some(encapsulation) = &port.trunk_encapsulation {
        out.push(format!(" switchport trunk encapsulation {encapsulation}"));
    }
    if let Some(native) = port.trunk_native_vlan {
        out.push(format!(" switchport trunk native vlan {native}"));
    }
    if let Some(allowed) = &port.trunk_vlans {
        if allowed.is_empty() {
            out.push(" switchport trunk allowed vlan none".to_string());
        } else {
            out.push(format!(
                " switchport trunk allowed vlan {}",
                render_vlan_ranges(allowed)
            ));
        }
    }
    match port.mode {
        PortMode::Unset | PortMode::General => {}
        PortMode::Access => out.push(" switchport mode access".to_string()),
        PortMode::Trunk => out.push(" switchport mode trunk".to_string()),
    }
    if let Some(vrf) = &port.vrf {
        out.push(format!(" ip vrf forwarding {vrf}"));
    }
    if let Some(primary) = port.primary_ip() {
        out.push(format!(" ip address {} {}", primary.address, primary.mask));
    }
    for secondary in port.secondary_ips() {
        out.push(format!(
            " ip address {} {} secondary",
            secondary.address, secondary.mask
        ));
    }
    if let Some(group) = &port.access_group_in {
        out.push(format!(" ip access-group {group} in"));
    }
    if let Some(group) = &port.access_group_out {
        out.push(format!(" ip access-group {group} out"));
    }
    for helper in &port.ip_helpers {
        out.push(format!(" ip helper-address {helper}"));
    }
    if port.ip_redirects == Some(false) {
        out.push(" no ip redirects".to_string());
    }
    if port.unicast_rpf {
        out.push(" ip verify unicast source reachable-via rx".to_string());
    }
    if port.ntp_disable {
        out.push(" ntp disable".to_string());
    }
    for (group, standby) in &port.standby {
        if let Some(ip) = standby.ip {
            out.push(format!(" standby {group} ip {ip}"));
        }
        for secondary in &standby.secondaries {
            out.push(format!(" standby {group} ip {secondary} secondary"));
        }
        if let Some((hello, hold)) = standby.timers {
            out.push(format!(" standby {group} timers {hello} {hold}"));
        }
        if let Some(priority) = standby.priority {
            out.push(format!(" standby {group} priority {priority}"));
        }
        if standby.preempt {
            match standby.preempt_delay_minimum {
                Some(delay) => out.push(format!(" standby {group} preempt delay minimum {delay}")),
                None => out.push(format!(" standby {group} preempt")),
            }
        }
        if let Some(authentication) = &standby.authentication {
            out.push(format!(" standby {group} authentication {authentication}"));
        }
        for (track, decrement) in &standby.tracks {
            out.push(format!(" standby {group} track {track} decrement {decrement}"));
        }
    }
    if port.shutdown {
        out.push(" shutdown".to_string());
    }
    if let Some((id, mode)) = &port.channel_group {
        out.push(format!(" channel-group {id} mode {mode}"));
    }

    out
}

/// `show vlan`: the VLAN summary table.
pub fn vlan_table(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "VLAN Name                             Status    Ports".to_string(),
        "---- -------------------------------- --------- -------------------------------"
            .to_string(),
    ];

    for vlan in config.vlans() {
        let members: Vec<String> = config
            .ports()
            .filter(|p| {
                matches!(p.kind, PortKind::Physical)
                    && (p.access_vlan == Some(vlan.number)
                        || (p.access_vlan.is_none() && vlan.is_default()))
            })
            .map(|p| short_name(&p.name))
            .collect();

        out.push(format!(
            "{:<4} {:<32} {:<9} {}",
            vlan.number,
            vlan.display_name(),
            "active",
            members.join(", ")
        ));
    }

    out
}

/// `show version`.
pub fn version(config: &SwitchConfiguration) -> Vec<String> {
    vec![
        "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 12.1(22)EA8a, RELEASE SOFTWARE (fc1)".to_string(),
        "Copyright (c) 1986-2006 by Cisco Systems, Inc.".to_string(),
        String::new(),
        format!("{} uptime is 2 weeks, 3 days, 12 hours, 34 minutes", config.name),
        "System returned to ROM by power-on".to_string(),
        "System image file is \"flash:c2960-lanbasek9-mz.121-22.EA8a.bin\"".to_string(),
        String::new(),
        "cisco WS-C2960-24TT-L (PowerPC405) processor (revision B0) with 61440K/4088K bytes of memory.".to_string(),
        "Base ethernet MAC Address       : 00:1A:2B:3C:4D:5E".to_string(),
        "Configuration register is 0xF".to_string(),
        String::new(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InterfaceIp, Port};

    fn sample_config() -> SwitchConfiguration {
        let mut config = SwitchConfiguration::new("my_switch");
        config.add_port(Port::physical("FastEthernet0/1"));
        config
    }

    #[test]
    fn test_vlan_block_rendering() {
        let mut config = sample_config();
        config.ensure_vlan(123).unwrap().name = Some("shizzle".to_string());

        let out = running_config_vlan(&config, 123).unwrap();
        assert!(out.contains(&"vlan 123".to_string()));
        assert!(out.contains(&" name shizzle".to_string()));
        assert!(out.contains(&"end".to_string()));
    }

    #[test]
    fn test_interface_renders_only_non_defaults() {
        let config = sample_config();
        let port = config.port("FastEthernet0/1").unwrap();
        assert_eq!(interface_lines(port), vec!["interface FastEthernet0/1"]);
    }

    #[test]
    fn test_interface_address_ordering() {
        let mut config = sample_config();
        config.ensure_vlan(1000).unwrap();
        config.ensure_port("Vlan1000", PortKind::Vlan(1000));
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::primary("1.1.1.1".parse().unwrap(), "255.255.255.0".parse().unwrap()),
            )
            .unwrap();
        config
            .add_port_ip(
                "Vlan1000",
                InterfaceIp::secondary("2.2.2.2".parse().unwrap(), "255.255.255.0".parse().unwrap()),
            )
            .unwrap();

        let lines = interface_lines(config.port("Vlan1000").unwrap());
        assert_eq!(
            lines,
            vec![
                "interface Vlan1000",
                " ip address 1.1.1.1 255.255.255.0",
                " ip address 2.2.2.2 255.255.255.0 secondary",
            ]
        );
    }

    #[test]
    fn test_full_running_config_shape() {
        let mut config = sample_config();
        config.ensure_vlan(10).unwrap();

        let out = running_config(&config);
        assert_eq!(out[0], "Building configuration...");
        assert!(out[2].starts_with("Current configuration : "));
        assert!(out.contains(&"hostname my_switch".to_string()));
        assert!(out.contains(&"vlan 10".to_string()));
        assert!(out.contains(&"interface FastEthernet0/1".to_string()));
        assert_eq!(out.last().unwrap(), "end");
    }
}
