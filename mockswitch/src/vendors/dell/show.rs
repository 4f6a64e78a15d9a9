//! Dell PowerConnect `show` output rendering.

use crate::config::port::render_vlan_ranges;
use crate::config::{Port, PortKind, PortMode, SwitchConfiguration};

use super::DellVariant;

/// `show running-config`.
pub fn running_config(variant: DellVariant, config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "!Current Configuration:".to_string(),
        format!("!System Description \"{}\"", system_description(variant)),
        "!".to_string(),
        "configure".to_string(),
    ];

    let created: Vec<u16> = config
        .vlans()
        .filter(|v| !v.is_default())
        .map(|v| v.number)
        .collect();
    if !created.is_empty() {
        out.push("vlan database".to_string());
        out.push(format!(
            "vlan {}",
            render_vlan_ranges(&created.into_iter().collect())
        ));
        out.push("exit".to_string());
    }

    out.push(format!("hostname \"{}\"", config.name));

    for port in config.ports() {
        let body = interface_lines(port);
        if body.is_empty() {
            continue;
        }
        out.push("!".to_string());
        out.push(format!("interface {}", port.name));
        out.extend(body);
        out.push("exit".to_string());
    }

    out.push("exit".to_string());
    out
}

fn system_description(variant: DellVariant) -> &'static str {
    match variant {
        DellVariant::PowerConnect => "PowerConnect 6224, 3.3.7.3, VxWorks 6.5",
        DellVariant::PowerConnect10G => "Dell Networking N4032, 6.0.1.3, Linux 2.6.32.9",
    }
}

/// Interface body lines, non-default attributes only.
fn interface_lines(port: &Port) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(description) = &port.description {
        out.push(format!("description \"{description}\""));
    }
    match port.mode {
        PortMode::Unset | PortMode::Trunk => {}
        PortMode::Access => out.push("switchport mode access".to_string()),
        PortMode::General => out.push("switchport mode general".to_string()),
    }
    if let Some(vlan) = port.access_vlan {
        out.push(format!("switchport access vlan {vlan}"));
    }
    if let Some(pvid) = port.general_pvid {
        out.push(format!("switchport general pvid {pvid}"));
    }
    if !port.general_vlans.is_empty() {
        out.push(format!(
            "switchport general allowed vlan add {}",
            render_vlan_ranges(&port.general_vlans)
        ));
    }
    if port.shutdown {
        out.push("shutdown".to_string());
    }

    out
}

/// `show vlan`.
pub fn vlan_table(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        String::new(),
        "VLAN   Name                             Ports          Type      Authorization"
            .to_string(),
        "-----  ---------------                  -------------  -----     -------------"
            .to_string(),
    ];

    for vlan in config.vlans() {
        let members: Vec<String> = config
            .ports()
            .filter(|p| {
                matches!(p.kind, PortKind::Physical) && p.access_vlan == Some(vlan.number)
            })
            .map(|p| p.name.clone())
            .collect();
        let kind = if vlan.is_default() {
            "Default"
        } else {
            "Static"
        };
        out.push(format!(
            "{:<6} {:<32} {:<14} {:<9} Required",
            vlan.number,
            vlan.display_name(),
            members.join(","),
            kind,
        ));
    }

    out.push(String::new());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_config_shape() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.seed_ports(vec![Port::physical("ethernet 1/g1")]);
        config.ensure_vlan(1000).unwrap();
        config.set_access_vlan("ethernet 1/g1", 1000).unwrap();

        let out = running_config(DellVariant::PowerConnect, &config);
        assert_eq!(out[0], "!Current Configuration:");
        assert!(out.contains(&"vlan database".to_string()));
        assert!(out.contains(&"vlan 1000".to_string()));
        assert!(out.contains(&"hostname \"my_switch\"".to_string()));
        assert!(out.contains(&"interface ethernet 1/g1".to_string()));
        assert!(out.contains(&"switchport access vlan 1000".to_string()));
        assert_eq!(out.last().unwrap(), "exit");
    }

    #[test]
    fn test_vlan_table_lists_default() {
        let config = SwitchConfiguration::new("my_switch");
        let out = vlan_table(&config);
        assert!(out.iter().any(|l| l.starts_with("1 ") || l.starts_with("1      default")));
    }
}
