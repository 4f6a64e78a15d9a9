//! Brocade `show` output rendering.

use crate::config::{Port, PortKind, SwitchConfiguration, Vlan};

/// `show running-config`.
pub fn running_config(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "Current configuration:".to_string(),
        "!".to_string(),
        "ver 08.0.30hT311".to_string(),
        "!".to_string(),
        format!("hostname {}", config.name),
        "!".to_string(),
    ];

    for vlan in config.vlans() {
        out.extend(vlan_block(config, vlan));
        out.push("!".to_string());
    }

    for port in config.ports().filter(|p| matches!(p.kind, PortKind::Vlan(_))) {
        out.extend(ve_block(port));
        out.push("!".to_string());
    }

    out.push("end".to_string());
    out
}

/// `show running-config vlan N`.
pub fn running_config_vlan(config: &SwitchConfiguration, number: u16) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(vlan) = config.vlan(number) {
        out.extend(vlan_block(config, vlan));
        out.push("!".to_string());
    }
    out
}

fn vlan_block(config: &SwitchConfiguration, vlan: &Vlan) -> Vec<String> {
    let header = if vlan.is_default() {
        format!("vlan {} name DEFAULT-VLAN", vlan.number)
    } else {
        match &vlan.name {
            Some(name) => format!("vlan {} name {}", vlan.number, name),
            None => format!("vlan {}", vlan.number),
        }
    };
    let mut out = vec![header];

    let untagged: Vec<&str> = config
        .ports()
        .filter(|p| p.access_vlan == Some(vlan.number))
        .map(|p| p.name.as_str())
        .collect();
    for name in untagged {
        out.push(format!(" untagged {}", abbreviate(name)));
    }

    let tagged: Vec<&str> = config
        .ports()
        .filter(|p| {
            p.trunk_vlans
                .as_ref()
                .is_some_and(|vlans| vlans.contains(&vlan.number))
        })
        .map(|p| p.name.as_str())
        .collect();
    for name in tagged {
        out.push(format!(" tagged {}", abbreviate(name)));
    }

    for port in config.ports() {
        if let PortKind::Vlan(bound) = port.kind {
            if bound == vlan.number {
                out.push(format!(" router-interface {}", port.name));
            }
        }
    }

    out
}

fn ve_block(port: &Port) -> Vec<String> {
    let mut out = vec![format!("interface {}", port.name)];
    if let Some(name) = &port.description {
        out.push(format!(" port-name {name}"));
    }
    if port.shutdown {
        out.push(" disable".to_string());
    }
    for ip in &port.ips {
        out.push(format!(" ip address {ip}"));
    }
    out
}

/// Brocade renders `ethernet 1/1` as `ethe 1/1`.
fn abbreviate(name: &str) -> String {
    name.replace("ethernet ", "ethe ")
}

/// `show vlan`.
pub fn vlan_brief(config: &SwitchConfiguration) -> Vec<String> {
    let total = config.vlans().count();
    let mut out = vec![format!("Total PORT-VLAN entries: {total}"), String::new()];
    for vlan in config.vlans() {
        out.push(format!(
            "PORT-VLAN {}, Name {}, Priority level0, Spanning tree Off",
            vlan.number,
            if vlan.is_default() {
                "DEFAULT-VLAN".to_string()
            } else {
                vlan.display_name()
            }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_block_membership() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.seed_ports(vec![Port::physical("ethernet 1/1")]);
        config.ensure_vlan(123).unwrap().name = Some("shizzle".to_string());
        config.set_access_vlan("ethernet 1/1", 123).unwrap();
        config.ensure_port("ve 123", PortKind::Vlan(123));

        let out = running_config_vlan(&config, 123);
        assert_eq!(out[0], "vlan 123 name shizzle");
        assert!(out.contains(&" untagged ethe 1/1".to_string()));
        assert!(out.contains(&" router-interface ve 123".to_string()));
    }

    #[test]
    fn test_default_vlan_named() {
        let config = SwitchConfiguration::new("my_switch");
        let out = running_config(&config);
        assert!(out.contains(&"vlan 1 name DEFAULT-VLAN".to_string()));
        assert_eq!(out.last().unwrap(), "end");
    }
}
