//! Arista EOS `show` output rendering.

use serde_json::{Map, Value, json};

use crate::config::{PortKind, PortMode, SwitchConfiguration};

/// `show running-config`.
pub fn running_config(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "! Command: show running-config".to_string(),
        format!("! device: {} (vEOS, EOS-4.21.1F)", config.name),
        "!".to_string(),
        format!("hostname {}", config.name),
        "!".to_string(),
    ];

    for vlan in config.vlans().filter(|v| !v.is_default()) {
        out.push(format!("vlan {}", vlan.number));
        if let Some(name) = &vlan.name {
            out.push(format!("   name {name}"));
        }
        out.push("!".to_string());
    }

    for port in config.ports() {
        out.push(format!("interface {}", port.name));
        if let Some(description) = &port.description {
            out.push(format!("   description {description}"));
        }
        if let Some(vlan) = port.access_vlan {
            out.push(format!("   switchport access vlan {vlan}"));
        }
        match port.mode {
            PortMode::Access => out.push("   switchport mode access".to_string()),
            PortMode::Trunk => out.push("   switchport mode trunk".to_string()),
            _ => {}
        }
        if port.shutdown {
            out.push("   shutdown".to_string());
        }
        out.push("!".to_string());
    }

    out.push("end".to_string());
    out
}

/// `show vlan` text table.
pub fn vlan_table(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "VLAN  Name                             Status    Ports".to_string(),
        "----- -------------------------------- --------- -------------------------------"
            .to_string(),
    ];
    for vlan in config.vlans() {
        let members: Vec<String> = config
            .ports()
            .filter(|p| {
                matches!(p.kind, PortKind::Physical) && p.access_vlan == Some(vlan.number)
            })
            .map(|p| p.name.replace("Ethernet", "Et"))
            .collect();
        out.push(format!(
            "{:<5} {:<32} {:<9} {}",
            vlan.number,
            vlan.display_name(),
            "active",
            members.join(", ")
        ));
    }
    out
}

/// `show vlan` structured result, as eAPI renders it with
/// `format: json`.
pub fn vlan_json(config: &SwitchConfiguration) -> Value {
    let mut vlans = Map::new();
    for vlan in config.vlans() {
        let mut interfaces = Map::new();
        for port in config.ports() {
            if matches!(port.kind, PortKind::Physical)
                && port.access_vlan == Some(vlan.number)
            {
                interfaces.insert(
                    port.name.clone(),
                    json!({ "privatePromoted": false }),
                );
            }
        }
        vlans.insert(
            vlan.number.to_string(),
            json!({
                "name": vlan.display_name(),
                "status": "active",
                "dynamic": false,
                "interfaces": Value::Object(interfaces),
            }),
        );
    }
    json!({ "sourceDetail": "", "vlans": Value::Object(vlans) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Port;

    #[test]
    fn test_running_config_shape() {
        let mut config = SwitchConfiguration::new("eos");
        config.seed_ports(vec![Port::physical("Ethernet1")]);
        config.ensure_vlan(123).unwrap().name = Some("shizzle".to_string());

        let out = running_config(&config);
        assert!(out.contains(&"hostname eos".to_string()));
        assert!(out.contains(&"vlan 123".to_string()));
        assert!(out.contains(&"   name shizzle".to_string()));
        assert_eq!(out.last().unwrap(), "end");
    }

    #[test]
    fn test_vlan_json_structure() {
        let mut config = SwitchConfiguration::new("eos");
        config.seed_ports(vec![Port::physical("Ethernet1")]);
        config.ensure_vlan(123).unwrap();
        config.set_access_vlan("Ethernet1", 123).unwrap();

        let value = vlan_json(&config);
        assert_eq!(value["vlans"]["123"]["name"], "VLAN123");
        assert_eq!(value["vlans"]["123"]["status"], "active");
        assert!(value["vlans"]["123"]["interfaces"]["Ethernet1"].is_object());
        assert!(value["vlans"]["1"].is_object());
    }
}
