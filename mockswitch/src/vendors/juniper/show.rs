//! JunOS configuration rendering and candidate diffs.

use crate::config::{PortKind, PortMode, SwitchConfiguration};

/// Render a configuration in JunOS curly-brace text format.
pub fn render(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "system {".to_string(),
        format!("    host-name {};", config.name),
        "}".to_string(),
    ];

    let interfaces: Vec<&crate::config::Port> = config
        .ports()
        .filter(|p| !matches!(p.kind, PortKind::Vlan(_)))
        .collect();
    if !interfaces.is_empty() {
        out.push("interfaces {".to_string());
        for port in interfaces {
            out.push(format!("    {} {{", port.name));
            if port.shutdown {
                out.push("        disable;".to_string());
            }
            if let Some(description) = &port.description {
                out.push(format!("        description \"{description}\";"));
            }
            if port.mode != PortMode::Unset || port.access_vlan.is_some() {
                out.push("        unit 0 {".to_string());
                out.push("            family ethernet-switching {".to_string());
                match port.mode {
                    PortMode::Trunk => {
                        out.push("                port-mode trunk;".to_string())
                    }
                    _ => out.push("                port-mode access;".to_string()),
                }
                let members = member_names(config, port);
                if !members.is_empty() {
                    out.push("                vlan {".to_string());
                    for member in members {
                        out.push(format!("                    members {member};"));
                    }
                    out.push("                }".to_string());
                }
                out.push("            }".to_string());
                out.push("        }".to_string());
            }
            out.push("    }".to_string());
        }
        out.push("}".to_string());
    }

    let named: Vec<&crate::config::Vlan> =
        config.vlans().filter(|v| !v.is_default()).collect();
    if !named.is_empty() {
        out.push("vlans {".to_string());
        for vlan in named {
            out.push(format!("    {} {{", vlan.display_name()));
            out.push(format!("        vlan-id {};", vlan.number));
            out.push("    }".to_string());
        }
        out.push("}".to_string());
    }

    out
}

fn member_names(config: &SwitchConfiguration, port: &crate::config::Port) -> Vec<String> {
    let mut members = Vec::new();
    if let Some(access) = port.access_vlan {
        members.push(vlan_label(config, access));
    }
    if let Some(trunk) = &port.trunk_vlans {
        for vlan in trunk {
            members.push(vlan_label(config, *vlan));
        }
    }
    members
}

fn vlan_label(config: &SwitchConfiguration, number: u16) -> String {
    config
        .vlan(number)
        .map(|v| v.display_name())
        .unwrap_or_else(|| number.to_string())
}

/// `show | compare`: a line diff of candidate against running.
pub fn compare(running: &SwitchConfiguration, candidate: &SwitchConfiguration) -> Vec<String> {
    let before = render(running);
    let after = render(candidate);

    let mut out = Vec::new();
    for line in &before {
        if !after.contains(line) {
            out.push(format!("-  {}", line.trim_start()));
        }
    }
    for line in &after {
        if !before.contains(line) {
            out.push(format!("+  {}", line.trim_start()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_vlans_and_interfaces() {
        let mut config = SwitchConfiguration::new("switch");
        config.seed_ports(vec![crate::config::Port::physical("ge-0/0/1")]);
        config.ensure_vlan(123).unwrap().name = Some("shizzle".to_string());
        config.set_access_vlan("ge-0/0/1", 123).unwrap();
        config.port_mut("ge-0/0/1").unwrap().mode = PortMode::Access;

        let out = render(&config);
        assert!(out.contains(&"    host-name switch;".to_string()));
        assert!(out.contains(&"    ge-0/0/1 {".to_string()));
        assert!(out.contains(&"                port-mode access;".to_string()));
        assert!(out.contains(&"                    members shizzle;".to_string()));
        assert!(out.contains(&"        vlan-id 123;".to_string()));
    }

    #[test]
    fn test_compare_shows_candidate_edits() {
        let running = SwitchConfiguration::new("switch");
        let mut candidate = running.clone();
        candidate.ensure_vlan(99).unwrap();

        let diff = compare(&running, &candidate);
        assert!(diff.iter().all(|l| l.starts_with('+')));
        assert!(diff.iter().any(|l| l.contains("vlan-id 99;")));

        assert!(compare(&running, &running.clone()).is_empty());
    }
}
