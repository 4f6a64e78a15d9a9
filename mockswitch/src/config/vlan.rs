//! VLAN model.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest valid VLAN number.
pub const VLAN_MIN: u16 = 1;

/// Highest valid VLAN number.
pub const VLAN_MAX: u16 = 4094;

/// The always-present default VLAN.
pub const DEFAULT_VLAN: u16 = 1;

/// Unicast reverse-path-forwarding mode on a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnicastRpfMode {
    /// No uRPF check.
    #[default]
    Disabled,
    /// Strict mode: source must be reachable via the receiving interface.
    Strict,
}

/// A VLAN entry in the switch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    /// VLAN number in [1, 4094].
    pub number: u16,

    /// Configured name, if any. Rendering falls back to `default` for
    /// VLAN 1 and `VLAN<n>` otherwise.
    pub name: Option<String>,

    /// Inbound access group.
    pub access_group_in: Option<String>,

    /// Outbound access group.
    pub access_group_out: Option<String>,

    /// uRPF mode.
    pub unicast_rpf: UnicastRpfMode,
}

impl Vlan {
    /// Create a VLAN, validating the number range.
    ///
    /// The range check takes an `i64` so callers can pass raw parsed input
    /// (`vlan -1`, `vlan 5000`) and get the out-of-range error instead of a
    /// silent clamp.
    pub fn new(number: i64) -> Result<Self, ConfigError> {
        if !(i64::from(VLAN_MIN)..=i64::from(VLAN_MAX)).contains(&number) {
            return Err(ConfigError::VlanOutOfRange(number));
        }
        Ok(Self {
            number: number as u16,
            name: None,
            access_group_in: None,
            access_group_out: None,
            unicast_rpf: UnicastRpfMode::Disabled,
        })
    }

    /// Effective display name.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None if self.number == DEFAULT_VLAN => "default".to_string(),
            None => format!("VLAN{}", self.number),
        }
    }

    /// Whether this is the undeletable default VLAN.
    pub fn is_default(&self) -> bool {
        self.number == DEFAULT_VLAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_range() {
        assert!(Vlan::new(-1).is_err());
        assert!(Vlan::new(0).is_err());
        assert!(Vlan::new(4095).is_err());
        assert!(Vlan::new(1).is_ok());
        assert!(Vlan::new(4094).is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Vlan::new(1).unwrap().display_name(), "default");
        assert_eq!(Vlan::new(123).unwrap().display_name(), "VLAN123");

        let mut named = Vlan::new(123).unwrap();
        named.name = Some("shizzle".to_string());
        assert_eq!(named.display_name(), "shizzle");
    }
}
