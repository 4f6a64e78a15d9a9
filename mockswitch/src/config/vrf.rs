//! VRF model.

use serde::{Deserialize, Serialize};

/// The always-present default VRF.
pub const DEFAULT_VRF: &str = "DEFAULT-LAN";

/// A VRF (virtual routing and forwarding instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vrf {
    /// VRF name.
    pub name: String,
}

impl Vrf {
    /// Create a VRF.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether this is the undeletable default VRF.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_VRF
    }
}
