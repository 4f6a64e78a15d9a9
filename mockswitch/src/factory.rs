//! Global switch model registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::config::SwitchConfiguration;
use crate::core::SwitchCore;
use crate::error::{FactoryError, Result};
use crate::vendors::{arista, brocade, cisco, dell, hp, juniper};

/// Constructor for a vendor core; receives the seeded configuration
/// (hostname, passwords, commit delay) and adds the model's default
/// ports.
pub type CoreBuilder = fn(SwitchConfiguration) -> Arc<dyn SwitchCore>;

/// Global factory instance.
static FACTORY: Lazy<RwLock<SwitchFactory>> = Lazy::new(|| {
    let mut factory = SwitchFactory::new();
    factory.register_builtin_models();
    RwLock::new(factory)
});

/// Maps model strings to switch core constructors.
#[derive(Default)]
pub struct SwitchFactory {
    models: HashMap<&'static str, CoreBuilder>,
}

impl SwitchFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Get the global factory.
    pub fn global() -> &'static RwLock<SwitchFactory> {
        &FACTORY
    }

    /// Register the built-in models.
    fn register_builtin_models(&mut self) {
        self.models.insert("cisco_generic", cisco::CiscoCore::generic);
        self.models
            .insert("cisco_2960_24TT_L", cisco::CiscoCore::model_2960_24tt);
        self.models
            .insert("cisco_2960_48TT_L", cisco::CiscoCore::model_2960_48tt);
        self.models
            .insert("cisco_6500", cisco::CiscoCore::catalyst_6500);
        self.models.insert("dell_generic", dell::DellCore::powerconnect);
        self.models
            .insert("dell10g_generic", dell::DellCore::powerconnect_10g);
        self.models
            .insert("brocade_generic", brocade::BrocadeCore::generic);
        self.models
            .insert("juniper_generic", juniper::JuniperCore::generic);
        self.models
            .insert("arista_generic", arista::AristaCore::generic);
        self.models
            .insert("hp_procurve_generic", hp::ProcurveCore::generic);
    }

    /// Register an additional model.
    pub fn register(&mut self, model: &'static str, builder: CoreBuilder) -> Result<()> {
        if self.models.contains_key(model) {
            return Err(FactoryError::AlreadyRegistered {
                model: model.to_string(),
            }
            .into());
        }
        self.models.insert(model, builder);
        Ok(())
    }

    /// Whether a model is registered.
    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// All registered model names.
    pub fn models(&self) -> impl Iterator<Item = &&'static str> {
        self.models.keys()
    }

    /// Build a core for `model` around a prepared configuration.
    pub fn create(&self, model: &str, config: SwitchConfiguration) -> Result<Arc<dyn SwitchCore>> {
        let builder = self.models.get(model).ok_or_else(|| FactoryError::UnknownModel {
            model: model.to_string(),
        })?;
        Ok(builder(config))
    }
}

/// Build a switch from the global registry with a bare hostname.
pub fn create_switch(model: &str, hostname: &str) -> Result<Arc<dyn SwitchCore>> {
    let factory = SwitchFactory::global().read().expect("factory lock poisoned");
    factory.create(model, SwitchConfiguration::new(hostname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models() {
        let factory = SwitchFactory::global().read().unwrap();
        for model in [
            "cisco_generic",
            "cisco_2960_24TT_L",
            "cisco_6500",
            "dell_generic",
            "dell10g_generic",
            "brocade_generic",
            "juniper_generic",
            "arista_generic",
            "hp_procurve_generic",
        ] {
            assert!(factory.contains(model), "{model} missing");
        }
    }

    #[test]
    fn test_unknown_model_is_distinct_error() {
        let err = create_switch("netgear_gs108", "sw").err().unwrap();
        assert!(matches!(
            err,
            crate::error::Error::Factory(FactoryError::UnknownModel { .. })
        ));
    }

    #[test]
    fn test_create_seeds_default_ports() {
        let core = create_switch("cisco_2960_24TT_L", "my_switch").unwrap();
        assert_eq!(core.model(), "cisco_2960_24TT_L");

        let config = core.switch_configuration().blocking_lock();
        assert!(config.port("FastEthernet0/1").is_some());
        assert!(config.port("FastEthernet0/24").is_some());
        assert!(config.port("GigabitEthernet0/2").is_some());
        assert!(config.has_vlan(1));
    }
}
