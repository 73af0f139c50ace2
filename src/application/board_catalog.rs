// Board catalog - Builder names from configuration to builder implementations
use crate::application::dashboard::DashboardBuilder;
use crate::application::mount_registry::MountError;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct BoardCatalog {
    builders: BTreeMap<String, Arc<dyn DashboardBuilder>>,
}

impl BoardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `builder` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: impl Into<String>, builder: impl DashboardBuilder + 'static) -> &mut Self {
        self.builders.insert(name.into(), Arc::new(builder));
        self
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn DashboardBuilder>, MountError> {
        self.builders
            .get(name)
            .cloned()
            .ok_or_else(|| MountError::UnknownBuilder {
                name: name.to_string(),
                known: self.names().map(str::to_string).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard::{BoardContext, Dashboard};

    fn passthrough(dashboard: Dashboard, _ctx: &BoardContext) -> anyhow::Result<Dashboard> {
        Ok(dashboard)
    }

    #[test]
    fn test_resolve_registered_builder() {
        let mut catalog = BoardCatalog::new();
        catalog.register("b1", passthrough).register("b2", passthrough);

        assert!(catalog.resolve("b1").is_ok());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_resolve_unknown_builder() {
        let mut catalog = BoardCatalog::new();
        catalog.register("b1", passthrough);

        match catalog.resolve("nope") {
            Err(MountError::UnknownBuilder { name, known }) => {
                assert_eq!(name, "nope");
                assert_eq!(known, vec!["b1".to_string()]);
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("unknown builder resolved"),
        }
    }
}
