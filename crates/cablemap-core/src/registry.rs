//! Component registry and per-document parse state

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::component::{ComponentDefinition, Role};
use crate::error::{Error, Result};

/// Every component known to one document parse, in registration order.
///
/// Ids share a single namespace across connectors and cables. The registry
/// only grows; autogenerated instances are appended as rows create them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    components: IndexMap<String, ComponentDefinition>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a component by id
    pub fn lookup(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    /// Role of a component, if it is known
    pub fn role_of(&self, id: &str) -> Option<Role> {
        self.lookup(id).map(|def| def.role)
    }

    /// Add a component; fails if the id is already taken
    pub fn register(&mut self, definition: ComponentDefinition) -> Result<()> {
        if self.components.contains_key(&definition.id) {
            return Err(Error::DuplicateId { id: definition.id });
        }
        self.components.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All components in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.values()
    }

    /// Connectors (templates and instances included) in registration order
    pub fn connectors(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.iter().filter(|def| def.role == Role::Connector)
    }

    /// Cables in registration order
    pub fn cables(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.iter().filter(|def| def.role == Role::Cable)
    }
}

/// Running count of instances created per autogenerate template
#[derive(Debug, Clone, Default)]
pub struct AutogenerationCounter {
    counts: HashMap<String, usize>,
}

impl AutogenerationCounter {
    /// Reserve the next instance id for `template`: `_<template>_<n>`, `n` from 1
    pub fn next_instance(&mut self, template: &str) -> String {
        let count = self.counts.entry(template.to_string()).or_insert(0);
        *count += 1;
        format!("_{}_{}", template, count)
    }

    /// Instances created so far for `template`
    pub fn count(&self, template: &str) -> usize {
        self.counts.get(template).copied().unwrap_or(0)
    }
}

/// Mutable state threaded through the rows of a single document.
///
/// Each document parse owns its own context; nothing is shared between
/// documents, so instance numbering is reproducible for identical input.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Components known so far
    pub registry: Registry,

    /// Autogeneration counters
    pub counter: AutogenerationCounter,
}

impl ParseContext {
    /// Create a context around an already populated registry
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            counter: AutogenerationCounter::default(),
        }
    }

    /// Create and register a fresh instance of `template`, returning its id.
    pub fn instantiate(&mut self, template: &ComponentDefinition) -> Result<String> {
        let id = self.counter.next_instance(&template.id);
        self.registry.register(template.instantiate(id.clone()))?;
        tracing::debug!(template = %template.id, instance = %id, "autogenerated connector");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(ComponentDefinition::connector("X1")).unwrap();
        registry.register(ComponentDefinition::cable("W1")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.role_of("X1"), Some(Role::Connector));
        assert_eq!(registry.role_of("W1"), Some(Role::Cable));
        assert_eq!(registry.role_of("nope"), None);
        assert_eq!(registry.lookup("X1").unwrap().id, "X1");
    }

    #[test]
    fn test_duplicate_id_rejected_across_roles() {
        let mut registry = Registry::new();
        registry.register(ComponentDefinition::connector("X1")).unwrap();
        let result = registry.register(ComponentDefinition::cable("X1"));
        match result {
            Err(Error::DuplicateId { id }) => assert_eq!(id, "X1"),
            other => panic!("Expected DuplicateId, got {:?}", other),
        }
        assert_eq!(registry.role_of("X1"), Some(Role::Connector));
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let mut registry = Registry::new();
        for id in ["X3", "W1", "X1", "X2"] {
            let def = if id.starts_with('W') {
                ComponentDefinition::cable(id)
            } else {
                ComponentDefinition::connector(id)
            };
            registry.register(def).unwrap();
        }
        let connectors: Vec<_> = registry.connectors().map(|d| d.id.as_str()).collect();
        assert_eq!(connectors, vec!["X3", "X1", "X2"]);
        let cables: Vec<_> = registry.cables().map(|d| d.id.as_str()).collect();
        assert_eq!(cables, vec!["W1"]);
    }

    #[test]
    fn test_counter_is_per_template() {
        let mut counter = AutogenerationCounter::default();
        assert_eq!(counter.next_instance("F"), "_F_1");
        assert_eq!(counter.next_instance("F"), "_F_2");
        assert_eq!(counter.next_instance("S"), "_S_1");
        assert_eq!(counter.count("F"), 2);
        assert_eq!(counter.count("S"), 1);
        assert_eq!(counter.count("T"), 0);
    }

    #[test]
    fn test_instantiate_registers_instance() {
        let template = ComponentDefinition::template("F");
        let mut registry = Registry::new();
        registry.register(template.clone()).unwrap();
        let mut ctx = ParseContext::new(registry);

        let id = ctx.instantiate(&template).unwrap();
        assert_eq!(id, "_F_1");
        let instance = ctx.registry.lookup("_F_1").unwrap();
        assert_eq!(instance.instance_of.as_deref(), Some("F"));
        assert!(!instance.autogenerate);
    }

    #[test]
    fn test_instantiate_collides_with_declared_id() {
        let template = ComponentDefinition::template("F");
        let mut registry = Registry::new();
        registry.register(template.clone()).unwrap();
        registry.register(ComponentDefinition::connector("_F_1")).unwrap();
        let mut ctx = ParseContext::new(registry);

        let result = ctx.instantiate(&template);
        assert!(matches!(result, Err(Error::DuplicateId { .. })));
    }
}
