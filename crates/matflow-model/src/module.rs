//! Modules: named groups of components with flattened slot views.
//!
//! A [`Module`] bundles the components of one plant section (a dosing
//! station, a conveyor segment) and transparently re-exposes their
//! slots: asking a module for its actuators yields the union of its
//! components' actuators in insertion order, and likewise for sensors
//! and buffer states.
//!
//! [`Element`] is the unit a plant is assembled from -- either a bare
//! component or a module.

use matflow_types::ModuleId;
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::slot::Slot;

/// A named collection of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Stable identifier.
    id: ModuleId,
    /// Module name, unique within the owning plant after setup.
    name: String,
    /// Owned components in insertion order.
    components: Vec<Component>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: &str) -> Self {
        Self {
            id: ModuleId::new(),
            name: name.to_owned(),
            components: Vec::new(),
        }
    }

    /// Add a component, preserving insertion order (builder style).
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Add a component, preserving insertion order.
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Return the module's stable id.
    pub const fn id(&self) -> ModuleId {
        self.id
    }

    /// Return the module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owned components in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Mutable view of the owned components.
    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    /// Flattened view of all actuators across components.
    pub fn actuators(&self) -> impl Iterator<Item = &Slot> {
        self.components.iter().flat_map(Component::actuators)
    }

    /// Flattened view of all sensors across components.
    pub fn sensors(&self) -> impl Iterator<Item = &Slot> {
        self.components.iter().flat_map(Component::sensors)
    }

    /// Flattened view of all buffer states across components.
    pub fn states(&self) -> impl Iterator<Item = &Slot> {
        self.components.iter().flat_map(Component::states)
    }

    /// Deactivate every slot of every owned component.
    pub fn deactivate_all(&mut self) {
        for component in &mut self.components {
            component.deactivate_all();
        }
    }
}

/// One element of a plant: a bare component or a module of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// A single component.
    Component(Component),
    /// A module of components.
    Module(Module),
}

impl Element {
    /// The element's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Component(c) => c.name(),
            Self::Module(m) => m.name(),
        }
    }

    /// The element's components in insertion order (a bare component
    /// yields itself).
    pub fn components(&self) -> &[Component] {
        match self {
            Self::Component(c) => core::slice::from_ref(c),
            Self::Module(m) => m.components(),
        }
    }

    /// Mutable view of the element's components.
    pub fn components_mut(&mut self) -> &mut [Component] {
        match self {
            Self::Component(c) => core::slice::from_mut(c),
            Self::Module(m) => m.components_mut(),
        }
    }

    /// Deactivate every slot of the element.
    pub fn deactivate_all(&mut self) {
        match self {
            Self::Component(c) => c.deactivate_all(),
            Self::Module(m) => m.deactivate_all(),
        }
    }
}

impl From<Component> for Element {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

impl From<Module> for Element {
    fn from(module: Module) -> Self {
        Self::Module(module)
    }
}
