//! # Game Object
//!
//! A named container of components. It always owns exactly one transform,
//! created together with it, and may own named child game objects whose
//! transforms are parented to its own.

use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};

use crate::{
    core::{MtResource, MtSystem},
    engine_state::{context::EngineContext, rendering::Camera},
    error::{EngineError, EngineResult},
};

use super::{
    component::{Component, ComponentKind},
    transform::{SharedTransform, Transform},
};

/// A component as stored by its game object.
pub type ComponentCell = MtSystem<dyn Component>;

/// A simulated entity: a name, a transform, components and children.
///
/// The maps are behind locks so that the update pass can run game objects in
/// parallel. Sequences such as "check then insert" are not atomic across calls.
pub struct GameObject {
    name: String,
    transform: SharedTransform,
    components: MtResource<HashMap<ComponentKind, ComponentCell>>,
    children: MtResource<HashMap<String, Arc<GameObject>>>,
}

impl GameObject {
    /// Creates a game object that isn't registered anywhere. Most callers want
    /// [`GameObjectDirectory::create`](super::GameObjectDirectory::create).
    pub fn detached(name: impl Into<String>) -> Self {
        Self::with_transform(name, Transform::default())
    }

    pub fn with_transform(name: impl Into<String>, transform: Transform) -> Self {
        GameObject {
            name: name.into(),
            transform: MtResource::new(transform),
            components: MtResource::new(HashMap::new()),
            children: MtResource::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &SharedTransform {
        &self.transform
    }

    /// Attaches `component`.
    ///
    /// If a component of the same kind is already attached nothing happens and
    /// [`EngineError::DuplicateComponent`] is returned: the existing one is never
    /// replaced, callers remove it first.
    pub fn add_component(
        &self,
        mut component: Box<dyn Component>,
        ctx: &EngineContext,
    ) -> EngineResult<()> {
        let kind = component.kind();
        if self.has_component(&kind) {
            debug!("{}: ignoring second {} component", self.name, kind);
            return Err(EngineError::DuplicateComponent {
                owner: self.name.clone(),
                kind: kind.to_string(),
            });
        }

        component.initialize(self, ctx);
        let cell: ComponentCell = MtSystem::new(component);
        let inserted = {
            let mut components = self.components.get_mut();
            if components.contains_key(&kind) {
                false
            } else {
                components.insert(kind.clone(), cell.clone());
                true
            }
        };

        if !inserted {
            // Lost a race with another add of the same kind; undo our init.
            cell.get_mut().uninitialize(self, ctx);
            return Err(EngineError::DuplicateComponent {
                owner: self.name.clone(),
                kind: kind.to_string(),
            });
        }

        cell.get_mut().on_load(self, ctx);
        Ok(())
    }

    /// Detaches and tears down the component of `kind`, if any.
    pub fn remove_component(&self, kind: &ComponentKind, ctx: &EngineContext) -> Option<ComponentCell> {
        let cell = self.components.get_mut().remove(kind)?;
        {
            let mut component = cell.get_mut();
            component.on_unload(self, ctx);
            component.uninitialize(self, ctx);
        }
        Some(cell)
    }

    pub fn has_component(&self, kind: &ComponentKind) -> bool {
        self.components.get().contains_key(kind)
    }

    pub fn component(&self, kind: &ComponentKind) -> Option<ComponentCell> {
        self.components.get().get(kind).cloned()
    }

    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        self.components.get().keys().cloned().collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.get().len()
    }

    /// Runs `f` on the component of `kind` if it is attached and is a `T`.
    pub fn with_component<T: Component, R>(
        &self,
        kind: &ComponentKind,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        let cell = self.component(kind)?;
        let guard = cell.get();
        guard.as_any().downcast_ref::<T>().map(f)
    }

    /// Mutable counterpart of [`GameObject::with_component`].
    pub fn with_component_mut<T: Component, R>(
        &self,
        kind: &ComponentKind,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let cell = self.component(kind)?;
        let mut guard = cell.get_mut();
        guard.as_any_mut().downcast_mut::<T>().map(f)
    }

    /// Updates every component, then every child.
    ///
    /// Components of one game object are updated one after another so that
    /// only one of them writes to the shared transform at a time.
    pub fn update(&self, ctx: &EngineContext) {
        for cell in self.component_cells() {
            cell.get_mut().update(self, ctx);
        }
        for child in self.children() {
            child.update(ctx);
        }
    }

    pub fn render(&self, camera: &Camera, ctx: &EngineContext) {
        for cell in self.component_cells() {
            cell.get().render(self, camera, ctx);
        }
        for child in self.children() {
            child.render(camera, ctx);
        }
    }

    /// Unloads and uninitializes every component and child, then empties the
    /// component map.
    pub fn destroy(&self, ctx: &EngineContext) {
        let children: Vec<Arc<GameObject>> = self.children.get_mut().drain().map(|(_, c)| c).collect();
        for child in children {
            child.destroy(ctx);
        }

        let cells: Vec<ComponentCell> = self.components.get_mut().drain().map(|(_, c)| c).collect();
        for cell in cells {
            let mut component = cell.get_mut();
            component.on_unload(self, ctx);
            component.uninitialize(self, ctx);
        }
    }

    /// Adds `child`, parenting its transform to this one.
    ///
    /// Names are unique among siblings. A child whose subtree already contains
    /// this game object's transform is refused.
    pub fn add_child(&self, child: Arc<GameObject>) -> EngineResult<()> {
        if self.children.get().contains_key(child.name()) {
            warn!("{}: already has a child named {}", self.name, child.name());
            return Err(EngineError::DuplicateName(child.name().to_string()));
        }
        if let Err(err) = child.transform.set_parent(&self.transform) {
            warn!("{}: refusing child {}: {}", self.name, child.name(), err);
            return Err(err);
        }
        self.children
            .get_mut()
            .insert(child.name().to_string(), child);
        Ok(())
    }

    pub fn child(&self, name: &str) -> Option<Arc<GameObject>> {
        self.children.get().get(name).cloned()
    }

    pub fn children(&self) -> Vec<Arc<GameObject>> {
        self.children.get().values().cloned().collect()
    }

    /// Detaches and destroys the named child.
    pub fn remove_child(&self, name: &str, ctx: &EngineContext) -> EngineResult<()> {
        let child = self
            .children
            .get_mut()
            .remove(name)
            .ok_or_else(|| EngineError::NotRegistered(name.to_string()))?;
        child.destroy(ctx);
        child.transform.get_mut().clear_parent();
        Ok(())
    }

    fn component_cells(&self) -> Vec<ComponentCell> {
        self.components.get().values().cloned().collect()
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("components", &self.component_kinds())
            .field("children", &self.children.get().len())
            .finish()
    }
}
