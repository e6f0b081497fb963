//! # Game Object Directory
//!
//! The registry of every live top-level game object, keyed by name. The tick
//! loop updates and renders whatever is registered here.

use std::{collections::HashMap, sync::Arc};

use cgmath::Vector3;
use log::{error, warn};

use crate::{
    core::MtResource,
    engine_state::context::EngineContext,
    error::{EngineError, EngineResult},
};

use super::{transform::Transform, GameObject};

/// Name-keyed registry of game objects.
#[derive(Default)]
pub struct GameObjectDirectory {
    objects: MtResource<HashMap<String, Arc<GameObject>>>,
}

impl GameObjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a game object named `name`.
    ///
    /// The first registration of a name wins. A duplicate is logged and the
    /// caller gets a detached object that is never updated or rendered.
    pub fn create(&self, name: impl Into<String>) -> Arc<GameObject> {
        self.create_at(name, Vector3::new(0.0, 0.0, 0.0))
    }

    /// Like [`GameObjectDirectory::create`] with an initial position.
    pub fn create_at(&self, name: impl Into<String>, position: Vector3<f32>) -> Arc<GameObject> {
        let name = name.into();
        match self.try_create_at(name.clone(), position) {
            Ok(object) => object,
            Err(err) => {
                warn!("{err}; keeping the first registration");
                Arc::new(GameObject::with_transform(name, Transform::at(position)))
            }
        }
    }

    /// Creates and registers a game object, failing on a duplicate name.
    pub fn try_create_at(
        &self,
        name: impl Into<String>,
        position: Vector3<f32>,
    ) -> EngineResult<Arc<GameObject>> {
        let name = name.into();
        // The transform exists before the object becomes visible in the map.
        let object = Arc::new(GameObject::with_transform(name.clone(), Transform::at(position)));

        let mut objects = self.objects.get_mut();
        if objects.contains_key(&name) {
            return Err(EngineError::DuplicateName(name));
        }
        objects.insert(name, object.clone());
        Ok(object)
    }

    /// Registers an already built game object (used by persistence).
    pub fn register(&self, object: Arc<GameObject>) -> EngineResult<()> {
        let mut objects = self.objects.get_mut();
        if objects.contains_key(object.name()) {
            return Err(EngineError::DuplicateName(object.name().to_string()));
        }
        objects.insert(object.name().to_string(), object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<GameObject>> {
        self.objects.get().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.get().contains_key(name)
    }

    /// Point-in-time copy of every registered game object.
    pub fn snapshot(&self) -> Vec<Arc<GameObject>> {
        self.objects.get().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.get().is_empty()
    }

    /// Tears down the named game object's components, then forgets it.
    pub fn destroy(&self, name: &str, ctx: &EngineContext) -> EngineResult<()> {
        let Some(object) = self.get(name) else {
            error!("cannot destroy `{name}`: no such game object");
            return Err(EngineError::NotRegistered(name.to_string()));
        };
        object.destroy(ctx);
        self.objects.get_mut().remove(name);
        Ok(())
    }

    /// Destroys everything, used when the engine shuts down.
    pub fn clear(&self, ctx: &EngineContext) {
        for object in self.snapshot() {
            object.destroy(ctx);
        }
        self.objects.get_mut().clear();
    }
}
