//! # Entity-Component Runtime
//!
//! Generic containers ("game objects") holding at most one component per
//! capability, dispatching lifecycle calls, and nesting children for derived
//! transforms. The runtime owns no game logic of its own.
//!
//! ## Key Components
//! - [`GameObject`]: named container with a transform, components and children
//! - [`Component`] / [`ComponentKind`]: the behaviour unit and its capability tag
//! - [`GameObjectDirectory`]: name-keyed registry driven by the tick loop
//! - [`Transform`]: position/rotation/scale with weak parent links

pub mod component;
pub mod directory;
pub mod game_object;
pub mod transform;

pub use component::{Component, ComponentKind};
pub use directory::GameObjectDirectory;
pub use game_object::{ComponentCell, GameObject};
pub use transform::{SharedTransform, Transform};

#[cfg(test)]
mod tests {
    use std::{
        any::Any,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use cgmath::Vector3;

    use super::*;
    use crate::{config::EngineConfig, engine_state::context::EngineContext, error::EngineError};

    /// Counts every lifecycle call it receives.
    #[derive(Default)]
    struct Probe {
        label: &'static str,
        calls: Arc<ProbeCalls>,
    }

    #[derive(Default)]
    struct ProbeCalls {
        initialize: AtomicUsize,
        update: AtomicUsize,
        load: AtomicUsize,
        unload: AtomicUsize,
        uninitialize: AtomicUsize,
    }

    impl Component for Probe {
        fn kind(&self) -> ComponentKind {
            ComponentKind::Custom(self.label)
        }

        fn initialize(&mut self, _owner: &GameObject, _ctx: &EngineContext) {
            self.calls.initialize.fetch_add(1, Ordering::SeqCst);
        }

        fn update(&mut self, owner: &GameObject, _ctx: &EngineContext) {
            self.calls.update.fetch_add(1, Ordering::SeqCst);
            owner.transform().get_mut().translate(Vector3::new(1.0, 0.0, 0.0));
        }

        fn on_load(&mut self, _owner: &GameObject, _ctx: &EngineContext) {
            self.calls.load.fetch_add(1, Ordering::SeqCst);
        }

        fn on_unload(&mut self, _owner: &GameObject, _ctx: &EngineContext) {
            self.calls.unload.fetch_add(1, Ordering::SeqCst);
        }

        fn uninitialize(&mut self, _owner: &GameObject, _ctx: &EngineContext) {
            self.calls.uninitialize.fetch_add(1, Ordering::SeqCst);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn probe(label: &'static str) -> (Box<Probe>, Arc<ProbeCalls>) {
        let calls = Arc::new(ProbeCalls::default());
        (
            Box::new(Probe {
                label,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[test]
    fn lifecycle_hooks_run_in_order() {
        let ctx = EngineContext::new(EngineConfig::default());
        let object = ctx.game_objects.create("probe");
        let (component, calls) = probe("probe");

        object.add_component(component, &ctx).unwrap();
        assert_eq!(calls.initialize.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load.load(Ordering::SeqCst), 1);

        object.update(&ctx);
        object.update(&ctx);
        assert_eq!(calls.update.load(Ordering::SeqCst), 2);
        assert_eq!(object.transform().get().position.x, 2.0);

        ctx.game_objects.destroy("probe", &ctx).unwrap();
        assert_eq!(calls.unload.load(Ordering::SeqCst), 1);
        assert_eq!(calls.uninitialize.load(Ordering::SeqCst), 1);
        assert_eq!(object.component_count(), 0);
        assert!(!ctx.game_objects.contains("probe"));
    }

    #[test]
    fn second_component_of_a_kind_is_ignored() {
        let ctx = EngineContext::new(EngineConfig::default());
        let object = ctx.game_objects.create("single");
        let (first, first_calls) = probe("same");
        let (second, second_calls) = probe("same");

        object.add_component(first, &ctx).unwrap();
        let err = object.add_component(second, &ctx).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateComponent { .. }));

        // The original stays attached and the rejected one never initialized.
        assert_eq!(object.component_count(), 1);
        assert_eq!(first_calls.initialize.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.initialize.load(Ordering::SeqCst), 0);

        object.update(&ctx);
        assert_eq!(first_calls.update.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.update.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remove_then_add_replaces() {
        let ctx = EngineContext::new(EngineConfig::default());
        let object = ctx.game_objects.create("swap");
        let (first, first_calls) = probe("slot");
        let (second, _) = probe("slot");

        object.add_component(first, &ctx).unwrap();
        assert!(object
            .remove_component(&ComponentKind::Custom("slot"), &ctx)
            .is_some());
        assert_eq!(first_calls.uninitialize.load(Ordering::SeqCst), 1);
        object.add_component(second, &ctx).unwrap();
        assert_eq!(object.component_count(), 1);
    }

    #[test]
    fn duplicate_name_keeps_first_registration() {
        let ctx = EngineContext::new(EngineConfig::default());
        let first = ctx.game_objects.create_at("player", Vector3::new(1.0, 0.0, 0.0));
        let second = ctx.game_objects.create_at("player", Vector3::new(2.0, 0.0, 0.0));

        let registered = ctx.game_objects.get("player").unwrap();
        assert!(Arc::ptr_eq(&registered, &first));
        assert!(!Arc::ptr_eq(&registered, &second));
        assert_eq!(ctx.game_objects.len(), 1);
    }

    #[test]
    fn destroying_unknown_name_is_an_error() {
        let ctx = EngineContext::new(EngineConfig::default());
        assert!(matches!(
            ctx.game_objects.destroy("ghost", &ctx),
            Err(EngineError::NotRegistered(_))
        ));
    }

    #[test]
    fn children_update_and_follow_parent() {
        let ctx = EngineContext::new(EngineConfig::default());
        let parent = ctx.game_objects.create_at("cart", Vector3::new(10.0, 0.0, 0.0));
        let child = Arc::new(GameObject::with_transform(
            "wheel",
            Transform::at(Vector3::new(0.0, -1.0, 0.0)),
        ));
        let (component, calls) = probe("spin");
        child.add_component(component, &ctx).unwrap();
        parent.add_child(child.clone()).unwrap();

        parent.update(&ctx);
        assert_eq!(calls.update.load(Ordering::SeqCst), 1);
        let world = child.transform().world_position();
        assert!((world.x - 11.0).abs() < 1e-5);
        assert!((world.y + 1.0).abs() < 1e-5);

        let twin = Arc::new(GameObject::detached("wheel"));
        assert!(matches!(parent.add_child(twin), Err(EngineError::DuplicateName(_))));

        parent.remove_child("wheel", &ctx).unwrap();
        assert_eq!(calls.uninitialize.load(Ordering::SeqCst), 1);
        assert!(parent.child("wheel").is_none());
    }

    #[test]
    fn parent_cannot_become_child_of_its_descendant() {
        let root = Arc::new(GameObject::detached("root"));
        let leaf = Arc::new(GameObject::detached("leaf"));
        root.add_child(leaf.clone()).unwrap();
        assert!(matches!(leaf.add_child(root), Err(EngineError::HierarchyCycle)));
    }
}
