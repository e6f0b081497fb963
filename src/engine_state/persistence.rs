//! # Persistence
//!
//! Binary save and load of game objects. All integers are little-endian `u32`.
//!
//! ```text
//! game object := name transform component_count component* child_count game_object*
//! name        := len bytes                (UTF-8)
//! transform   := len bytes                (JSON)
//! component   := tag_len tag payload_len payload
//! ```
//!
//! Components decide their own payload through [`Component::save`]; those that
//! return `None` are left out and rebuilt by whoever owns them (chunks are
//! regenerated by the world). On load, tags are resolved through
//! [`ComponentLoaders`], so a component comes back as the same type. Unknown
//! tags are skipped with a warning.

use std::{
    collections::HashMap,
    io::{ErrorKind, Read, Write},
    sync::Arc,
};

use log::{debug, warn};

use super::{
    context::EngineContext,
    entity::{Component, ComponentKind, GameObject, Transform},
    physics::{Collider, Rigidbody},
};
use crate::error::{EngineError, EngineResult};

/// Upper bound on any single length field, to reject garbage early.
pub const MAX_FIELD_LEN: u32 = 64 * 1024 * 1024;

/// Builds a component back from its payload.
pub type ComponentLoader = fn(&[u8]) -> EngineResult<Box<dyn Component>>;

/// Tag → loader table.
pub struct ComponentLoaders {
    loaders: HashMap<String, ComponentLoader>,
}

impl Default for ComponentLoaders {
    fn default() -> Self {
        let mut loaders = ComponentLoaders {
            loaders: HashMap::new(),
        };
        loaders.register(ComponentKind::Collider.tag(), Collider::load);
        loaders.register(ComponentKind::Rigidbody.tag(), Rigidbody::load);
        loaders
    }
}

impl ComponentLoaders {
    /// Loaders for the built-in persistent components.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tag: &str, loader: ComponentLoader) {
        self.loaders.insert(tag.to_string(), loader);
    }

    pub fn load(&self, tag: &str, payload: &[u8]) -> EngineResult<Box<dyn Component>> {
        let loader = self
            .loaders
            .get(tag)
            .ok_or_else(|| EngineError::UnknownComponentTag(tag.to_string()))?;
        loader(payload)
    }
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> EngineResult<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> EngineResult<()> {
    let len = u32::try_from(bytes.len())
        .ok()
        .filter(|&len| len <= MAX_FIELD_LEN)
        .ok_or_else(|| EngineError::Corrupt(format!("field of {} bytes is too long", bytes.len())))?;
    write_u32(writer, len)?;
    writer.write_all(bytes)?;
    Ok(())
}

fn read_u32<R: Read>(reader: &mut R) -> EngineResult<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => EngineError::Corrupt("stream ended early".to_string()),
        _ => err.into(),
    })?;
    Ok(u32::from_le_bytes(buffer))
}

fn read_bytes<R: Read>(reader: &mut R) -> EngineResult<Vec<u8>> {
    let len = read_u32(reader)?;
    if len > MAX_FIELD_LEN {
        return Err(EngineError::Corrupt(format!("field length {len} is too long")));
    }
    let mut bytes = vec![0u8; len as usize];
    reader.read_exact(&mut bytes).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => EngineError::Corrupt("stream ended inside a field".to_string()),
        _ => err.into(),
    })?;
    Ok(bytes)
}

fn read_string<R: Read>(reader: &mut R) -> EngineResult<String> {
    String::from_utf8(read_bytes(reader)?)
        .map_err(|_| EngineError::Corrupt("string is not UTF-8".to_string()))
}

/// Writes `object`, its persistent components and its children.
pub fn save_game_object<W: Write>(object: &GameObject, writer: &mut W) -> EngineResult<()> {
    write_bytes(writer, object.name().as_bytes())?;
    let transform = serde_json::to_vec(&*object.transform().get())?;
    write_bytes(writer, &transform)?;

    let mut saved = Vec::new();
    for kind in object.component_kinds() {
        let Some(cell) = object.component(&kind) else {
            continue;
        };
        let payload = cell.get().save();
        match payload {
            Some(payload) => saved.push((kind, payload?)),
            None => debug!("{}: {} is not persisted", object.name(), kind),
        }
    }

    write_u32(writer, saved.len() as u32)?;
    for (kind, payload) in saved {
        write_bytes(writer, kind.tag().as_bytes())?;
        write_bytes(writer, &payload)?;
    }

    let children = object.children();
    write_u32(writer, children.len() as u32)?;
    for child in children {
        save_game_object(&child, writer)?;
    }
    Ok(())
}

/// Reads a game object written by [`save_game_object`].
///
/// Components are attached through the normal lifecycle, so colliders rejoin
/// the collider directory. The object itself is not registered in the game
/// object directory; the caller decides where it goes.
pub fn load_game_object<R: Read>(
    reader: &mut R,
    loaders: &ComponentLoaders,
    ctx: &EngineContext,
) -> EngineResult<Arc<GameObject>> {
    let name = read_string(reader)?;
    let transform: Transform = serde_json::from_slice(&read_bytes(reader)?)?;
    let object = Arc::new(GameObject::with_transform(name, transform));

    let component_count = read_u32(reader)?;
    for _ in 0..component_count {
        let tag = read_string(reader)?;
        let payload = read_bytes(reader)?;
        let component = match loaders.load(&tag, &payload) {
            Ok(component) => component,
            Err(EngineError::UnknownComponentTag(tag)) => {
                warn!("{}: skipping component with unknown tag `{}`", object.name(), tag);
                continue;
            }
            Err(err) => return Err(err),
        };
        object.add_component(component, ctx)?;
    }

    let child_count = read_u32(reader)?;
    for _ in 0..child_count {
        let child = load_game_object(reader, loaders, ctx)?;
        object.add_child(child)?;
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use cgmath::Vector3;

    use super::*;
    use crate::config::EngineConfig;

    struct Sign;

    impl Component for Sign {
        fn kind(&self) -> ComponentKind {
            ComponentKind::Custom("sign")
        }

        fn save(&self) -> Option<EngineResult<Vec<u8>>> {
            Some(Ok(b"hello".to_vec()))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn player(ctx: &EngineContext) -> Arc<GameObject> {
        let player = ctx.game_objects.create_at("player", Vector3::new(1.0, 2.0, 3.0));
        player.transform().get_mut().rotate(Vector3::new(0.0, 90.0, 0.0));
        player
            .add_component(Box::new(Collider::box_collider(Vector3::new(0.6, 1.8, 0.6))), ctx)
            .unwrap();
        player
            .add_component(Box::new(Rigidbody::with_velocity(Vector3::new(0.0, -2.0, 0.0))), ctx)
            .unwrap();
        player
    }

    #[test]
    fn round_trips_components_and_children() {
        let ctx = EngineContext::new(EngineConfig::default());
        let original = player(&ctx);
        let hand = Arc::new(GameObject::with_transform(
            "hand",
            Transform::at(Vector3::new(0.5, 0.0, 0.0)),
        ));
        original.add_child(hand).unwrap();

        let mut bytes = Vec::new();
        save_game_object(&original, &mut bytes).unwrap();

        let other = EngineContext::new(EngineConfig::default());
        let loaded = load_game_object(&mut bytes.as_slice(), &ComponentLoaders::new(), &other).unwrap();

        assert_eq!(loaded.name(), "player");
        assert_eq!(*loaded.transform().get(), *original.transform().get());
        assert!(other.colliders.contains("player"));
        let velocity = loaded
            .with_component::<Rigidbody, _>(&ComponentKind::Rigidbody, Rigidbody::velocity)
            .unwrap();
        assert_eq!(velocity, Vector3::new(0.0, -2.0, 0.0));

        let hand = loaded.child("hand").unwrap();
        assert!(hand.transform().is_child_of(loaded.transform()));
        assert_eq!(hand.transform().get().position, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn unknown_tags_are_skipped() {
        let ctx = EngineContext::new(EngineConfig::default());
        let original = player(&ctx);
        original.add_component(Box::new(Sign), &ctx).unwrap();

        let mut bytes = Vec::new();
        save_game_object(&original, &mut bytes).unwrap();

        let other = EngineContext::new(EngineConfig::default());
        let loaded = load_game_object(&mut bytes.as_slice(), &ComponentLoaders::new(), &other).unwrap();
        assert_eq!(loaded.component_count(), 2);
        assert!(!loaded.has_component(&ComponentKind::Custom("sign")));
    }

    #[test]
    fn registered_loaders_restore_custom_components() {
        let ctx = EngineContext::new(EngineConfig::default());
        let original = player(&ctx);
        original.add_component(Box::new(Sign), &ctx).unwrap();
        let mut bytes = Vec::new();
        save_game_object(&original, &mut bytes).unwrap();

        let mut loaders = ComponentLoaders::new();
        loaders.register("sign", |payload| {
            assert_eq!(payload, b"hello");
            Ok(Box::new(Sign) as Box<dyn Component>)
        });
        let other = EngineContext::new(EngineConfig::default());
        let loaded = load_game_object(&mut bytes.as_slice(), &loaders, &other).unwrap();
        assert!(loaded.has_component(&ComponentKind::Custom("sign")));
    }

    #[test]
    fn truncated_streams_are_corrupt() {
        let ctx = EngineContext::new(EngineConfig::default());
        let mut bytes = Vec::new();
        save_game_object(&player(&ctx), &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 3);

        let other = EngineContext::new(EngineConfig::default());
        let result = load_game_object(&mut bytes.as_slice(), &ComponentLoaders::new(), &other);
        assert!(matches!(result, Err(EngineError::Corrupt(_))));
    }
}
