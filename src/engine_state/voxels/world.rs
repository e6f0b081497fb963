//! # World Module
//!
//! The [`World`] component streams chunks around a chunk loader, typically the
//! player's transform.
//!
//! ## Streaming
//!
//! Each update runs two passes around the loader's chunk coordinate `c`:
//! - **Load**: every coordinate within Chebyshev distance `render_distance` of
//!   `c` that isn't loaded yet gets a chunk game object. Terrain for all new
//!   chunks of the pass is generated in parallel, then the game objects are
//!   created one by one.
//! - **Unload**: every loaded coordinate farther than `render_distance + 1`
//!   from `c` has its game object destroyed.
//!
//! The one-chunk gap between the two thresholds keeps a loader sitting on a
//! chunk boundary from loading and unloading the same chunks every tick.
//! Without a loader (or once its transform is gone) streaming does nothing.

use std::{any::Any, collections::HashSet};

use cgmath::Point3;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    core::MtWeak,
    engine_state::{
        context::EngineContext,
        entity::{Component, ComponentKind, GameObject, SharedTransform, Transform},
        physics::Collider,
    },
};

use super::{
    chunk::{chunk_coordinate, chunk_name, chunk_origin, Chunk},
    generation::{default_generators, TerrainGenerator},
};

/// Chebyshev distance between two chunk coordinates.
pub fn chunk_distance(a: Point3<i32>, b: Point3<i32>) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs()).max((a.z - b.z).abs())
}

/// Streams chunks in and out around a chunk loader.
///
/// The loaded set is the single source of truth for which chunk game objects
/// exist; only the streaming passes change it.
pub struct World {
    loader: Option<MtWeak<Transform>>,
    generators: Option<Vec<Box<dyn TerrainGenerator>>>,
    loaded: HashSet<Point3<i32>>,
    last_loaded: HashSet<Point3<i32>>,
    last_unloaded: HashSet<Point3<i32>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// A world using the default terrain pipeline, seeded from the engine
    /// configuration when it is attached.
    pub fn new() -> Self {
        World {
            loader: None,
            generators: None,
            loaded: HashSet::new(),
            last_loaded: HashSet::new(),
            last_unloaded: HashSet::new(),
        }
    }

    /// A world generating its chunks with `generators`, applied in order.
    pub fn with_generators(generators: Vec<Box<dyn TerrainGenerator>>) -> Self {
        World {
            generators: Some(generators),
            ..Self::new()
        }
    }

    /// Streams around `loader` from now on. Only a weak link is kept.
    pub fn set_loader(&mut self, loader: &SharedTransform) {
        self.loader = Some(loader.downgrade());
    }

    pub fn clear_loader(&mut self) {
        self.loader = None;
    }

    pub fn loaded_chunks(&self) -> &HashSet<Point3<i32>> {
        &self.loaded
    }

    pub fn is_loaded(&self, coordinate: Point3<i32>) -> bool {
        self.loaded.contains(&coordinate)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Coordinates loaded by the most recent update.
    pub fn last_loaded(&self) -> &HashSet<Point3<i32>> {
        &self.last_loaded
    }

    /// Coordinates unloaded by the most recent update.
    pub fn last_unloaded(&self) -> &HashSet<Point3<i32>> {
        &self.last_unloaded
    }

    /// Chunk coordinate the loader is in, if there still is a loader.
    pub fn loader_chunk(&self) -> Option<Point3<i32>> {
        let loader = self.loader.as_ref()?.upgrade()?;
        Some(chunk_coordinate(loader.world_position()))
    }

    /// Runs the load pass then the unload pass around the loader.
    pub fn stream(&mut self, ctx: &EngineContext) {
        self.last_loaded.clear();
        self.last_unloaded.clear();

        let Some(center) = self.loader_chunk() else {
            return;
        };

        self.load_pass(center, ctx);
        self.unload_pass(center, ctx);

        if !self.last_loaded.is_empty() || !self.last_unloaded.is_empty() {
            debug!(
                "streamed around chunk {:?}: +{} -{} ({} loaded)",
                center,
                self.last_loaded.len(),
                self.last_unloaded.len(),
                self.loaded.len()
            );
        }
    }

    fn load_pass(&mut self, center: Point3<i32>, ctx: &EngineContext) {
        let distance = ctx.config.render_distance;
        let mut missing = Vec::new();
        for x in -distance..=distance {
            for y in -distance..=distance {
                for z in -distance..=distance {
                    let coordinate = Point3::new(center.x + x, center.y + y, center.z + z);
                    if !self.loaded.contains(&coordinate) {
                        missing.push(coordinate);
                    }
                }
            }
        }
        if missing.is_empty() {
            return;
        }

        let generators: &[Box<dyn TerrainGenerator>] = self
            .generators
            .get_or_insert_with(|| default_generators(ctx.config.seed));
        let chunks: Vec<Chunk> = missing
            .par_iter()
            .map(|&coordinate| Chunk::generate(coordinate, generators, &ctx.blocks))
            .collect();

        for chunk in chunks {
            let coordinate = chunk.coordinate;
            if Self::spawn_chunk(chunk, ctx) {
                self.loaded.insert(coordinate);
                self.last_loaded.insert(coordinate);
            }
        }
    }

    fn spawn_chunk(chunk: Chunk, ctx: &EngineContext) -> bool {
        let coordinate = chunk.coordinate;
        let object = match ctx
            .game_objects
            .try_create_at(chunk_name(coordinate), chunk_origin(coordinate))
        {
            Ok(object) => object,
            Err(err) => {
                warn!("cannot load chunk {:?}: {}", coordinate, err);
                return false;
            }
        };

        Self::attach_chunk(&object, chunk, ctx)
    }

    /// Attaches `chunk` and its collider to `object`. On failure the object is
    /// destroyed so no chunk-less game object stays registered.
    fn attach_chunk(object: &GameObject, chunk: Chunk, ctx: &EngineContext) -> bool {
        let coordinate = chunk.coordinate;
        let cells = chunk.collision_cells();
        if let Err(err) = object.add_component(Box::new(chunk), ctx) {
            warn!("cannot load chunk {:?}: {}", coordinate, err);
            if let Err(err) = ctx.game_objects.destroy(object.name(), ctx) {
                warn!("chunk {:?} left behind: {}", coordinate, err);
            }
            return false;
        }
        if ctx.config.chunk_colliders && !cells.is_empty() {
            if let Err(err) = object.add_component(Box::new(Collider::voxel_mesh(cells)), ctx) {
                warn!("chunk {:?} has no collider: {}", coordinate, err);
            }
        }
        true
    }

    fn unload_pass(&mut self, center: Point3<i32>, ctx: &EngineContext) {
        let unload_distance = ctx.config.unload_distance();
        let stale: Vec<Point3<i32>> = self
            .loaded
            .iter()
            .copied()
            .filter(|&coordinate| chunk_distance(coordinate, center) > unload_distance)
            .collect();

        for coordinate in stale {
            if let Err(err) = ctx.game_objects.destroy(&chunk_name(coordinate), ctx) {
                warn!("chunk {:?} was already gone: {}", coordinate, err);
            }
            self.loaded.remove(&coordinate);
            self.last_unloaded.insert(coordinate);
        }
    }

    /// Destroys every loaded chunk.
    fn unload_all(&mut self, ctx: &EngineContext) {
        for coordinate in self.loaded.drain() {
            if ctx.game_objects.contains(&chunk_name(coordinate)) {
                let _ = ctx.game_objects.destroy(&chunk_name(coordinate), ctx);
            }
        }
        self.last_loaded.clear();
        self.last_unloaded.clear();
    }
}

impl Component for World {
    fn kind(&self) -> ComponentKind {
        ComponentKind::World
    }

    fn initialize(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        if self.generators.is_none() {
            self.generators = Some(default_generators(ctx.config.seed));
        }
    }

    fn update(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        self.stream(ctx);
    }

    fn uninitialize(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        self.unload_all(ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::{config::EngineConfig, engine_state::voxels::chunk::BlockGrid};

    fn quick_config(render_distance: i32) -> EngineConfig {
        EngineConfig {
            render_distance,
            chunk_colliders: false,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn chebyshev_distance() {
        assert_eq!(chunk_distance(Point3::new(0, 0, 0), Point3::new(3, -5, 1)), 5);
        assert_eq!(chunk_distance(Point3::new(2, 2, 2), Point3::new(2, 2, 2)), 0);
    }

    #[test]
    fn no_loader_means_no_streaming() {
        let ctx = EngineContext::new(quick_config(1));
        let mut world = World::with_generators(Vec::new());
        world.stream(&ctx);
        assert_eq!(world.loaded_count(), 0);
        assert!(ctx.game_objects.is_empty());
    }

    #[test]
    fn a_dropped_loader_stops_streaming() {
        let ctx = EngineContext::new(quick_config(1));
        let mut world = World::with_generators(Vec::new());
        {
            let loader = SharedTransform::at(Vector3::new(0.0, 0.0, 0.0));
            world.set_loader(&loader);
        }
        world.stream(&ctx);
        assert_eq!(world.loaded_count(), 0);
    }

    #[test]
    fn loads_a_cube_and_unloads_past_the_buffer() {
        let ctx = EngineContext::new(quick_config(1));
        let loader = SharedTransform::at(Vector3::new(8.0, 8.0, 8.0));
        let mut world = World::with_generators(Vec::new());
        world.set_loader(&loader);

        world.stream(&ctx);
        assert_eq!(world.loaded_count(), 27);
        assert_eq!(ctx.game_objects.len(), 27);
        assert!(ctx.game_objects.contains("chunk_-1_0_1"));

        // One chunk over: within the buffer, nothing unloads.
        loader.get_mut().translate(Vector3::new(16.0, 0.0, 0.0));
        world.stream(&ctx);
        assert_eq!(world.last_loaded().len(), 9);
        assert!(world.last_unloaded().is_empty());
        assert_eq!(world.loaded_count(), 36);

        // Two more: the x = -1 and x = 0 slabs fall outside distance 2.
        loader.get_mut().translate(Vector3::new(32.0, 0.0, 0.0));
        world.stream(&ctx);
        assert!(world.last_unloaded().iter().all(|c| c.x <= 0));
        assert!(!world.is_loaded(Point3::new(-1, 0, 0)));
        assert!(!ctx.game_objects.contains("chunk_-1_0_0"));
        assert!(world.last_loaded().is_disjoint(world.last_unloaded()));
    }

    #[test]
    fn chunks_are_created_at_their_origin() {
        let ctx = EngineContext::new(quick_config(0));
        let loader = SharedTransform::at(Vector3::new(-20.0, 40.0, 3.0));
        let mut world = World::with_generators(Vec::new());
        world.set_loader(&loader);
        world.stream(&ctx);

        let chunk = ctx.game_objects.get("chunk_-2_2_0").unwrap();
        assert_eq!(chunk.transform().world_position(), Vector3::new(-32.0, 32.0, 0.0));
        assert!(chunk.has_component(&ComponentKind::Chunk));
    }

    #[test]
    fn detaching_the_world_destroys_its_chunks() {
        let ctx = EngineContext::new(quick_config(1));
        let owner = ctx.game_objects.create("world");
        let loader = SharedTransform::at(Vector3::new(0.0, 0.0, 0.0));
        let mut world = World::with_generators(Vec::new());
        world.set_loader(&loader);
        owner.add_component(Box::new(world), &ctx).unwrap();

        owner.update(&ctx);
        assert_eq!(ctx.game_objects.len(), 28);

        owner.remove_component(&ComponentKind::World, &ctx);
        assert_eq!(ctx.game_objects.len(), 1);
    }

    #[test]
    fn a_chunk_that_cannot_attach_leaves_no_object_behind() {
        let ctx = EngineContext::new(quick_config(0));
        let origin = Point3::new(0, 0, 0);
        let object = ctx
            .game_objects
            .try_create_at(chunk_name(origin), chunk_origin(origin))
            .unwrap();
        object
            .add_component(Box::new(Chunk::new(origin, BlockGrid::empty(), &ctx.blocks)), &ctx)
            .unwrap();

        let second = Chunk::new(origin, BlockGrid::empty(), &ctx.blocks);
        assert!(!World::attach_chunk(&object, second, &ctx));
        assert!(!ctx.game_objects.contains(&chunk_name(origin)));
    }
}
