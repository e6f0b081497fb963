use std::collections::HashSet;

use cgmath::{Point3, Vector3};
use voxel_sim::{
    config::EngineConfig,
    engine_state::{
        entity::{ComponentKind, SharedTransform},
        voxels::{
            chunk::{chunk_coordinate, CHUNK_DIMENSION},
            world::chunk_distance,
            World,
        },
        EngineContext,
    },
};

fn flat_config(render_distance: i32) -> EngineConfig {
    EngineConfig {
        render_distance,
        chunk_colliders: false,
        ..EngineConfig::default()
    }
}

fn expected_cube(center: Point3<i32>, distance: i32) -> HashSet<Point3<i32>> {
    let mut cube = HashSet::new();
    for x in -distance..=distance {
        for y in -distance..=distance {
            for z in -distance..=distance {
                cube.insert(Point3::new(center.x + x, center.y + y, center.z + z));
            }
        }
    }
    cube
}

#[test]
fn one_pass_loads_the_full_cube() {
    let ctx = EngineContext::new(flat_config(3));
    let loader = SharedTransform::at(Vector3::new(1.0, 2.0, 3.0));
    let mut world = World::with_generators(Vec::new());
    world.set_loader(&loader);

    world.stream(&ctx);

    assert_eq!(world.loaded_count(), 343);
    assert_eq!(*world.loaded_chunks(), expected_cube(Point3::new(0, 0, 0), 3));
    assert_eq!(ctx.game_objects.len(), 343);

    world.stream(&ctx);
    assert!(world.last_loaded().is_empty());
    assert!(world.last_unloaded().is_empty());
}

#[test]
fn loaded_set_follows_a_loader_moving_along_x() {
    let ctx = EngineContext::new(flat_config(3));
    let loader = SharedTransform::at(Vector3::new(0.5, 0.5, 0.5));
    let mut world = World::with_generators(Vec::new());
    world.set_loader(&loader);

    let step = CHUNK_DIMENSION as f32 / 4.0;
    for _ in 0..40 {
        world.stream(&ctx);
        assert!(world.last_loaded().is_disjoint(world.last_unloaded()));

        let center = chunk_coordinate(loader.world_position());
        let unload_distance = ctx.config.unload_distance();
        assert!(world
            .loaded_chunks()
            .iter()
            .all(|&c| chunk_distance(c, center) <= unload_distance));
        assert!(expected_cube(center, 3).is_subset(world.loaded_chunks()));

        loader.get_mut().translate(Vector3::new(step, 0.0, 0.0));
    }

    // Stopped: the set stops changing. It holds the cube plus, at most, the
    // trailing slab the unload buffer keeps.
    world.stream(&ctx);
    world.stream(&ctx);
    assert!(world.last_loaded().is_empty());
    assert!(world.last_unloaded().is_empty());

    let center = chunk_coordinate(loader.world_position());
    let cube = expected_cube(center, 3);
    assert!(cube.is_subset(world.loaded_chunks()));
    assert!(world
        .loaded_chunks()
        .iter()
        .all(|c| cube.contains(c) || c.x == center.x - 4));
    assert!(world.loaded_count() <= 343 + 49);
}

#[test]
fn a_stationary_loader_stabilizes_on_the_cube() {
    let ctx = EngineContext::new(flat_config(3));
    let loader = SharedTransform::at(Vector3::new(0.5, 0.5, 0.5));
    let mut world = World::with_generators(Vec::new());
    world.set_loader(&loader);
    world.stream(&ctx);

    // Jump far away: everything old unloads in the same pass.
    loader
        .get_mut()
        .set_local_position(Vector3::new(10.0 * CHUNK_DIMENSION as f32 + 0.5, 0.5, 0.5));
    world.stream(&ctx);
    assert_eq!(world.last_unloaded().len(), 343);
    assert_eq!(world.last_loaded().len(), 343);
    assert!(world.last_loaded().is_disjoint(world.last_unloaded()));

    for _ in 0..3 {
        world.stream(&ctx);
    }
    assert_eq!(*world.loaded_chunks(), expected_cube(Point3::new(10, 0, 0), 3));
    assert_eq!(ctx.game_objects.len(), 343);
}

#[test]
fn world_component_streams_during_the_update_pass() {
    let ctx = EngineContext::new(flat_config(2));
    let loader = SharedTransform::at(Vector3::new(0.0, 0.0, 0.0));
    let owner = ctx.game_objects.create("world");
    let mut world = World::with_generators(Vec::new());
    world.set_loader(&loader);
    owner.add_component(Box::new(world), &ctx).unwrap();

    owner.update(&ctx);
    let loaded = owner
        .with_component::<World, _>(&ComponentKind::World, World::loaded_count)
        .unwrap();
    assert_eq!(loaded, 125);
}
