//! # Voxels Module
//!
//! Everything about the block world: block ids and their registry, chunks and
//! their block grids, the terrain generation pipeline, and the [`World`]
//! component that streams chunks around the player.
//!
//! ## Key Components
//! - [`block`]: block types, faces and the [`BlockRegistry`](block::BlockRegistry)
//! - [`chunk`]: the 16×16×16 [`Chunk`](chunk::Chunk) component
//! - [`generation`]: pluggable [`TerrainGenerator`](generation::TerrainGenerator)s
//! - [`world`]: the streaming [`World`] component

pub mod block;
pub mod chunk;
pub mod generation;
pub mod world;

pub use world::World;
