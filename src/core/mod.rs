//! # Core Module
//!
//! Shared-ownership primitives used throughout the simulation. Everything that
//! more than one subsystem touches (transforms, collider shapes, chunk grids,
//! components) lives behind one of these handles so that the parallel update
//! pass can reach it without external locking.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted value with read-write locking
//! - `MtWeak`: Non-owning counterpart of `MtResource`, used for parent links and
//!   the chunk loader so that nothing is kept alive by a reference it doesn't own
//! - `MtSystem`: Thread-safe cell around a boxed, possibly unsized value (used to
//!   store type-erased components)
//!
//! ## Usage
//! ```rust
//! use voxel_sim::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let weak = counter.downgrade();
//! assert_eq!(*weak.upgrade().unwrap().get(), 1);
//! ```

pub mod mt_resource;
pub mod mt_system;

pub use mt_resource::{MtResource, MtWeak};
pub use mt_system::MtSystem;
