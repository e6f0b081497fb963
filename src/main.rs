//! # Voxel Sim Entry Point
//!
//! Runs the headless simulation. See `voxel_sim::run` for the options.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --ticks 1200 --seed 7
//! ```

fn main() {
    voxel_sim::run();
}
