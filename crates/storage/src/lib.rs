#![warn(clippy::pedantic)]

pub mod cached;
pub mod memory;

pub use cached::{Cached, ExerciseStore};
pub use memory::InMemory;
