#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod equipment;
pub mod error;
pub mod exercise;
pub mod fatigue;
pub mod generator;
pub mod history;
pub mod muscle;
pub mod recovery;
pub mod service;
pub mod substitution;
pub mod volume;
pub mod workout;

pub use equipment::*;
pub use error::*;
pub use exercise::*;
pub use fatigue::*;
pub use generator::*;
pub use history::*;
pub use muscle::*;
pub use recovery::*;
pub use service::*;
pub use substitution::*;
pub use volume::*;
pub use workout::*;
