pub mod components;
pub mod transition;
pub mod world;

pub use transition::*;
pub use world::*;
