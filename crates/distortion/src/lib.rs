pub mod engine;
pub mod path;
pub mod project;

pub use engine::*;
pub use path::*;
pub use project::*;
