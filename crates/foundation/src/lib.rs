pub mod math;
pub mod projection;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use projection::*;
pub use time::*;
