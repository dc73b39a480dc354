pub mod bounds;
pub mod names;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use names::*;
