pub mod admin;
pub mod atlas;
pub mod selection;

#[cfg(test)]
pub(crate) mod fixtures;

pub use admin::*;
pub use atlas::*;
pub use selection::*;
