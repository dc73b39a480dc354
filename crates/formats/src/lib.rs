pub mod extract;
pub mod geojson;

pub use extract::*;
pub use geojson::*;
