pub mod command;
pub mod filter;
pub mod gate;
pub mod style;
pub mod sync;

pub use command::*;
pub use filter::*;
pub use gate::*;
pub use sync::*;
