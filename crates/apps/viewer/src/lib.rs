pub mod bridge;
pub mod config;
pub mod loader;
pub mod session;

pub use config::{ConfigError, ViewerConfig};
pub use loader::{LoadError, LoadSummary, load_atlas};
pub use session::{LevelView, MapSession, PanelView, SessionEvent, SessionOutput};
