//! Host integration: plugin lifecycle and scene filtering.

pub mod plugin;
pub mod scene;

pub use plugin::Plugin;
pub use scene::SceneFilter;
