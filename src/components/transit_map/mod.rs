mod builder;
mod component;
mod config;
mod error;
mod loader;
mod render;
mod scene;
mod state;
mod types;

pub use component::TransitMapCanvas;
pub use config::MapConfig;
