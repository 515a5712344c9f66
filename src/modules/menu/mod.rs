//! Static menu tree of gated resources.

pub mod config;
pub mod model;

pub use config::school_menu;
pub use model::{Menu, MenuResource};
