pub mod aggregate;
pub mod cli;
pub mod config;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod results;
pub mod source;

mod api;

pub use api::{Zigbench, ZigbenchBuilder};
