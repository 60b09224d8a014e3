pub mod emitters;
pub mod generator;
pub mod helper;

pub use generator::{PluginGenerator, PluginOptions};
