#[macro_use]
pub mod utils;

pub mod config;
pub mod dirs;
pub mod install;
pub mod logs;
mod native;
pub mod plugins;
mod prelude;
mod run;
