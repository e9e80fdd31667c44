pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::server::{app, run, run_with_config, run_with_static_dir};
