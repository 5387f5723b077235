/* src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{find_gantry_config, load_gantry_config};
pub use types::GantryConfig;
