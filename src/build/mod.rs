/* src/build/mod.rs */

pub mod app;
pub mod assets;
pub mod constants;
pub mod graph;
pub mod manifest;
pub mod output;
pub mod profile;
pub mod revision;
pub mod rewrite;
pub mod run;
pub mod stylesheet;
pub mod vendor;
