// crates/cli/src/commands/mod.rs
pub mod decode;
pub mod info;
pub mod list;
pub mod projects;
pub mod view;
