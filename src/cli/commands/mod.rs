//! One module per CLI command.

pub mod add;
pub mod autofill;
pub mod delete;
pub mod generate;
pub mod get;
pub mod list;
pub mod menu;
pub mod status;
