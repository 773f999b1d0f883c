// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod messages;
pub mod model;
pub mod storage;
pub mod store;
