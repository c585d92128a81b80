//! RAX file manager storage
//!
//! Local storage layer of a browser-based file manager: resolves paths against
//! the files root, enforces the restriction policy and permission model, and
//! performs bulk operations (summaries, recursive delete, zip packaging,
//! exact file sizing) that respect both.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod policy;
pub mod storage;
pub mod utils;

pub use crate::config::Settings;
pub use error::StorageError;
pub use storage::{HostEnvironment, LocalStorage};
