//! Authorization
//!
//! Hook through which the application's auth layer approves reads and writes.

pub mod authorizer;

pub use authorizer::{AccessAuthorizer, AllowAll, FnAuthorizer};
