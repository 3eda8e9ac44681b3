//! Core library components.
//!
//! Everything except the command-line shell: encryption, storage, the
//! identity vault, the resource tree and action dispatch.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod domain;
pub mod hangar;
pub mod store;
pub mod tree;
pub mod types;
pub mod validation;
pub mod vault;
