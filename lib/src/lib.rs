//! Engine for `cellar`: a local, Git-shaped version-control system for
//! secrets. Owns the on-disk repository layout, the encrypted secrets store,
//! the append-only per-environment commit log, deterministic state replay,
//! and remote push/clone sync. Carries no CLI concerns; see `cellar-cli` for
//! the frontend.

pub mod auth;
pub mod commit;
pub mod config;
pub mod crypt;
pub mod error;
pub mod export;
pub mod file_util;
pub mod journal;
pub mod keystore;
pub mod model;
pub mod project;
pub mod remote;
pub mod repo;
pub mod secrets;
pub mod state;

pub use error::Error;
pub use error::Result;
