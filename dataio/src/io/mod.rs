//! I/O helpers: root discovery, directory layout and artifact loaders.

pub mod archive;
pub mod check;
pub mod cohort;
pub mod config;
pub mod layout;
pub mod npy;
pub mod root;
