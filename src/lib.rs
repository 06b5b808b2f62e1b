#![deny(rust_2018_idioms)]
#![deny(clippy::all)]
#![allow(clippy::module_inception)]

pub mod audit;
pub mod config;
pub mod migrate;
pub mod model;
pub mod render;
pub mod renumber;
pub mod slug;
pub mod sync;

pub mod error {
    pub use anyhow::{Error, Result};
}
