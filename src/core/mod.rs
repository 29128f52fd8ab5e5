//! Core translation engine module

pub mod config;
pub mod dispatcher;
pub mod errors;
#[cfg(feature = "marian")]
pub mod marian;
pub mod models;
pub mod provider;
pub mod remote;
pub mod worker;
