//! simrun — simulation runner and HTTP demo.
//!
//! Library crate shared by the `run` and `http-demo` binaries and by the
//! integration tests.

pub mod config;
pub mod demo;
pub mod logging;
pub mod properties;
pub mod runner;
