//! Deterministic simulation harness for Kaiwa screen-flow testing.
//!
//! Virtual-time implementations of the Environment, `AuthService` and
//! Driver traits for deterministic, reproducible testing of the bootstrap
//! and navigation state machines with the same orchestration code that
//! runs in production.
//!
//! # Components
//!
//! - [`SimEnv`]: manually advanced virtual clock
//! - [`SimAuth`]: scripted auth/profile service that records every fetch
//! - [`SimDriver`]: scripted user input with a render log

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod sim_auth;
mod sim_driver;
mod sim_env;

pub use sim_auth::{ProfileStep, SimAuth, SimAuthError};
pub use sim_driver::{DriverStep, RenderFrame, SimDriver};
pub use sim_env::{SimEnv, SimInstant};
