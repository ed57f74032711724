//! Fleet state store: typed repositories for agents, tasks and
//! configurations with an append-only mutation history.
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
