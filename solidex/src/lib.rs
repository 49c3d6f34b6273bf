//! Deployment tooling and bindings for the Solids token and the Solidex
//! exchange.
//!
//! [`ContractFactory`] deploys a [`ContractArtifact`] (ABI + bytecode) or
//! binds to an existing instance; [`commands`] holds the scripted flows built
//! on top of it.

pub mod artifact;
pub mod client;
pub mod commands;
pub mod contracts;
pub mod factory;
pub mod health;
pub mod report;
pub mod units;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use artifact::ContractArtifact;
pub use client::{SolidexClient, SolidexClientBuilder};
pub use factory::{ContractFactory, Deployment};
pub use report::{BootstrapReport, DeploymentRecord};
