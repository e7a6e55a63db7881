//! # Backend Driver
//!
//! The privileged component that actually reads memory and MSRs.
//!
//! The interpreter never talks to kernel code directly. A [`Driver`] knows
//! how to install and load the backend, and loading hands back the
//! [`Transport`] capability that every memory and MSR command needs. The
//! session keeps that capability for as long as the driver stays loaded.
//!
//! ## Lifecycle
//!
//! 1. `install()` registers the driver with the OS
//! 2. `load()` starts it and returns the transport
//! 3. `unload(transport)` stops it, consuming the transport
//! 4. `uninstall()` removes the registration

pub mod loopback;

use hvdbg_protocol::Transport;
use thiserror::Error;

pub use loopback::LoopbackDriver;

/// Installation and loading mechanics for the backend
pub trait Driver
{
    /// Register the driver with the operating system
    ///
    /// ## Errors
    ///
    /// `InstallFailed` if the OS refuses the driver.
    fn install(&mut self) -> Result<(), DriverError>;

    /// Start the driver and open a channel to it
    ///
    /// ## Errors
    ///
    /// `LoadFailed` if the driver cannot be started or opened.
    fn load(&mut self) -> Result<Box<dyn Transport>, DriverError>;

    /// Stop the driver, closing the channel
    ///
    /// ## Errors
    ///
    /// `UnloadFailed` if the driver refuses to stop.
    fn unload(&mut self, transport: Box<dyn Transport>) -> Result<(), DriverError>;

    /// Remove the driver registration
    ///
    /// ## Errors
    ///
    /// `UninstallFailed` if the registration cannot be removed.
    fn uninstall(&mut self) -> Result<(), DriverError>;
}

/// Error from driver installation or loading
#[derive(Error, Debug)]
pub enum DriverError
{
    /// The driver could not be registered
    #[error("Failed to install driver: {0}")]
    InstallFailed(String),

    /// The driver could not be started or opened
    #[error("Failed to load driver: {0}")]
    LoadFailed(String),

    /// The driver refused to stop
    #[error("Failed to unload driver: {0}")]
    UnloadFailed(String),

    /// The registration could not be removed
    #[error("Failed to uninstall driver: {0}")]
    UninstallFailed(String),
}

/// Create the driver for this build
///
/// No kernel driver ships with this crate, so the loopback driver stands in
/// for it with `logical_cores` simulated processors.
pub fn create_driver(logical_cores: u32) -> Box<dyn Driver>
{
    Box::new(LoopbackDriver::new(logical_cores))
}
