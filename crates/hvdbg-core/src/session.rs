//! # Session
//!
//! Connection and driver state for one interpreter.
//!
//! The session replaces two process-wide flags ("connected" and "modules
//! loaded") with a value the interpreter owns and lends to every handler.
//! The transport to the backend lives here too, and only exists while the
//! driver is loaded; handlers that need it get it through
//! [`Session::transport`].
//!
//! ## States
//!
//! ```text
//! disconnected ──.connect──▶ connected/unloaded ──load──▶ connected/loaded
//!      ▲                          │                            │
//!      └───────.disconnect────────┘            unload ◀────────┘
//! ```
//!
//! `.disconnect` leaves a loaded driver loaded. The transport stays owned by
//! the session, so it is still valid after reconnecting and `exit` still
//! tears it down.

use std::fmt;
use std::net::Ipv4Addr;

use hvdbg_protocol::Transport;
use tracing::{info, warn};

use crate::backend::{Driver, DriverError};
use crate::error::{CommandError, HvdbgResult};

/// What `.connect` attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint
{
    /// Debugging the current machine
    Local,
    /// Debugging a remote machine
    Remote
    {
        /// Remote address
        ip: Ipv4Addr,
        /// Remote port
        port: u16,
    },
}

impl fmt::Display for Endpoint
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Local => write!(f, "local system"),
            Self::Remote { ip, port } => write!(f, "{ip}:{port}"),
        }
    }
}

/// Result of tearing the driver down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown
{
    /// Nothing was loaded
    NothingLoaded,
    /// Unloaded and uninstalled
    Unloaded,
}

/// Interpreter session
pub struct Session
{
    endpoint: Option<Endpoint>,
    driver: Box<dyn Driver>,
    transport: Option<Box<dyn Transport>>,
}

impl fmt::Debug for Session
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Session")
            .field("endpoint", &self.endpoint)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl Session
{
    /// A disconnected session that will load `driver` on demand
    pub fn new(driver: Box<dyn Driver>) -> Self
    {
        Self {
            endpoint: None,
            driver,
            transport: None,
        }
    }

    /// Whether `.connect` has succeeded since the last `.disconnect`
    pub fn is_connected(&self) -> bool
    {
        self.endpoint.is_some()
    }

    /// Whether the driver is loaded and its transport open
    pub fn is_loaded(&self) -> bool
    {
        self.transport.is_some()
    }

    /// Current endpoint, if connected
    pub fn endpoint(&self) -> Option<Endpoint>
    {
        self.endpoint
    }

    /// Connect to `endpoint`
    ///
    /// Connecting while already connected replaces the endpoint.
    pub fn connect(&mut self, endpoint: Endpoint)
    {
        if let Some(previous) = self.endpoint.replace(endpoint) {
            info!(%previous, %endpoint, "session reconnected");
        } else {
            info!(%endpoint, "session connected");
        }
    }

    /// Drop the connection, leaving any loaded driver alone
    ///
    /// ## Errors
    ///
    /// `NotConnected` if there is no connection.
    pub fn disconnect(&mut self) -> HvdbgResult<()>
    {
        let endpoint = self.endpoint.take().ok_or(CommandError::NotConnected)?;
        info!(%endpoint, loaded = self.is_loaded(), "session disconnected");
        Ok(())
    }

    /// Fail with `NotConnected` unless connected
    ///
    /// ## Errors
    ///
    /// `NotConnected` if there is no connection.
    pub fn require_connected(&self) -> HvdbgResult<()>
    {
        if self.is_connected() {
            Ok(())
        } else {
            Err(CommandError::NotConnected)
        }
    }

    /// Install and load the driver
    ///
    /// ## Errors
    ///
    /// The driver error from the step that failed. A failed load leaves the
    /// driver installed so a later `load` can retry.
    pub fn load(&mut self) -> Result<(), DriverError>
    {
        self.driver.install()?;
        let transport = self.driver.load()?;
        self.transport = Some(transport);
        info!("driver loaded");
        Ok(())
    }

    /// Unload and uninstall the driver if it is loaded
    ///
    /// Uninstall is attempted even when unload fails.
    ///
    /// ## Errors
    ///
    /// The first driver error, unload before uninstall. The transport is
    /// gone either way.
    pub fn unload(&mut self) -> Result<Teardown, DriverError>
    {
        let Some(transport) = self.transport.take() else {
            return Ok(Teardown::NothingLoaded);
        };

        let unloaded = self.driver.unload(transport);
        let uninstalled = self.driver.uninstall();
        match (unloaded, uninstalled) {
            (Ok(()), Ok(())) => {
                info!("driver unloaded");
                Ok(Teardown::Unloaded)
            }
            (Err(e), uninstalled) => {
                warn!(error = %e, "driver unload failed");
                if let Err(second) = uninstalled {
                    warn!(error = %second, "driver uninstall failed");
                }
                Err(e)
            }
            (Ok(()), Err(e)) => {
                warn!(error = %e, "driver uninstall failed");
                Err(e)
            }
        }
    }

    /// The backend transport
    ///
    /// ## Errors
    ///
    /// `NotLoaded` unless the driver is loaded.
    pub fn transport(&mut self) -> HvdbgResult<&mut (dyn Transport + 'static)>
    {
        self.transport.as_deref_mut().ok_or(CommandError::NotLoaded)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::backend::LoopbackDriver;

    fn session() -> Session
    {
        Session::new(Box::new(LoopbackDriver::new(2)))
    }

    #[test]
    fn test_new_session_is_disconnected()
    {
        let mut session = session();
        assert!(!session.is_connected());
        assert!(!session.is_loaded());
        assert!(matches!(session.transport(), Err(CommandError::NotLoaded)));
        assert!(matches!(session.require_connected(), Err(CommandError::NotConnected)));
    }

    #[test]
    fn test_disconnect_keeps_driver_loaded()
    {
        let mut session = session();
        session.connect(Endpoint::Local);
        session.load().unwrap();
        session.disconnect().unwrap();

        assert!(!session.is_connected());
        assert!(session.is_loaded());
        assert!(session.transport().is_ok());
    }

    #[test]
    fn test_disconnect_twice_fails()
    {
        let mut session = session();
        session.connect(Endpoint::Local);
        session.disconnect().unwrap();
        assert!(matches!(session.disconnect(), Err(CommandError::NotConnected)));
    }

    #[test]
    fn test_unload_without_load()
    {
        let mut session = session();
        assert_eq!(session.unload().unwrap(), Teardown::NothingLoaded);
    }

    struct BusyDriver(LoopbackDriver);

    impl Driver for BusyDriver
    {
        fn install(&mut self) -> Result<(), DriverError>
        {
            self.0.install()
        }

        fn load(&mut self) -> Result<Box<dyn Transport>, DriverError>
        {
            self.0.load()
        }

        fn unload(&mut self, _transport: Box<dyn Transport>) -> Result<(), DriverError>
        {
            Err(DriverError::UnloadFailed("device busy".to_string()))
        }

        fn uninstall(&mut self) -> Result<(), DriverError>
        {
            self.0.uninstall()
        }
    }

    #[test]
    fn test_failed_unload_is_returned()
    {
        let mut session = Session::new(Box::new(BusyDriver(LoopbackDriver::new(1))));
        session.connect(Endpoint::Local);
        session.load().unwrap();

        let err = session.unload().unwrap_err();
        assert!(matches!(err, DriverError::UnloadFailed(ref reason) if reason == "device busy"));
        assert!(!session.is_loaded());
        assert_eq!(session.unload().unwrap(), Teardown::NothingLoaded);
    }

    #[test]
    fn test_endpoint_display()
    {
        let remote = Endpoint::Remote {
            ip: Ipv4Addr::new(192, 168, 1, 5),
            port: 50000,
        };
        assert_eq!(remote.to_string(), "192.168.1.5:50000");
        assert_eq!(Endpoint::Local.to_string(), "local system");
    }
}
