//! The `utils` module provides the pieces shared across `specular`:
//! error types and logging setup.

pub mod error;
pub mod logging;

pub use error::{BrokerError, Error, Result};

#[cfg(test)]
mod tests {
    use super::error::{BrokerError, Error};
    use super::logging;

    #[test]
    fn test_logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("warning");
        logging::init("nonsense");
    }

    #[test]
    fn test_broker_error_converts_into_app_error() {
        let err: Error = BrokerError::Closed.into();
        assert!(matches!(err, Error::Broker(BrokerError::Closed)));
        assert_eq!(err.to_string(), "broker is shut down");
    }

    #[test]
    fn test_io_error_is_wrapped_with_context() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: Error = io.into();
        assert_eq!(err.to_string(), "i/o error: port taken");
    }
}
