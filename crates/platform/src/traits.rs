//! Core traits for Keel daemon modules

use crate::KeelResult;

/// Security module interface
///
/// Long-lived daemon components implement this trait so the daemon can
/// bring them up and tear them down uniformly.
pub trait SecurityModule: Send + Sync {
    /// Unique module identifier
    fn id(&self) -> &'static str;

    /// Module version
    fn version(&self) -> &'static str;

    /// Module description
    fn description(&self) -> &'static str;

    /// Initialize the module
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails
    fn init(&mut self) -> KeelResult<()> {
        Ok(())
    }

    /// Shutdown the module
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails
    fn shutdown(&mut self) -> KeelResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeelError;

    struct CountingModule {
        started: bool,
        fail_shutdown: bool,
    }

    impl SecurityModule for CountingModule {
        fn id(&self) -> &'static str {
            "counting_module"
        }

        fn version(&self) -> &'static str {
            "0.1.0"
        }

        fn description(&self) -> &'static str {
            "Module used to exercise lifecycle defaults"
        }

        fn init(&mut self) -> KeelResult<()> {
            self.started = true;
            Ok(())
        }

        fn shutdown(&mut self) -> KeelResult<()> {
            if self.fail_shutdown {
                return Err(KeelError::Config("still running".to_string()));
            }
            self.started = false;
            Ok(())
        }
    }

    struct DefaultModule;

    impl SecurityModule for DefaultModule {
        fn id(&self) -> &'static str {
            "default_module"
        }

        fn version(&self) -> &'static str {
            "0.1.0"
        }

        fn description(&self) -> &'static str {
            "Module relying on default lifecycle hooks"
        }
    }

    #[test]
    fn test_default_lifecycle() {
        let mut module = DefaultModule;
        assert_eq!(module.id(), "default_module");
        assert!(module.init().is_ok());
        assert!(module.shutdown().is_ok());
    }

    #[test]
    fn test_custom_lifecycle() {
        let mut module = CountingModule {
            started: false,
            fail_shutdown: false,
        };
        module.init().unwrap();
        assert!(module.started);
        module.shutdown().unwrap();
        assert!(!module.started);

        module.fail_shutdown = true;
        assert!(matches!(module.shutdown(), Err(KeelError::Config(_))));
    }
}
