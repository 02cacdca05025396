//! Shell port — the single point where the controller reaches the host OS.

/// The only command the controller ever issues.
pub const POWEROFF_COMMAND: &str = "sudo poweroff";

/// Host command runner.
///
/// Implementations must execute [`POWEROFF_COMMAND`] and nothing else: any
/// other string is logged and ignored, never executed and never an error.
pub trait Shell: Send + Sync {
    fn run(&self, command: &str);
}

impl<T: Shell + ?Sized> Shell for std::sync::Arc<T> {
    fn run(&self, command: &str) {
        (**self).run(command);
    }
}
