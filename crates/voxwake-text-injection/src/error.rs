use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectionError {
    /// The backend cannot run in this environment at all.
    #[error("Injection backend unavailable: {0}")]
    Unavailable(String),

    /// A single synthetic-input operation was rejected by the OS.
    #[error("Synthetic input failed: {0}")]
    MethodFailed(String),

    /// The blocking injection task went away before completing.
    #[error("Injection task was cancelled")]
    Cancelled,
}

impl InjectionError {
    /// Operator hint logged next to injection warnings. Rejected synthetic
    /// input is almost always a permissions problem.
    pub fn remediation_hint(&self) -> &'static str {
        "grant input/accessibility permission to this process \
         (macOS: System Settings > Privacy & Security > Accessibility; \
         Linux: ensure the session allows synthetic input)"
    }
}
