/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of attempts, including the first one.
    pub retry_attempts: usize,
    /// Base retry delay in milliseconds (linear strategy: the n-th retry
    /// waits `retry_delay_ms * n`).
    pub retry_delay_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            retry_attempts: 3,
            retry_delay_ms: 1_500,
        }
    }
}
