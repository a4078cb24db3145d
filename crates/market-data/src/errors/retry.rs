/// Classification for retry policy.
///
/// Used by [`RetryPolicy`](crate::registry::RetryPolicy) to decide whether a
/// failed upstream request is worth another attempt.
///
/// # Behavior Summary
///
/// | Class | Retry same provider? |
/// |-------|----------------------|
/// | `Never` | No, the error is surfaced immediately |
/// | `WithBackoff` | Yes, after an exponentially growing delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request itself is wrong (bad parameters, 4xx,
    /// unsupported operation). Retrying won't help.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for transient errors: rate limiting (429), timeouts, transport
    /// failures, 5xx responses and payloads that failed to decode.
    WithBackoff,
}
