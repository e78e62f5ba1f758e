use std::time::Duration;

/// 16 MiB. A memory guard for a single response body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use gistsub_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .timeout(Duration::from_secs(5))
///     .max_body_bytes(1024 * 1024);
/// assert_eq!(options.timeout, Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Whole-request deadline: connect, headers and body.
    ///
    /// There is no way to disable it; every request ends in bounded time.
    ///
    /// Default: 20s
    pub timeout: Duration,

    /// Bodies larger than this abort the request.
    ///
    /// Default: 16 MiB
    pub max_body_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout:        DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl FetchOptions {
    /// Set the request timeout. A zero duration is bumped to one second.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            Duration::from_secs(1)
        } else {
            timeout
        };
        self
    }

    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_stays_finite() {
        let options = FetchOptions::default().timeout(Duration::ZERO);
        assert_eq!(options.timeout, Duration::from_secs(1));
    }
}
