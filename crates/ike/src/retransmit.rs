//! Retransmission timeouts
//!
//! Unacknowledged requests are resent with exponential backoff: the n-th
//! retransmission waits `first_timeout * 2^n`. There is no jitter and no
//! cap besides the numeric one.
//!
//! # Algorithm
//!
//! ```text
//! count:    0      1      2      3      4
//!           |------|------|------|------|
//! timeout:  1000   2000   4000   8000   limit exceeded
//!
//! Config: first_timeout=1000ms, max_retransmit_count=3
//! ```
//!
//! Timeouts are computed in `u64` milliseconds from a `u32` first timeout,
//! so every count below 32 is exact. Larger results saturate at
//! `u64::MAX` instead of wrapping.

use crate::logging::{self, Diagnostics};
use crate::{Error, Result};
use std::time::Duration;

/// Default first retransmit timeout (3 seconds)
pub const DEFAULT_FIRST_RETRANSMIT_TIMEOUT_MS: u32 = 3000;

/// Default maximum retransmit count
pub const DEFAULT_MAX_RETRANSMIT_COUNT: u32 = 5;

/// Default half-open IKE_SA timeout (30 seconds)
pub const DEFAULT_HALF_OPEN_IKE_SA_TIMEOUT_MS: u32 = 30_000;

/// Retransmission and half-open session timeouts
#[derive(Debug, Clone)]
pub struct RetransmissionPolicy {
    first_timeout_ms: u32,
    max_retransmit_count: u32,
    half_open_timeout_ms: u32,
    diagnostics: Diagnostics,
}

impl RetransmissionPolicy {
    /// Create policy
    ///
    /// # Arguments
    ///
    /// * `first_timeout_ms` - Timeout before the first retransmission
    /// * `max_retransmit_count` - Retransmissions allowed, 0 for unlimited
    /// * `half_open_timeout_ms` - Lifetime of an unauthenticated IKE_SA
    pub fn new(first_timeout_ms: u32, max_retransmit_count: u32, half_open_timeout_ms: u32) -> Self {
        RetransmissionPolicy {
            first_timeout_ms,
            max_retransmit_count,
            half_open_timeout_ms,
            diagnostics: Diagnostics::ambient(),
        }
    }

    /// Route diagnostics to a dedicated sink
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Timeout for the given retransmission in milliseconds
    ///
    /// # Errors
    ///
    /// Returns `RetransmitLimitExceeded` if a maximum is configured and
    /// `retransmit_count` is above it.
    pub fn timeout_for(&self, retransmit_count: u32) -> Result<u64> {
        if self.max_retransmit_count != 0 && retransmit_count > self.max_retransmit_count {
            self.diagnostics.emit(|| {
                logging::log_retransmit_limit(retransmit_count, self.max_retransmit_count)
            });
            return Err(Error::RetransmitLimitExceeded {
                count: retransmit_count,
                max: self.max_retransmit_count,
            });
        }

        let timeout = match 1u64.checked_shl(retransmit_count) {
            Some(factor) => u64::from(self.first_timeout_ms).saturating_mul(factor),
            None if self.first_timeout_ms == 0 => 0,
            None => u64::MAX,
        };

        self.diagnostics
            .emit(|| logging::log_retransmit_timeout(retransmit_count, timeout));
        Ok(timeout)
    }

    /// Timeout for the given retransmission as a `Duration`
    pub fn timeout_duration_for(&self, retransmit_count: u32) -> Result<Duration> {
        self.timeout_for(retransmit_count).map(Duration::from_millis)
    }

    /// Lifetime of a half-open IKE_SA in milliseconds
    pub fn half_open_session_timeout(&self) -> u32 {
        self.half_open_timeout_ms
    }

    /// First retransmit timeout in milliseconds
    pub fn first_timeout_ms(&self) -> u32 {
        self.first_timeout_ms
    }

    /// Configured maximum, 0 for unlimited
    pub fn max_retransmit_count(&self) -> u32 {
        self.max_retransmit_count
    }
}

impl Default for RetransmissionPolicy {
    fn default() -> Self {
        RetransmissionPolicy::new(
            DEFAULT_FIRST_RETRANSMIT_TIMEOUT_MS,
            DEFAULT_MAX_RETRANSMIT_COUNT,
            DEFAULT_HALF_OPEN_IKE_SA_TIMEOUT_MS,
        )
    }
}
