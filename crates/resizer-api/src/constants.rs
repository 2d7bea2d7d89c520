//! API constants

use std::time::Duration;

/// Upper bound for a storage event notification body.
pub const MAX_EVENT_BODY_BYTES: usize = 1024 * 1024;

/// Timeout for each dependency checked by readiness.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Key looked up by the readiness check; it is never written.
pub const HEALTH_CHECK_KEY: &str = "health-check-non-existent-key";

/// Service name reported in logs.
pub const SERVICE_NAME: &str = "resizer-api";
