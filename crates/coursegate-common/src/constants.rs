//! Shared constants for Coursegate components.

/// Characters a verification challenge may contain.
///
/// Digits and glyphs that read ambiguously in an italic monospace face
/// (I, O, i, l, o) are excluded.
pub const CHALLENGE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz";

/// Challenge string length
pub const CHALLENGE_LEN: usize = 6;

/// One-time code length
pub const OTP_LEN: usize = 6;

/// Simulated one-time-code dispatch latency (milliseconds)
pub const CODE_DISPATCH_DELAY_MS: u64 = 1500;

/// Simulated one-time-code confirmation latency (milliseconds)
pub const CODE_CONFIRM_DELAY_MS: u64 = 1500;

/// Delay before a mismatched challenge regenerates (milliseconds)
pub const CHALLENGE_RETRY_DELAY_MS: u64 = 1000;

/// How long a completed wizard lingers before closing (milliseconds)
pub const COMPLETION_LINGER_MS: u64 = 1000;

/// Currency passed to the checkout overlay
pub const DEFAULT_CURRENCY: &str = "INR";

/// Merchant display name shown in the checkout overlay
pub const DEFAULT_MERCHANT_NAME: &str = "Dome of Money";

/// Checkout overlay theme color
pub const DEFAULT_THEME_COLOR: &str = "#1e3a8a";

/// Default enrollment store file
pub const DEFAULT_STORE_FILE: &str = "courseEnrollments.json";
