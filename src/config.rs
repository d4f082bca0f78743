//! Application-level configuration constants.

// UI behavior: the first computation fires on its own shortly after load.
pub const STARTUP_COMPUTE_DELAY_MS: u32 = 800;

// Error notification lifetime: fully visible, then fading out.
pub const NOTICE_VISIBLE_MS: u32 = 5_000;
pub const NOTICE_FADE_MS: u32 = 1_000;
