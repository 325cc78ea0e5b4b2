//! Shared banner strings framing merge output.

/// Banner printed before a merge report.
pub const START_BANNER: &str = "========== scenario merge ==========";

/// Banner printed before a change preview.
pub const DIFF_BANNER: &str = "========== proposed changes ==========";

/// Banner printed after a merge report.
pub const END_BANNER: &str = "========== end of scenario merge ==========";
