//! Storage key names

use crate::economy::PowerKind;

pub const HIGH_SCORE: &str = "bone_runner_high_score";
pub const HIGH_COINS: &str = "bone_runner_high_coins";
pub const TOTAL_CURRENCY: &str = "bone_runner_total_currency";
pub const PREMIUM_CURRENCY: &str = "bone_runner_premium_currency";

/// Per-power uses-remaining key
pub fn power_uses(kind: PowerKind) -> String {
    format!("bone_runner_uses_{}", kind.id())
}
