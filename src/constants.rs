use rust_decimal::Decimal;

/// Tolerance applied when comparing exact split sums and percentage totals.
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Percentages of a split must add up to this value.
pub const PERCENTAGE_TOTAL: Decimal = Decimal::ONE_HUNDRED;

/// Upper bound on any single monetary amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub const MAX_TEXT_LENGTH: usize = 255;

/// Display name used when a balance references a user or group that no longer exists.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";
