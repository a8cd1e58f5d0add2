pub const PLATFORM_FEE_PERCENT: i64 = 20;

/// Minor units per major unit (cents per dollar).
pub const MINOR_PER_MAJOR: i64 = 100;

/// Converts a decimal major-unit amount (`9.99`) to minor units (`999`),
/// rounding to the nearest minor unit. `None` for non-finite, sub-cent or
/// out-of-range input.
pub fn to_minor_units(major: f64) -> Option<i64> {
    if !major.is_finite() {
        return None;
    }
    let minor = (major * MINOR_PER_MAJOR as f64).round();
    // i64::MAX as f64 rounds up to 2^63, so equality is already out of range.
    if minor < 1.0 || minor >= i64::MAX as f64 {
        return None;
    }
    Some(minor as i64)
}

pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / MINOR_PER_MAJOR as f64
}

/// Split of a payment between the platform and the room creator, in minor
/// currency units. `platform_fee + creator_share` always equals the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub platform_fee: i64,
    pub creator_share: i64,
}

impl FeeSplit {
    /// Platform fee is 20% of `amount`, rounded half up.
    pub fn for_amount(amount: i64) -> Self {
        let scaled = i128::from(amount) * i128::from(PLATFORM_FEE_PERCENT) + 50;
        let platform_fee = (scaled.div_euclid(100)) as i64;

        Self {
            platform_fee,
            creator_share: amount - platform_fee,
        }
    }
}
