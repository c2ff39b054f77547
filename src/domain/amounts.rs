//! Atomic <-> display amount conversion.
//!
//! One source (Dexag) speaks display amounts over the wire, so a quote
//! through it round-trips atomic -> display -> atomic. That round trip
//! must stay exact to well past 8 significant digits, which rules out
//! f64; `rust_decimal` carries 28 significant digits on a 96-bit
//! mantissa. Amounts that do not fit the mantissa are conversion
//! errors, not silent truncations.

use alloy::primitives::U256;
use rust_decimal::Decimal;

use super::error::AmountError;

/// `rust_decimal` rejects scales above 28.
const MAX_SCALE: u8 = 28;

/// Convert an atomic integer amount to a display amount by shifting the
/// token's decimals into the fractional part.
pub fn to_display_amount(atomic: U256, decimals: u8) -> Result<Decimal, AmountError> {
    if decimals > MAX_SCALE {
        return Err(AmountError::UnsupportedScale(decimals));
    }
    let mantissa = i128::try_from(atomic)
        .map_err(|_| AmountError::OutOfRange(atomic.to_string()))?;
    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals))
        .map_err(|_| AmountError::OutOfRange(atomic.to_string()))
}

/// Convert a display amount back to atomic units, truncating any
/// fraction finer than the token's decimals.
pub fn to_atomic_amount(display: Decimal, decimals: u8) -> Result<U256, AmountError> {
    if decimals > MAX_SCALE {
        return Err(AmountError::UnsupportedScale(decimals));
    }
    if display.is_sign_negative() {
        return Err(AmountError::OutOfRange(display.to_string()));
    }
    let factor = Decimal::try_from_i128_with_scale(10i128.pow(u32::from(decimals)), 0)
        .map_err(|_| AmountError::UnsupportedScale(decimals))?;
    let scaled = display
        .checked_mul(factor)
        .ok_or_else(|| AmountError::OutOfRange(display.to_string()))?
        .trunc();
    let mantissa = scaled
        .to_string()
        .parse::<u128>()
        .map_err(|_| AmountError::OutOfRange(display.to_string()))?;
    Ok(U256::from(mantissa))
}
