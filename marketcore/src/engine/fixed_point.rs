//! Fixed-point arithmetic for price/amount/funds conversions.
//!
//! Every monetary computation the matcher performs — trade cost, affordable
//! size for a market buy — goes through `multiply`/`divide` so rounding is
//! uniform and deterministic regardless of host. Both helpers take a `u128`
//! intermediate; for `u64` inputs the product can never overflow it, so
//! neither function is fallible.

fn pow10(digits: u32) -> u128 {
    10u128.pow(digits)
}

fn rescale(x: u128, from_digits: u32, to_digits: u32) -> u128 {
    if to_digits >= from_digits {
        x * pow10(to_digits - from_digits)
    } else {
        x / pow10(from_digits - to_digits)
    }
}

/// `volume * price`, rescaled from `(vp + pp)` decimal digits to `result_p`
/// digits, truncating toward zero.
pub fn multiply(volume: u64, price: u64, vp: u32, pp: u32, result_p: u32) -> u64 {
    let raw = (volume as u128) * (price as u128);
    rescale(raw, vp + pp, result_p) as u64
}

/// `funds / price`, rescaled to `result_p` digits, truncating toward zero.
///
/// `funds` is stated with `fp` digits, `price` with `pp` digits. The scale-up
/// is folded into the numerator before the division so there is a single
/// truncation point rather than compounding rounding error across a
/// divide-then-rescale sequence.
///
/// `price` must be non-zero; callers guard this with a `lowest_ask`/
/// `highest_bid` check before the division is ever attempted.
pub fn divide(funds: u64, price: u64, fp: u32, pp: u32, result_p: u32) -> u64 {
    debug_assert!(price != 0, "divide by zero price");
    let scale_up = result_p as i64 + pp as i64 - fp as i64;
    let numerator: u128 = if scale_up >= 0 {
        (funds as u128) * pow10(scale_up as u32)
    } else {
        (funds as u128) / pow10((-scale_up) as u32)
    };
    (numerator / (price as u128)) as u64
}
