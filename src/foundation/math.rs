/// Round `v` up to the next multiple of `align`, saturating at `u64::MAX`.
/// An `align` of 0 or 1 returns `v`.
pub(crate) fn align_up(v: u64, align: u64) -> u64 {
    if align <= 1 {
        return v;
    }
    v.div_ceil(align).saturating_mul(align)
}

pub(crate) fn is_aligned(v: u64, align: u64) -> bool {
    align <= 1 || v % align == 0
}

/// `ceil(v * num / den)`, `None` on overflow. `den` must be > 0.
pub(crate) fn mul_ratio_ceil(v: u64, num: u64, den: u64) -> Option<u64> {
    v.checked_mul(num).map(|x| x.div_ceil(den))
}

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple; 0 when either side is 0.
pub(crate) fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
