// Bit counting helpers shared by the chunk types.

/// Number of 1-bits in `v`, counted SWAR-style: sum adjacent bits into 2-bit
/// fields, those into 4-bit fields, then add up the bytes with a multiply.
pub fn popcount32(v: u32) -> u32 {
    let v = v - ((v >> 1) & 0x5555_5555);
    let v = (v & 0x3333_3333) + ((v >> 2) & 0x3333_3333);
    let v = (v + (v >> 4)) & 0x0F0F_0F0F;
    v.wrapping_mul(0x0101_0101) >> 24
}

/// 64-bit variant of [`popcount32`].
pub fn popcount64(v: u64) -> u32 {
    let v = v - ((v >> 1) & 0x5555_5555_5555_5555);
    let v = (v & 0x3333_3333_3333_3333) + ((v >> 2) & 0x3333_3333_3333_3333);
    let v = (v + (v >> 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    (v.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
}

/// Return a mask with the low `n` bits set. `n` may be anything in 0..=64.
pub fn low_mask(n: u32) -> u64 {
    u64::MAX.checked_shr(64 - n).unwrap_or(0)
}
