//! Fixed-width bit packing for groups of 8 values.
//!
//! Values are laid out LSB-first: value 0 occupies the lowest bits of byte 0,
//! and each subsequent value starts at the next bit position. A group of 8
//! values at width `w` always occupies exactly `w` bytes, so packed runs stay
//! byte aligned.

/// Largest supported bit width (packed values are `u32`).
pub const MAX_WIDTH: usize = 32;

/// Number of bits needed to represent `v`. Zero needs zero bits.
pub fn required_bits(v: u32) -> usize {
    (32 - v.leading_zeros()) as usize
}

fn width_mask(width: usize) -> u64 {
    if width == MAX_WIDTH {
        u32::MAX as u64
    } else {
        (1u64 << width) - 1
    }
}

/// Pack 8 values at `width` bits each onto the end of `out`.
///
/// Values wider than `width` are masked down; callers may pass don't-care
/// slots (e.g. padding past the end of real data) without widening the group.
pub fn pack8(values: &[u32; 8], width: usize, out: &mut Vec<u8>) {
    debug_assert!(width <= MAX_WIDTH, "bit width out of range");
    if width == 0 {
        return;
    }

    let mask = width_mask(width);
    let mut acc: u64 = 0;
    let mut bits = 0usize;
    for &v in values {
        acc |= ((v as u64) & mask) << bits;
        bits += width;
        while bits >= 8 {
            out.push((acc & 0xFF) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    debug_assert_eq!(bits, 0, "8 values at any width end on a byte boundary");
}

/// Unpack 8 values of `width` bits each from `bytes`.
///
/// `bytes` must hold exactly `width` bytes (the size [`pack8`] produced).
pub fn unpack8(bytes: &[u8], width: usize) -> [u32; 8] {
    debug_assert!(width <= MAX_WIDTH, "bit width out of range");
    debug_assert_eq!(bytes.len(), width, "packed group is one byte per width bit");

    let mut values = [0u32; 8];
    if width == 0 {
        return values;
    }

    let mask = width_mask(width);
    let mut acc: u64 = 0;
    let mut bits = 0usize;
    let mut next = 0usize;
    for slot in values.iter_mut() {
        while bits < width {
            acc |= (bytes[next] as u64) << bits;
            next += 1;
            bits += 8;
        }
        *slot = (acc & mask) as u32;
        acc >>= width;
        bits -= width;
    }
    values
}
