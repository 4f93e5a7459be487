//! Bit-serial CRC7 over the GSIP polynomial.

/// CRC7 generator polynomial: x^7 + x^3 + 1, left-justified in a byte.
pub const POLYNOMIAL: u8 = 0x89;

/// Compute the GSIP CRC7 checksum of `data`.
///
/// This is a non-reflected CRC with no final XOR, processed MSB first.
/// The working remainder is seeded with the first input byte (not zero),
/// then driven for `data.len() * 8` bit steps: whenever the top bit of the
/// remainder is set it is XORed with [`POLYNOMIAL`] before shifting the
/// next input bit in at the bottom. Bits come from the second byte onward,
/// MSB first, padded with zeros once the input is exhausted. The final
/// remainder is shifted right once, leaving the 7-bit checksum in the low
/// bits of the returned byte.
///
/// # Panics
///
/// Panics if `data` is empty; the checksum is only defined over the
/// non-empty field bytes of a frame.
pub fn crc7(data: &[u8]) -> u8 {
    assert!(!data.is_empty(), "crc7 input must not be empty");

    let mut remainder = data[0];
    for step in 0..data.len() * 8 {
        if remainder & 0x80 != 0 {
            remainder ^= POLYNOMIAL;
        }
        let byte_index = 1 + step / 8;
        let next_bit = if byte_index < data.len() {
            (data[byte_index] >> (7 - step % 8)) & 1
        } else {
            0
        };
        remainder = (remainder << 1) | next_bit;
    }

    remainder >> 1
}
