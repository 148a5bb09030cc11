//! Textual canister id decoding.
//!
//! A textual id is the base32 rendering (alphabet `A-Z2-7`, no padding,
//! grouped by dashes) of a 32-bit checksum followed by the id bytes. The
//! routing key is the hex rendering of the id bytes, obtained by skipping
//! the checksum bits and repacking the rest into nibbles.

use crate::table::types::CanisterKey;

/// Length of a canonical textual canister id, dashes included.
pub const CANISTER_ID_LENGTH: usize = 27;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const CHECKSUM_BITS: usize = 32;
const HEX: &[u8; 16] = b"0123456789abcdef";
/// Rendered for any nibble built from bits of an unrecognized character.
const GARBAGE: char = 'g';

/// Bit value of a symbol; `None` for characters outside the alphabet.
fn symbol_value(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&s| char::from(s) == upper)
        .map(|p| p as u8)
}

/// Decode a textual canister id into its routing key.
///
/// Never fails. Characters outside the alphabet do not abort decoding:
/// their bits are poisoned and every nibble touching them renders as a
/// non-hex marker, so the result is still a string but never a
/// well-formed key. A trailing partial nibble is dropped.
pub fn decode(canister_id: &str) -> CanisterKey {
    // One entry per bit; None marks a poisoned bit.
    let mut bits: Vec<Option<bool>> = Vec::with_capacity(canister_id.len() * 5);
    for c in canister_id.chars().filter(|&c| c != '-') {
        match symbol_value(c) {
            Some(v) => bits.extend((0..5).rev().map(|shift| Some((v >> shift) & 1 == 1))),
            None => bits.extend([None; 5]),
        }
    }

    let payload = bits.get(CHECKSUM_BITS..).unwrap_or(&[]);
    let key = payload
        .chunks_exact(4)
        .map(|nibble| {
            nibble
                .iter()
                .try_fold(0usize, |acc, bit| bit.map(|b| acc << 1 | usize::from(b)))
                .map_or(GARBAGE, |v| char::from(HEX[v]))
        })
        .collect();

    CanisterKey(key)
}
