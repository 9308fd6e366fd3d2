// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! SCALE compact integers, as used to prefix the length of vectors.  The two
//! low bits of the first byte select the mode:
//!
//! | mode | range            | width                          |
//! |------|------------------|--------------------------------|
//! | 0b00 | 0 ..= 63         | 1 byte                         |
//! | 0b01 | 64 ..= 16383     | 2 bytes, little-endian         |
//! | 0b10 | 16384 ..= 2^30-1 | 4 bytes, little-endian         |
//! | 0b11 | 2^30 ..          | 1 + n bytes, n = (b0 >> 2) + 4 |

use super::errors::Error;
use parity_scale_codec::{Compact, Decode, Encode};

/// Compact encoding of `n`
pub fn encode_compact(n: u64) -> Vec<u8> {
    Compact(n).encode()
}

/// Decode a compact integer from the start of `buf`, returning the value and
/// the number of bytes consumed.  Non-canonical encodings are rejected.
pub fn decode_compact(buf: &[u8]) -> Result<(u64, usize), Error> {
    let mut input = buf;

    let Compact(value) =
        Compact::<u64>::decode(&mut input).map_err(|e| Error::Syntax(format!("compact: {e}")))?;

    Ok((value, buf.len() - input.len()))
}
