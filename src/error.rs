//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;

// LSA decode errors.
//
// Decoding never partially commits: any error aborts the current LSA and
// leaves the input buffer positioned at the octet where decoding stopped,
// so callers can tell how much input was consumed. Unknown LSA types,
// unknown flag bits and non-zero reserved octets are deliberately not
// errors (unrecognized LSAs must remain floodable).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    // The buffer ended before a fixed-size field or length-prefixed
    // payload was fully read.
    Truncated { needed: usize, remaining: usize },
    // The body codec consumed fewer octets than the header's Length
    // field declared.
    ShortBody { trailing: usize },
    // A body with an explicit prefix count disagrees with the prefixes
    // actually present.
    PrefixCount { declared: u32, decoded: u32 },
    // The header's Length field is smaller than the header itself.
    BadLength(u16),
    // An LSA prefix declares more than 128 bits.
    PrefixFormat(u8),
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Truncated { needed, remaining } => {
                write!(
                    f,
                    "truncated input: needed {} octets, {} remaining",
                    needed, remaining
                )
            }
            DecodeError::ShortBody { trailing } => {
                write!(f, "{} octets left over after LSA body", trailing)
            }
            DecodeError::PrefixCount { declared, decoded } => {
                write!(
                    f,
                    "prefix count mismatch: {} declared, {} decoded",
                    declared, decoded
                )
            }
            DecodeError::BadLength(length) => {
                write!(f, "invalid LSA length: {}", length)
            }
            DecodeError::PrefixFormat(plen) => {
                write!(f, "invalid prefix length: {}", plen)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
