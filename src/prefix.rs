//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv6Addr;

use bitflags::bitflags;
use bytes::{BufMut, Bytes, BytesMut};
use ipnetwork::Ipv6Network;
use serde::{Deserialize, Serialize};

use crate::bytes::BytesExt;
use crate::error::{DecodeError, DecodeResult};

// The PrefixOptions Field.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-4
//
// Unknown bits are preserved verbatim across a decode/encode cycle.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct PrefixOptions: u8 {
        const NU = 0x01;
        const LA = 0x02;
        const P = 0x08;
        const DN = 0x10;
        const N = 0x20;
    }
}

//
// OSPFv3 LSA address prefix.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | PrefixLength  | PrefixOptions |        (context-dependent)    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// The address prefix occupies the minimal number of 32-bit words needed
// to hold PrefixLength bits. The 16-bit word following the options octet
// depends on the enclosing LSA: a per-prefix metric in Intra-Area-Prefix
// LSAs, the Referenced LS Type in AS-External LSAs, reserved elsewhere.
// It is carried here as `special` so every enclosing body round-trips
// bit-exactly.
//
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaPrefix {
    pub prefix_len: u8,
    pub options: PrefixOptions,
    pub special: u16,
    pub addr: Ipv6Addr,
}

// ===== impl LsaPrefix =====

impl LsaPrefix {
    pub const MAX_PREFIX_LEN: u8 = 128;

    pub fn new(
        prefix: Ipv6Network,
        options: PrefixOptions,
        special: u16,
    ) -> Self {
        LsaPrefix {
            prefix_len: prefix.prefix(),
            options,
            special,
            addr: prefix.ip(),
        }
    }

    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let prefix_len = buf.read_u8()?;
        if prefix_len > Self::MAX_PREFIX_LEN {
            return Err(DecodeError::PrefixFormat(prefix_len));
        }
        let options = PrefixOptions::from_bits_retain(buf.read_u8()?);
        let special = buf.read_u16()?;

        let plen_wire = prefix_wire_len(prefix_len);
        let mut octets = [0; 16];
        buf.read_slice(&mut octets[..plen_wire])?;

        Ok(LsaPrefix {
            prefix_len,
            options,
            special,
            addr: Ipv6Addr::from(octets),
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.prefix_len);
        buf.put_u8(self.options.bits());
        buf.put_u16(self.special);
        let plen_wire = prefix_wire_len(self.prefix_len);
        buf.put_slice(&self.addr.octets()[..plen_wire]);
    }

    // Number of octets this prefix occupies on the wire, including the
    // leading length/options/context word.
    pub fn wire_len(&self) -> usize {
        4 + prefix_wire_len(self.prefix_len)
    }

    // The advertised prefix. Returns `None` if `prefix_len` was set to
    // an out-of-range value after construction.
    pub fn network(&self) -> Option<Ipv6Network> {
        Ipv6Network::new(self.addr, self.prefix_len).ok()
    }
}

// ===== global functions =====

// Calculate the number of bytes required to encode a prefix.
pub(crate) fn prefix_wire_len(len: u8) -> usize {
    ((len as usize + 31) / 32) * 4
}
