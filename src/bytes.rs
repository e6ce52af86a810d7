//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv6Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, DecodeResult};
use crate::lsa::Id;

// Extension methods for Bytes.
//
// Unlike the panicking `Buf` getters, every read checks the remaining
// length first and fails with `DecodeError::Truncated`, as required when
// parsing untrusted input.
pub trait BytesExt {
    /// Reads an unsigned 8 bit integer from `self`.
    ///
    /// The current position is advanced by 1.
    fn read_u8(&mut self) -> DecodeResult<u8>;

    /// Reads an unsigned 16 bit integer from `self` in the big-endian
    /// byte order.
    ///
    /// The current position is advanced by 2.
    fn read_u16(&mut self) -> DecodeResult<u16>;

    /// Reads an unsigned 24 bit integer from `self` in the big-endian
    /// byte order.
    ///
    /// The current position is advanced by 3.
    fn read_u24(&mut self) -> DecodeResult<u32>;

    /// Reads an unsigned 32 bit integer from `self` in the big-endian
    /// byte order.
    ///
    /// The current position is advanced by 4.
    fn read_u32(&mut self) -> DecodeResult<u32>;

    /// Reads a 4-octet identifier from `self` in network byte order.
    ///
    /// The current position is advanced by 4.
    fn read_id(&mut self) -> DecodeResult<Id>;

    /// Reads an IPv6 addr from `self` in big-endian byte order.
    ///
    /// The current position is advanced by 16.
    fn read_ipv6(&mut self) -> DecodeResult<Ipv6Addr>;

    /// Fills `dst` from `self`.
    ///
    /// The current position is advanced by `dst.len()`.
    fn read_slice(&mut self, dst: &mut [u8]) -> DecodeResult<()>;

    /// Splits off the next `len` octets of `self` as an owned buffer.
    ///
    /// The current position is advanced by `len`.
    fn read_bytes(&mut self, len: usize) -> DecodeResult<Bytes>;
}

// Extension methods for BytesMut.
pub trait BytesMutExt {
    /// Writes an unsigned 24 bit integer to `self` in big-endian byte
    /// order.
    ///
    /// The current position is advanced by 3.
    fn put_u24(&mut self, n: u32);

    /// Writes a 4-octet identifier to `self` in network byte order.
    ///
    /// The current position is advanced by 4.
    fn put_id(&mut self, id: &Id);

    /// Writes an IPv6 addr to `self` in big-endian byte order.
    ///
    /// The current position is advanced by 16.
    fn put_ipv6(&mut self, addr: &Ipv6Addr);
}

// ===== helper functions =====

fn ensure(buf: &Bytes, needed: usize) -> DecodeResult<()> {
    let remaining = buf.remaining();
    if remaining < needed {
        return Err(DecodeError::Truncated { needed, remaining });
    }
    Ok(())
}

// ===== impl Bytes =====

impl BytesExt for Bytes {
    fn read_u8(&mut self) -> DecodeResult<u8> {
        ensure(self, 1)?;
        Ok(self.get_u8())
    }

    fn read_u16(&mut self) -> DecodeResult<u16> {
        ensure(self, 2)?;
        Ok(self.get_u16())
    }

    fn read_u24(&mut self) -> DecodeResult<u32> {
        ensure(self, 3)?;
        let mut n = [0; 4];
        self.copy_to_slice(&mut n[1..=3]);
        Ok(u32::from_be_bytes(n))
    }

    fn read_u32(&mut self) -> DecodeResult<u32> {
        ensure(self, 4)?;
        Ok(self.get_u32())
    }

    fn read_id(&mut self) -> DecodeResult<Id> {
        ensure(self, Id::LENGTH)?;
        let mut octets = [0; Id::LENGTH];
        self.copy_to_slice(&mut octets);
        Ok(Id(octets))
    }

    fn read_ipv6(&mut self) -> DecodeResult<Ipv6Addr> {
        ensure(self, 16)?;
        Ok(Ipv6Addr::from(self.get_u128()))
    }

    fn read_slice(&mut self, dst: &mut [u8]) -> DecodeResult<()> {
        ensure(self, dst.len())?;
        self.copy_to_slice(dst);
        Ok(())
    }

    fn read_bytes(&mut self, len: usize) -> DecodeResult<Bytes> {
        ensure(self, len)?;
        Ok(self.copy_to_bytes(len))
    }
}

// ===== impl BytesMut =====

impl BytesMutExt for BytesMut {
    fn put_u24(&mut self, n: u32) {
        let n = n.to_be_bytes();
        self.put_slice(&n[1..=3]);
    }

    fn put_id(&mut self, id: &Id) {
        self.put_slice(&id.0);
    }

    fn put_ipv6(&mut self, addr: &Ipv6Addr) {
        self.put_slice(&addr.octets());
    }
}
