//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use enum_as_inner::EnumAsInner;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bytes::{BytesExt, BytesMutExt};
use crate::error::{DecodeError, DecodeResult};
use crate::prefix::LsaPrefix;

// 4-octet opaque identifier.
//
// Used for the Link State ID, the Advertising Router, interface IDs and
// neighbor IDs. Comparison is byte-wise; the wire form is network byte
// order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct Id(pub [u8; 4]);

// Interface output cost.
//
// A 24-bit unsigned integer, encoded on the wire as one high octet
// followed by a big-endian 16-bit low half.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct InterfaceMetric(u32);

// OSPFv3 LSA type.
//
// The top bit (U-bit) indicates how the LSA should be handled by a
// router that does not recognize its function code. Bits 14-13 encode
// the flooding scope. Unknown bit patterns are preserved, not rejected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LsaType(pub u16);

// OSPFv3 LSA flooding scope (bits 14-13 of the LSA type).
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum FloodingScope {
    LinkLocal = 0,
    Area = 1,
    As = 2,
    Reserved = 3,
}

// OSPFv3 Options field.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-1
//
// 24 bits on the wire. Unknown bits are preserved verbatim across a
// decode/encode cycle.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct RouterOptions: u32 {
        const V6 = 0x00_0001;
        const E = 0x00_0002;
        const N = 0x00_0008;
        const R = 0x00_0010;
        const DC = 0x00_0020;
        const AF = 0x00_0100;
    }
}

//
// OSPFv3 LSA header.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           LS Age              |           LS Type             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Link State ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Advertising Router                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    LS Sequence Number                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |        LS Checksum            |             Length            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaHdr {
    pub age: u16,
    pub lsa_type: LsaType,
    pub lsa_id: Id,
    pub adv_rtr: Id,
    pub seq_no: u32,
    pub cksum: u16,
    pub length: u16,
}

// OSPF LSA key. It serves both as a global LSA identifier and as a key
// to store LSAs in an LSDB.
//
// Please be aware that modifying the order of the fields will impact
// operations such as iterating over LSDBs.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaKey {
    pub lsa_type: LsaType,
    pub adv_rtr: Id,
    pub lsa_id: Id,
}

// OSPFv3 LSA.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lsa {
    pub hdr: LsaHdr,
    pub body: LsaBody,
}

// OSPFv3 LSA body.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
#[derive(Deserialize, Serialize)]
pub enum LsaBody {
    Router(LsaRouter),
    Network(LsaNetwork),
    InterAreaPrefix(LsaInterAreaPrefix),
    InterAreaRouter(LsaInterAreaRouter),
    AsExternal(LsaAsExternal),
    Link(LsaLink),
    IntraAreaPrefix(LsaIntraAreaPrefix),
    Unknown(LsaUnknown),
}

//
// OSPFv3 Router-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  0  |Nt|x|V|E|B|            Options                            |
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |     Type       |                  Metric                       |
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                      Interface ID                              |
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                   Neighbor Interface ID                        |
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Neighbor Router ID                          |
// +-+-+-+--+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                                |
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaRouter {
    pub flags: LsaRouterFlags,
    pub options: RouterOptions,
    pub links: Vec<LsaRouterLink>,
}

// OSPFv3 Router Properties Registry.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-7
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LsaRouterFlags: u8 {
        const B = 0x01;
        const E = 0x02;
        const V = 0x04;
        const NT = 0x10;
    }
}

// OSPFv3 Router LSA Link Types.
//
// IANA registry:
// https://www.iana.org/assignments/ospfv3-parameters/ospfv3-parameters.xhtml#ospfv3-parameters-6
//
// A newtype rather than an enum: the reserved values 0 and 3 pass
// through a decode/encode cycle unmodified.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LsaRouterLinkType(pub u8);

#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaRouterLink {
    pub link_type: LsaRouterLinkType,
    pub metric: InterfaceMetric,
    pub iface_id: Id,
    pub nbr_iface_id: Id,
    pub nbr_router_id: Id,
}

//
// OSPFv3 Network-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |              Options                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Attached Router                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                             ...                               |
//
// Attached routers are kept in wire order (not de-duplicated) so that
// re-serialization reproduces the input octets.
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaNetwork {
    pub options: RouterOptions,
    pub attached_rtrs: Vec<Id>,
}

//
// OSPFv3 Inter-Area-Prefix LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |                  Metric                       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | PrefixLength  | PrefixOptions |              0                |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaInterAreaPrefix {
    pub metric: InterfaceMetric,
    pub prefix: LsaPrefix,
}

//
// OSPFv3 Inter-Area-Router LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |                 Options                       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      0        |                 Metric                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Destination Router ID                      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaInterAreaRouter {
    pub options: RouterOptions,
    pub metric: InterfaceMetric,
    pub router_id: Id,
}

//
// OSPFv3 AS-External-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         |E|F|T|                Metric                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | PrefixLength  | PrefixOptions |     Referenced LS Type        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                Forwarding Address (Optional)                -+
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |              External Route Tag (Optional)                    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |               Referenced Link State ID (Optional)             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// The Forwarding Address is present iff the F-bit is set, the External
// Route Tag iff the T-bit is set, and the Referenced Link State ID iff
// the Referenced LS Type (carried in the prefix's context word) is
// non-zero. On encode the F and T bits are derived from field presence.
//
// NSSA-LSAs (type 0x2007) share this body format; only the header type
// and the `nssa` discriminator differ.
//
#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaAsExternal {
    pub nssa: bool,
    pub flags: LsaAsExternalFlags,
    pub metric: InterfaceMetric,
    pub prefix: LsaPrefix,
    pub fwd_addr: Option<Ipv6Addr>,
    pub tag: Option<u32>,
    pub ref_lsa_id: Option<Id>,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LsaAsExternalFlags: u8 {
        const T = 0x01;
        const F = 0x02;
        const E = 0x04;
    }
}

//
// OSPFv3 Link-LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// | Rtr Priority  |                Options                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                Link-local Interface Address                 -+
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         # prefixes                            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  PrefixLength | PrefixOptions |             0                 |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        Address Prefix                         |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaLink {
    pub priority: u8,
    pub options: RouterOptions,
    pub linklocal: Ipv6Addr,
    pub prefixes: Vec<LsaPrefix>,
}

//
// OSPFv3 Intra-Area-Prefix LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         # Prefixes            |     Referenced LS Type        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                  Referenced Link State ID                     |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |               Referenced Advertising Router                   |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  PrefixLength | PrefixOptions |          Metric               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Address Prefix                          |
// |                             ...                               |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaIntraAreaPrefix {
    pub ref_lsa_type: LsaType,
    pub ref_lsa_id: Id,
    pub ref_adv_rtr: Id,
    pub prefixes: Vec<LsaPrefix>,
}

//
// OSPFv3 Unknown LSA.
//
// The body octets are preserved verbatim so that LSAs with the U-bit
// set can be flooded unchanged by routers that do not implement them.
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaUnknown {
    pub data: Bytes,
}

// ===== impl Id =====

impl Id {
    pub const LENGTH: usize = 4;

    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ipv4Addr::from(self.0).fmt(f)
    }
}

impl From<Ipv4Addr> for Id {
    fn from(addr: Ipv4Addr) -> Id {
        Id(addr.octets())
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Id {
        Id(value.to_be_bytes())
    }
}

impl From<Id> for u32 {
    fn from(id: Id) -> u32 {
        u32::from_be_bytes(id.0)
    }
}

// ===== impl InterfaceMetric =====

impl InterfaceMetric {
    pub const MAX: u32 = 0x00ff_ffff;

    /// Creates a metric from its numeric value.
    ///
    /// # Panics
    ///
    /// This function panics if `value` does not fit in 24 bits.
    pub fn new(value: u32) -> Self {
        assert!(value <= Self::MAX);
        InterfaceMetric(value)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

// ===== impl LsaType =====

impl LsaType {
    pub const U_BIT_MASK: u16 = 0x8000;
    pub const SCOPE_MASK: u16 = 0x6000;
    pub const FUNCTION_CODE_MASK: u16 = 0x1fff;

    pub const ROUTER: LsaType = LsaType(0x2001);
    pub const NETWORK: LsaType = LsaType(0x2002);
    pub const INTER_AREA_PREFIX: LsaType = LsaType(0x2003);
    pub const INTER_AREA_ROUTER: LsaType = LsaType(0x2004);
    pub const AS_EXTERNAL: LsaType = LsaType(0x4005);
    pub const DEPRECATED: LsaType = LsaType(0x2006);
    pub const NSSA: LsaType = LsaType(0x2007);
    pub const LINK: LsaType = LsaType(0x0008);
    pub const INTRA_AREA_PREFIX: LsaType = LsaType(0x2009);

    // Whether a router that does not recognize the function code should
    // flood this LSA as if it were understood.
    pub fn flood_if_unknown(&self) -> bool {
        self.0 & Self::U_BIT_MASK != 0
    }

    pub fn flooding_scope(&self) -> FloodingScope {
        FloodingScope::from_u16((self.0 & Self::SCOPE_MASK) >> 13).unwrap()
    }

    pub fn function_code(&self) -> u16 {
        self.0 & Self::FUNCTION_CODE_MASK
    }
}

impl std::fmt::Display for LsaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<LsaType> for u16 {
    fn from(lsa_type: LsaType) -> u16 {
        lsa_type.0
    }
}

// ===== impl RouterOptions =====

impl RouterOptions {
    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        Ok(RouterOptions::from_bits_retain(buf.read_u24()?))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u24(self.bits());
    }
}

// ===== impl LsaHdr =====

impl LsaHdr {
    pub const LENGTH: u16 = 20;

    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let age = buf.read_u16()?;
        let lsa_type = LsaType(buf.read_u16()?);
        let lsa_id = buf.read_id()?;
        let adv_rtr = buf.read_id()?;
        let seq_no = buf.read_u32()?;
        let cksum = buf.read_u16()?;
        let length = buf.read_u16()?;

        Ok(LsaHdr {
            age,
            lsa_type,
            lsa_id,
            adv_rtr,
            seq_no,
            cksum,
            length,
        })
    }

    // The `length` field is written as stored. Callers that mutate the
    // body are expected to refresh it (see `Lsa::refresh_length`).
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.age);
        buf.put_u16(self.lsa_type.0);
        buf.put_id(&self.lsa_id);
        buf.put_id(&self.adv_rtr);
        buf.put_u32(self.seq_no);
        buf.put_u16(self.cksum);
        buf.put_u16(self.length);
    }

    pub fn key(&self) -> LsaKey {
        LsaKey {
            lsa_type: self.lsa_type,
            adv_rtr: self.adv_rtr,
            lsa_id: self.lsa_id,
        }
    }
}

// ===== impl Lsa =====

impl Lsa {
    pub fn new(
        age: u16,
        lsa_type: LsaType,
        lsa_id: Id,
        adv_rtr: Id,
        seq_no: u32,
        body: LsaBody,
    ) -> Self {
        // Build LSA header. The checksum is owned by the LSDB layer and
        // stays zero here; the length is computed from the body.
        let mut lsa = Lsa {
            hdr: LsaHdr {
                age,
                lsa_type,
                lsa_id,
                adv_rtr,
                seq_no,
                cksum: 0,
                length: 0,
            },
            body,
        };
        lsa.refresh_length();
        lsa
    }

    // Decodes an LSA from a bytes buffer.
    //
    // On success the buffer is advanced by exactly `hdr.length` octets.
    // On failure it is left at the octet where decoding stopped.
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let hdr = LsaHdr::decode(buf)?;
        if hdr.length < LsaHdr::LENGTH {
            return Err(DecodeError::BadLength(hdr.length));
        }

        let body_len = (hdr.length - LsaHdr::LENGTH) as usize;
        if buf.remaining() < body_len {
            return Err(DecodeError::Truncated {
                needed: body_len,
                remaining: buf.remaining(),
            });
        }

        // Decode the body from a sub-buffer bounded by the header's
        // length, then advance the caller's cursor by what was consumed.
        let mut buf_body = buf.slice(..body_len);
        let result = LsaBody::decode(hdr.lsa_type, &mut buf_body);
        buf.advance(body_len - buf_body.remaining());
        let body = result?;

        if buf_body.has_remaining() {
            return Err(DecodeError::ShortBody {
                trailing: buf_body.remaining(),
            });
        }

        Ok(Lsa { hdr, body })
    }

    // Encodes the LSA into the caller-provided buffer, in network byte
    // order.
    pub fn encode(&self, buf: &mut BytesMut) {
        self.hdr.encode(buf);
        self.body.encode(buf);
    }

    // Recomputes the header's `length` field from the body.
    pub fn refresh_length(&mut self) {
        let mut buf = BytesMut::with_capacity(128);
        self.body.encode(&mut buf);
        self.hdr.length = LsaHdr::LENGTH + buf.len() as u16;
    }
}

// ===== impl LsaBody =====

impl LsaBody {
    pub fn decode(lsa_type: LsaType, buf: &mut Bytes) -> DecodeResult<Self> {
        let body = match lsa_type {
            LsaType::ROUTER => LsaBody::Router(LsaRouter::decode(buf)?),
            LsaType::NETWORK => LsaBody::Network(LsaNetwork::decode(buf)?),
            LsaType::INTER_AREA_PREFIX => {
                LsaBody::InterAreaPrefix(LsaInterAreaPrefix::decode(buf)?)
            }
            LsaType::INTER_AREA_ROUTER => {
                LsaBody::InterAreaRouter(LsaInterAreaRouter::decode(buf)?)
            }
            LsaType::AS_EXTERNAL => {
                LsaBody::AsExternal(LsaAsExternal::decode(buf, false)?)
            }
            // NSSA-LSAs share the AS-External body format.
            LsaType::NSSA => {
                LsaBody::AsExternal(LsaAsExternal::decode(buf, true)?)
            }
            LsaType::LINK => LsaBody::Link(LsaLink::decode(buf)?),
            LsaType::INTRA_AREA_PREFIX => {
                LsaBody::IntraAreaPrefix(LsaIntraAreaPrefix::decode(buf)?)
            }
            _ => {
                if lsa_type != LsaType::DEPRECATED {
                    debug!(%lsa_type, "unknown LSA type");
                }
                LsaBody::Unknown(LsaUnknown::decode(buf)?)
            }
        };

        Ok(body)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            LsaBody::Router(lsa) => lsa.encode(buf),
            LsaBody::Network(lsa) => lsa.encode(buf),
            LsaBody::InterAreaPrefix(lsa) => lsa.encode(buf),
            LsaBody::InterAreaRouter(lsa) => lsa.encode(buf),
            LsaBody::AsExternal(lsa) => lsa.encode(buf),
            LsaBody::Link(lsa) => lsa.encode(buf),
            LsaBody::IntraAreaPrefix(lsa) => lsa.encode(buf),
            LsaBody::Unknown(lsa) => lsa.encode(buf),
        }
    }

    // The LSA type intrinsic to this body, or `None` for unknown bodies
    // (their type lives in the header alone).
    pub fn lsa_type(&self) -> Option<LsaType> {
        match self {
            LsaBody::Router(_) => Some(LsaType::ROUTER),
            LsaBody::Network(_) => Some(LsaType::NETWORK),
            LsaBody::InterAreaPrefix(_) => Some(LsaType::INTER_AREA_PREFIX),
            LsaBody::InterAreaRouter(_) => Some(LsaType::INTER_AREA_ROUTER),
            LsaBody::AsExternal(lsa) => Some(match lsa.nssa {
                true => LsaType::NSSA,
                false => LsaType::AS_EXTERNAL,
            }),
            LsaBody::Link(_) => Some(LsaType::LINK),
            LsaBody::IntraAreaPrefix(_) => Some(LsaType::INTRA_AREA_PREFIX),
            LsaBody::Unknown(_) => None,
        }
    }
}

// ===== impl LsaRouter =====

impl LsaRouter {
    pub const BASE_LENGTH: u16 = 4;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let flags = LsaRouterFlags::from_bits_retain(buf.read_u8()?);
        let options = RouterOptions::decode(buf)?;

        // A trailing remainder shorter than a link description is left
        // unconsumed and rejected by the caller's length check.
        let mut links = vec![];
        while buf.remaining() >= LsaRouterLink::LENGTH {
            let link = LsaRouterLink::decode(buf)?;
            links.push(link);
        }

        Ok(LsaRouter::new(flags, options, links))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.flags.bits());
        self.options.encode(buf);
        for link in &self.links {
            link.encode(buf);
        }
    }
}

// ===== impl LsaRouterFlags =====

impl LsaRouterFlags {
    pub fn is_abr(&self) -> bool {
        self.contains(LsaRouterFlags::B)
    }

    pub fn is_asbr(&self) -> bool {
        self.contains(LsaRouterFlags::E)
    }
}

// ===== impl LsaRouterLinkType =====

impl LsaRouterLinkType {
    pub const POINT_TO_POINT: LsaRouterLinkType = LsaRouterLinkType(1);
    pub const TRANSIT_NETWORK: LsaRouterLinkType = LsaRouterLinkType(2);
    pub const VIRTUAL_LINK: LsaRouterLinkType = LsaRouterLinkType(4);
}

impl From<LsaRouterLinkType> for u8 {
    fn from(link_type: LsaRouterLinkType) -> u8 {
        link_type.0
    }
}

// ===== impl LsaRouterLink =====

impl LsaRouterLink {
    pub const LENGTH: usize = 16;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let link_type = LsaRouterLinkType(buf.read_u8()?);
        let metric = InterfaceMetric(buf.read_u24()?);
        let iface_id = buf.read_id()?;
        let nbr_iface_id = buf.read_id()?;
        let nbr_router_id = buf.read_id()?;

        Ok(LsaRouterLink::new(
            link_type,
            metric,
            iface_id,
            nbr_iface_id,
            nbr_router_id,
        ))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.link_type.0);
        buf.put_u24(self.metric.get());
        buf.put_id(&self.iface_id);
        buf.put_id(&self.nbr_iface_id);
        buf.put_id(&self.nbr_router_id);
    }
}

// ===== impl LsaNetwork =====

impl LsaNetwork {
    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let _ = buf.read_u8()?;
        let options = RouterOptions::decode(buf)?;

        let mut attached_rtrs = vec![];
        while buf.remaining() >= Id::LENGTH {
            let rtr = buf.read_id()?;
            attached_rtrs.push(rtr);
        }

        Ok(LsaNetwork::new(options, attached_rtrs))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        self.options.encode(buf);
        for rtr in &self.attached_rtrs {
            buf.put_id(rtr);
        }
    }
}

// ===== impl LsaInterAreaPrefix =====

impl LsaInterAreaPrefix {
    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let _ = buf.read_u8()?;
        let metric = InterfaceMetric(buf.read_u24()?);
        let prefix = LsaPrefix::decode(buf)?;

        Ok(LsaInterAreaPrefix::new(metric, prefix))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        buf.put_u24(self.metric.get());
        self.prefix.encode(buf);
    }
}

// ===== impl LsaInterAreaRouter =====

impl LsaInterAreaRouter {
    pub const LENGTH: u16 = 12;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let _ = buf.read_u8()?;
        let options = RouterOptions::decode(buf)?;
        let _ = buf.read_u8()?;
        let metric = InterfaceMetric(buf.read_u24()?);
        let router_id = buf.read_id()?;

        Ok(LsaInterAreaRouter::new(options, metric, router_id))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(0);
        self.options.encode(buf);
        buf.put_u8(0);
        buf.put_u24(self.metric.get());
        buf.put_id(&self.router_id);
    }
}

// ===== impl LsaAsExternal =====

impl LsaAsExternal {
    fn decode(buf: &mut Bytes, nssa: bool) -> DecodeResult<Self> {
        let flags = LsaAsExternalFlags::from_bits_retain(buf.read_u8()?);
        let metric = InterfaceMetric(buf.read_u24()?);
        let prefix = LsaPrefix::decode(buf)?;
        let fwd_addr = if flags.contains(LsaAsExternalFlags::F) {
            Some(buf.read_ipv6()?)
        } else {
            None
        };
        let tag = if flags.contains(LsaAsExternalFlags::T) {
            Some(buf.read_u32()?)
        } else {
            None
        };
        let ref_lsa_id = if prefix.special != 0 {
            Some(buf.read_id()?)
        } else {
            None
        };

        Ok(LsaAsExternal::new(
            nssa, flags, metric, prefix, fwd_addr, tag, ref_lsa_id,
        ))
    }

    fn encode(&self, buf: &mut BytesMut) {
        // The F and T bits follow from field presence so that the flags
        // and the optional tail can never disagree.
        let mut flags = self.flags;
        flags.set(LsaAsExternalFlags::F, self.fwd_addr.is_some());
        flags.set(LsaAsExternalFlags::T, self.tag.is_some());

        buf.put_u8(flags.bits());
        buf.put_u24(self.metric.get());
        self.prefix.encode(buf);
        if let Some(fwd_addr) = &self.fwd_addr {
            buf.put_ipv6(fwd_addr);
        }
        if let Some(tag) = self.tag {
            buf.put_u32(tag);
        }
        if self.prefix.special != 0 {
            buf.put_id(&self.ref_lsa_id.unwrap_or_default());
        }
    }
}

// ===== impl LsaLink =====

impl LsaLink {
    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let priority = buf.read_u8()?;
        let options = RouterOptions::decode(buf)?;
        let linklocal = buf.read_ipv6()?;

        let declared = buf.read_u32()?;
        let prefixes = decode_prefix_list(buf, declared)?;

        Ok(LsaLink::new(priority, options, linklocal, prefixes))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.priority);
        self.options.encode(buf);
        buf.put_ipv6(&self.linklocal);
        buf.put_u32(self.prefixes.len() as u32);
        for prefix in &self.prefixes {
            prefix.encode(buf);
        }
    }
}

// ===== impl LsaIntraAreaPrefix =====

impl LsaIntraAreaPrefix {
    pub const BASE_LENGTH: u16 = 12;

    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let declared = u32::from(buf.read_u16()?);
        let ref_lsa_type = LsaType(buf.read_u16()?);
        let ref_lsa_id = buf.read_id()?;
        let ref_adv_rtr = buf.read_id()?;

        let prefixes = decode_prefix_list(buf, declared)?;

        Ok(LsaIntraAreaPrefix::new(
            ref_lsa_type,
            ref_lsa_id,
            ref_adv_rtr,
            prefixes,
        ))
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.prefixes.len() as u16);
        buf.put_u16(self.ref_lsa_type.0);
        buf.put_id(&self.ref_lsa_id);
        buf.put_id(&self.ref_adv_rtr);
        for prefix in &self.prefixes {
            prefix.encode(buf);
        }
    }
}

// ===== impl LsaUnknown =====

impl LsaUnknown {
    fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let data = buf.copy_to_bytes(buf.remaining());
        Ok(LsaUnknown { data })
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.data);
    }
}

// ===== global functions =====

// Decode exactly `declared` prefixes from a body-bounded buffer.
//
// Bodies carrying an explicit prefix count are held to it in both
// directions: running out of body before the declared count, or leaving
// octets behind after it, is a count mismatch rather than a plain
// truncation.
fn decode_prefix_list(
    buf: &mut Bytes,
    declared: u32,
) -> DecodeResult<Vec<LsaPrefix>> {
    let mut prefixes = vec![];
    for decoded in 0..declared {
        let prefix = LsaPrefix::decode(buf).map_err(|err| match err {
            DecodeError::Truncated { .. } => {
                DecodeError::PrefixCount { declared, decoded }
            }
            err => err,
        })?;
        prefixes.push(prefix);
    }
    if buf.has_remaining() {
        return Err(DecodeError::PrefixCount {
            declared,
            decoded: declared,
        });
    }
    Ok(prefixes)
}
