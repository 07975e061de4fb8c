// src/data/address.rs

//! Interpret the 16 byte `ut_addr_v6` field of a login-accounting record as
//! an IPv4 or IPv6 address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Size of the on-disk address field in bytes.
pub const ADDR_FIELD_SZ: usize = 16;

/// Resolve the on-disk address field to an [`IpAddr`].
///
/// If the three 4-byte words at byte ranges `[4‥8]`, `[8‥12]`, `[12‥16]` are
/// all zero then the first 4 bytes are an IPv4 address and the rest is
/// discarded. Otherwise all 16 bytes are an IPv6 address.
///
/// An IPv4-mapped IPv6 address (`::ffff:a.b.c.d`) has `0xffff` in the word at
/// `[8‥12]` so it resolves to IPv6, not IPv4. `glibc` writes IPv4 remote
/// addresses into the first word only so this has not mattered in practice.
/// All-zero bytes resolve to IPv4 `0.0.0.0`.
pub fn resolve_address(addr_v6: &[u8; ADDR_FIELD_SZ]) -> IpAddr {
    if addr_v6[4..].iter().all(|&b| b == 0) {
        let ip = Ipv4Addr::new(addr_v6[0], addr_v6[1], addr_v6[2], addr_v6[3]);
        defñ!("IPv4 {}", ip);

        return IpAddr::V4(ip);
    }
    let ip = Ipv6Addr::from(*addr_v6);
    defñ!("IPv6 {}", ip);

    IpAddr::V6(ip)
}

/// The octets of `ip` as stored, 4 bytes for IPv4 and 16 bytes for IPv6.
pub fn address_octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(ip4) => ip4.octets().to_vec(),
        IpAddr::V6(ip6) => ip6.octets().to_vec(),
    }
}
