//! IPv4 CIDR parsing and subdivision for per-zone subnets.

use std::fmt;
use std::net::Ipv4Addr;

use lakestack_core::{LakeStackError, LakeStackResult};

/// An IPv4 CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrBlock {
    network: u32,
    prefix: u8,
}

impl CidrBlock {
    /// Parse a CIDR block from `a.b.c.d/prefix` notation.
    ///
    /// Host bits below the prefix must be zero.
    pub fn parse(s: &str) -> LakeStackResult<Self> {
        let err = || LakeStackError::InvalidCidr(s.to_owned());

        let (addr, prefix) = s.split_once('/').ok_or_else(err)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| err())?;
        let prefix: u8 = prefix.parse().map_err(|_| err())?;
        if prefix > 32 {
            return Err(err());
        }

        let network = u32::from(addr);
        if prefix < 32 && network.trailing_zeros() < 32 - u32::from(prefix) {
            return Err(err());
        }

        Ok(Self { network, prefix })
    }

    /// The prefix length.
    #[must_use]
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Split this block into `2^bits` equal, disjoint sub-blocks.
    ///
    /// Subnets need room for addresses, so the resulting prefix must stay at
    /// or below /28.
    pub fn subdivide(&self, bits: u8) -> LakeStackResult<Vec<CidrBlock>> {
        let new_prefix = self.prefix + bits;
        if new_prefix > 28 {
            return Err(LakeStackError::InvalidCidr(format!(
                "{self} is too small to split into {} subnets",
                1u32 << bits
            )));
        }

        let step = 1u32 << (32 - new_prefix);
        Ok((0..1u32 << bits)
            .map(|i| CidrBlock {
                network: self.network + i * step,
                prefix: new_prefix,
            })
            .collect())
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.network), self.prefix)
    }
}
