//! Object Identifier values

use crate::error::OerError;
use std::fmt;
use std::slice;

/// Object Identifier, stored as its list of arcs
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Oid(Vec<u64>);

impl Oid {
    /// Build an OID from a list of arcs
    pub fn from(s: &[u64]) -> Oid {
        Oid(s.to_vec())
    }

    /// Decode the content octets of an OID (X.690 8.19, shared by X.696)
    ///
    /// The first sub-identifier encodes the first two arcs as `X * 40 + Y`.
    pub fn from_der_content(i: &[u8]) -> Result<Oid, OerError> {
        if i.is_empty() {
            return Err(OerError::InvalidOid);
        }
        let subids = read_subidentifiers(i)?;
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        let first = subids[0];
        let (x, y) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };
        arcs.push(x);
        arcs.push(y);
        arcs.extend_from_slice(&subids[1..]);
        Ok(Oid(arcs))
    }

    /// Dotted-decimal representation
    pub fn to_id_string(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        parts.join(".")
    }

    pub fn iter(&self) -> slice::Iter<u64> {
        self.0.iter()
    }
}

fn read_subidentifiers(i: &[u8]) -> Result<Vec<u64>, OerError> {
    let mut subids = Vec::new();
    let mut acc: u64 = 0;
    let mut pending = false;
    for &c in i {
        if acc & 0xfe00_0000_0000_0000 != 0 {
            return Err(OerError::InvalidOid);
        }
        acc = (acc << 7) | u64::from(c & 0b0111_1111);
        pending = c & 0b1000_0000 != 0;
        if !pending {
            subids.push(acc);
            acc = 0;
        }
    }
    if pending {
        return Err(OerError::InvalidOid);
    }
    Ok(subids)
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_id_string())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OID({})", self.to_id_string())
    }
}
