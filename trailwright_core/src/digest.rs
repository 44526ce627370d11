// Determinism digests over ordered waypoint sequences.
//
// A `RouteDigest` is the SHA-256 of a route's canonical text form:
//
//   trailwright/route/v1|<count>|x,y,z;x,y,z;...;
//
// with decimal coordinates in x, y, z order. Identical sequences always
// hash identically; any change in order, count, or value changes the text
// and therefore (with overwhelming probability) the digest. Digests are
// output only. Nothing in the planner reads one back.
//
// Serialized as a 64-character lowercase hex string so digests can key
// JSON maps in exported diagnostics.

use crate::types::GridPos;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};

const DOMAIN: &str = "trailwright/route/v1";

/// SHA-256 digest of a canonical waypoint sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteDigest([u8; 32]);

impl RouteDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse the 64-character hex form.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 || !s.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for RouteDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RouteDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteDigest({self})")
    }
}

impl Serialize for RouteDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RouteDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RouteDigest::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid route digest"))
    }
}

/// Computes route digests.
pub struct DeterminismHasher;

impl DeterminismHasher {
    /// Canonical text form hashed by `hash`.
    pub fn canonical(points: &[GridPos]) -> String {
        let mut out = String::with_capacity(DOMAIN.len() + 8 + points.len() * 16);
        out.push_str(DOMAIN);
        // Writing into a String cannot fail.
        let _ = write!(out, "|{}|", points.len());
        for p in points {
            let _ = write!(out, "{},{},{};", p.x, p.y, p.z);
        }
        out
    }

    pub fn hash(points: &[GridPos]) -> RouteDigest {
        let mut hasher = Sha256::new();
        hasher.update(Self::canonical(points).as_bytes());
        RouteDigest(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: i32) -> Vec<GridPos> {
        (0..n).map(|x| GridPos::new(x, 64, 0)).collect()
    }

    #[test]
    fn canonical_form_is_fixed() {
        let text = DeterminismHasher::canonical(&[GridPos::new(1, -2, 3), GridPos::new(4, 5, 6)]);
        assert_eq!(text, "trailwright/route/v1|2|1,-2,3;4,5,6;");
    }

    #[test]
    fn identical_sequences_hash_identically() {
        assert_eq!(DeterminismHasher::hash(&line(10)), DeterminismHasher::hash(&line(10)));
    }

    #[test]
    fn order_count_and_values_matter() {
        let base = line(5);
        let digest = DeterminismHasher::hash(&base);

        let mut reversed = base.clone();
        reversed.reverse();
        assert_ne!(digest, DeterminismHasher::hash(&reversed));

        assert_ne!(digest, DeterminismHasher::hash(&base[..4]));

        let mut nudged = base.clone();
        nudged[2].y += 1;
        assert_ne!(digest, DeterminismHasher::hash(&nudged));
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        // (1, 23, 4) and (12, 3, 4) must not collide through concatenation.
        let a = DeterminismHasher::hash(&[GridPos::new(1, 23, 4)]);
        let b = DeterminismHasher::hash(&[GridPos::new(12, 3, 4)]);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_roundtrip() {
        let digest = DeterminismHasher::hash(&line(3));
        let hex = digest.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(RouteDigest::from_hex(&hex), Some(digest));
        assert_eq!(RouteDigest::from_hex("abc"), None);

        let json = serde_json::to_string(&digest).unwrap();
        let restored: RouteDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, restored);
    }
}
