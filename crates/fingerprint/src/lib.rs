//! Stable short identifiers for node names.
//!
//! A [`Fingerprint`] is the MurmurHash3 x86_32 digest of a node's full name
//! under a fixed seed. The same name yields the same fingerprint on every
//! machine and in every run, so operators can match a long name against the
//! short code printed in logs or dashboards.
//!
//! Fingerprints are not unique. Two different names may share one; callers
//! must not treat a fingerprint as a key.

mod murmur;

use std::fmt;

pub use murmur::murmur3_x86_32;

/// Seed used for every listed fingerprint.
pub const FINGERPRINT_SEED: u32 = 0;

/// Number of hex digits in the fixed-width rendering.
pub const PADDED_WIDTH: usize = 8;

/// Unsigned 32-bit digest of a node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Fingerprints the raw bytes of `name`.
    pub fn of(name: impl AsRef<[u8]>) -> Self {
        Self(murmur3_x86_32(name.as_ref(), FINGERPRINT_SEED))
    }

    /// Wraps an already computed digest.
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// Reinterprets a digest produced by a signed 32-bit hash primitive.
    ///
    /// The bit pattern is kept as is, so a negative input maps to the upper
    /// half of the unsigned range.
    pub const fn from_signed(raw: i32) -> Self {
        Self(raw as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Fixed-width rendering: always eight uppercase hex digits.
    pub fn padded(self) -> Padded {
        Padded(self)
    }
}

impl From<u32> for Fingerprint {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Fingerprint> for u32 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

/// Uppercase hex without padding or prefix (`0` renders as `"0"`).
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::UpperHex for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Display adapter returned by [`Fingerprint::padded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padded(Fingerprint);

impl fmt::Display for Padded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$X}", self.0.0, width = PADDED_WIDTH)
    }
}

/// Fingerprint of `name` as a plain unsigned integer.
pub fn fingerprint(name: &[u8]) -> u32 {
    Fingerprint::of(name).value()
}

/// Renders `fp` as unpadded uppercase hex.
pub fn format(fp: u32) -> String {
    Fingerprint::from_u32(fp).to_string()
}

/// Renders `fp` as eight zero-padded uppercase hex digits.
pub fn format_padded(fp: u32) -> String {
    Fingerprint::from_u32(fp).padded().to_string()
}
