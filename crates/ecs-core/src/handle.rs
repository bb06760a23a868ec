//! # Ciphertext Handles
//!
//! A `CiphertextHandle` is an opaque 32-byte reference to an encrypted
//! value held by the confidential-arithmetic backend. It is meaningful only
//! together with the chain it was minted under.
//!
//! ## Layout
//!
//! ```text
//! bytes  0..21  hash prefix (input blob digest or operation digest)
//! byte   21     input index within its proof batch, 0xff when computed
//! bytes 22..30  chain id, big-endian
//! byte   30     encrypted type tag
//! byte   31     handle version
//! ```
//!
//! ## Security Invariant
//!
//! Handles carry no plaintext and expose no ordering or arithmetic. Contract
//! logic never branches on a handle; it only passes handles to the
//! arithmetic engine, which itself returns handles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::ContentDigest;
use crate::error::CoreError;
use crate::identity::ChainId;

/// Current handle layout version.
pub const HANDLE_VERSION: u8 = 0;

/// Index byte stamped on handles produced by computation rather than input.
pub const COMPUTED_INDEX: u8 = 0xff;

const INDEX_BYTE: usize = 21;
const CHAIN_RANGE: std::ops::Range<usize> = 22..30;
const TYPE_BYTE: usize = 30;
const VERSION_BYTE: usize = 31;

/// Encrypted value types understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FheType {
    /// Encrypted boolean.
    Bool = 0,
    /// Encrypted 32-bit unsigned integer.
    Uint32 = 4,
}

impl FheType {
    /// The tag byte stored in a handle.
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    /// Decode a tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Bool),
            4 => Some(Self::Uint32),
            _ => None,
        }
    }

    /// Lowercase type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "ebool",
            Self::Uint32 => "euint32",
        }
    }
}

impl std::fmt::Display for FheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to an encrypted value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    /// The empty handle. Never a valid reference.
    pub const ZERO: CiphertextHandle = CiphertextHandle([0u8; 32]);

    /// Assemble a handle from a digest and its metadata.
    pub fn compose(digest: &ContentDigest, index: u8, chain: ChainId, fhe_type: FheType) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..INDEX_BYTE].copy_from_slice(&digest.0[..INDEX_BYTE]);
        bytes[INDEX_BYTE] = index;
        bytes[CHAIN_RANGE].copy_from_slice(&chain.value().to_be_bytes());
        bytes[TYPE_BYTE] = fhe_type.tag();
        bytes[VERSION_BYTE] = HANDLE_VERSION;
        Self(bytes)
    }

    /// Create a handle from raw bytes without validation.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw handle bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the empty handle.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Input index within the proof batch, or `COMPUTED_INDEX`.
    pub fn index(&self) -> u8 {
        self.0[INDEX_BYTE]
    }

    /// Whether the handle was produced by computation.
    pub fn is_computed(&self) -> bool {
        self.index() == COMPUTED_INDEX
    }

    /// The chain the handle was minted under.
    pub fn chain_id(&self) -> ChainId {
        let mut be = [0u8; 8];
        be.copy_from_slice(&self.0[CHAIN_RANGE]);
        ChainId(u64::from_be_bytes(be))
    }

    /// The encrypted type, if the tag is known.
    pub fn fhe_type(&self) -> Option<FheType> {
        FheType::from_tag(self.0[TYPE_BYTE])
    }

    /// The handle layout version.
    pub fn version(&self) -> u8 {
        self.0[VERSION_BYTE]
    }

    /// Check that the handle is well-formed: non-zero, known type, current
    /// version.
    pub fn validate(&self) -> Result<FheType, CoreError> {
        if self.is_zero() {
            return Err(CoreError::InvalidHandle("empty handle".to_string()));
        }
        if self.version() != HANDLE_VERSION {
            return Err(CoreError::InvalidHandle(format!(
                "{}: unsupported version {}",
                self.short(),
                self.version()
            )));
        }
        self.fhe_type().ok_or_else(|| {
            CoreError::InvalidHandle(format!("{}: unknown type tag {}", self.short(), self.0[TYPE_BYTE]))
        })
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", crate::hex::encode(&self.0))
    }

    /// Parse from 64 hex characters, with or without `0x`.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        crate::hex::decode_array::<32>(hex)
            .map(Self)
            .map_err(|e| CoreError::InvalidHandle(format!("{e}")))
    }

    /// Short prefix for log fields.
    pub fn short(&self) -> String {
        format!("0x{}", crate::hex::prefix(&self.0))
    }
}

impl Serialize for CiphertextHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CiphertextHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CiphertextHandle({}...)", self.short())
    }
}

impl std::fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Reference to an encrypted 32-bit unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Euint32(CiphertextHandle);

/// Reference to an encrypted boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ebool(CiphertextHandle);

macro_rules! typed_handle {
    ($name:ident, $ty:expr) => {
        impl $name {
            /// Wrap a handle, checking that it is well-formed and carries
            /// the matching type tag.
            pub fn try_from_handle(handle: CiphertextHandle) -> Result<Self, CoreError> {
                let actual = handle.validate()?;
                if actual != $ty {
                    return Err(CoreError::InvalidHandle(format!(
                        "{}: expected {}, found {}",
                        handle.short(),
                        $ty,
                        actual
                    )));
                }
                Ok(Self(handle))
            }

            /// The underlying handle.
            pub fn handle(&self) -> &CiphertextHandle {
                &self.0
            }
        }

        impl From<$name> for CiphertextHandle {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

typed_handle!(Euint32, FheType::Uint32);
typed_handle!(Ebool, FheType::Bool);
