use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The discriminant of an [`EntityId`].
///
/// Identifiers of different kinds never match, whatever their values. Each
/// integer width is its own kind: `1i32` and `1i64` are different keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Text,
    Uuid,
    Bytes,
}

impl IdKind {
    /// Stable lowercase name, as used in the `kind:value` text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Bytes => "bytes",
        }
    }

    /// Returns `true` for the integer kinds.
    pub const fn is_integer(&self) -> bool {
        !matches!(self, Self::Text | Self::Uuid | Self::Bytes)
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i8" => Ok(Self::I8),
            "i16" => Ok(Self::I16),
            "i32" => Ok(Self::I32),
            "i64" => Ok(Self::I64),
            "u8" => Ok(Self::U8),
            "u16" => Ok(Self::U16),
            "u32" => Ok(Self::U32),
            "u64" => Ok(Self::U64),
            "text" => Ok(Self::Text),
            "uuid" => Ok(Self::Uuid),
            "bytes" => Ok(Self::Bytes),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

/// Identifier of a stored entity.
///
/// Equality is type-qualified: kinds are compared first, then values under
/// that kind's natural ordering. The derived `Ord` sorts by kind and then by
/// value; it exists for deterministic listings, matching always goes through
/// [`EntityId::matches`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EntityId {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    /// String id.
    Text(String),
    /// UUID id.
    Uuid(uuid::Uuid),
    /// Opaque byte-string id.
    Bytes(Vec<u8>),
}

impl EntityId {
    /// The discriminant of this id.
    pub fn kind(&self) -> IdKind {
        match self {
            Self::I8(_) => IdKind::I8,
            Self::I16(_) => IdKind::I16,
            Self::I32(_) => IdKind::I32,
            Self::I64(_) => IdKind::I64,
            Self::U8(_) => IdKind::U8,
            Self::U16(_) => IdKind::U16,
            Self::U32(_) => IdKind::U32,
            Self::U64(_) => IdKind::U64,
            Self::Text(_) => IdKind::Text,
            Self::Uuid(_) => IdKind::Uuid,
            Self::Bytes(_) => IdKind::Bytes,
        }
    }

    /// Compare two ids of the same kind.
    ///
    /// Returns `None` when the kinds differ: values of different kinds are
    /// not comparable, even integers of different widths.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::I8(a), Self::I8(b)) => Some(a.cmp(b)),
            (Self::I16(a), Self::I16(b)) => Some(a.cmp(b)),
            (Self::I32(a), Self::I32(b)) => Some(a.cmp(b)),
            (Self::I64(a), Self::I64(b)) => Some(a.cmp(b)),
            (Self::U8(a), Self::U8(b)) => Some(a.cmp(b)),
            (Self::U16(a), Self::U16(b)) => Some(a.cmp(b)),
            (Self::U32(a), Self::U32(b)) => Some(a.cmp(b)),
            (Self::U64(a), Self::U64(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Type-qualified equality: same kind and equal value.
    pub fn matches(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.compare(other) == Some(Ordering::Equal)
    }

    /// Generate a fresh time-ordered UUID (v7) id.
    pub fn new_uuid() -> Self {
        Self::Uuid(uuid::Uuid::now_v7())
    }

    /// The text value, if this is a [`EntityId::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value of any signed integer id, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(n) => Some((*n).into()),
            Self::I16(n) => Some((*n).into()),
            Self::I32(n) => Some((*n).into()),
            Self::I64(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({self})")
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Self::I8(n) => write!(f, "{kind}:{n}"),
            Self::I16(n) => write!(f, "{kind}:{n}"),
            Self::I32(n) => write!(f, "{kind}:{n}"),
            Self::I64(n) => write!(f, "{kind}:{n}"),
            Self::U8(n) => write!(f, "{kind}:{n}"),
            Self::U16(n) => write!(f, "{kind}:{n}"),
            Self::U32(n) => write!(f, "{kind}:{n}"),
            Self::U64(n) => write!(f, "{kind}:{n}"),
            Self::Text(s) => write!(f, "{kind}:{s}"),
            Self::Uuid(u) => write!(f, "{kind}:{u}"),
            Self::Bytes(b) => write!(f, "{kind}:{}", hex::encode(b)),
        }
    }
}

impl FromStr for EntityId {
    type Err = TypeError;

    /// Parse the `kind:value` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| TypeError::MissingSeparator(s.to_string()))?;
        let kind: IdKind = kind.parse()?;
        let invalid = |reason: String| TypeError::InvalidValue {
            kind: kind.to_string(),
            value: value.to_string(),
            reason,
        };

        macro_rules! parse_int {
            ($variant:ident) => {
                value
                    .parse()
                    .map(EntityId::$variant)
                    .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))
            };
        }

        match kind {
            IdKind::I8 => parse_int!(I8),
            IdKind::I16 => parse_int!(I16),
            IdKind::I32 => parse_int!(I32),
            IdKind::I64 => parse_int!(I64),
            IdKind::U8 => parse_int!(U8),
            IdKind::U16 => parse_int!(U16),
            IdKind::U32 => parse_int!(U32),
            IdKind::U64 => parse_int!(U64),
            IdKind::Text => Ok(Self::Text(value.to_string())),
            IdKind::Uuid => uuid::Uuid::parse_str(value)
                .map(Self::Uuid)
                .map_err(|e| invalid(e.to_string())),
            IdKind::Bytes => hex::decode(value)
                .map(Self::Bytes)
                .map_err(|e| invalid(e.to_string())),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for EntityId {
                fn from(n: $t) -> Self {
                    Self::$variant(n)
                }
            }
        )+
    };
}

impl_from_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<uuid::Uuid> for EntityId {
    fn from(u: uuid::Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<Vec<u8>> for EntityId {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for EntityId {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}
