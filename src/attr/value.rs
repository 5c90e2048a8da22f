use serde::{Deserialize, Serialize};

/// Address-sized token stored under a pointer-kind attribute.
///
/// The store only carries the address; it is never dereferenced inside this crate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OpaquePtr(usize);

impl OpaquePtr {
    /// The null token.
    pub const fn null() -> Self {
        Self(0)
    }

    /// Wrap a raw address.
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// Capture the address of a reference without keeping the borrow.
    pub fn of<T>(r: &T) -> Self {
        Self(std::ptr::from_ref(r) as usize)
    }

    /// Raw address.
    pub const fn addr(self) -> usize {
        self.0
    }

    /// True for the null token.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Tag of a stored attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Signed 32-bit integer.
    S32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    S64,
    /// Unsigned 64-bit integer.
    U64,
    /// Opaque pointer token.
    Ptr,
    /// Opaque structure blob.
    St,
}

impl ValueKind {
    /// Short lowercase name used in logs and profile files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S32 => "s32",
            Self::U32 => "u32",
            Self::S64 => "s64",
            Self::U64 => "u64",
            Self::Ptr => "ptr",
            Self::St => "st",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tagged attribute value.
///
/// Serialized externally tagged, e.g. `{"u32": 1920}` or `{"st": [1, 2, 3]}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Signed 32-bit integer.
    S32(i32),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Signed 64-bit integer.
    S64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Opaque pointer token.
    Ptr(OpaquePtr),
    /// Opaque structure blob with a consumer-defined layout.
    St(Vec<u8>),
}

impl Value {
    /// Tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::S32(_) => ValueKind::S32,
            Self::U32(_) => ValueKind::U32,
            Self::S64(_) => ValueKind::S64,
            Self::U64(_) => ValueKind::U64,
            Self::Ptr(_) => ValueKind::Ptr,
            Self::St(_) => ValueKind::St,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::S64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::Ptr(p) => write!(f, "{:#x}", p.addr()),
            Self::St(bytes) => {
                write!(f, "[{} bytes]", bytes.len())?;
                for b in bytes.iter().take(16) {
                    write!(f, " {b:02x}")?;
                }
                if bytes.len() > 16 {
                    f.write_str(" ..")?;
                }
                Ok(())
            }
        }
    }
}

/// Rust types that map one-to-one onto a [`ValueKind`].
pub trait AttrValue: Sized {
    /// Kind this type is stored as.
    const KIND: ValueKind;

    /// Wrap into a tagged value.
    fn into_value(self) -> Value;

    /// Extract from a tagged value; `None` when the tag differs.
    fn from_value(v: &Value) -> Option<Self>;
}

macro_rules! scalar_attr_value {
    ($ty:ty, $variant:ident) => {
        impl AttrValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(v: &Value) -> Option<Self> {
                match v {
                    Value::$variant(x) => Some(*x),
                    _ => None,
                }
            }
        }
    };
}

scalar_attr_value!(i32, S32);
scalar_attr_value!(u32, U32);
scalar_attr_value!(i64, S64);
scalar_attr_value!(u64, U64);
scalar_attr_value!(OpaquePtr, Ptr);

impl AttrValue for Vec<u8> {
    const KIND: ValueKind = ValueKind::St;

    fn into_value(self) -> Value {
        Value::St(self)
    }

    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::St(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

/// A consumer-defined structure stored as a fixed-size blob.
///
/// The store never interprets the bytes; the implementing type owns the layout.
pub trait StructBlob: Sized {
    /// Exact encoded size in bytes.
    const SIZE: usize;

    /// Encode into `out`, which is exactly [`Self::SIZE`] bytes long.
    fn write_bytes(&self, out: &mut [u8]);

    /// Decode from `bytes`, which is exactly [`Self::SIZE`] bytes long.
    fn read_bytes(bytes: &[u8]) -> Self;
}

#[cfg(test)]
#[path = "../../tests/unit/attr/value.rs"]
mod tests;
