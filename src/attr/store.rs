use std::{
    collections::{BTreeMap, HashMap, hash_map::Entry},
    fmt::Write as _,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context;

use crate::{
    attr::value::{AttrValue, OpaquePtr, StructBlob, Value, ValueKind},
    foundation::debug::{self, DebugFlags},
    foundation::error::{VencError, VencResult},
};

const INITIAL_CAPACITY: usize = 32;

/// Named, typed property bag used to configure an encoder.
///
/// Two access protocols share one store:
///
/// - **direct**: `set_*` / `get_*` by name, effective immediately;
/// - **staged**: [`AttrStore::stage_get`] hands out a mutable slot in a working copy and
///   [`AttrStore::stage_put`] commits every pending slot in one step.
///
/// Direct reads only observe committed values. The store is not internally synchronized;
/// `&mut self` on every mutation leaves exclusion to the owner.
#[derive(Clone, Debug, Default)]
pub struct AttrStore {
    values: HashMap<String, Value>,
    staged: HashMap<String, Value>,
}

impl AttrStore {
    /// Allocate a fresh, empty store.
    pub fn init() -> VencResult<Self> {
        let mut values = HashMap::new();
        values
            .try_reserve(INITIAL_CAPACITY)
            .map_err(|e| VencError::allocation(format!("reserve attribute map: {e}")))?;
        Ok(Self {
            values,
            staged: HashMap::new(),
        })
    }

    /// Release the store and everything it owns.
    pub fn deinit(self) {
        if debug::enabled(DebugFlags::CFG) {
            tracing::debug!(entries = self.values.len(), "attribute store released");
        }
    }

    /// Number of committed attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no attribute is committed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `name` holds a committed value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Kind of the committed value under `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.values.get(name).map(Value::kind)
    }

    /// Committed value under `name`, if any.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Committed keys in lexicographic order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Committed entries in key order.
    pub fn entries(&self) -> Vec<(&str, &Value)> {
        let mut out: Vec<(&str, &Value)> =
            self.values.iter().map(|(k, v)| (k.as_str(), v)).collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Remove a committed attribute, returning its value. A pending staged edit of the
    /// key is dropped with it.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.staged.remove(name);
        self.values.remove(name)
    }

    /// Insert or overwrite `name` with an already tagged value.
    ///
    /// A pending staged edit of the same key is discarded so a later
    /// [`AttrStore::stage_put`] cannot write the older snapshot back.
    pub fn set_value(&mut self, name: &str, value: Value) -> VencResult<()> {
        check_name(name)?;
        if debug::enabled(DebugFlags::CFG) {
            tracing::debug!(name, kind = %value.kind(), value = %value, "set");
        }
        if !self.values.contains_key(name) {
            self.values
                .try_reserve(1)
                .map_err(|e| {
                    debug::report(VencError::allocation(format!("insert '{name}': {e}")))
                })?;
        }
        self.staged.remove(name);
        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    /// Insert or overwrite `name` with a typed value.
    pub fn set<T: AttrValue>(&mut self, name: &str, value: T) -> VencResult<()> {
        self.set_value(name, value.into_value())
    }

    /// Read `name` as `T`.
    ///
    /// Fails with `NotFound` when absent and with `TypeMismatch` when it was written
    /// with another kind; bits are never reinterpreted.
    pub fn get<T: AttrValue>(&self, name: &str) -> VencResult<T> {
        let value = self.lookup(name)?;
        T::from_value(value)
            .ok_or_else(|| debug::report(VencError::type_mismatch(name, value.kind(), T::KIND)))
    }

    /// Insert or overwrite `name` with an `s32` value.
    pub fn set_s32(&mut self, name: &str, value: i32) -> VencResult<()> {
        self.set(name, value)
    }

    /// Insert or overwrite `name` with a `u32` value.
    pub fn set_u32(&mut self, name: &str, value: u32) -> VencResult<()> {
        self.set(name, value)
    }

    /// Insert or overwrite `name` with an `s64` value.
    pub fn set_s64(&mut self, name: &str, value: i64) -> VencResult<()> {
        self.set(name, value)
    }

    /// Insert or overwrite `name` with a `u64` value.
    pub fn set_u64(&mut self, name: &str, value: u64) -> VencResult<()> {
        self.set(name, value)
    }

    /// Insert or overwrite `name` with a pointer token.
    pub fn set_ptr(&mut self, name: &str, value: OpaquePtr) -> VencResult<()> {
        self.set(name, value)
    }

    /// Store a copy of `bytes` as an opaque structure blob.
    pub fn set_st(&mut self, name: &str, bytes: &[u8]) -> VencResult<()> {
        self.set_value(name, Value::St(bytes.to_vec()))
    }

    /// Read `name` as `s32`.
    pub fn get_s32(&self, name: &str) -> VencResult<i32> {
        self.get(name)
    }

    /// Read `name` as `u32`.
    pub fn get_u32(&self, name: &str) -> VencResult<u32> {
        self.get(name)
    }

    /// Read `name` as `s64`.
    pub fn get_s64(&self, name: &str) -> VencResult<i64> {
        self.get(name)
    }

    /// Read `name` as `u64`.
    pub fn get_u64(&self, name: &str) -> VencResult<u64> {
        self.get(name)
    }

    /// Read `name` as a pointer token.
    pub fn get_ptr(&self, name: &str) -> VencResult<OpaquePtr> {
        self.get(name)
    }

    /// Borrow the blob stored under `name`.
    pub fn get_st(&self, name: &str) -> VencResult<&[u8]> {
        match self.lookup(name)? {
            Value::St(bytes) => Ok(bytes),
            other => Err(debug::report(VencError::type_mismatch(
                name,
                other.kind(),
                ValueKind::St,
            ))),
        }
    }

    /// Copy the blob under `name` into `out`.
    ///
    /// `out` must have the blob's exact length; on any error it is left untouched.
    pub fn get_st_into(&self, name: &str, out: &mut [u8]) -> VencResult<()> {
        let bytes = self.get_st(name)?;
        if bytes.len() != out.len() {
            return Err(debug::report(VencError::invalid_argument(format!(
                "'{name}' holds {} bytes, caller buffer is {}",
                bytes.len(),
                out.len()
            ))));
        }
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Encode `value` with its own layout and store it as a blob.
    pub fn set_struct<T: StructBlob>(&mut self, name: &str, value: &T) -> VencResult<()> {
        let mut bytes = vec![0u8; T::SIZE];
        value.write_bytes(&mut bytes);
        self.set_value(name, Value::St(bytes))
    }

    /// Decode the blob under `name` as `T`.
    pub fn get_struct<T: StructBlob>(&self, name: &str) -> VencResult<T> {
        let bytes = self.get_st(name)?;
        if bytes.len() != T::SIZE {
            return Err(debug::report(VencError::invalid_argument(format!(
                "'{name}' holds {} bytes, structure needs {}",
                bytes.len(),
                T::SIZE
            ))));
        }
        Ok(T::read_bytes(bytes))
    }

    /// Open a staged edit of `name`.
    ///
    /// The first call for a key copies its committed value into the working copy; later
    /// calls before [`AttrStore::stage_put`] return the same pending slot.
    pub fn stage_get(&mut self, name: &str) -> VencResult<StagedSlot<'_>> {
        check_name(name)?;
        let value = match self.staged.entry(name.to_owned()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let current = self.values.get(name).cloned().ok_or_else(|| {
                    debug::report(VencError::not_found(format!("attribute '{name}'")))
                })?;
                e.insert(current)
            }
        };
        Ok(StagedSlot {
            name: name.to_owned(),
            value,
        })
    }

    /// True when staged edits are waiting for [`AttrStore::stage_put`].
    pub fn has_pending(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Commit every pending staged slot, returning how many keys were written.
    ///
    /// With nothing pending this is a no-op returning 0. Capacity is reserved before any
    /// value moves, so a failure leaves the committed state unchanged.
    pub fn stage_put(&mut self) -> VencResult<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }
        self.values
            .try_reserve(self.staged.len())
            .map_err(|e| {
                debug::report(VencError::allocation(format!("commit staged edits: {e}")))
            })?;

        let n = self.staged.len();
        for (name, value) in self.staged.drain() {
            self.values.insert(name, value);
        }
        if debug::enabled(DebugFlags::CFG) {
            tracing::debug!(committed = n, "stage_put");
        }
        Ok(n)
    }

    /// Drop pending staged slots without committing, returning how many were dropped.
    pub fn stage_discard(&mut self) -> usize {
        let n = self.staged.len();
        self.staged.clear();
        n
    }

    /// Log every committed entry at `info` level.
    pub fn show(&self) {
        tracing::info!(
            entries = self.values.len(),
            pending = self.staged.len(),
            "attribute store"
        );
        for (name, value) in self.entries() {
            tracing::info!("{name:<28} {:<3} {value}", value.kind());
        }
    }

    /// Render every committed entry, one `name kind value` line each, in key order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.entries() {
            let _ = writeln!(out, "{name:<28} {:<3} {value}", value.kind());
        }
        out
    }

    /// Parse a JSON profile: an object of key to tagged value.
    ///
    /// ```json
    /// { "prep.width": { "s32": 1920 }, "init.buf_size": { "u32": 4194304 } }
    /// ```
    pub fn from_json_str(s: &str) -> VencResult<Self> {
        let map: BTreeMap<String, Value> = serde_json::from_str(s)
            .map_err(|e| VencError::serde(format!("parse attribute profile JSON: {e}")))?;
        Self::from_map(map)
    }

    /// Parse a JSON profile from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VencResult<Self> {
        let map: BTreeMap<String, Value> = serde_json::from_reader(r)
            .map_err(|e| VencError::serde(format!("parse attribute profile JSON: {e}")))?;
        Self::from_map(map)
    }

    /// Parse a JSON profile from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VencResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open attribute profile '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize the committed entries in the profile format, keys sorted.
    pub fn to_json_string(&self) -> VencResult<String> {
        let map: BTreeMap<&str, &Value> =
            self.values.iter().map(|(k, v)| (k.as_str(), v)).collect();
        serde_json::to_string_pretty(&map)
            .map_err(|e| VencError::serde(format!("write attribute profile JSON: {e}")))
    }

    fn from_map(map: BTreeMap<String, Value>) -> VencResult<Self> {
        let mut store = Self::init()?;
        for (name, value) in map {
            store.set_value(&name, value)?;
        }
        Ok(store)
    }

    fn lookup(&self, name: &str) -> VencResult<&Value> {
        check_name(name)?;
        let value = self
            .values
            .get(name)
            .ok_or_else(|| debug::report(VencError::not_found(format!("attribute '{name}'"))))?;
        if debug::enabled(DebugFlags::CFG) {
            tracing::debug!(name, kind = %value.kind(), "get");
        }
        Ok(value)
    }
}

fn check_name(name: &str) -> VencResult<()> {
    if name.is_empty() {
        return Err(debug::report(VencError::invalid_argument(
            "attribute name must not be empty",
        )));
    }
    Ok(())
}

/// Mutable view of one pending staged value.
///
/// Edits land in the store's working copy and become visible to direct reads only after
/// [`AttrStore::stage_put`].
#[derive(Debug)]
pub struct StagedSlot<'a> {
    name: String,
    value: &'a mut Value,
}

macro_rules! slot_scalar_mut {
    ($(#[$doc:meta])* $fn_name:ident, $ty:ty, $variant:ident) => {
        $(#[$doc])*
        pub fn $fn_name(&mut self) -> VencResult<&mut $ty> {
            match &mut *self.value {
                Value::$variant(v) => Ok(v),
                other => Err(debug::report(VencError::type_mismatch(
                    self.name.as_str(),
                    other.kind(),
                    ValueKind::$variant,
                ))),
            }
        }
    };
}

impl<'a> StagedSlot<'a> {
    /// Key being edited.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the pending value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Current pending value.
    pub fn value(&self) -> &Value {
        self.value
    }

    slot_scalar_mut!(
        /// Edit a pending `s32` value in place.
        s32_mut, i32, S32
    );
    slot_scalar_mut!(
        /// Edit a pending `u32` value in place.
        u32_mut, u32, U32
    );
    slot_scalar_mut!(
        /// Edit a pending `s64` value in place.
        s64_mut, i64, S64
    );
    slot_scalar_mut!(
        /// Edit a pending `u64` value in place.
        u64_mut, u64, U64
    );
    slot_scalar_mut!(
        /// Edit a pending pointer token in place.
        ptr_mut, OpaquePtr, Ptr
    );

    /// Edit a pending blob in place. The slice has the blob's fixed length.
    pub fn bytes_mut(&mut self) -> VencResult<&mut [u8]> {
        match &mut *self.value {
            Value::St(bytes) => Ok(bytes.as_mut_slice()),
            other => Err(debug::report(VencError::type_mismatch(
                self.name.as_str(),
                other.kind(),
                ValueKind::St,
            ))),
        }
    }

    /// Consume the slot and keep a mutable blob view for the rest of the borrow.
    pub fn into_bytes_mut(self) -> VencResult<&'a mut [u8]> {
        match self.value {
            Value::St(bytes) => Ok(bytes.as_mut_slice()),
            other => Err(debug::report(VencError::type_mismatch(
                self.name,
                other.kind(),
                ValueKind::St,
            ))),
        }
    }

    /// Decode the pending blob as `T`.
    pub fn read_struct<T: StructBlob>(&self) -> VencResult<T> {
        match &*self.value {
            Value::St(bytes) if bytes.len() == T::SIZE => Ok(T::read_bytes(bytes)),
            Value::St(bytes) => Err(debug::report(VencError::invalid_argument(format!(
                "'{}' holds {} bytes, structure needs {}",
                self.name,
                bytes.len(),
                T::SIZE
            )))),
            other => Err(debug::report(VencError::type_mismatch(
                self.name.as_str(),
                other.kind(),
                ValueKind::St,
            ))),
        }
    }

    /// Re-encode `value` over the pending blob, keeping its length.
    pub fn write_struct<T: StructBlob>(&mut self, value: &T) -> VencResult<()> {
        let name = self.name.clone();
        let bytes = self.bytes_mut()?;
        if bytes.len() != T::SIZE {
            return Err(debug::report(VencError::invalid_argument(format!(
                "'{name}' holds {} bytes, structure needs {}",
                bytes.len(),
                T::SIZE
            ))));
        }
        value.write_bytes(bytes);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/attr/store.rs"]
mod tests;
