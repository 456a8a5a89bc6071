//! Persisted slice - one independently stored, dirty-tracked unit of workflow state
//!
//! A slice wraps a [`SliceState`] value. Every successful mutation marks the
//! slice dirty, bumps its revision and writes the new value through to the
//! storage port, all in the same call. Storage failures never fail the
//! mutation: they are logged and kept as a pending warning for the UI.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ports::outbound::{SliceStorage, StorageError};
use crate::domain::entities::SliceState;
use crate::domain::errors::ValidationError;

/// Version written into every persisted envelope
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    state: &'a T,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// The capability the coordinators need from a slice, whatever its field type
pub trait Dirtyable: Send {
    fn key(&self) -> &'static str;
    fn is_dirty(&self) -> bool;
    fn mark_clean(&mut self);
    /// Return to the initial value. The in-memory reset always happens; the
    /// error only reports that removing the stored value failed.
    fn reset(&mut self) -> Result<(), StorageError>;
    fn revision(&self) -> u64;
    fn can_continue(&self) -> bool;
    /// Pending storage warning, cleared once taken
    fn take_warning(&mut self) -> Option<StorageError> {
        None
    }
}

pub struct Slice<T: SliceState> {
    fields: T,
    dirty: bool,
    revision: u64,
    storage: Arc<dyn SliceStorage>,
    warning: Option<StorageError>,
}

impl<T: SliceState> Slice<T> {
    /// Restore the slice from storage, falling back to the initial value when
    /// nothing usable is stored. A freshly loaded slice is clean.
    pub fn load(storage: Arc<dyn SliceStorage>) -> Self {
        let fields = match storage.get(T::KEY) {
            Ok(Some(blob)) => decode::<T>(&blob).unwrap_or_else(|reason| {
                warn!(key = T::KEY, %reason, "Discarding unreadable persisted slice");
                T::initial()
            }),
            Ok(None) => T::initial(),
            Err(e) => {
                warn!(key = T::KEY, error = %e, "Could not read persisted slice");
                T::initial()
            }
        };
        Self {
            fields,
            dirty: false,
            revision: 0,
            storage,
            warning: None,
        }
    }

    pub fn key(&self) -> &'static str {
        T::KEY
    }

    pub fn get(&self) -> &T {
        &self.fields
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an infallible change. The result is still checked against the
    /// state's invariants and discarded if it breaks them.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, ValidationError> {
        self.try_update(|fields| Ok(f(fields)))
    }

    /// Apply a change that may reject itself. Nothing is committed unless both
    /// the closure and the state's validation succeed.
    pub fn try_update<R>(
        &mut self,
        f: impl FnOnce(&mut T) -> Result<R, ValidationError>,
    ) -> Result<R, ValidationError> {
        let mut next = self.fields.clone();
        let out = f(&mut next)?;
        next.validate()?;
        self.commit(next);
        Ok(out)
    }

    /// Replace every field at once
    pub fn set(&mut self, fields: T) -> Result<(), ValidationError> {
        fields.validate()?;
        self.commit(fields);
        Ok(())
    }

    /// Merge the given top-level fields onto the current value.
    ///
    /// The patch is re-read through the typed schema, so unknown fields,
    /// unknown enumeration values and mistyped values are rejected.
    pub fn set_partial(&mut self, patch: serde_json::Value) -> Result<(), ValidationError> {
        let serde_json::Value::Object(patch) = patch else {
            return Err(schema_error::<T>("expected an object of fields"));
        };
        let mut merged = serde_json::to_value(&self.fields).map_err(|e| schema_error::<T>(e))?;
        let Some(current) = merged.as_object_mut() else {
            return Err(schema_error::<T>("slice fields are not an object"));
        };
        let patched: Vec<String> = patch.keys().cloned().collect();
        for (field, value) in patch {
            if !current.contains_key(&field) {
                return Err(schema_error::<T>(format!("unknown field `{}`", field)));
            }
            current.insert(field, value);
        }
        let mut next: T = serde_json::from_value(merged).map_err(|e| schema_error::<T>(e))?;
        next.reconcile(&self.fields, &patched);
        self.set(next)
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Back to the initial value, clean. The stored blob is removed, so the
    /// next load starts from the initial value too. A failed removal is
    /// returned to the caller rather than kept as the pending warning.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.fields = T::initial();
        self.dirty = false;
        self.revision += 1;
        self.warning = None;
        debug!(key = T::KEY, "Slice reset");
        self.storage.clear(T::KEY).map_err(|e| {
            warn!(key = T::KEY, error = %e, "Failed to clear persisted slice");
            e
        })
    }

    pub fn can_continue(&self) -> bool {
        self.fields.can_continue()
    }

    /// The last storage failure, if it has not been reported yet
    pub fn take_warning(&mut self) -> Option<StorageError> {
        self.warning.take()
    }

    fn commit(&mut self, fields: T) {
        self.fields = fields;
        self.dirty = true;
        self.revision += 1;
        debug!(key = T::KEY, revision = self.revision, "Slice updated");
        if let Err(e) = self.persist() {
            self.warning = Some(e);
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let result = encode(&self.fields).and_then(|blob| self.storage.set(T::KEY, &blob));
        if let Err(ref e) = result {
            warn!(key = T::KEY, error = %e, "Failed to persist slice; keeping in-memory state");
        }
        result
    }
}

impl<T: SliceState> Dirtyable for Slice<T> {
    fn key(&self) -> &'static str {
        T::KEY
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        Slice::mark_clean(self)
    }

    fn reset(&mut self) -> Result<(), StorageError> {
        Slice::reset(self)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn can_continue(&self) -> bool {
        Slice::can_continue(self)
    }

    fn take_warning(&mut self) -> Option<StorageError> {
        Slice::take_warning(self)
    }
}

impl<T: SliceState> std::fmt::Debug for Slice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slice")
            .field("key", &T::KEY)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("fields", &self.fields)
            .finish()
    }
}

fn encode<T: SliceState>(fields: &T) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        state: fields,
        updated_at: Utc::now(),
    })
    .map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode<T: SliceState>(blob: &str) -> Result<T, String> {
    let envelope: Envelope = serde_json::from_str(blob).map_err(|e| e.to_string())?;
    if envelope.version != SCHEMA_VERSION {
        return Err(format!("unsupported schema version {}", envelope.version));
    }
    let state: T = serde_json::from_value(envelope.state).map_err(|e| e.to_string())?;
    state.validate().map_err(|e| e.to_string())?;
    Ok(state)
}

fn schema_error<T: SliceState>(message: impl ToString) -> ValidationError {
    ValidationError::Schema {
        slice: T::KEY,
        message: message.to_string(),
    }
}
