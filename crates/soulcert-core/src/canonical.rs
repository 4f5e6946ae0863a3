//! # Canonical Serialization — JCS Byte Production
//!
//! Defines [`CanonicalBytes`], the sole construction path for bytes used
//! in digest computation across the whole stack.
//!
//! ## Integrity Invariant
//!
//! The digest stored at issuance and the digest recomputed at
//! verification must be produced from byte-for-byte identical
//! serializations, or honest certificates read as tampered. The
//! `CanonicalBytes` newtype has a private inner field: the only ways to
//! construct it are [`CanonicalBytes::new()`], which applies float
//! rejection and then RFC 8785 (JSON Canonicalization Scheme)
//! serialization, and [`CanonicalBytes::from_raw()`], which wraps raw
//! file bytes verbatim. Any function that computes a digest must accept
//! `&CanonicalBytes`, so a second, divergent serialization path cannot
//! exist.
//!
//! ## Rules
//!
//! 1. **Reject floats** — certificate fields are strings or integers.
//!    Floats have non-deterministic JSON number serialization edge cases.
//! 2. **Sorted keys, compact separators** — `serde_jcs` produces RFC
//!    8785 compliant output, so the key order of the presented JSON
//!    object never influences the digest.
//! 3. **Raw bytes pass through untouched** — a file is its own
//!    canonical form; hashing covers exactly the bytes the issuer saw.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization or verbatim from
/// a file's contents.
///
/// # Invariants
///
/// - For structured values: keys sorted lexicographically, compact
///   separators, UTF-8, no floats (RFC 8785).
/// - For raw bytes: the input bytes, unchanged.
///
/// The inner `Vec<u8>` is private; downstream code cannot construct
/// `CanonicalBytes` except through the two constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY serialization routine used for structured
    /// certificate content — at issuance and at verification alike.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value
    /// contains a float, or [`CanonicalizationError::SerializationFailed`]
    /// if the value cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Wrap raw file bytes without transformation.
    ///
    /// File-based certificates are hashed over the exact bytes the
    /// issuer received; there is no structural canonicalization to do.
    pub fn from_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively reject float values anywhere in a JSON value tree.
///
/// Integers (representable as i64/u64) pass; every other number is a
/// float and is rejected before serialization.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for JSON-compatible values without floats.
    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,10}", inner, 0..8).prop_map(|m| {
                    Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        /// Canonicalization never fails for float-free values.
        #[test]
        fn never_fails_without_floats(value in json_value_no_floats()) {
            prop_assert!(CanonicalBytes::new(&value).is_ok());
        }

        /// Same input, same bytes — determinism.
        #[test]
        fn deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Canonical output is valid JSON that reparses to the input.
        #[test]
        fn round_trips_through_json(value in json_value_no_floats()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        /// Object keys appear sorted in the canonical output.
        #[test]
        fn keys_sorted(keys in prop::collection::btree_set("[a-z]{1,8}", 2..6)) {
            let map: serde_json::Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            let parsed: serde_json::Map<String, Value> =
                serde_json::from_slice(cb.as_bytes()).unwrap();
            let output_keys: Vec<&String> = parsed.keys().collect();
            let mut sorted = output_keys.clone();
            sorted.sort();
            prop_assert_eq!(output_keys, sorted);
        }

        /// Non-integer floats are always rejected.
        #[test]
        fn floats_always_rejected(f in any::<f64>().prop_filter("non-integer", |f| {
            f.fract() != 0.0 && f.is_finite()
        })) {
            let data = serde_json::json!({"val": f});
            prop_assert!(CanonicalBytes::new(&data).is_err());
        }
    }
}
