//! Call-result records — the fundamental unit of the ringside event store.
//!
//! A record is an immutable snapshot of one webhook notification. Records
//! are never updated or deleted; they carry no identity beyond their
//! position in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// One inbound call-progress notification from the calling vendor.
///
/// The vendor payload is structurally unvalidated ("any shape accepted"), so
/// the record separates the fields ingestion knows about — best-effort
/// contact info and the server-assigned arrival timestamp — from a free-form
/// residual map holding everything else the vendor sent. On the wire the
/// residual is flattened back into the record, so a stored record reads as
/// the original payload plus `receivedAt` (and `email`/`phone` when
/// derivable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
  /// Contact email, when the payload carried one (top-level or under
  /// `entities`).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email:       Option<String>,

  /// Contact phone number, extracted the same way as `email`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone:       Option<String>,

  /// When ingestion accepted the webhook call. Server-assigned; a
  /// caller-supplied `receivedAt` key never survives.
  #[serde(rename = "receivedAt")]
  pub received_at: DateTime<Utc>,

  /// Everything else the vendor sent, untouched.
  #[serde(flatten)]
  pub payload:     Map<String, Value>,
}

impl CallResult {
  /// Parse a raw webhook body into a record.
  ///
  /// The body must be a JSON object; any other JSON value (or unparsable
  /// bytes) is rejected. This is the only place a record is ever created.
  pub fn parse(body: &[u8], received_at: DateTime<Utc>) -> Result<Self> {
    match serde_json::from_slice::<Value>(body)? {
      Value::Object(map) => Ok(Self::from_payload(map, received_at)),
      _ => Err(Error::NotAnObject),
    }
  }

  /// Build a record from a parsed webhook payload.
  ///
  /// Contact extraction is best-effort: for `email` and `phone`
  /// independently, a non-empty top-level string wins, then the same key
  /// under a nested `entities` object. The extracted value overrides an
  /// identically named payload field: the consumed source key — and, when
  /// `entities` supplied the value, any losing top-level entry — is removed
  /// from the residual so each key appears once on the wire. An `entities`
  /// object drained empty by extraction is dropped entirely.
  pub fn from_payload(
    mut payload: Map<String, Value>,
    received_at: DateTime<Utc>,
  ) -> Self {
    let email = extract_contact(&mut payload, "email");
    let phone = extract_contact(&mut payload, "phone");
    // The timestamp is server-assigned and wins over the payload's.
    payload.remove("receivedAt");
    Self {
      email,
      phone,
      received_at,
      payload,
    }
  }

  /// Whether the record carries usable contact info.
  pub fn has_contact(&self) -> bool {
    self.email.as_deref().is_some_and(|s| !s.is_empty())
      || self.phone.as_deref().is_some_and(|s| !s.is_empty())
  }

  /// String value of a residual payload field, if present.
  pub fn payload_str(&self, key: &str) -> Option<&str> {
    self.payload.get(key).and_then(Value::as_str)
  }
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Pull `key` out of the payload: top-level first, then `entities.key`.
fn extract_contact(payload: &mut Map<String, Value>, key: &str) -> Option<String> {
  if let Some(v) = non_empty_str(payload.get(key)) {
    let v = v.to_string();
    payload.remove(key);
    return Some(v);
  }

  if let Some(Value::Object(entities)) = payload.get_mut("entities")
    && let Some(v) = non_empty_str(entities.get(key))
  {
    let v = v.to_string();
    entities.remove(key);
    let drained = entities.is_empty();
    if drained {
      payload.remove("entities");
    }
    // The extracted value overrides an identically named payload field, so
    // an empty or non-string top-level entry that lost is discarded too —
    // the flattened wire form must carry each key once.
    payload.remove(key);
    return Some(v);
  }

  None
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
  match value {
    Some(Value::String(s)) if !s.is_empty() => Some(s),
    _ => None,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
