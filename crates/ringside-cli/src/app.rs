//! Poller state machine and presentation policy.
//!
//! The timers themselves live in the event loop (`main.rs`); everything
//! here is synchronous state, so the polling contract is testable without a
//! server.

use std::{sync::Arc, time::Duration};

use ringside_core::CallResult;

use crate::client::{ApiClient, BookingRequest};

// ─── Polling contract ─────────────────────────────────────────────────────────

/// Fixed interval between status queries while monitoring.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Fixed interval between agent phrase advances before results exist.
pub const PHASE_INTERVAL: Duration = Duration::from_millis(1200);

/// How many records the general status list shows, newest first.
pub const RECENT_LIMIT: usize = 5;

/// Consecutive failed ticks before the session is shown as degraded.
pub const DEGRADED_AFTER: u32 = 3;

/// Predetermined progress phrases shown until the first results arrive.
/// Advances one per phase tick and holds at the last.
pub const AGENT_PHASES: [&str; 6] = [
  "Analyzing your info...",
  "Finding venues in your area...",
  "Calling the first venue...",
  "Waiting for response...",
  "Booking in progress...",
  "Done! Check your dashboard soon.",
];

/// Monitoring state of the display session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monitor {
  /// No polling; the agent panel shows a placeholder.
  Idle,
  /// The interval timer is active.
  Polling,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current monitoring state.
  pub monitor: Monitor,

  /// Latest snapshot from the status endpoint. Replaced wholesale on every
  /// successful tick, never merged.
  pub results: Vec<CallResult>,

  /// Index into [`AGENT_PHASES`].
  pub phase: usize,

  /// Failed ticks since the last success.
  pub consecutive_failures: u32,

  /// Outcome message of the last booking submission.
  pub message: Option<String>,

  /// Booking details sent by the make-call action.
  pub booking: BookingRequest,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, booking: BookingRequest) -> Self {
    Self {
      monitor: Monitor::Idle,
      results: Vec::new(),
      phase: 0,
      consecutive_failures: 0,
      message: None,
      booking,
      client: Arc::new(client),
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// `Idle → Polling`. The caller issues the first query immediately after.
  pub fn start_monitoring(&mut self) {
    self.monitor = Monitor::Polling;
    self.phase = 0;
    self.consecutive_failures = 0;
  }

  /// `Polling → Idle`. Cancels the timers; an in-flight query is not
  /// cancelled — a late result is applied and then nothing further is
  /// scheduled.
  pub fn stop_monitoring(&mut self) {
    self.monitor = Monitor::Idle;
  }

  pub fn is_polling(&self) -> bool {
    self.monitor == Monitor::Polling
  }

  // ── Ticks ─────────────────────────────────────────────────────────────────

  /// Submit the booking and enter `Polling`. Monitoring starts on the
  /// submission itself, not on its success — call progress is reported via
  /// webhooks either way.
  pub async fn submit_booking(&mut self) {
    self.start_monitoring();
    let client = self.client.clone();
    match client.submit_booking(&self.booking).await {
      Ok(message) => self.message = Some(message),
      Err(e) => self.message = Some(format!("Error: {e}")),
    }
  }

  /// One poll tick: query the status endpoint and reconcile.
  pub async fn poll_tick(&mut self) {
    let outcome = self.client.get_status().await;
    self.apply_poll(outcome);
  }

  /// Reconcile one tick's outcome. A success replaces the view entirely; a
  /// failure keeps the previous view, counts toward the degraded
  /// indicator, and never stops polling.
  pub fn apply_poll(&mut self, outcome: anyhow::Result<Vec<CallResult>>) {
    match outcome {
      Ok(results) => {
        self.results = results;
        self.consecutive_failures = 0;
      }
      Err(e) => {
        self.consecutive_failures += 1;
        tracing::debug!(
          error = %e,
          failures = self.consecutive_failures,
          "status poll failed"
        );
      }
    }
  }

  /// Advance the agent phrase strip one step; holds at the last phrase.
  pub fn advance_phase(&mut self) {
    if self.phase + 1 < AGENT_PHASES.len() {
      self.phase += 1;
    }
  }

  // ── Presentation ──────────────────────────────────────────────────────────

  /// Whether enough ticks have failed in a row to call the session
  /// degraded.
  pub fn is_degraded(&self) -> bool {
    self.consecutive_failures >= DEGRADED_AFTER
  }

  /// Whether the phrase strip (rather than results) should be shown.
  pub fn showing_phases(&self) -> bool {
    self.is_polling() && self.results.is_empty()
  }

  /// The most recent [`RECENT_LIMIT`] records, newest first.
  pub fn recent(&self) -> Vec<&CallResult> {
    self.results.iter().rev().take(RECENT_LIMIT).collect()
  }

  /// The first record in arrival order with usable contact info,
  /// independent of the recent list.
  pub fn collected_contact(&self) -> Option<&CallResult> {
    self.results.iter().find(|r| r.has_contact())
  }
}

/// Display name for a record's venue: `venue`, then `to`, then a fallback.
pub fn venue_label(record: &CallResult) -> &str {
  record
    .payload_str("venue")
    .or_else(|| record.payload_str("to"))
    .unwrap_or("Unknown Venue")
}

/// Display label for a record's call status: `status`, then `state`.
pub fn status_label(record: &CallResult) -> &str {
  record
    .payload_str("status")
    .or_else(|| record.payload_str("state"))
    .unwrap_or("N/A")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use chrono::Utc;
  use ringside_core::CallResult;
  use serde_json::{Value, json};

  use super::{
    AGENT_PHASES, App, DEGRADED_AFTER, Monitor, RECENT_LIMIT, status_label,
    venue_label,
  };
  use crate::client::{ApiClient, ApiConfig, BookingRequest};

  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:5233".to_string(),
    })
    .unwrap();
    App::new(client, BookingRequest::default())
  }

  fn record(value: Value) -> CallResult {
    match value {
      Value::Object(map) => CallResult::from_payload(map, Utc::now()),
      _ => unreachable!(),
    }
  }

  #[test]
  fn starts_idle() {
    let app = app();
    assert_eq!(app.monitor, Monitor::Idle);
    assert!(!app.showing_phases());
  }

  #[test]
  fn start_and_stop_transitions() {
    let mut app = app();
    app.start_monitoring();
    assert!(app.is_polling());
    assert!(app.showing_phases());

    app.stop_monitoring();
    assert!(!app.is_polling());
  }

  #[test]
  fn successful_poll_replaces_the_view() {
    let mut app = app();
    app.start_monitoring();

    app.apply_poll(Ok(vec![record(json!({ "call_id": "a" }))]));
    assert_eq!(app.results.len(), 1);

    // Full replace, not a merge.
    app.apply_poll(Ok(vec![
      record(json!({ "call_id": "b" })),
      record(json!({ "call_id": "c" })),
    ]));
    let ids: Vec<_> = app
      .results
      .iter()
      .map(|r| r.payload_str("call_id").unwrap())
      .collect();
    assert_eq!(ids, ["b", "c"]);
  }

  #[test]
  fn failed_poll_keeps_the_previous_view() {
    let mut app = app();
    app.start_monitoring();
    app.apply_poll(Ok(vec![record(json!({ "call_id": "a" }))]));

    app.apply_poll(Err(anyhow!("connection refused")));
    assert_eq!(app.results.len(), 1);
    assert!(app.is_polling());
  }

  #[test]
  fn degraded_after_consecutive_failures_and_cleared_on_success() {
    let mut app = app();
    app.start_monitoring();

    for _ in 0..DEGRADED_AFTER - 1 {
      app.apply_poll(Err(anyhow!("boom")));
    }
    assert!(!app.is_degraded());

    app.apply_poll(Err(anyhow!("boom")));
    assert!(app.is_degraded());
    assert!(app.is_polling(), "degraded never stops polling");

    app.apply_poll(Ok(vec![]));
    assert!(!app.is_degraded());
    assert_eq!(app.consecutive_failures, 0);
  }

  #[test]
  fn phase_advances_and_holds_at_the_last_phrase() {
    let mut app = app();
    app.start_monitoring();

    for _ in 0..AGENT_PHASES.len() * 2 {
      app.advance_phase();
    }
    assert_eq!(app.phase, AGENT_PHASES.len() - 1);
  }

  #[test]
  fn phases_yield_to_results() {
    let mut app = app();
    app.start_monitoring();
    assert!(app.showing_phases());

    app.apply_poll(Ok(vec![record(json!({ "call_id": "a" }))]));
    assert!(!app.showing_phases());
  }

  #[test]
  fn recent_is_newest_first_and_bounded() {
    let mut app = app();
    let snapshot: Vec<_> = (0..8)
      .map(|i| record(json!({ "call_id": format!("c{i}") })))
      .collect();
    app.apply_poll(Ok(snapshot));

    let ids: Vec<_> = app
      .recent()
      .iter()
      .map(|r| r.payload_str("call_id").unwrap())
      .collect();
    assert_eq!(ids.len(), RECENT_LIMIT);
    assert_eq!(ids, ["c7", "c6", "c5", "c4", "c3"]);
  }

  #[test]
  fn collected_contact_is_first_in_arrival_order() {
    let mut app = app();
    app.apply_poll(Ok(vec![
      record(json!({ "call_id": "a" })),
      record(json!({ "call_id": "b", "entities": { "phone": "+15550001111" } })),
      record(json!({ "call_id": "c", "email": "late@example.com" })),
    ]));

    let contact = app.collected_contact().unwrap();
    assert_eq!(contact.payload_str("call_id"), Some("b"));
  }

  #[test]
  fn display_labels_fall_back() {
    let r = record(json!({ "venue": "Blue Note", "status": "completed" }));
    assert_eq!(venue_label(&r), "Blue Note");
    assert_eq!(status_label(&r), "completed");

    let r = record(json!({ "to": "+15550001111", "state": "ringing" }));
    assert_eq!(venue_label(&r), "+15550001111");
    assert_eq!(status_label(&r), "ringing");

    let r = record(json!({}));
    assert_eq!(venue_label(&r), "Unknown Venue");
    assert_eq!(status_label(&r), "N/A");
  }
}
