//! The agent status panel: phrase strip, recent results, contact callout.

use chrono::Local;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{AGENT_PHASES, App, status_label, venue_label};

/// Draw the agent panel for the current monitoring state.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Booking Agent ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = if !app.is_polling() && app.results.is_empty() {
    placeholder_lines()
  } else if app.showing_phases() {
    phase_lines(app)
  } else {
    result_lines(app)
  };

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn placeholder_lines() -> Vec<Line<'static>> {
  vec![Line::from(Span::styled(
    "Agent status will appear here after you make a call.",
    Style::default().fg(Color::DarkGray),
  ))]
}

/// The fixed phrase strip, one phrase per elapsed phase tick, current bold.
fn phase_lines(app: &App) -> Vec<Line<'static>> {
  AGENT_PHASES
    .iter()
    .take(app.phase + 1)
    .enumerate()
    .map(|(i, phrase)| {
      let style = if i == app.phase {
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Line::from(Span::styled(*phrase, style))
    })
    .collect()
}

/// Collected contact callout plus the recent list, newest first.
fn result_lines(app: &App) -> Vec<Line<'static>> {
  let mut lines = Vec::new();

  if let Some(contact) = app.collected_contact() {
    let mut spans = vec![Span::styled(
      "Collected contact: ",
      Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD),
    )];
    if let Some(email) = contact.email.as_deref().filter(|s| !s.is_empty()) {
      spans.push(Span::raw(email.to_string()));
    }
    if let Some(phone) = contact.phone.as_deref().filter(|s| !s.is_empty()) {
      if spans.len() > 1 {
        spans.push(Span::raw("  "));
      }
      spans.push(Span::raw(phone.to_string()));
    }
    lines.push(Line::from(spans));
    lines.push(Line::default());
  }

  for record in app.recent() {
    lines.push(Line::from(Span::styled(
      venue_label(record).to_string(),
      Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::raw(format!(
      "  Status: {}",
      status_label(record)
    ))));
    if let Some(message) = record.payload_str("message") {
      lines.push(Line::from(Span::styled(
        format!("  {message}"),
        Style::default().fg(Color::Gray),
      )));
    }
    let received = record
      .received_at
      .with_timezone(&Local)
      .format("%H:%M:%S")
      .to_string();
    lines.push(Line::from(Span::styled(
      format!("  {received}"),
      Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());
  }

  lines
}
