//! TUI rendering — orchestrates all panes.

pub mod agent_panel;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, POLL_INTERVAL};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, agent panel, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // agent panel
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  agent_panel::draw(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " ringside  [b] make call  [m] stop/resume  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let mut spans = Vec::new();

  if let Some(message) = &app.message {
    let style = if message.starts_with("Error") {
      Style::default().fg(Color::Red)
    } else {
      Style::default().fg(Color::Green)
    };
    spans.push(Span::styled(format!(" {message}"), style));
  }

  if app.is_polling() {
    let poll_note = if app.is_degraded() {
      Span::styled(
        format!(
          "  polling degraded ({} failed attempts)",
          app.consecutive_failures
        ),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
      )
    } else {
      Span::styled(
        format!("  polling every {}s", POLL_INTERVAL.as_secs()),
        Style::default().fg(Color::DarkGray),
      )
    };
    spans.push(poll_note);
  }

  f.render_widget(Paragraph::new(Line::from(spans)), area);
}
