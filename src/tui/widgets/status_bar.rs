//! Status bar widget: transient notices and background activity.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A message shown in the status bar until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>, now: Instant) -> Self {
        Self::new(NoticeKind::Success, message, now)
    }

    pub fn failure(message: impl Into<String>, now: Instant) -> Self {
        Self::new(NoticeKind::Failure, message, now)
    }

    fn new(kind: NoticeKind, message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now + NOTICE_TTL,
        }
    }

    /// Returns `true` once `now` has reached the expiry time.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// Name of the focused panel.
    pub panel: &'static str,
    /// Current notice, if any.
    pub notice: Option<Notice>,
    /// A submit is outstanding.
    pub saving: bool,
    /// A fetch is outstanding.
    pub loading: bool,
}

/// Renders a one-line status bar.
///
/// Layout: `[panel]  Saving…  Loading…  <notice>`, with the notice green for
/// success and red for failure.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let cyan = Style::default().fg(Color::Cyan);
    let yellow = Style::default().fg(Color::Yellow);

    let mut spans = vec![Span::styled(format!("[{}]", ctx.panel), cyan)];
    if ctx.saving {
        spans.push(Span::styled("  Saving…", yellow));
    }
    if ctx.loading {
        spans.push(Span::styled("  Loading…", yellow));
    }
    if let Some(notice) = &ctx.notice {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Failure => Color::Red,
        };
        spans.push(Span::styled(
            format!("  {}", notice.message),
            Style::default().fg(color),
        ));
    }
    spans.push(Span::styled("  F1 help", Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    fn render_status_bar(ctx: &StatusBarContext, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal
            .draw(|frame| draw_status_bar(ctx, frame, frame.area()))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn notice_expires_after_ttl() {
        let now = Instant::now();
        let notice = Notice::success("Saved", now);
        assert!(!notice.is_expired(now));
        assert!(!notice.is_expired(now + NOTICE_TTL - Duration::from_millis(1)));
        assert!(notice.is_expired(now + NOTICE_TTL));
    }

    #[test]
    fn renders_panel_and_notice() {
        let ctx = StatusBarContext {
            panel: "Field Builder",
            notice: Some(Notice::failure("Save failed", Instant::now())),
            ..StatusBarContext::default()
        };
        let output = render_status_bar(&ctx, 60);
        assert!(output.contains("[Field Builder]"));
        assert!(output.contains("Save failed"));
        assert!(!output.contains("Saving"));
    }

    #[test]
    fn renders_activity_indicators() {
        let ctx = StatusBarContext {
            panel: "End User Form",
            saving: true,
            loading: true,
            ..StatusBarContext::default()
        };
        let output = render_status_bar(&ctx, 60);
        assert!(output.contains("Saving"));
        assert!(output.contains("Loading"));
    }
}
