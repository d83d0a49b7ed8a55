//! Dashboard renderer with a fixed line layout.
//!
//! ```text
//! 0        Server IP: … | Total Bandwidth: …   (reverse video)
//! 1        ──────────────────────────────────
//! 2        IP Address |Port |Location |Bandwidth (TX/RX)
//! 3        ──────────────────────────────────
//! 4 + 2i   row i
//! 5 + 2i   ──────────────────────────────────
//! h - 2    ──────────────────────────────────
//! h - 1    key hints                            (reverse video)
//! ```
//!
//! Rows that would reach the bottom rule are not drawn; there is no
//! scrolling.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::line;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use netwatch_core::Snapshot;

use crate::app::DashboardState;
use crate::theme;
use crate::widgets::rate_fmt;

pub const FOOTER_TEXT: &str = "Press 'q' to quit, use arrow keys to scroll.";

const FIRST_ROW_LINE: usize = 4;
const LINES_PER_ROW: usize = 2;

/// One table line with the fixed column widths.
pub fn format_row(address: &str, port: &str, location: &str, bandwidth: &str) -> String {
    format!("{address:<18}|{port:<7}|{location:<27}|{bandwidth:<20}")
}

/// Display line of connection row `index`, if it fits in a `u16`.
pub fn row_line(index: usize) -> Option<u16> {
    index
        .checked_mul(LINES_PER_ROW)
        .and_then(|offset| offset.checked_add(FIRST_ROW_LINE))
        .and_then(|line| u16::try_from(line).ok())
}

/// Render one full dashboard frame. Reads `state` and `snapshot` only.
pub fn render(frame: &mut Frame, state: &DashboardState, snapshot: &Snapshot) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let header = format!(
        "Server IP: {} | Total Bandwidth: {}",
        snapshot.public_address,
        rate_fmt::format_measurement(snapshot.total.as_ref())
    );
    draw_text(frame, area, 0, header, theme::bar());
    draw_rule(frame, area, 1);
    draw_text(
        frame,
        area,
        2,
        format_row("IP Address", "Port", "Location", "Bandwidth (TX/RX)"),
        theme::column_titles(),
    );
    draw_rule(frame, area, 3);

    let bottom_rule = area.height.saturating_sub(2);
    for (idx, conn) in snapshot.connections.iter().enumerate() {
        let Some(line_y) = row_line(idx) else {
            break;
        };
        if line_y >= bottom_rule {
            break;
        }

        let style = if idx == state.selected_row {
            theme::row_selected()
        } else {
            theme::row()
        };
        let text = format_row(
            &conn.connection.peer_address,
            &conn.connection.peer_port,
            &conn.location,
            &rate_fmt::format_measurement(conn.share.as_ref()),
        );
        draw_text(frame, area, line_y, text, style);
        if line_y + 1 < bottom_rule {
            draw_rule(frame, area, line_y + 1);
        }
    }

    draw_rule(frame, area, bottom_rule);
    draw_text(
        frame,
        area,
        area.height - 1,
        FOOTER_TEXT.to_owned(),
        theme::bar(),
    );
}

fn line_rect(area: Rect, y: u16) -> Option<Rect> {
    (y < area.height).then(|| Rect::new(area.x, area.y + y, area.width, 1))
}

fn draw_text(frame: &mut Frame, area: Rect, y: u16, text: String, style: Style) {
    if let Some(rect) = line_rect(area, y) {
        frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), rect);
    }
}

fn draw_rule(frame: &mut Frame, area: Rect, y: u16) {
    if let Some(rect) = line_rect(area, y) {
        let rule = line::HORIZONTAL.repeat(usize::from(area.width));
        frame.render_widget(Paragraph::new(Span::styled(rule, theme::rule())), rect);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::style::Modifier;

    use netwatch_core::{Connection, EnrichedConnection, RateMeasurement};

    use super::*;

    fn snapshot(rows: usize) -> Snapshot {
        let total = RateMeasurement::new(600.0, 300.0);
        let share = total.split(rows);
        Snapshot {
            public_address: "203.0.113.7".into(),
            total: Some(total),
            connections: (0..rows)
                .map(|i| EnrichedConnection {
                    connection: Connection::new(format!("93.1.2.{i}"), "443"),
                    location: "Paris, France".into(),
                    share,
                })
                .collect(),
        }
    }

    fn draw(width: u16, height: u16, state: &DashboardState, snapshot: &Snapshot) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, state, snapshot)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text_at(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    fn is_rule(buf: &Buffer, y: u16) -> bool {
        (0..buf.area.width).all(|x| buf[(x, y)].symbol() == line::HORIZONTAL)
    }

    #[test]
    fn format_row_pads_fixed_columns() {
        let row = format_row("93.1.2.3", "443", "Paris, France", "TX: 1 Kbps, RX: 2 Kbps");
        assert_eq!(
            row,
            "93.1.2.3          |443    |Paris, France              |TX: 1 Kbps, RX: 2 Kbps"
        );
    }

    #[test]
    fn lays_out_header_titles_rows_and_footer() {
        let snap = snapshot(3);
        let buf = draw(90, 24, &DashboardState::default(), &snap);

        assert_eq!(
            text_at(&buf, 0),
            "Server IP: 203.0.113.7 | Total Bandwidth: TX: 600 Kbps, RX: 300 Kbps"
        );
        assert!(is_rule(&buf, 1));
        assert_eq!(
            text_at(&buf, 2),
            format_row("IP Address", "Port", "Location", "Bandwidth (TX/RX)").trim_end()
        );
        assert!(is_rule(&buf, 3));

        for i in 0..3u16 {
            let expected = format_row(
                &format!("93.1.2.{i}"),
                "443",
                "Paris, France",
                "TX: 200 Kbps, RX: 100 Kbps",
            );
            assert_eq!(text_at(&buf, 4 + 2 * i), expected.trim_end());
            assert!(is_rule(&buf, 5 + 2 * i));
        }

        assert!(is_rule(&buf, 22));
        assert_eq!(text_at(&buf, 23), FOOTER_TEXT);
    }

    #[test]
    fn header_and_footer_are_reverse_video() {
        let buf = draw(90, 12, &DashboardState::default(), &snapshot(1));
        assert!(buf[(0, 0)].modifier.contains(Modifier::REVERSED));
        assert!(buf[(0, 11)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(0, 2)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn unavailable_bandwidth_shows_placeholder() {
        let mut snap = snapshot(1);
        snap.total = None;
        snap.connections[0].share = None;
        let buf = draw(90, 10, &DashboardState::default(), &snap);

        assert!(text_at(&buf, 0).ends_with("Total Bandwidth: N/A"));
        assert!(text_at(&buf, 4).ends_with("|N/A"));
    }

    #[test]
    fn rows_past_the_bottom_rule_are_not_drawn() {
        // Height 10: bottom rule at 8, so only rows at lines 4 and 6 fit.
        let snap = snapshot(5);
        let buf = draw(90, 10, &DashboardState::default(), &snap);

        assert!(text_at(&buf, 4).starts_with("93.1.2.0"));
        assert!(text_at(&buf, 6).starts_with("93.1.2.1"));
        assert!(is_rule(&buf, 8));
        assert_eq!(text_at(&buf, 9), FOOTER_TEXT);
        let all: String = (0..10).map(|y| text_at(&buf, y)).collect();
        assert!(!all.contains("93.1.2.2"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let snap = snapshot(4);
        for height in 1..6 {
            let _ = draw(20, height, &DashboardState::default(), &snap);
        }
    }

    #[test]
    fn selected_row_is_highlighted() {
        let state = DashboardState {
            selected_row: 1,
            ..DashboardState::default()
        };
        let buf = draw(90, 24, &state, &snapshot(3));
        assert_eq!(buf[(0, 6)].style().bg, theme::row_selected().bg);
        assert_ne!(buf[(0, 4)].style().bg, theme::row_selected().bg);
    }

    #[test]
    fn rendering_is_idempotent() {
        let state = DashboardState::default();
        let snap = snapshot(3);
        let before = snap.clone();

        let first = draw(90, 24, &state, &snap);
        let second = draw(90, 24, &state, &snap);

        assert_eq!(first, second);
        assert_eq!(snap, before);
    }

    #[test]
    fn row_line_follows_fixed_spacing() {
        assert_eq!(row_line(0), Some(4));
        assert_eq!(row_line(3), Some(10));
        assert_eq!(row_line(usize::MAX), None);
    }
}
