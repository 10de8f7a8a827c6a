//! Ratatui frontend for the triage diagnostics panel.
//!
//! [`draw`] renders one frame from an [`App`]: the diagnostics tree in a
//! bordered panel, then a one-line footer with feed status and key hints.
//! All state lives in the engine; this crate only projects it to styled
//! lines and maps terminal input back onto [`App`] methods.

mod input;
mod theme;

pub use input::{InputPump, apply_key, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, severity_color, spinner_frame, styles};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use triage_engine::{
    App, DisplayLine, FeedStatus, RowRef, SpanClass, project_group, project_leaf,
};
use triage_types::truncate_with_ellipsis;

/// Renders a complete frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = theme::palette(app.ui_options());
    let glyphs = theme::glyphs(app.ui_options());

    let bg = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg, frame.area());

    let [tree_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_tree(frame, app, tree_area, &palette, glyphs);
    draw_footer(frame, app, footer_area, &palette, glyphs);
}

fn draw_tree(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.text_muted))
        .title(" Diagnostics ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let session = app.session();
    let rows = session.visible_rows();
    if rows.is_empty() {
        let placeholder = Line::from(Span::styled(
            "no diagnostics",
            Style::default().fg(palette.text_muted),
        ));
        frame.render_widget(Paragraph::new(placeholder), inner);
        return;
    }

    let height = inner.height as usize;
    let width = inner.width as usize;
    let selected = session.selected();
    let offset = scroll_offset(selected, rows.len(), height);

    let tree = session.tree();
    let mut lines = Vec::with_capacity(height.min(rows.len()));
    for (row_index, row) in rows.iter().enumerate().skip(offset).take(height) {
        let projected = match *row {
            RowRef::Group { group } => {
                let node = &tree.groups()[group];
                let toggle = if node.is_expanded() {
                    glyphs.expanded
                } else {
                    glyphs.collapsed
                };
                project_group(node, toggle)
            }
            RowRef::Leaf { group, child } => {
                project_leaf(&tree.groups()[group].children()[child])
            }
        };
        lines.push(render_row(&projected, row_index == selected, width, palette));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// First visible row index such that the selection stays on screen while
/// scrolling as little as possible.
fn scroll_offset(selected: usize, row_count: usize, height: usize) -> usize {
    if height == 0 || row_count <= height {
        return 0;
    }
    selected
        .saturating_sub(height - 1)
        .min(row_count - height)
}

/// Converts a projected row into a styled line, truncating the message
/// column when the row overflows and painting the selection background.
fn render_row(line: &DisplayLine, selected: bool, width: usize, palette: &Palette) -> Line<'static> {
    let indent = "  ".repeat(line.depth());

    // Everything except the message keeps its full width; the message
    // column absorbs the overflow.
    let fixed_width: usize = indent.width()
        + line
            .spans()
            .iter()
            .filter(|span| span.class() != SpanClass::Message)
            .map(|span| span.text().width())
            .sum::<usize>();
    let message_budget = width.saturating_sub(fixed_width);

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(line.spans().len() + 2);
    spans.push(Span::raw(indent));
    for span in line.spans() {
        let style = match span.class() {
            SpanClass::Toggle => Style::default().fg(palette.primary),
            SpanClass::GroupPath => Style::default()
                .fg(palette.group)
                .add_modifier(Modifier::BOLD),
            SpanClass::Sign(sign) => Style::default().fg(severity_color(sign, palette)),
            SpanClass::Message => Style::default().fg(palette.text_primary),
            SpanClass::Position => Style::default().fg(palette.text_muted),
        };
        let text = if span.class() == SpanClass::Message && span.text().width() > message_budget {
            truncate_with_ellipsis(span.text(), message_budget)
        } else {
            span.text().to_string()
        };
        spans.push(Span::styled(text, style));
    }

    if selected {
        let used: usize = spans.iter().map(|span| span.content.width()).sum();
        let filler = width.saturating_sub(used);
        if filler > 0 {
            spans.push(Span::raw(" ".repeat(filler)));
        }
        return Line::from(spans).style(
            Style::default()
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD),
        );
    }
    Line::from(spans)
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let session = app.session();
    let width = area.width as usize;

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    if app.is_syncing() {
        let frame_glyph = spinner_frame(app.tick_count(), app.ui_options());
        spans.push(Span::styled(
            format!("{frame_glyph} "),
            Style::default().fg(palette.primary),
        ));
    }

    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            truncate_with_ellipsis(message, width.saturating_sub(4)),
            Style::default().fg(palette.text_secondary),
        ));
    } else if let FeedStatus::Failed(reason) = session.feed_status() {
        spans.push(Span::styled(
            format!("{} ", glyphs.status_fail),
            Style::default().fg(palette.error),
        ));
        spans.push(Span::styled(
            truncate_with_ellipsis(reason, width.saturating_sub(24)),
            Style::default().fg(palette.error),
        ));
        spans.push(Span::styled(
            " (stale)",
            Style::default().fg(palette.text_muted),
        ));
    } else if session.tree().is_empty() {
        spans.push(Span::styled(
            format!("{} clean", glyphs.status_ok),
            Style::default().fg(palette.green),
        ));
    } else {
        let tree = session.tree();
        let tally_color = if tree.error_count() > 0 {
            palette.error
        } else if tree.warning_count() > 0 {
            palette.warning
        } else {
            palette.text_muted
        };
        spans.push(Span::styled(
            tree.status_string(),
            Style::default().fg(tally_color),
        ));
        if tree.info_count() > 0 || tree.hint_count() > 0 {
            spans.push(Span::styled(
                format!(" I:{} H:{}", tree.info_count(), tree.hint_count()),
                Style::default().fg(palette.text_muted),
            ));
        }
        if session.rejected_count() > 0 {
            spans.push(Span::styled(
                format!(" │ {} rejected", session.rejected_count()),
                Style::default().fg(palette.warning),
            ));
        }
    }

    let hints = [
        ("j/k", " move  "),
        ("enter", " toggle  "),
        ("r", " rescan  "),
        ("q", " quit "),
    ];
    let hints_width: usize = hints
        .iter()
        .map(|(key, label)| key.width() + label.width())
        .sum();
    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    if width > used + hints_width + 1 {
        spans.push(Span::raw(" ".repeat(width - used - hints_width)));
        for (key, label) in hints {
            spans.push(Span::styled(key, styles::key_highlight(palette)));
            spans.push(Span::styled(label, styles::key_hint(palette)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
