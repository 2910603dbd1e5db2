use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use time::OffsetDateTime;

use super::*;
use crate::timefmt::fmt_ts;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_search(frame, app, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Percentage(40),
            Constraint::Min(0),
        ])
        .split(chunks[2]);
    draw_tags(frame, app, body[0]);
    draw_packages(frame, app, body[1]);
    draw_details(frame, app, body[2]);

    draw_footer(frame, app, chunks[3]);

    if let Some(modal) = &app.modal {
        dim_frame(frame);
        draw_doc_modal(frame, modal);
        return;
    }

    if app.focus == Focus::Search {
        let x = chunks[1].x + 1 + app.search.cursor as u16;
        frame.set_cursor_position((x, chunks[1].y + 1));
    }
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("Gallery", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::raw(app.source_label()),
    ];
    if app.loads_in_flight > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("loading...", Style::default().fg(Color::Yellow)));
    }
    if app.snapshot.failed_folders > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} unavailable", app.snapshot.failed_folders),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_search(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let text = if app.search.buf.is_empty() && app.focus != Focus::Search {
        Span::styled(
            "Search by name",
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )
    } else {
        Span::raw(app.search.buf.as_str())
    };
    frame.render_widget(
        Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app, Focus::Search))
                .title("Search"),
        ),
        area,
    );
}

fn draw_tags(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .all_tags
        .iter()
        .map(|(tag, n)| {
            let on = app.query.tags.contains(tag);
            let mark = if on { "[x]" } else { "[ ]" };
            let style = if on {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}", mark, tag), style),
                Span::styled(format!(" ({})", n), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !app.all_tags.is_empty() && app.focus == Focus::Tags {
        state.select(Some(app.tag_cursor));
    }

    let policy = match app.query.policy {
        TagPolicy::Any => "any",
        TagPolicy::All => "all",
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app, Focus::Tags))
                .title(format!("Tags ({})", policy)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_packages(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .visible_records()
        .map(|r| {
            let mut spans = vec![Span::raw(r.title.clone())];
            if r.is_placeholder() {
                spans.push(Span::styled(" (unavailable)", Style::default().fg(Color::Red)));
            } else if !r.tags.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", r.tags.join(", ")),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected));
    }

    let title = format!(
        "Packages {}/{}",
        app.visible.len(),
        app.snapshot.records.len()
    );
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app, Focus::Packages))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let lines = match app.selected_record() {
        Some(r) => detail_lines(r, OffsetDateTime::now_utc()),
        None if app.loads_in_flight > 0 => vec![Line::from("Loading packages...")],
        None => vec![Line::from("No package selected")],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Details")),
        area,
    );
}

fn detail_lines(r: &PackageRecord, now: OffsetDateTime) -> Vec<Line<'static>> {
    let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::Gray));
    let missing = Style::default().fg(Color::Gray).add_modifier(Modifier::DIM);

    let mut lines = vec![
        Line::from(Span::styled(
            r.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![label("folder  "), Span::raw(r.raw_name.clone())]),
    ];
    if !r.tags.is_empty() {
        lines.push(Line::from(vec![label("tags    "), Span::raw(r.tags.join(", "))]));
    }
    if let Some(err) = &r.fetch_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("unavailable: {}", err),
            Style::default().fg(Color::Red),
        )));
        return lines;
    }

    lines.push(Line::from(""));
    lines.push(match &r.preview_ref {
        Some(url) => Line::from(vec![label("preview "), Span::raw(url.clone())]),
        None => Line::from(Span::styled("No preview available", missing)),
    });
    lines.push(match &r.readme_ref {
        Some(_) => Line::from(vec![label("readme  "), Span::raw("Enter to read")]),
        None => Line::from(Span::styled("No documentation", missing)),
    });
    lines.push(match &r.config_ref {
        Some(_) => Line::from(vec![label("config  "), Span::raw("d to download")]),
        None => Line::from(Span::styled("No configuration file", missing)),
    });

    if r.created_at.is_some() || r.updated_at.is_some() {
        lines.push(Line::from(""));
    }
    if let Some(ts) = &r.created_at {
        lines.push(Line::from(vec![label("created "), Span::raw(fmt_ts(ts, now))]));
    }
    if let Some(ts) = &r.updated_at {
        lines.push(Line::from(vec![label("updated "), Span::raw(fmt_ts(ts, now))]));
    }
    lines
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(s) => {
            let color = if s.error { Color::Red } else { Color::Green };
            Line::from(Span::styled(s.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            key_hints(app.focus),
            Style::default().fg(Color::Gray),
        )),
    };
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn key_hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Search => "type to filter  up/down select  enter readme  tab focus  esc clear",
        Focus::Packages => "j/k move  enter readme  d download  r refresh  / search  q quit",
        Focus::Tags => "space toggle  a any/all  c clear  tab focus  q quit",
    }
}

fn draw_doc_modal(frame: &mut ratatui::Frame, modal: &DocModal) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 100);
    let h = area.height.saturating_sub(4).clamp(8, 40);
    let box_area = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };
    frame.render_widget(Clear, box_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{}  (esc to close)", modal.title));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let lines: Vec<Line> = match &modal.state {
        DocState::Loading => vec![Line::from("Loading documentation...")],
        DocState::Failed(err) => vec![Line::from(Span::styled(
            format!("Could not load documentation: {}", err),
            Style::default().fg(Color::Red),
        ))],
        DocState::Ready(doc) => crate::docs::render_lines(doc, inner.width as usize)
            .into_iter()
            .map(Line::from)
            .collect(),
    };
    let scroll = modal.scroll.min(lines.len().saturating_sub(1)) as u16;
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        inner,
    );
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}
