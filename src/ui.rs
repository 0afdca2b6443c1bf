use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::{App, PaneFocus, format_gold, format_multiplier};
use crate::reputation::{self, TIER_NAMES};
use crate::wheel::MULTIPLIERS;

pub fn draw(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(8),
        ])
        .split(f.size());

    draw_kpis(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(32),
            Constraint::Percentage(36),
            Constraint::Percentage(32),
        ])
        .split(chunks[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[2]);

    draw_roll(f, main_chunks[0], app);
    draw_wheel(f, main_chunks[1], app);
    draw_payout(f, right_chunks[0], app);
    draw_tiers(f, right_chunks[1], app);

    draw_footer(f, chunks[2], app);
}

fn draw_kpis(f: &mut Frame<'_>, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let tier = app.session.tier();
    let jobs = app.session.aggregate().job_count;

    let rep_block = Block::default()
        .title("Reputation")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let rep = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Tier {}/10 — {}", tier + 1, reputation::tier_name(tier)),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} jobs completed • +{}% max-cap bonus",
            jobs,
            tier * 10
        )),
    ])
    .block(rep_block);
    f.render_widget(rep, columns[0]);

    let gold_block = Block::default()
        .title("Total Gold Earned")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let gold = Paragraph::new(vec![
        Line::from(Span::styled(
            format_gold(app.session.aggregate().total_gold),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Current cap: {} gp (+{}% from reputation)",
            app.session.cap(),
            tier * 10
        )),
    ])
    .block(gold_block);
    f.render_widget(gold, columns[1]);

    let status_block = Block::default()
        .title("Ledger")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let status = Paragraph::new(vec![
        Line::from(app.status.clone()),
        Line::from(Span::styled(
            if app.save_in_flight {
                "save in flight…"
            } else {
                ""
            },
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(status_block);
    f.render_widget(status, columns[2]);
}

fn draw_roll(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block("Rolls and Flair", app.focus == PaneFocus::Roll);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let ratio = (app.roll - 1) as f64 / 29.0;
    let gauge = Gauge::default()
        .block(Block::default().title("Dice Result (1–30)"))
        .ratio(ratio)
        .gauge_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .label(format!("{}", app.roll));
    f.render_widget(gauge, segments[0]);

    let mut lines = vec![
        checkbox_line("1", "Passable narrative  (+10%)", app.flags.passable),
        checkbox_line("2", "Good narrative      (+15%)", app.flags.good),
        checkbox_line("3", "Excellent narrative (+25%)", app.flags.excellent),
        Line::from(""),
    ];
    let note_label = if app.editing_note {
        Span::styled(
            format!("Note: {}▌", app.note),
            Style::default().fg(Color::LightCyan),
        )
    } else if app.note.is_empty() {
        Span::styled("Note: (press N to add)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("Note: {}", app.note))
    };
    lines.push(Line::from(note_label));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "S save result to ledger",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, segments[1]);
}

fn checkbox_line(key: &str, label: &str, checked: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if checked {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{mark} "), style),
        Span::raw(format!("{label}  ")),
        Span::styled(format!("[{key}]"), Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_wheel(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block("Wheel of Fortune", app.focus == PaneFocus::Wheel);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let header = if app.animation.is_some() {
        Line::from(Span::styled(
            "Spinning…",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        match app.session.last_spin() {
            Some(spin) => Line::from(vec![
                Span::styled("Result ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_multiplier(spin.multiplier()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  after {:.0}°", spin.angle_deg),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            None => Line::from(Span::styled(
                "Not spun yet — previews use ×1.0. Enter to spin.",
                Style::default().fg(Color::Gray),
            )),
        }
    };
    f.render_widget(Paragraph::new(vec![header]), segments[0]);

    let pointer = app.wheel_pointer();
    let items: Vec<ListItem> = MULTIPLIERS
        .iter()
        .enumerate()
        .map(|(idx, &mult)| {
            let pointed = pointer == Some(idx);
            let marker = if pointed { "▶ " } else { "  " };
            let style = if pointed {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{marker}{}", format_multiplier(mult)),
                style,
            )))
        })
        .collect();
    let list = List::new(items);
    let mut state = ListState::default();
    state.select(pointer);
    f.render_stateful_widget(list, segments[1], &mut state);
}

fn draw_payout(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .title("Payout Estimates")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let b = app.breakdown();
    let lines = vec![
        stat_line(
            format!("Base from roll {}: ", b.roll),
            format!("{:.0} gp", b.base),
        ),
        stat_line("Wheel multiplier:  ".into(), format_multiplier(b.multiplier)),
        stat_line(
            "Narrative bonus:   ".into(),
            format!("+{}%", (b.bonus_rate * 100.0).round() as i64),
        ),
        stat_line(
            format!("Cap (Tier {}):      ", app.session.tier() + 1),
            format!("{} gp", b.cap),
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("Final award: {} gp", b.award),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}

fn stat_line(label: String, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn draw_tiers(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block("Reputation Tiers", app.focus == PaneFocus::Tiers);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    if !app.show_tiers {
        let paragraph = Paragraph::new("Press Enter to view all ten tiers.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
        return;
    }

    let jobs = app.session.aggregate().job_count;
    let current = app.session.tier();
    let visible_height = inner.height as usize;
    let start = app.tier_scroll.min(TIER_NAMES.len().saturating_sub(1));
    let end = (start + visible_height).min(TIER_NAMES.len());

    let items: Vec<ListItem> = (start..end)
        .map(|tier| {
            let needed = reputation::unlock_threshold(tier);
            let progress = if jobs >= needed {
                "Unlocked".to_string()
            } else {
                format!("Reach {needed} jobs")
            };
            let name_style = if tier == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("Tier {} — {}", tier + 1, reputation::tier_name(tier)),
                    name_style,
                ),
                Span::styled(
                    format!("  +{}% cap • {}", tier * 10, progress),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items);
    f.render_widget(list, inner);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Keys & Feed")
        .border_style(Style::default().fg(Color::Gray));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let instruction_lines = vec![
        Line::from("Tab cycle focus | Q quit"),
        Line::from("Roll: ←/→ adjust  1/2/3 flair  N note  S save"),
        Line::from("Wheel: Enter spin"),
        Line::from("Tiers: Enter toggle  ↑↓ scroll"),
    ];
    let instruction = Paragraph::new(instruction_lines).wrap(Wrap { trim: true });
    f.render_widget(instruction, columns[0]);

    let mut message_lines: Vec<Line> = Vec::new();
    for msg in app.messages.iter() {
        message_lines.push(Line::from(Span::raw(msg.clone())));
    }
    if message_lines.is_empty() {
        message_lines.push(Line::from(Span::styled(
            "No results yet…",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let feed = Paragraph::new(message_lines).wrap(Wrap { trim: true });
    f.render_widget(feed, columns[1]);
}

fn pane_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let border_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .borders(Borders::ALL)
        .border_style(border_style)
}
