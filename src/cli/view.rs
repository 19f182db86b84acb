//! Drawing the play screen.

use columbus::game::{Cell, GridSize, PirateKind, Position};
use columbus::{Notification, Session, SessionPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Draw the whole screen for the current session.
pub(crate) fn ui(f: &mut Frame, session: &Session, grid: GridSize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], session);

    if session.phase() == SessionPhase::Idle {
        render_welcome(f, chunks[1]);
    } else {
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);

        render_grid(f, main_chunks[0], session, grid);
        render_side_panel(f, main_chunks[1], session);
    }

    render_footer(f, chunks[2], session);

    match session.notification() {
        Some(&Notification::Blocking { kind, message }) => {
            let hint = if kind.ends_session() {
                "[Enter] Back to port"
            } else {
                "[Enter] Sail on"
            };
            render_popup(f, chunks[1], message, hint);
        }
        Some(notification @ Notification::Transient { .. }) => {
            render_toast(f, chunks[1], notification.message());
        }
        None => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, session: &Session) {
    let status = match session.phase() {
        SessionPhase::Idle => "IN PORT",
        SessionPhase::Active => "SAILING",
        SessionPhase::Blocked => "HALTED",
        SessionPhase::Ended => "CLOSED",
    };

    let mut title = format!(" Columbus | {status} ");
    if let Some(strategy) = session.strategy() {
        title.push_str(&format!("| Pirates: {strategy} "));
    }

    let style = if session.is_celebrating() {
        title.push_str("| TREASURE FOUND! ");
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let header = Paragraph::new(title)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Columbus",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Sail from the top-left corner to the treasure."),
        Line::from("Steer clear of pirates, sea monsters and islands."),
        Line::from(""),
        Line::from("Press [Enter] to set sail."),
    ];

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(welcome, area);
}

fn render_grid(f: &mut Frame, area: Rect, session: &Session, grid: GridSize) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(state) = session.state() {
        let visible_rows = area.height.saturating_sub(2).min(grid.side());
        let visible_cols = (area.width.saturating_sub(2) / 2).min(grid.side());

        for row in 0..visible_rows {
            let mut spans = Vec::with_capacity(usize::from(visible_cols));
            for col in 0..visible_cols {
                let cell = Cell::at(state, Position::new(row, col));
                spans.push(Span::styled(
                    format!("{} ", cell.glyph()),
                    cell_style(cell, state.invisible),
                ));
            }
            lines.push(Line::from(spans));
        }
    } else {
        lines.push(Line::from("Waiting for the server..."));
    }

    let grid_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Sea "));

    f.render_widget(grid_widget, area);
}

fn cell_style(cell: Cell, cloaked: bool) -> Style {
    match cell {
        Cell::Ship if cloaked => Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        Cell::Ship => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        Cell::Treasure => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Cell::Pirate(_) => Style::default().fg(Color::Red),
        Cell::Monster => Style::default().fg(Color::Magenta),
        Cell::Island => Style::default().fg(Color::Green),
        Cell::Water => Style::default().fg(Color::Blue),
    }
}

fn render_side_panel(f: &mut Frame, area: Rect, session: &Session) {
    let legend = [
        (Cell::Ship, "Columbus"),
        (Cell::Treasure, "Treasure"),
        (Cell::Pirate(PirateKind::Slow), "Pirate (slow)"),
        (Cell::Pirate(PirateKind::Fast), "Pirate (fast)"),
        (Cell::Pirate(PirateKind::Patrol), "Pirate (patrol)"),
        (Cell::Monster, "Sea monster"),
        (Cell::Island, "Island"),
    ];

    let mut lines = vec![Line::from("")];
    for (cell, label) in legend {
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", cell.glyph()), cell_style(cell, false)),
            Span::raw(label),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(state) = session.state() {
        let ship = state.ship;
        lines.push(Line::from(format!(" Ship at ({}, {})", ship.row, ship.col)));
        if state.invisible {
            lines.push(Line::from(Span::styled(
                " Cloaked",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Legend "))
        .wrap(Wrap { trim: false });

    f.render_widget(panel, area);
}

fn render_footer(f: &mut Frame, area: Rect, session: &Session) {
    let controls = match session.phase() {
        SessionPhase::Idle | SessionPhase::Ended => " [Enter] Start  [q] Quit ",
        SessionPhase::Blocked => " [Enter] OK  [r] Reset  [b] Back  [q] Quit ",
        SessionPhase::Active => {
            " [←↑↓→/WASD] Sail  [r] Reset  [t] Strategy  [i] Cloak  [b] Back  [q] Quit "
        }
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn render_popup(f: &mut Frame, area: Rect, message: &str, hint: &str) {
    let popup = centered(area, 50, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);
}

fn render_toast(f: &mut Frame, area: Rect, message: &str) {
    let width = area.width.saturating_sub(4).min(48);
    let toast = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(3),
        width,
        height: 3.min(area.height),
    };

    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(Clear, toast);
    f.render_widget(widget, toast);
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
