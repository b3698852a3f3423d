use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    capture::CaptureSnapshot, gallery::GallerySnapshot, models::CapturedRecord,
    timer::TimerSnapshot,
};

use super::input::{Field, InputState, Mode};

pub const EMPTY_GALLERY_MESSAGE: &str = "No Pokémon caught yet";

/// Everything one frame shows.
pub struct ViewModel {
    pub timer: TimerSnapshot,
    pub capture: CaptureSnapshot,
    pub gallery: GallerySnapshot,
}

/// `No.025 pikachu  [electric]  caught 2026-10-18`
pub fn gallery_line(record: &CapturedRecord) -> String {
    format!(
        "{}  [{}]  caught {}",
        record.label(),
        record.categories.join(", "),
        record.captured_on
    )
}

pub fn render(f: &mut Frame, model: &ViewModel, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5), // timer
            Constraint::Length(3), // duration fields
            Constraint::Length(3), // controls
            Constraint::Min(4),    // capture status
        ])
        .split(f.area());

    let timer_color = if model.timer.running {
        Color::Green
    } else {
        Color::Gray
    };
    let timer = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            model.timer.display.clone(),
            Style::default()
                .fg(timer_color)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("- timer -"));
    f.render_widget(timer, chunks[0]);

    f.render_widget(duration_fields(model, input), chunks[1]);

    let start_label = if model.timer.running {
        "pause"
    } else {
        "start"
    };
    let controls = Paragraph::new(format!(
        "[space] {start_label}   [r] reset   [g] gallery   [m/s] set duration   [q] quit"
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(controls, chunks[2]);

    f.render_widget(capture_status(model, input), chunks[3]);

    if model.gallery.open {
        render_gallery(f, &model.gallery, input.gallery_scroll);
    }
}

fn duration_fields(model: &ViewModel, input: &InputState) -> Paragraph<'static> {
    let remaining = model.timer.state.remaining_seconds;
    let mut minutes = (remaining / 60).to_string();
    let mut seconds = format!("{:02}", remaining % 60);
    let highlight = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::UNDERLINED);
    let mut minute_style = Style::default();
    let mut second_style = Style::default();

    if let Mode::Editing { field, buffer } = &input.mode {
        let shown = format!("{buffer}_");
        match field {
            Field::Minutes => {
                minutes = shown;
                minute_style = highlight;
            }
            Field::Seconds => {
                seconds = shown;
                second_style = highlight;
            }
        }
    }

    let title = if model.timer.running {
        "duration (locked while running)"
    } else {
        "duration"
    };

    Paragraph::new(Line::from(vec![
        Span::styled(minutes, minute_style),
        Span::raw(" min  "),
        Span::styled(seconds, second_style),
        Span::raw(" sec"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(title))
}

fn capture_status(model: &ViewModel, input: &InputState) -> Paragraph<'static> {
    let mut lines = Vec::new();

    if let Some(notice) = &input.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let capture = &model.capture;
    if capture.loading {
        lines.push(Line::from(Span::styled(
            "Catching a Pokémon...",
            Style::default().add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )));
    } else {
        if let Some(error) = &capture.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from("[t] retry"));
        }
        // The previous catch stays on screen after a failed one.
        if let Some(record) = &capture.current {
            lines.extend(record_lines(record));
        }
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("catch"))
}

fn record_lines(record: &CapturedRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            record.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(record.categories.join(" · ")),
    ];
    if !record.image_ref.is_empty() {
        lines.push(Line::from(Span::styled(
            record.image_ref.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_gallery(f: &mut Frame, gallery: &GallerySnapshot, scroll: u16) {
    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let lines: Vec<Line> = if gallery.entries.is_empty() {
        vec![Line::from(Span::styled(
            EMPTY_GALLERY_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        gallery
            .entries
            .iter()
            .map(|record| Line::from(gallery_line(record)))
            .collect()
    };

    let max_scroll = (lines.len() as u16).saturating_sub(1);
    let title = format!("Pokédex ({})  [g/esc] close", gallery.entries.len());
    let list = Paragraph::new(lines)
        .scroll((scroll.min(max_scroll), 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
