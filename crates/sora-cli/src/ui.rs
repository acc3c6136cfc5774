use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use sora_client::{GenerationRecord, GenerationStatus};

use crate::app::{App, CARDS_PER_ROW, EXAMPLE_PROMPTS};
use crate::theme::Theme;

const CARD_HEIGHT: u16 = 9;
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::default();
    let area = frame.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(" 🎬 Sora-2 Video Studio ")
        .title_style(theme.title);

    frame.render_widget(block, area);

    let inner = Layout::default()
        .constraints([
            Constraint::Length(1), // Server line
            Constraint::Length(6), // Prompt input
            Constraint::Length(1), // Notice
            Constraint::Min(3),    // Examples or cards
            Constraint::Length(1), // Footer
        ])
        .split(inner_rect(area, 1));

    let server = Paragraph::new(Line::from(vec![
        Span::styled("Transform your ideas into videos  ", theme.text),
        Span::styled(format!("({})", app.server_url), theme.muted),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(server, inner[0]);

    render_input(frame, app, inner[1], &theme);
    render_notice(frame, app, inner[2], &theme);

    if app.session.records().is_empty() {
        render_examples(frame, inner[3], &theme);
    } else {
        render_cards(frame, app, inner[3], &theme);
    }

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" Enter ", theme.key_hint),
        Span::styled("Generate", theme.muted),
        Span::raw("  "),
        Span::styled(" Shift+Enter ", theme.key_hint),
        Span::styled("Newline", theme.muted),
        Span::raw("  "),
        Span::styled(" F1-F3 ", theme.key_hint),
        Span::styled("Examples", theme.muted),
        Span::raw("  "),
        Span::styled(" Esc ", theme.key_hint),
        Span::styled("Quit", theme.muted),
    ]))
    .alignment(Alignment::Center);

    frame.render_widget(footer, inner[4]);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let (title, border) = if app.input_enabled() {
        (" Describe your video ".to_string(), theme.border)
    } else {
        (
            format!(" {} Generating... ", spinner(app.tick)),
            theme.generating,
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
        .title_style(theme.title);

    let input = if app.input.is_empty() {
        Paragraph::new("A serene sunset over the ocean with waves gently crashing...")
            .style(theme.muted)
    } else {
        let mut text = app.input.clone();
        if app.input_enabled() {
            text.push('▏');
        }
        Paragraph::new(text).style(theme.text)
    };

    frame.render_widget(input.wrap(Wrap { trim: false }).block(block), area);
}

fn render_notice(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(format!("⚠ {}", notice), theme.notice))
    } else if !app.input_enabled() {
        let in_flight = app.session.records().in_flight();
        Line::from(Span::styled(
            format!("{} in flight, input unlocks when it finishes", in_flight),
            theme.muted,
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_examples(frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines = vec![
        Line::from(Span::styled("Try these examples:", theme.title)),
        Line::default(),
    ];
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" F{} ", i + 1), theme.key_hint),
            Span::raw(" "),
            Span::styled(*prompt, theme.text),
        ]));
    }

    let examples = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(examples, inner_rect(area, 1));
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let records: Vec<&GenerationRecord> = app.session.records().iter().collect();
    let total_rows = app.card_rows();

    // Bottom line reports what is off screen
    let layout = Layout::default()
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let visible_rows = usize::from(layout[0].height / CARD_HEIGHT).max(1);
    app.visible_rows.set(visible_rows);
    let first_row = app.scroll_row.min(total_rows.saturating_sub(visible_rows));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(layout[0]);

    let shown = records.chunks(CARDS_PER_ROW).skip(first_row);
    for (row_area, chunk) in rows.iter().zip(shown) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW])
            .split(*row_area);

        for (card_area, record) in columns.iter().zip(chunk) {
            render_card(frame, record, app.tick, *card_area, theme);
        }
    }

    if total_rows > visible_rows {
        let first = first_row * CARDS_PER_ROW + 1;
        let last = ((first_row + visible_rows) * CARDS_PER_ROW).min(records.len());
        let status = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Cards {}-{} of {}  ", first, last, records.len()),
                theme.muted,
            ),
            Span::styled(" ↑/↓ PgUp/PgDn ", theme.key_hint),
            Span::styled("Scroll", theme.muted),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(status, layout[1]);
    }
}

fn render_card(frame: &mut Frame, record: &GenerationRecord, tick: usize, area: Rect, theme: &Theme) {
    let style = theme.status(record.status);
    let label = match record.status {
        GenerationStatus::Generating => format!(" {} Generating ", spinner(tick)),
        GenerationStatus::Completed => " ✔ Completed ".to_string(),
        GenerationStatus::Failed => " ✖ Failed ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(label)
        .title_style(style)
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", record.timestamp.format("%H:%M:%S")),
            theme.muted,
        )));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .constraints([
            Constraint::Length(3), // Prompt
            Constraint::Length(1), // Spacing
            Constraint::Min(1),    // Status body
        ])
        .split(inner);

    let prompt = Paragraph::new(record.prompt.as_str())
        .style(theme.text)
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, layout[0]);

    match record.status {
        GenerationStatus::Generating => {
            let body = Layout::default()
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(layout[2]);

            let gauge = Gauge::default()
                .gauge_style(theme.gauge)
                .percent(u16::from(record.progress.min(100)))
                .label(format!("{}%", record.progress));
            frame.render_widget(gauge, body[0]);

            let message = record.message.as_deref().unwrap_or("Starting...");
            frame.render_widget(Paragraph::new(message).style(theme.muted), body[1]);
        }
        GenerationStatus::Completed => {
            let url = record.video_url.as_deref().unwrap_or_default();
            let video = Paragraph::new(Line::from(vec![
                Span::styled("▶ ", style),
                Span::styled(url, theme.text),
            ]))
            .wrap(Wrap { trim: true });
            frame.render_widget(video, layout[2]);
        }
        GenerationStatus::Failed => {
            frame.render_widget(
                Paragraph::new("✖ Generation failed").style(style),
                layout[2],
            );
        }
    }
}

fn spinner(tick: usize) -> &'static str {
    SPINNER[(tick / 2) % SPINNER.len()]
}

// Helper: inner area with margin
fn inner_rect(area: Rect, margin: u16) -> Rect {
    Rect {
        x: area.x + margin,
        y: area.y + margin,
        width: area.width.saturating_sub(margin * 2),
        height: area.height.saturating_sub(margin * 2),
    }
}
