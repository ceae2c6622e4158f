use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Paragraph};

use crate::navigation::controller::NavState;
use crate::render::formatter::Tone;
use crate::tui::app::{App, Mode};
use crate::tui::keys::help_line;

pub fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::default().fg(Color::White),
        Tone::Section => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Tone::Link => Style::default().fg(Color::Yellow),
        Tone::Input => Style::default().fg(Color::Green),
        Tone::Button => Style::default().fg(Color::Blue),
        Tone::Form => Style::default().fg(Color::Magenta),
        Tone::Image => Style::default().fg(Color::DarkGray),
        Tone::Error => Style::default().fg(Color::Red),
        Tone::Notice => Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [address_area, content_area, prompt_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // Borders take two rows
    app.page_height = content_area.height.saturating_sub(2).max(1);

    let address = match app.mode {
        Mode::Address => format!("{}▏", app.input),
        _ => app.address.clone(),
    };
    frame.render_widget(
        Paragraph::new(address).style(Style::default().fg(Color::White).bg(Color::Blue)),
        address_area,
    );

    let lines: Vec<Line> = app
        .content
        .lines
        .iter()
        .map(|l| Line::styled(l.text.clone(), tone_style(l.tone)))
        .collect();

    let title = match &app.state {
        NavState::Loading { url } => format!(" loading {} ", url),
        other => format!(" {} ", other.label()),
    };

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::bordered().title(title))
            .scroll((app.scroll, 0)),
        content_area,
    );

    let prompt = match (app.prompt_line(), &app.notice) {
        (Some(prompt), _) => prompt,
        (None, Some(notice)) => notice.clone(),
        (None, None) => help_line(),
    };
    frame.render_widget(
        Paragraph::new(prompt).style(Style::default().fg(Color::White).bg(Color::Green)),
        prompt_area,
    );
}
