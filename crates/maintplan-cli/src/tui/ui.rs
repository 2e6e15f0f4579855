//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::app::{App, Focus, ShellState};
use crate::view;

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // panes
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_input(f, app, panes[0]);
    render_result(f, app, panes[1]);
    render_status_bar(f, app, chunks[2]);
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Maintenance Plan Organizer",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Transform unstructured maintenance notes into a clear, actionable plan.",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let mut lines: Vec<Line> = app.input.split('\n').map(Line::raw).collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
    }

    // Keep the end of the text visible while typing. Ignores wrapping.
    let inner_height = area.height.saturating_sub(2) as usize;
    let overflow = lines.len().saturating_sub(inner_height);
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

    let input = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(pane_block(" 1. Paste Your Plan ", focused));
    f.render_widget(input, area);
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let block = pane_block(" 2. View Organized Plan ", app.focus == Focus::Result);

    let widget = match &app.state {
        ShellState::Loading => Paragraph::new(Line::from(Span::styled(
            "Organizing...",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        ShellState::Failure(message) => Paragraph::new(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        ShellState::Idle => Paragraph::new(Line::from(Span::styled(
            "Your organized plan will appear here.",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center),
        ShellState::Success(plan) => Paragraph::new(view::plan_lines(plan)).scroll((app.scroll, 0)),
    };

    f.render_widget(widget.wrap(Wrap { trim: false }).block(block), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let pane = match app.focus {
        Focus::Input => "Input",
        Focus::Result => "Result",
    };

    let state = match &app.state {
        ShellState::Loading => Span::styled("organizing...", Style::default().fg(Color::Cyan)),
        ShellState::Success(_) => match app.organized_at {
            Some(at) => Span::styled(
                format!("organized at {}", at.format("%H:%M:%S")),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("organized", Style::default().fg(Color::Green)),
        },
        ShellState::Failure(_) => Span::styled("error", Style::default().fg(Color::Red)),
        ShellState::Idle => Span::styled("ready", Style::default().fg(Color::DarkGray)),
    };

    let organize_hint = if app.is_loading() {
        Span::styled("  Ctrl+S:organize", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw("  Ctrl+S:organize")
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {pane} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        state,
        organize_hint,
        Span::raw("  Tab:switch pane  Ctrl+L:clear  Esc:quit"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::app::{EMPTY_INPUT_MESSAGE, SAMPLE_NOTES};
    use maintplan_test_utils::sample_plan;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        let symbols: Vec<String> = buffer
            .content()
            .iter()
            .map(|c| c.symbol().to_string())
            .collect();
        symbols
            .chunks(width)
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn idle_shows_placeholder_only() {
        let app = App::new(SAMPLE_NOTES);
        let s = screen(&app);
        assert!(s.contains("Your organized plan will appear here."));
        assert!(!s.contains("Organizing..."));
        assert!(!s.contains("Event Details"));
    }

    #[test]
    fn loading_shows_indicator_only() {
        let mut app = App::new(SAMPLE_NOTES);
        app.submit();
        let s = screen(&app);
        assert!(s.contains("Organizing..."));
        assert!(!s.contains("Your organized plan will appear here."));
    }

    #[test]
    fn failure_shows_message_only() {
        let mut app = App::new("   ");
        app.submit();
        let s = screen(&app);
        assert!(s.contains(EMPTY_INPUT_MESSAGE));
        assert!(!s.contains("Your organized plan will appear here."));
        assert!(!s.contains("Organizing..."));
    }

    #[test]
    fn success_shows_plan_sections() {
        let mut app = App::new(SAMPLE_NOTES);
        app.submit();
        app.complete(Ok(sample_plan()));
        let s = screen(&app);
        assert!(s.contains("Event Details"));
        assert!(s.contains("Date: 17/01"));
        assert!(s.contains("Time: 8h"));
        assert!(s.contains("[ Ricardo ] [ Jonatas ]"));
        assert!(s.contains("organized at"));
        assert!(!s.contains("Your organized plan will appear here."));
    }
}
