use crate::app::{App, RowText};
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the news list panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let presenter = &app.presenter;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!("Headlines ({})", presenter.items().len()));

    if presenter.is_empty() {
        // Nothing to say until the first outcome; the status bar shows the spinner.
        let text = presenter.empty_message().unwrap_or("");
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // Borders take two columns
    let inner_width = area.width.saturating_sub(2) as usize;

    let rows: Vec<ListItem> = (0..presenter.items().len())
        .filter_map(|i| presenter.row(i))
        .map(|row| list_item(&row, inner_width))
        .collect();

    let list = List::new(rows).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default().with_selected(Some(presenter.selected()));
    f.render_stateful_widget(list, area, &mut state);
}

/// Two lines: the title, then author/section with date and time on the right.
fn list_item(row: &RowText<'_>, width: usize) -> ListItem<'static> {
    let title = strip_control_chars(row.title);
    let title = truncate_to_width(&title, width).into_owned();

    let when = if row.time.is_empty() {
        row.date.to_string()
    } else {
        format!("{} {}", row.date, row.time)
    };
    let when_width = display_width(&when);

    let byline = format!(
        "{} · {}",
        strip_control_chars(row.author),
        strip_control_chars(row.section)
    );
    let byline_room = width.saturating_sub(when_width + 2);
    let byline = truncate_to_width(&byline, byline_room).into_owned();
    let padding = width
        .saturating_sub(display_width(&byline))
        .saturating_sub(when_width);

    ListItem::new(vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled(byline, Style::default().fg(Color::Gray)),
            Span::raw(" ".repeat(padding)),
            Span::styled(when, Style::default().fg(Color::DarkGray)),
        ]),
    ])
}
