use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if app.presenter.is_loading() {
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        Cow::Owned(format!("{} Loading news...", frame))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else {
        Cow::Borrowed("[j/k]move [o/Enter]open [r]eload [q]uit")
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
