use crate::app::App;
use blogfeed::controller::LoadStatus;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Saisir la recherche | ENTRÉE valider | ÉCHAP annuler")
    } else if app.controller.is_deep_link_view() {
        Cow::Borrowed("[b]retour [o]uvrir [q]uitter")
    } else {
        match app.controller.status() {
            LoadStatus::Failed(_) => Cow::Borrowed("[r]éessayer [q]uitter"),
            LoadStatus::Loaded => Cow::Owned(format!(
                "{}/{} articles  [j/k]naviguer [espace]déplier [n/p]page [/]rechercher [t]ag [o]uvrir [q]uitter",
                app.controller.filtered().count(),
                app.controller.articles().len()
            )),
            LoadStatus::Idle | LoadStatus::Loading => Cow::Borrowed("[q]uitter"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
