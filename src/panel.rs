//! What the window shows: a status line and, in the bilingual layout, a
//! mood line.

use serde::Deserialize;

use crate::command::Command;
use crate::mood::Mood;

/// Which of the two panel variants to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Chinese/English captions with a mood label; every command is
    /// followed by a `Get Face` query.
    #[default]
    Bilingual,
    /// English captions, status label only.
    Plain,
}

impl Layout {
    pub fn title(self) -> &'static str {
        match self {
            Layout::Bilingual => "Robot Control / 機器人控制",
            Layout::Plain => "Robot Control",
        }
    }

    pub fn window_size(self) -> [f32; 2] {
        match self {
            Layout::Bilingual => [300.0, 300.0],
            Layout::Plain => [300.0, 200.0],
        }
    }

    /// Whether commands and distance reads are followed by a mood query.
    pub fn tracks_mood(self) -> bool {
        matches!(self, Layout::Bilingual)
    }

    fn initial_status(self) -> &'static str {
        match self {
            Layout::Bilingual => "Status: STOP / 狀態: 停止",
            Layout::Plain => "Status: Ready",
        }
    }

    fn initial_mood(self) -> Option<Mood> {
        self.tracks_mood().then_some(Mood::Happy)
    }

    fn command_status(self, cmd: Command) -> String {
        match self {
            Layout::Bilingual => format!("Status: {cmd} / 狀態: {cmd}"),
            Layout::Plain => format!("Status: {cmd} sent"),
        }
    }

    fn distance_status(self, distance: &str) -> String {
        match self {
            Layout::Bilingual => format!("Distance: {distance} cm / 距離: {distance} 公分"),
            Layout::Plain => format!("Distance: {distance} cm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    layout: Layout,
    status: String,
    mood: Option<Mood>,
}

impl Panel {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            status: layout.initial_status().to_string(),
            mood: layout.initial_mood(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    /// Text for the mood label, if this layout has one.
    pub fn mood_text(&self) -> Option<String> {
        self.mood
            .map(|mood| format!("Mood: {g} / 表情: {g}", g = mood.glyph()))
    }

    pub fn show_command(&mut self, cmd: Command) {
        self.status = self.layout.command_status(cmd);
    }

    /// Show a distance reply verbatim; no parsing or unit conversion.
    pub fn show_distance(&mut self, distance: &str) {
        self.status = self.layout.distance_status(distance);
    }

    pub fn show_mood(&mut self, mood: Mood) {
        if self.layout.tracks_mood() {
            self.mood = Some(mood);
        }
    }

    pub fn reset(&mut self) {
        *self = Panel::new(self.layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilingual_starts_stopped_and_happy() {
        let panel = Panel::new(Layout::Bilingual);
        assert_eq!(panel.status(), "Status: STOP / 狀態: 停止");
        assert_eq!(panel.mood_text().as_deref(), Some("Mood: ^ w ^ Y / 表情: ^ w ^ Y"));
    }

    #[test]
    fn plain_has_no_mood() {
        let mut panel = Panel::new(Layout::Plain);
        assert_eq!(panel.status(), "Status: Ready");
        panel.show_mood(Mood::Sad);
        assert_eq!(panel.mood_text(), None);
    }

    #[test]
    fn templates_per_layout() {
        let mut bi = Panel::new(Layout::Bilingual);
        bi.show_command(Command::MoveRight);
        assert_eq!(bi.status(), "Status: Move Right / 狀態: Move Right");
        bi.show_distance("12.5");
        assert_eq!(bi.status(), "Distance: 12.5 cm / 距離: 12.5 公分");

        let mut plain = Panel::new(Layout::Plain);
        plain.show_command(Command::Stop);
        assert_eq!(plain.status(), "Status: Stop sent");
        plain.show_distance("far away");
        assert_eq!(plain.status(), "Distance: far away cm");
    }

    #[test]
    fn reset_restores_initial_display() {
        let mut panel = Panel::new(Layout::Bilingual);
        panel.show_command(Command::Reboot);
        panel.show_mood(Mood::Sad);
        panel.reset();
        assert_eq!(panel, Panel::new(Layout::Bilingual));
    }
}
