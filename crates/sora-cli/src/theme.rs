use ratatui::style::{Color, Modifier, Style};
use sora_client::GenerationStatus;

/// Styles for the studio page. Cards and the input border take their colour
/// from the record status.
pub struct Theme {
    pub title: Style,
    pub border: Style,
    pub text: Style,
    pub muted: Style,
    pub key_hint: Style,
    pub notice: Style,
    pub gauge: Style,
    pub generating: Style,
    pub completed: Style,
    pub failed: Style,
}

impl Theme {
    pub fn status(&self, status: GenerationStatus) -> Style {
        match status {
            GenerationStatus::Generating => self.generating,
            GenerationStatus::Completed => self.completed,
            GenerationStatus::Failed => self.failed,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        Self {
            title: bold(Color::Magenta),
            border: Style::default().fg(Color::DarkGray),
            text: Style::default().fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            key_hint: bold(Color::Yellow),
            notice: bold(Color::LightYellow),
            gauge: Style::default().fg(Color::LightMagenta).bg(Color::Black),
            generating: bold(Color::Cyan),
            completed: bold(Color::Green),
            failed: bold(Color::Red),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_styles_are_distinct() {
        let theme = Theme::default();
        let styles = [
            theme.status(GenerationStatus::Generating),
            theme.status(GenerationStatus::Completed),
            theme.status(GenerationStatus::Failed),
        ];
        assert_ne!(styles[0], styles[1]);
        assert_ne!(styles[1], styles[2]);
        assert_ne!(styles[0], styles[2]);
    }
}
