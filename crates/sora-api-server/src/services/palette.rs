/// Colour scheme picked for a prompt by keyword. First match wins, in the
/// order the variants are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePalette {
    Sunset,
    Ocean,
    Forest,
    Night,
    Default,
}

impl ScenePalette {
    pub fn from_prompt(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has_any(&["sunset", "orange", "golden"]) {
            ScenePalette::Sunset
        } else if has_any(&["ocean", "sea", "water"]) {
            ScenePalette::Ocean
        } else if has_any(&["forest", "tree", "green"]) {
            ScenePalette::Forest
        } else if has_any(&["night", "dark", "moon"]) {
            ScenePalette::Night
        } else {
            ScenePalette::Default
        }
    }

    pub fn colors(&self) -> [&'static str; 3] {
        match self {
            ScenePalette::Sunset => ["#FF6B6B", "#FFE66D", "#4ECDC4"],
            ScenePalette::Ocean => ["#006994", "#0090C1", "#00B4D8"],
            ScenePalette::Forest => ["#2D6A4F", "#40916C", "#52B788"],
            ScenePalette::Night => ["#1A1A2E", "#16213E", "#0F3460"],
            ScenePalette::Default => ["#667eea", "#764ba2", "#f093fb"],
        }
    }

    /// Colour at a point of the clip, `t` in `[0, 1]`.
    pub fn color_at(&self, t: f32) -> &'static str {
        let colors = self.colors();
        let idx = (t.clamp(0.0, 1.0) * (colors.len() - 1) as f32).floor() as usize;
        colors[idx]
    }
}
