use egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(79, 70, 229);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(224, 231, 255);
pub const REWARD_GOLD: Color32 = Color32::from_rgb(250, 204, 21);
pub const CORRECT: Color32 = Color32::from_rgb(22, 163, 74);
pub const CORRECT_SOFT: Color32 = Color32::from_rgb(220, 252, 231);
pub const WRONG: Color32 = Color32::from_rgb(220, 38, 38);
pub const WRONG_SOFT: Color32 = Color32::from_rgb(254, 226, 226);
pub const HIGHLIGHT_BG: Color32 = Color32::from_rgb(254, 240, 138);
pub const CARD_FILL: Color32 = Color32::from_rgb(248, 250, 252);
pub const DIAGRAM_FILL: Color32 = Color32::from_rgb(15, 23, 42);
pub const DIAGRAM_TEXT: Color32 = Color32::from_rgb(134, 239, 172);
pub const NOTICE_FILL: Color32 = Color32::from_rgb(185, 28, 28);

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;
    visuals.panel_fill = Color32::WHITE;
    visuals
}
