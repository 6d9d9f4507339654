use crate::scene::frame::Overlay;

/// Help text keeps a fixed pixel height; only its placement follows the window size.
const OVERLAY_FONT_SIZE: f32 = 15.0;

pub fn draw_help_overlay(ctx: &egui::Context, overlay: Option<&Overlay>) {
    let Some(overlay) = overlay else { return };

    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("help_overlay"),
    ));

    for line in &overlay.lines {
        let (x, y) = overlay
            .projection
            .to_screen(line.x, line.y, screen.width(), screen.height());
        painter.text(
            screen.min + egui::vec2(x, y),
            egui::Align2::LEFT_BOTTOM,
            line.text,
            egui::FontId::monospace(OVERLAY_FONT_SIZE),
            egui::Color32::BLACK,
        );
    }
}
