//! Floating "+N XP" notifications drawn above everything else.

use std::time::{Duration, Instant};

use client_core::RewardEvent;
use egui::RichText;

use crate::ui::theme;

/// Distance in points a notification rises over its lifetime.
const RISE_DISTANCE: f32 = 48.0;

/// Offset and opacity for a notification `progress` of the way through its lifetime.
pub fn placement(progress: f32) -> (f32, f32) {
    let progress = progress.clamp(0.0, 1.0);
    (-RISE_DISTANCE * progress, 1.0 - progress * progress)
}

pub fn show(ctx: &egui::Context, events: &[RewardEvent], display_for: Duration) {
    let now = Instant::now();
    for event in events {
        let (rise, opacity) = placement(event.progress(now, display_for));
        let pos = egui::pos2(event.position.x - 40.0, event.position.y - 20.0 + rise);

        egui::Area::new(egui::Id::new(("reward", event.id.0)))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(format!("+{} XP", event.amount))
                            .strong()
                            .size(26.0)
                            .color(theme::REWARD_GOLD.gamma_multiply(opacity)),
                    );
                    ui.label(
                        RichText::new(&event.label)
                            .small()
                            .strong()
                            .color(theme::ACCENT.gamma_multiply(opacity)),
                    );
                });
            });
    }
}
