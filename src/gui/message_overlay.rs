use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::gui::theme::Theme;

const NOTICE_LIFETIME: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient notice anchored to the bottom of the window. Errors stay until
/// dismissed, info notices fade after a few seconds.
#[derive(Default)]
pub struct MessageOverlay {
    message: Option<(String, NoticeKind, Instant)>,
}

impl MessageOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: String) {
        self.message = Some((message, NoticeKind::Info, Instant::now()));
    }

    pub fn set_error(&mut self, message: String) {
        self.message = Some((message, NoticeKind::Error, Instant::now()));
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        let Some((message, kind, shown_at)) = &self.message else {
            return;
        };

        if *kind == NoticeKind::Info {
            let age = shown_at.elapsed();
            if age >= NOTICE_LIFETIME {
                self.message = None;
                return;
            }
            ctx.request_repaint_after(NOTICE_LIFETIME - age);
        }

        let color = match kind {
            NoticeKind::Info => theme.jade(ctx),
            NoticeKind::Error => theme.seal(ctx),
        };

        let mut dismissed = false;
        egui::Window::new("notice")
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::Vec2::new(0.0, -16.0))
            .frame(egui::Frame::popup(&ctx.style()).stroke(egui::Stroke::new(2.0, color)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(message.as_str()).color(color));
                    if ui.small_button("✕").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.clear_message();
        }
    }
}
