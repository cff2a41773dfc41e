use eframe::egui::{
    self,
    Sense,
};

use super::app::BushouApp;
use crate::{
    pinyin::{
        has_numbered_pinyin,
        ToneMarks,
    },
    study::LookupState,
};

const CARD_GLYPH_SIZE: f32 = 140.0;
const CHARACTER_BUTTON_SIZE: f32 = 28.0;

pub fn flashcard_panel(ctx: &egui::Context, app: &mut BushouApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(record) = app.flashcards.current().cloned() else {
            ui.centered_and_justified(|ui| {
                ui.label(app.theme.muted(ctx, "No radicals in this group yet. Mark some as difficult."));
            });
            return;
        };

        ui.vertical_centered(|ui| {
            ui.label(app.theme.muted(
                ctx,
                &format!(
                    "{} · {} / {}",
                    app.flashcards.group(),
                    app.flashcards.index() + 1,
                    app.flashcards.total()
                ),
            ));
            ui.add_space(8.0);

            // The glyph doubles as the swipe surface.
            let glyph = ui.add(
                egui::Label::new(app.theme.glyph(ctx, &record.glyph, CARD_GLYPH_SIZE))
                    .sense(Sense::drag())
                    .selectable(false),
            );
            if glyph.drag_started() {
                if let Some(pos) = glyph.interact_pointer_pos() {
                    app.swipe.begin(pos.x, pos.y);
                }
            }
            if glyph.drag_stopped() {
                match ui.input(|i| i.pointer.latest_pos()) {
                    Some(pos) => {
                        if let Some(direction) = app.swipe.end(pos.x, pos.y) {
                            app.flashcards.apply_swipe(direction);
                        }
                    }
                    None => app.swipe.cancel(),
                }
            }

            ui.label(app.theme.heading(ctx, &format!("#{} {}", record.id, record.name)));
            let romanization = if has_numbered_pinyin(&record.romanization) {
                record.romanization.to_tone_marks()
            } else {
                record.romanization.clone()
            };
            ui.label(egui::RichText::new(romanization).size(20.0));
            ui.label(&record.meaning);
            ui.label(app.theme.muted(ctx, &format!("{} strokes", record.strokes)));
            if let Some(components) = app.radicals.describe_components(&record) {
                ui.label(app.theme.muted(ctx, &components));
            }

            ui.add_space(12.0);
            navigation_row(ui, app, record.id);
            ui.add_space(12.0);
            ui.separator();
            characters_section(ui, app, record.id);
        });
    });
}

fn navigation_row(ui: &mut egui::Ui, app: &mut BushouApp, id: u32) {
    ui.horizontal(|ui| {
        if ui.button("⏮").on_hover_text("First").clicked() {
            app.flashcards.first();
        }
        if ui.button("◀").on_hover_text("Previous (←)").clicked() {
            app.flashcards.prev();
        }
        if ui.button("▶").on_hover_text("Next (→)").clicked() {
            app.flashcards.next();
        }

        ui.separator();

        let marked = app.bookmarks.is_marked(id);
        let (label, color) = if marked {
            ("★ Difficult", app.theme.gold(ui.ctx()))
        } else {
            ("☆ Mark difficult", ui.visuals().text_color())
        };
        if ui.button(egui::RichText::new(label).color(color)).clicked() {
            app.toggle_bookmark(id);
        }
    });
}

fn characters_section(ui: &mut egui::Ui, app: &mut BushouApp, id: u32) {
    let shown = app.characters.is_shown(id);
    let toggle_label = if shown { "Hide characters" } else { "Characters with this radical" };
    if ui.button(toggle_label).clicked() {
        app.task_manager.toggle_characters(app.characters.clone(), id);
    }

    if !shown {
        return;
    }

    match app.characters.state(id) {
        None | Some(LookupState::Loading) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Looking up characters...");
            });
        }
        Some(LookupState::Error) => {
            ui.horizontal(|ui| {
                ui.colored_label(app.theme.seal(ui.ctx()), "Lookup failed.");
                if ui.button("Retry").clicked() {
                    app.task_manager.retry_characters(app.characters.clone(), id);
                }
            });
        }
        Some(LookupState::Loaded(characters)) if characters.is_empty() => {
            ui.label(app.theme.muted(ui.ctx(), "No characters found."));
        }
        Some(LookupState::Loaded(_)) => {
            let page = app.characters.page(id);

            let mut clicked = None;
            ui.horizontal_wrapped(|ui| {
                for character in &page.characters {
                    let text = egui::RichText::new(character.as_str()).size(CHARACTER_BUTTON_SIZE);
                    if ui.button(text).on_hover_text("Search").clicked() {
                        clicked = Some(character.clone());
                    }
                }
            });

            if page.page_count > 1 {
                ui.horizontal(|ui| {
                    if ui.small_button("◀").clicked() {
                        app.characters.prev_page(id);
                    }
                    ui.label(format!("{} / {}", page.page + 1, page.page_count));
                    if ui.small_button("▶").clicked() {
                        app.characters.next_page(id);
                    }
                });
            }

            if let Some(character) = clicked {
                app.open_character(character);
            }
        }
    }
}
