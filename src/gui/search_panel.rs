use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use super::{
    app::BushouApp,
    theme::Theme,
};
use crate::{
    api::DictEntry,
    pinyin::ToneMarks,
    radicals::RadicalTable,
    study::{
        Carousel,
        Category,
        SearchController,
        SearchSession,
    },
};

#[derive(Default)]
pub struct SearchPanel {
    open: bool,
    input: String,
    focus_input: bool,
}

impl SearchPanel {
    pub fn open_with(&mut self, query: &str) {
        self.open = true;
        self.focus_input = query.is_empty();
        if !query.is_empty() {
            self.input = query.to_string();
        }
    }
}

enum SearchAction {
    Search(String),
    Open(String),
    Clear,
    Study(u32),
}

pub fn search_window(ctx: &egui::Context, app: &mut BushouApp) {
    let mut open = app.search_panel.open;
    if !open {
        return;
    }

    let mut action = None;
    let session = app.search.snapshot();

    egui::Window::new("Search")
        .open(&mut open)
        .default_width(560.0)
        .vscroll(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut app.search_panel.input)
                        .hint_text("汉字, e.g. 爱")
                        .desired_width(280.0),
                );
                if app.search_panel.focus_input {
                    input.request_focus();
                    app.search_panel.focus_input = false;
                }
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Search").clicked() || submitted {
                    action = Some(SearchAction::Search(app.search_panel.input.clone()));
                }
                if ui.button("Clear").clicked() {
                    action = Some(SearchAction::Clear);
                }
            });
            ui.separator();

            if session.is_idle() {
                ui.label(app.theme.muted(ctx, "Type one or more characters to see their radicals."));
                return;
            }

            ui.horizontal(|ui| {
                ui.label(app.theme.heading(ctx, &format!("Results for {}", session.query)));
                if !session.is_ready() {
                    ui.spinner();
                }
            });

            let view = SessionView {
                session: &session,
                controller: &app.search,
                radicals: &app.radicals,
                theme: &app.theme,
            };

            if let Some(next) = view.radicals_section(ui) {
                action = Some(next);
            }
            view.definitions_section(ui);
            if let Some(next) = view.examples_section(ui) {
                action = Some(next);
            }
            if let Some(next) = view.dictionary_section(ui) {
                action = Some(next);
            }
        });

    app.search_panel.open = open;

    match action {
        Some(SearchAction::Search(query)) => app.start_search(query),
        Some(SearchAction::Open(character)) => app.open_character(character),
        Some(SearchAction::Clear) => {
            app.search_panel.input.clear();
            app.search.clear();
        }
        Some(SearchAction::Study(id)) => app.study_radical(id),
        None => {}
    }
}

/// Renders a category's pending or failed state; returns the loaded value.
fn settled<'a, T>(ui: &mut egui::Ui, theme: &Theme, category: &'a Category<T>) -> Option<&'a T> {
    match category {
        Category::Pending => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
            None
        }
        Category::Failed(message) => {
            ui.colored_label(theme.seal(ui.ctx()), format!("Failed: {}", message));
            None
        }
        Category::Loaded(value) => Some(value),
    }
}

/// Prev / position / next controls for one result carousel.
fn carousel_controls(
    ui: &mut egui::Ui,
    controller: &SearchController,
    carousel: Carousel,
    position: usize,
    len: usize,
) {
    ui.horizontal(|ui| {
        if ui.small_button("◀").clicked() {
            controller.prev(carousel);
        }
        ui.label(format!("{} / {}", position + 1, len));
        if ui.small_button("▶").clicked() {
            controller.next(carousel);
        }
    });
}

struct SessionView<'a> {
    session: &'a SearchSession,
    controller: &'a SearchController,
    radicals: &'a RadicalTable,
    theme: &'a Theme,
}

impl SessionView<'_> {
    fn radicals_section(&self, ui: &mut egui::Ui) -> Option<SearchAction> {
        ui.label(self.theme.heading(ui.ctx(), "Radicals"));
        let ids = settled(ui, self.theme, &self.session.radicals)?;
        if ids.is_empty() {
            ui.label(self.theme.muted(ui.ctx(), "No radicals found."));
            return None;
        }

        let position = self.session.position(Carousel::Radicals);
        let record = self.radicals.get(ids[position])?;

        let mut action = None;
        ui.horizontal(|ui| {
            ui.label(self.theme.glyph(ui.ctx(), &record.glyph, 48.0));
            ui.vertical(|ui| {
                ui.strong(format!("#{} {}", record.id, record.name));
                ui.label(format!("{} · {}", record.romanization, record.meaning));
                if ui.button("Study this radical").clicked() {
                    action = Some(SearchAction::Study(record.id));
                }
            });
        });
        carousel_controls(ui, self.controller, Carousel::Radicals, position, ids.len());
        ui.separator();
        action
    }

    fn definitions_section(&self, ui: &mut egui::Ui) {
        ui.label(self.theme.heading(ui.ctx(), "Definitions"));
        let Some(definitions) = settled(ui, self.theme, &self.session.definitions) else {
            ui.separator();
            return;
        };

        for character in definitions {
            ui.horizontal_wrapped(|ui| {
                ui.label(self.theme.glyph(ui.ctx(), &character.character, 28.0));
                if character.entries.is_empty() {
                    ui.label(self.theme.muted(ui.ctx(), "No definition"));
                }
            });
            for entry in &character.entries {
                ui.horizontal_wrapped(|ui| {
                    ui.strong(entry.pinyin.to_tone_marks());
                    ui.label(entry.senses().collect::<Vec<_>>().join("; "));
                });
            }
        }
        ui.separator();
    }

    fn entry_card(&self, ui: &mut egui::Ui, entry: &DictEntry) -> Option<SearchAction> {
        let mut action = None;
        ui.horizontal_wrapped(|ui| {
            for character in entry.simplified.chars() {
                let text = egui::RichText::new(character.to_string()).size(32.0);
                if ui.button(text).on_hover_text("Search this character").clicked() {
                    action = Some(SearchAction::Open(character.to_string()));
                }
            }
            if entry.traditional != entry.simplified {
                ui.label(self.theme.muted(ui.ctx(), &format!("({})", entry.traditional)));
            }
        });
        ui.strong(entry.pinyin.to_tone_marks());
        ui.label(entry.senses().collect::<Vec<_>>().join("; "));
        action
    }

    fn examples_section(&self, ui: &mut egui::Ui) -> Option<SearchAction> {
        ui.label(self.theme.heading(ui.ctx(), "Example words"));
        let examples = settled(ui, self.theme, &self.session.examples)?;
        if examples.is_empty() {
            ui.label(self.theme.muted(ui.ctx(), "No example words."));
            ui.separator();
            return None;
        }

        let position = self.session.position(Carousel::Examples);
        let action = self.entry_card(ui, &examples[position]);
        carousel_controls(ui, self.controller, Carousel::Examples, position, examples.len());
        ui.separator();
        action
    }

    fn dictionary_section(&self, ui: &mut egui::Ui) -> Option<SearchAction> {
        ui.label(self.theme.heading(ui.ctx(), "Dictionary"));
        let results = settled(ui, self.theme, &self.session.dictionary)?;
        if results.is_empty() {
            ui.label(self.theme.muted(ui.ctx(), "No dictionary matches."));
            return None;
        }

        let position = self.session.position(Carousel::Dictionary);
        let action = self.entry_card(ui, &results[position]);
        carousel_controls(ui, self.controller, Carousel::Dictionary, position, results.len());

        egui::CollapsingHeader::new(format!("All {} matches", results.len()))
            .id_salt("dictionary_matches")
            .show(ui, |ui| dictionary_table(ui, self.theme, results));
        action
    }
}

fn dictionary_table(ui: &mut egui::Ui, theme: &Theme, results: &[DictEntry]) {
    let text_height = egui::TextStyle::Body.resolve(ui.style()).size.max(ui.spacing().interact_size.y);

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .max_scroll_height(320.0)
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.label(theme.heading(ui.ctx(), "Simplified"));
            });
            header.col(|ui| {
                ui.label(theme.heading(ui.ctx(), "Traditional"));
            });
            header.col(|ui| {
                ui.label(theme.heading(ui.ctx(), "Pinyin"));
            });
            header.col(|ui| {
                ui.label(theme.heading(ui.ctx(), "Definition"));
            });
        })
        .body(|body| {
            body.rows(text_height, results.len(), |mut row| {
                let entry = &results[row.index()];
                row.col(|ui| {
                    ui.strong(&entry.simplified);
                });
                row.col(|ui| {
                    ui.label(&entry.traditional);
                });
                row.col(|ui| {
                    ui.label(entry.pinyin.to_tone_marks());
                });
                row.col(|ui| {
                    ui.label(entry.senses().next().unwrap_or_default())
                        .on_hover_text(entry.definition.replace('/', "; "));
                });
            });
        });
}
