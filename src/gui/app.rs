use std::{
    path::Path,
    sync::Arc,
    time::{
        Duration,
        Instant,
    },
};

use eframe::{
    egui,
    epaint::text::{
        FontInsert,
        FontPriority,
        InsertFontFamily,
    },
};
use log::{
    debug,
    info,
    warn,
};

use super::{
    flashcard_panel::flashcard_panel,
    message_overlay::MessageOverlay,
    search_panel::{
        search_window,
        SearchPanel,
    },
    theme::{
        set_theme,
        Theme,
    },
};
use crate::{
    client::{
        HanziApi,
        HttpHanziApi,
    },
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        BushouError,
    },
    persistence::store::{
        FileStore,
        KeyValueStore,
    },
    radicals::{
        RadicalTable,
        VariantIndex,
    },
    settings::Settings,
    study::{
        swipe::DEFAULT_SWIPE_THRESHOLD,
        BookmarkSet,
        CharacterCache,
        Flashcards,
        Group,
        Revision,
        SearchController,
        SwipeDetector,
    },
};

const SERVER_RECHECK_INTERVAL: Duration = Duration::from_secs(30);

/// System fonts tried, in order, when no CJK font is configured.
const SYSTEM_CJK_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simsun.ttc",
];

pub struct BushouApp {
    // Configuration
    pub(super) settings: Settings,

    // UI State
    pub(super) theme: Theme,
    pub(super) message_overlay: MessageOverlay,
    pub(super) search_panel: SearchPanel,
    pub(super) swipe: SwipeDetector,

    // Study state
    pub(super) radicals: Arc<RadicalTable>,
    pub(super) flashcards: Flashcards,
    pub(super) bookmarks: BookmarkSet,
    pub(super) characters: Arc<CharacterCache>,
    pub(super) search: Arc<SearchController>,

    // External Services
    api: Arc<dyn HanziApi>,
    pub(super) server_connected: Option<bool>,
    last_server_check: Option<Instant>,
    pub(super) task_manager: TaskManager,
}

impl BushouApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, BushouError> {
        let settings = Settings::load();
        let timeout = settings.request_timeout();

        let radicals = Arc::new(RadicalTable::builtin()?);
        let variants = Arc::new(VariantIndex::build(&radicals));
        let revision = Revision::new();

        let api: Arc<dyn HanziApi> = Arc::new(HttpHanziApi::new(&settings.api_base_url, timeout)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::in_app_data_dir());
        let bookmarks = BookmarkSet::load(store, revision.clone());

        let characters = Arc::new(CharacterCache::new(
            api.clone(),
            radicals.clone(),
            revision.clone(),
            timeout,
        ));
        let search =
            Arc::new(SearchController::new(api.clone(), variants, revision.clone(), timeout));
        let flashcards = Flashcards::new(radicals.clone(), settings.autoplay_interval());

        let task_manager = TaskManager::new()?;
        let ctx = cc.egui_ctx.clone();
        task_manager.watch_revision(&revision, move || ctx.request_repaint());

        let mut app = Self {
            settings,

            theme: Theme::ink(),
            message_overlay: MessageOverlay::new(),
            search_panel: SearchPanel::default(),
            swipe: SwipeDetector::new(DEFAULT_SWIPE_THRESHOLD),

            radicals,
            flashcards,
            bookmarks,
            characters,
            search,

            api,
            server_connected: None,
            last_server_check: None,
            task_manager,
        };

        app.setup_fonts(&cc.egui_ctx);
        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.3);
        set_theme(&cc.egui_ctx, &app.theme);
        app.check_server();

        Ok(app)
    }

    fn setup_fonts(&mut self, ctx: &egui::Context) {
        let configured = self.settings.font_path.clone();
        let candidates = configured
            .iter()
            .map(|p| p.as_path())
            .chain(SYSTEM_CJK_FONTS.iter().map(Path::new));

        for path in candidates {
            match std::fs::read(path) {
                Ok(bytes) => {
                    info!("Using CJK font {:?}", path);
                    ctx.add_font(FontInsert::new(
                        "cjk",
                        egui::FontData::from_owned(bytes),
                        vec![
                            InsertFontFamily {
                                family: egui::FontFamily::Proportional,
                                priority: FontPriority::Lowest,
                            },
                            InsertFontFamily {
                                family: egui::FontFamily::Monospace,
                                priority: FontPriority::Lowest,
                            },
                        ],
                    ));
                    return;
                }
                Err(e) => debug!("Font {:?} unavailable: {}", path, e),
            }
        }

        warn!("No CJK font found; set font_path in settings.json");
        self.message_overlay
            .set_error("No CJK font found. Set font_path in settings.json.".to_string());
    }

    fn check_server(&mut self) {
        self.last_server_check = Some(Instant::now());
        self.task_manager.check_server(self.api.clone());
    }

    fn update_server_status(&mut self) {
        if self.server_connected == Some(true) {
            return;
        }
        let due = self.last_server_check.is_none_or(|last| last.elapsed() >= SERVER_RECHECK_INTERVAL);
        if due {
            self.check_server();
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        debug!("Task finished: {}", result.task_type());
        match result {
            TaskResult::ServerConnection(connected) => {
                if connected && self.server_connected != Some(true) {
                    self.message_overlay.set_message("Connected to the query server".to_string());
                } else if !connected && self.server_connected != Some(false) {
                    self.message_overlay.set_error(format!(
                        "Query server unreachable at {}",
                        self.settings.api_base_url
                    ));
                }
                self.server_connected = Some(connected);
            }
            TaskResult::SearchSettled(token) => {
                debug!("Search {} settled", token);
            }
            TaskResult::CharactersLoaded { id, state } => {
                debug!("Characters for radical {}: {:?}", id, state);
            }
            TaskResult::CharactersToggled { id, shown } => {
                debug!("Characters for radical {} shown: {}", id, shown);
            }
        }
    }

    pub(super) fn select_group(&mut self, group: Group) {
        self.flashcards.select_group(group, &self.bookmarks.marked());
    }

    pub(super) fn toggle_bookmark(&mut self, id: u32) {
        match self.bookmarks.toggle(id) {
            Ok(_) => self.flashcards.refresh_difficult(&self.bookmarks.marked()),
            Err(e) => {
                warn!("Failed to save bookmarks: {}", e);
                self.message_overlay.set_error(format!("Could not save bookmarks: {}", e));
            }
        }
    }

    /// Starts a search and brings the search window up.
    pub(super) fn start_search(&mut self, query: String) {
        self.search_panel.open_with(&query);
        if query.trim().is_empty() {
            self.search.clear();
        } else {
            self.task_manager.search(self.search.clone(), query);
        }
    }

    /// Searches for a character picked from a result list.
    pub(super) fn open_character(&mut self, character: String) {
        self.search_panel.open_with(&character);
        self.task_manager.open_character(self.search.clone(), character);
    }

    /// Shows a radical from the search results as the current flashcard.
    pub(super) fn study_radical(&mut self, id: u32) {
        self.select_group(Group::All);
        if let Some(index) = self.flashcards.order().iter().position(|&o| o == id) {
            self.flashcards.go_to(index);
        }
    }

    pub(super) fn set_autoplay_period(&mut self, period: Duration) {
        self.flashcards.set_period(period);
        self.settings.autoplay_interval_ms = period.as_millis() as u64;
        self.save_settings();
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
            self.message_overlay.set_error(format!("Could not save settings: {}", e));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (left, right, space, slash) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::Slash),
            )
        });

        if left {
            self.flashcards.prev();
        }
        if right {
            self.flashcards.next();
        }
        if space {
            self.flashcards.toggle_autoplay(Instant::now());
        }
        if slash {
            self.search_panel.open_with("");
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.theme.heading(ctx, "部首"));
                ui.separator();

                let current = self.flashcards.group();
                let mut selected = current;
                egui::ComboBox::from_id_salt("group")
                    .selected_text(current.to_string())
                    .show_ui(ui, |ui| {
                        for group in [Group::All, Group::Popular, Group::Random, Group::Difficult] {
                            ui.selectable_value(&mut selected, group, group.to_string());
                        }
                        ui.separator();
                        for strokes in self.radicals.stroke_counts() {
                            let group = Group::Strokes(strokes);
                            ui.selectable_value(&mut selected, group, group.to_string());
                        }
                    });
                if selected != current {
                    self.select_group(selected);
                }
                if current == Group::Random && ui.button("🔀").on_hover_text("Reshuffle").clicked() {
                    self.select_group(Group::Random);
                }

                ui.separator();

                let autoplay_label = if self.flashcards.is_autoplaying() { "⏸ Pause" } else { "▶ Autoplay" };
                if ui.button(autoplay_label).clicked() {
                    self.flashcards.toggle_autoplay(Instant::now());
                }

                let mut seconds = self.flashcards.period().as_secs_f32();
                let response = ui.add(
                    egui::DragValue::new(&mut seconds).range(0.5..=60.0).speed(0.1).suffix(" s"),
                );
                if response.changed() {
                    self.flashcards.set_period(Duration::from_secs_f32(seconds));
                }
                if response.drag_stopped() || response.lost_focus() {
                    self.set_autoplay_period(self.flashcards.period());
                }

                ui.separator();

                if ui.button("🔍 Search").clicked() {
                    self.search_panel.open_with("");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = match self.server_connected {
                        Some(true) => ("● Server", self.theme.jade(ctx)),
                        Some(false) => ("● Offline", self.theme.seal(ctx)),
                        None => ("● Connecting", self.theme.gold(ctx)),
                    };
                    ui.label(egui::RichText::new(text).color(color))
                        .on_hover_text(self.settings.api_base_url.as_str());
                    ui.label(self.theme.muted(
                        ctx,
                        &format!("{} difficult", self.bookmarks.len()),
                    ));
                });
            });
        });
    }
}

impl eframe::App for BushouApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let task_results = self.task_manager.poll_results();

        for result in task_results {
            self.handle_task_result(result);
        }

        self.update_server_status();
        self.handle_shortcuts(ctx);

        let now = Instant::now();
        self.flashcards.tick(now);
        if let Some(wait) = self.flashcards.time_until_advance(now) {
            ctx.request_repaint_after(wait);
        }
        if self.server_connected != Some(true) {
            ctx.request_repaint_after(SERVER_RECHECK_INTERVAL);
        }

        self.top_bar(ctx);
        flashcard_panel(ctx, self);
        search_window(ctx, self);
        self.message_overlay.show(ctx, &self.theme);
    }
}
