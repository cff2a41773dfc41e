use bushou::gui::BushouApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Bushou")
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bushou",
        native_options,
        Box::new(|cc| Ok(Box::new(BushouApp::new(cc)?))),
    )
}
