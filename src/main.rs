use board_uploader::{logging, BoardConfig, BoardUploader};
use eframe::CreationContext;

fn main() {
    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    logging::initialize(config.log_level);
    log::info!("Starting board uploader against {}", config.server_url);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "File Board Uploader",
        options,
        Box::new(move |cc: &CreationContext| Box::new(BoardUploader::new(cc, config))),
    ) {
        log::error!("Window loop failed: {}", e);
    }
}
