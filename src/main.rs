use clap::Parser;
use eframe::egui;
use medical_dashboard::app::MedicalDashboardApp;
use medical_dashboard::cli::Cli;
use medical_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level())).init();

    let mut state = AppState {
        requested_age_range: cli.requested_age_range(),
        ..Default::default()
    };
    match cli.startup_file() {
        Some(path) => state.load_path(&path),
        None => log::info!("No dataset given; use File → Open…"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Medical Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(MedicalDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
