// Application entry point for the drive health overview

// GUI module containing the main application state
mod gui;

use clap::Parser;
use drive_health::ScanError;
use drive_health::config::{Args, ScanOptions};
use drive_health::report::render_table;
use drive_health::scanner::{Sysfs, scan_devices};
use log::info;
use nix::unistd::Uid;

/// Entry point for the application.
/// Prints a text table with `--print`, otherwise opens a fixed-size window.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // smartctl needs raw access to the block devices
    if !Uid::effective().is_root() {
        return Err(ScanError::PermissionDenied("please run as root".to_string()).into());
    }

    let options = ScanOptions::try_from(&args)?;

    if args.print {
        let reports = scan_devices(&options, &Sysfs::default())?;
        print!("{}", render_table(&reports, options.verbose));
        return Ok(());
    }

    // Configure window options with fixed size of 1200x675 pixels
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 675.0])
            .with_resizable(false),
        ..Default::default()
    };

    info!("opening drive health window");
    eframe::run_native(
        "Drive Health",
        native_options,
        Box::new(move |cc| Ok(Box::new(gui::AppState::new(cc, options)))),
    )
    .map_err(|e| ScanError::Gui(e.to_string()))?;

    Ok(())
}
