// Main application state and UI rendering logic for the drive health overview

use crate::gui::{lifetime_color, severity_color, stat_card};
use drive_health::Result;
use drive_health::config::ScanOptions;
use drive_health::models::DeviceReport;
use drive_health::scanner::{Sysfs, scan_in_background};
use eframe::egui;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Main application state for the eframe app.
pub struct AppState {
    /// The scanned drives wrapped in Arc for cheap cloning
    drives: Vec<Arc<DeviceReport>>,

    /// Index of currently selected drive in the drives vector
    selected: usize,

    /// Last error message if scanning drives failed
    last_error: Option<String>,

    options: ScanOptions,
    sysfs: Sysfs,

    /// Timestamp of the last automatic refresh
    last_refresh: Instant,

    /// How often to automatically rescan; each scan runs smartctl on every drive
    refresh_interval: Duration,

    /// Scan running on a worker thread, if any
    pending: Option<Receiver<Result<Vec<DeviceReport>>>>,
}

impl AppState {
    /// Creates a new application state instance and performs the first scan.
    pub fn new(cc: &eframe::CreationContext<'_>, options: ScanOptions) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let mut s = Self {
            drives: Vec::new(),
            selected: 0,
            last_error: None,
            options,
            sysfs: Sysfs::default(),
            last_refresh: Instant::now(),
            refresh_interval: Duration::from_secs(30),
            pending: None,
        };

        s.refresh();
        s
    }

    /// Starts a rescan unless one is already running.
    fn refresh(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(scan_in_background(self.options.clone(), self.sysfs.clone()));
        }
        self.last_refresh = Instant::now();
    }

    /// Picks up a finished scan without blocking the frame.
    fn poll_scan(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.apply_scan(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.last_error = Some("drive scan stopped unexpectedly".to_string());
            }
        }
    }

    /// On error the list is cleared and the message kept for display.
    fn apply_scan(&mut self, result: Result<Vec<DeviceReport>>) {
        self.last_error = None;
        match result {
            Ok(list) => {
                debug!("scan returned {} drive(s)", list.len());
                self.drives = list.into_iter().map(Arc::new).collect();

                if self.selected >= self.drives.len() {
                    self.selected = 0;
                }
            }
            Err(e) => {
                warn!("drive scan failed: {e}");
                self.drives.clear();
                self.selected = 0;
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn drive_card(&mut self, ui: &mut egui::Ui, i: usize) {
        let d = Arc::clone(&self.drives[i]);
        let is_selected = self.selected == i;

        let frame = if is_selected {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(220, 235, 255))
                .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(70, 130, 220)))
                .rounding(8.0)
                .inner_margin(12.0)
        } else {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(250, 250, 250))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(220)))
                .rounding(8.0)
                .inner_margin(12.0)
        };

        let response = frame.show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&d.dev).strong().size(14.0));
                ui.add_space(2.0);
                ui.label(
                    egui::RichText::new(&d.model)
                        .size(11.0)
                        .color(egui::Color32::from_gray(100)),
                );
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    let color = severity_color(d.health.severity());
                    ui.label(egui::RichText::new("●").color(color).size(12.0));
                    ui.label(egui::RichText::new(d.health.label()).size(11.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(&d.lifetime)
                                .size(11.0)
                                .color(lifetime_color(d.lifetime_percent)),
                        );
                    });
                });
            });
        });

        if response.response.interact(egui::Sense::click()).clicked() {
            self.selected = i;
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_scan();
        if self.pending.is_some() {
            ctx.request_repaint_after(Duration::from_millis(200));
        } else {
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        if self.last_refresh.elapsed() >= self.refresh_interval {
            self.refresh();
        }

        // LEFT SIDEBAR: drive list
        egui::SidePanel::left("drive_panel")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new("Drives").size(18.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.pending.is_some() {
                            ui.spinner();
                            return;
                        }

                        let refresh_btn =
                            egui::Button::new(egui::RichText::new("🔄").size(14.0)).frame(false);

                        if ui.add(refresh_btn).on_hover_text("Rescan").clicked() {
                            self.refresh();
                        }
                    });
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for i in 0..self.drives.len() {
                        self.drive_card(ui, i);
                        ui.add_space(8.0);
                    }
                });

                if let Some(err) = &self.last_error {
                    ui.add_space(10.0);
                    ui.separator();
                    ui.add_space(10.0);
                    ui.colored_label(egui::Color32::RED, err);
                }
            });

        // CENTRAL PANEL: details of the selected drive
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_rgb(245, 247, 250)))
            .show(ctx, |ui| {
                if self.drives.is_empty() && self.pending.is_some() {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Scanning drives...");
                    });
                    return;
                }

                if self.drives.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.heading("No drives detected");
                            ui.add_space(8.0);
                            ui.label("Make sure smartctl is installed and run as root");
                            if let Some(err) = &self.last_error {
                                ui.add_space(6.0);
                                ui.label(format!("Last error: {}", err));
                            }
                        });
                    });
                    return;
                }

                let di = self.drives[self.selected].as_ref();
                let muted = egui::Color32::from_gray(100);

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(20.0);

                    // Header card with model and health badge
                    ui.horizontal(|ui| {
                        ui.add_space(20.0);
                        egui::Frame::none()
                            .fill(egui::Color32::WHITE)
                            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(230)))
                            .rounding(12.0)
                            .inner_margin(10.0)
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width() - 40.0);

                                ui.horizontal(|ui| {
                                    ui.vertical(|ui| {
                                        ui.heading(egui::RichText::new(&di.model).size(22.0));
                                        ui.add_space(4.0);

                                        ui.horizontal(|ui| {
                                            ui.label(egui::RichText::new(&di.size).size(16.0).color(muted));
                                            ui.label(egui::RichText::new("•").color(egui::Color32::from_gray(150)));
                                            ui.label(egui::RichText::new(&di.dev).size(16.0).color(muted));
                                            if let Some(class) = di.class {
                                                ui.label(egui::RichText::new("•").color(egui::Color32::from_gray(150)));
                                                ui.label(egui::RichText::new(class.label()).size(16.0).color(muted));
                                            }
                                        });
                                    });

                                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                        egui::Frame::none()
                                            .fill(severity_color(di.health.severity()))
                                            .rounding(8.0)
                                            .inner_margin(egui::vec2(20.0, 10.0))
                                            .show(ui, |ui| {
                                                ui.vertical_centered(|ui| {
                                                    ui.label(
                                                        egui::RichText::new(di.health.label())
                                                            .color(egui::Color32::WHITE)
                                                            .size(14.0)
                                                            .strong(),
                                                    );
                                                    ui.label(
                                                        egui::RichText::new(di.health.to_string())
                                                            .color(egui::Color32::WHITE)
                                                            .size(28.0)
                                                            .strong(),
                                                    );
                                                });
                                            });
                                    });
                                });
                            });
                        ui.add_space(20.0);
                    });

                    ui.add_space(15.0);

                    ui.horizontal(|ui| {
                        ui.add_space(20.0);
                        egui::Frame::none()
                            .fill(egui::Color32::WHITE)
                            .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(220)))
                            .rounding(10.0)
                            .inner_margin(15.0)
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width() - 40.0);

                                ui.label(egui::RichText::new("Drive Information").size(14.0).strong());
                                ui.add_space(8.0);

                                egui::Grid::new("info_grid")
                                    .striped(true)
                                    .spacing([15.0, 6.0])
                                    .show(ui, |ui| {
                                        for header in &["Serial no.", "Firmware", "Type", "S.M.A.R.T."] {
                                            ui.label(egui::RichText::new(*header).strong().size(11.0));
                                        }
                                        ui.end_row();

                                        ui.label(egui::RichText::new(&di.serial).size(11.0));
                                        ui.label(egui::RichText::new(&di.firmware).size(11.0));
                                        ui.label(
                                            egui::RichText::new(di.class.map_or("-", |c| c.label())).size(11.0),
                                        );
                                        ui.label(egui::RichText::new(di.smart_support.to_string()).size(11.0));
                                        ui.end_row();
                                    });
                            });
                        ui.add_space(20.0);
                    });

                    ui.add_space(12.0);

                    let card_width = 263.0;
                    let card_spacing = 11.0;
                    let card_height = 75.0;

                    // Row 1: capacity and usage
                    ui.horizontal(|ui| {
                        ui.add_space(20.0);
                        stat_card(ui, card_width, card_height, "Capacity", &di.size, egui::Color32::from_rgb(59, 130, 246));
                        ui.add_space(card_spacing);
                        stat_card(ui, card_width, card_height, "Runtime", &di.runtime, egui::Color32::from_rgb(168, 85, 247));
                        ui.add_space(card_spacing);
                        stat_card(ui, card_width, card_height, "Data written", &di.written, egui::Color32::from_rgb(251, 146, 60));
                    });

                    ui.add_space(10.0);

                    // Row 2: wear and health
                    ui.horizontal(|ui| {
                        ui.add_space(20.0);
                        stat_card(ui, card_width, card_height, "Rotation", &di.rotation, egui::Color32::from_rgb(139, 92, 246));
                        ui.add_space(card_spacing);
                        stat_card(
                            ui,
                            card_width,
                            card_height,
                            "Lifetime remaining",
                            &di.lifetime,
                            lifetime_color(di.lifetime_percent),
                        );
                        ui.add_space(card_spacing);
                        stat_card(
                            ui,
                            card_width,
                            card_height,
                            "Health",
                            &di.health.label(),
                            severity_color(di.health.severity()),
                        );
                    });

                    ui.add_space(15.0);
                });
            });
    }
}
