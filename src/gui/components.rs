use drive_health::models::Severity;
use eframe::egui;

pub fn stat_card(ui: &mut egui::Ui, width: f32, height: f32, label: &str, value: &str, color: egui::Color32) {
    egui::Frame::none()
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(230)))
        .rounding(10.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(width);
            ui.set_height(height);
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(label)
                        .size(11.0)
                        .color(egui::Color32::from_gray(120)),
                );
                ui.add_space(8.0);
                ui.label(egui::RichText::new(value).size(22.0).color(color).strong());
            });
        });
}

/// Badge color for a health verdict.
pub fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Good => egui::Color32::from_rgb(16, 185, 129),
        Severity::Critical => egui::Color32::from_rgb(239, 68, 68),
        Severity::Timeout => egui::Color32::from_rgb(168, 85, 247),
        Severity::Info => egui::Color32::from_rgb(59, 130, 246),
        Severity::NoSmart => egui::Color32::from_gray(90),
    }
}

/// Red at 45% and below, amber below 80%, green above.
pub fn lifetime_color(percent: Option<u8>) -> egui::Color32 {
    match percent {
        Some(p) if p <= 45 => egui::Color32::from_rgb(239, 68, 68),
        Some(p) if p < 80 => egui::Color32::from_rgb(245, 158, 11),
        Some(_) => egui::Color32::from_rgb(34, 197, 94),
        None => egui::Color32::from_gray(150),
    }
}
