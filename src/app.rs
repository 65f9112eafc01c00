use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use eframe::egui;
use tracing::{info, warn};

use crate::command::Command;
use crate::link::Link;
use crate::panel::{Layout, Panel};

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct RoverApp {
    link: Link,
    panel: Panel,
}

impl RoverApp {
    pub fn new(link: Link, layout: Layout) -> Self {
        Self {
            link,
            panel: Panel::new(layout),
        }
    }

    fn button(&self, ui: &mut egui::Ui, cmd: Command) {
        if ui.button(cmd.label(self.panel.layout())).clicked() {
            self.link.press(cmd);
        }
    }

    fn bilingual(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.button(ui, Command::MoveForward);
            ui.label(self.panel.status());
            if let Some(mood) = self.panel.mood_text() {
                ui.label(mood);
            }
        });
        ui.horizontal(|ui| {
            self.button(ui, Command::MoveLeft);
            self.button(ui, Command::Stop);
            self.button(ui, Command::MoveRight);
        });
        ui.horizontal(|ui| {
            self.button(ui, Command::Reboot);
            self.button(ui, Command::MoveBackward);
            self.button(ui, Command::GetDistance);
        });
        ui.horizontal(|ui| {
            self.button(ui, Command::GetFace);
            if ui.button("重置 / Reset").clicked() {
                self.link.reset();
            }
        });
    }

    fn plain(&self, ui: &mut egui::Ui) {
        ui.label(self.panel.status());
        for cmd in [
            Command::MoveForward,
            Command::MoveBackward,
            Command::MoveLeft,
            Command::MoveRight,
            Command::Stop,
            Command::Reboot,
            Command::GetDistance,
        ] {
            self.button(ui, cmd);
        }
    }
}

impl eframe::App for RoverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(panel) = self.link.poll() {
            self.panel = panel;
        }
        egui::CentralPanel::default().show(ctx, |ui| match self.panel.layout() {
            Layout::Bilingual => self.bilingual(ui),
            Layout::Plain => self.plain(ui),
        });
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

fn install_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("captions".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("captions".to_owned());
    }
    ctx.set_fonts(fonts);
    Ok(())
}

/// Open the control window and block until it is closed.
pub fn run(link: Link, layout: Layout, font: Option<&Path>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(layout.window_size())
            .with_title(layout.title()),
        ..Default::default()
    };
    let font = font.map(Path::to_path_buf);
    info!(?layout, "opening control window");
    eframe::run_native(
        layout.title(),
        options,
        Box::new(move |cc| {
            if let Some(path) = &font {
                if let Err(e) = install_font(&cc.egui_ctx, path) {
                    warn!(error = %e, "font not loaded; using built-in fonts");
                }
            }
            Ok(Box::new(RoverApp::new(link, layout)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("control window failed: {e}"))
}
