use std::path::{Path, PathBuf};

use eframe::egui;
use nn_visualizer_3d::{ModelLoader, NetworkGraph, Outcome, Visualizer, status_message};

use crate::browser::FileBrowser;
use crate::preview;

const WINDOW_TITLE: &str = "Neural Network Visualizer";

pub fn run() -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(VisualizerApp::default()))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the window: {e}"))
}

struct VisualizerApp {
    visualizer: Visualizer,
    model_path: Option<PathBuf>,
    status: String,
    browser: FileBrowser,
    // Layout of the last successful run
    preview: Option<NetworkGraph>,
}

impl Default for VisualizerApp {
    fn default() -> Self {
        let visualizer = Visualizer::default();
        let browser = FileBrowser::new(visualizer.loader.extensions());
        Self {
            visualizer,
            model_path: None,
            status: String::new(),
            browser,
            preview: None,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl VisualizerApp {
    fn prompt(&self) -> String {
        let patterns: Vec<String> = self
            .visualizer
            .loader
            .extensions()
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect();
        format!("Select a model file ({})", patterns.join(" "))
    }

    fn select(&mut self, path: PathBuf) {
        self.status = format!("Selected: {}", file_name(&path));
        self.model_path = Some(path);
        self.preview = None;
    }

    fn visualize(&mut self) {
        let Some(path) = &self.model_path else {
            self.status = "Please select a model file first.".to_string();
            return;
        };
        let result = self.visualizer.visualize_to_downloads(path);
        if let Err(err) = &result {
            tracing::error!(model = %path.display(), "visualization failed: {err}");
        }
        self.status = status_message(&result);
        self.preview = match result {
            Ok(Outcome::Written { graph, .. }) => Some(graph),
            _ => None,
        };
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            if self.visualizer.loader.accepts(&path) {
                self.select(path);
            } else {
                self.status = format!("Unsupported file: {}", file_name(&path));
            }
        }
    }

    fn browse_start_dir(&self) -> PathBuf {
        self.model_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.accept_dropped_files(ctx);
        if let Some(path) = self.browser.show(ctx) {
            self.select(path);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(self.prompt());
            if ui.button("Browse").clicked() {
                let dir = self.browse_start_dir();
                self.browser.open(dir);
            }
            let can_visualize = self.model_path.is_some();
            if ui
                .add_enabled(can_visualize, egui::Button::new("Visualize"))
                .clicked()
            {
                self.visualize();
            }
            ui.label(&self.status);

            if let Some(graph) = &self.preview {
                ui.separator();
                preview::show(ui, graph, &self.visualizer.style);
            }
        });
    }
}
