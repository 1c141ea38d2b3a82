mod parser;
mod render;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, Frame, Id, RichText, ScrollArea, Vec2};
use render::DisplayFragment;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(Vec2::new(600.0, 400.0)),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Chat Viewer",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let app = AppState::default();
            app.apply_theme(cc.egui_ctx.clone());
            Box::new(app)
        }),
    ) {
        eprintln!("eframe error: {e}");
    }
    Ok(())
}

struct AppState {
    theme_dark: bool,
    file_name: Option<String>,
    /// Initial directory for the next file dialog; in-memory only.
    previous_folder: Option<PathBuf>,
    fragments: Vec<DisplayFragment>,
    message_count: usize,
    errors: Vec<String>,

    // UI helpers
    scroll_area_key: String,
}

#[derive(Default, Clone)]
struct Loaded {
    file_name: Option<String>,
    fragments: Vec<DisplayFragment>,
    message_count: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            theme_dark: true,
            file_name: None,
            previous_folder: None,
            fragments: vec![],
            message_count: 0,
            errors: vec![],
            scroll_area_key: String::new(),
        }
    }
}

impl AppState {
    fn apply_theme(&self, ctx: egui::Context) {
        if self.theme_dark {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    fn set_loaded(&mut self, loaded: Loaded) {
        self.file_name = loaded.file_name;
        self.fragments = loaded.fragments;
        self.message_count = loaded.message_count;
        // Reset scroll position by changing the scroll area id key
        self.scroll_area_key = self
            .file_name
            .clone()
            .unwrap_or_else(|| "__empty__".to_string());
    }

    /// Shared load path for the file dialog and drag & drop. A rejected or
    /// corrupt file surfaces one generic notice and leaves prior content
    /// untouched.
    fn open_path(&mut self, path: &Path) {
        if !is_msg_file(path) {
            tracing::warn!(path = %path.display(), "rejected non-.msg file");
            self.errors
                .push("File selected is an invalid format. Please select a .msg file.".to_string());
            return;
        }
        match load_from_path(path) {
            Ok(loaded) => {
                tracing::info!(path = %path.display(), messages = loaded.message_count, "loaded chat history");
                self.previous_folder = path.parent().map(Path::to_path_buf);
                self.set_loaded(loaded);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load chat history");
                self.errors.push(format!("{e}"));
            }
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top control bar
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("Upload file…").clicked() {
                    let mut dialog = rfd::FileDialog::new().add_filter("Chat log", &["msg"]);
                    if let Some(folder) = self.previous_folder.as_ref().filter(|f| f.is_dir()) {
                        dialog = dialog.set_directory(folder);
                    }
                    // None means the user cancelled the chooser; do nothing.
                    if let Some(path) = dialog.pick_file() {
                        self.open_path(&path);
                    }
                }

                if ui.button("Clear").clicked() {
                    *self = AppState {
                        theme_dark: self.theme_dark,
                        previous_folder: self.previous_folder.take(),
                        ..Default::default()
                    };
                    self.apply_theme(ctx.clone());
                }

                let theme_label = if self.theme_dark { "Theme: Dark" } else { "Theme: Light" };
                if ui.button(theme_label).clicked() {
                    self.theme_dark = !self.theme_dark;
                    self.apply_theme(ctx.clone());
                }

                ui.separator();
                if let Some(name) = &self.file_name {
                    ui.label(RichText::new(name).italics());
                } else {
                    ui.label(RichText::new("No file uploaded").italics());
                }
            });
        });

        // Error banner (non-blocking)
        if !self.errors.is_empty() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                Frame::none()
                    .fill(Color32::from_rgb(255, 235, 238))
                    .inner_margin(egui::Margin::symmetric(8.0, 6.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let msg = self.errors.join(" • ");
                            ui.colored_label(Color32::from_rgb(183, 28, 28), msg);
                            if ui.button("Dismiss").clicked() {
                                self.errors.clear();
                            }
                        });
                    });
            });
        }

        // Central content with drag & drop handling
        egui::CentralPanel::default().show(ctx, |ui| {
            let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
            for f in dropped_files {
                if let Some(path) = f.path {
                    self.open_path(&path);
                    break;
                }
            }

            let scroll_id = Id::new("scroll_conversation").with(self.scroll_area_key.clone());
            ScrollArea::vertical()
                .id_source(scroll_id)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    ui.add_space(6.0);
                    if self.fragments.is_empty() {
                        ui.label(
                            "Upload a .msg file using the Upload button and chat history will display here.",
                        );
                    } else {
                        render_fragments(ui, &self.fragments);
                    }
                    ui.add_space(6.0);
                });
        });

        // Bottom status line
        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let fname = self
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "(no file)".to_string());
                ui.label(format!("File: {}", fname));
                ui.separator();
                ui.label(format!("Messages: {}", self.message_count));
            });
        });
    }
}

// ---------------- Loading ----------------

/// The extension must be exactly `msg`, case-sensitively, before the parser
/// ever sees the file.
fn is_msg_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("msg")
}

fn load_from_path(path: &Path) -> Result<Loaded> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records =
        parser::parse(&text).context("The uploaded chat history file is corrupt or broken.")?;
    Ok(Loaded {
        file_name: Some(
            path.file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        ),
        message_count: records.len(),
        fragments: render::build_fragments(&records),
    })
}

// ---------------- Rendering helpers ----------------

/// Render the fragment stream; fragments between `LineBreak`s form one
/// wrapped row.
fn render_fragments(ui: &mut egui::Ui, fragments: &[DisplayFragment]) {
    for row in fragments.split(|f| matches!(f, DisplayFragment::LineBreak)) {
        if row.is_empty() {
            continue;
        }
        ui.horizontal_wrapped(|ui| {
            for fragment in row {
                render_fragment(ui, fragment);
            }
        });
    }
}

fn render_fragment(ui: &mut egui::Ui, fragment: &DisplayFragment) {
    match fragment {
        DisplayFragment::Timestamp(text) => {
            ui.label(RichText::new(text));
        }
        DisplayFragment::SenderLabel(text) => {
            ui.label(RichText::new(text).color(Color32::from_rgb(100, 149, 237)));
        }
        DisplayFragment::PlainWord(word, bold) => {
            let text = RichText::new(word);
            ui.label(if *bold { text.strong() } else { text });
        }
        DisplayFragment::EmojiToken(asset) => match emoji_image(asset) {
            Some(source) => {
                ui.add(egui::Image::new(source).fit_to_exact_size(Vec2::splat(16.0)));
            }
            // Unknown asset id: fall back to showing the id as text.
            None => {
                ui.label(RichText::new(*asset).strong());
            }
        },
        DisplayFragment::LineBreak => {}
    }
}

/// Asset identifier → embedded image. `include_image!` wants a literal path,
/// so this table lives at the render sink rather than next to the token table.
fn emoji_image(asset: &str) -> Option<egui::ImageSource<'static>> {
    match asset {
        "smile_happy.gif" => Some(egui::include_image!("../assets/smile_happy.gif")),
        "smile_sad.gif" => Some(egui::include_image!("../assets/smile_sad.gif")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_accepts_only_msg() {
        assert!(is_msg_file(Path::new("history.msg")));
        assert!(is_msg_file(Path::new("/some/dir/chat.log.msg")));
        assert!(!is_msg_file(Path::new("history.MSG")));
        assert!(!is_msg_file(Path::new("history.txt")));
        assert!(!is_msg_file(Path::new("msg")));
    }

    #[test]
    fn emoji_assets_are_embedded() {
        assert!(emoji_image("smile_happy.gif").is_some());
        assert!(emoji_image("smile_sad.gif").is_some());
        assert!(emoji_image("unknown.gif").is_none());
    }
}
