use std::io;
use std::path::{Path, PathBuf};

use eframe::egui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir(PathBuf),
    File(PathBuf),
}

/// Sub-directories first, then files whose extension is in `extensions`.
/// Hidden entries are skipped.
pub fn list_entries(dir: &Path, extensions: &[String]) -> io::Result<Vec<Entry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            dirs.push(path);
        } else if has_extension(&path, extensions) {
            files.push(path);
        }
    }
    dirs.sort();
    files.sort();
    Ok(dirs
        .into_iter()
        .map(Entry::Dir)
        .chain(files.into_iter().map(Entry::File))
        .collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// In-window picker restricted to model file extensions.
pub struct FileBrowser {
    open: bool,
    dir: PathBuf,
    entries: Vec<Entry>,
    error: Option<String>,
    extensions: Vec<String>,
}

impl FileBrowser {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            open: false,
            dir: PathBuf::from("."),
            entries: Vec::new(),
            error: None,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn open(&mut self, dir: PathBuf) {
        self.open = true;
        self.change_dir(dir);
    }

    fn change_dir(&mut self, dir: PathBuf) {
        match list_entries(&dir, &self.extensions) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(dir = %dir.display(), "cannot list directory: {err}");
                self.entries.clear();
                self.error = Some(err.to_string());
            }
        }
        self.dir = dir;
    }

    /// Returns the picked file, once, and closes.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<PathBuf> {
        if !self.open {
            return None;
        }
        let mut open = true;
        let mut picked = None;
        let mut next_dir = None;
        egui::Window::new("Select Model")
            .open(&mut open)
            .collapsible(false)
            .default_size([360.0, 300.0])
            .show(ctx, |ui| {
                ui.label(self.dir.display().to_string());
                if let Some(parent) = self.dir.parent() {
                    if ui.button("..").clicked() {
                        next_dir = Some(parent.to_path_buf());
                    }
                }
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for entry in &self.entries {
                        match entry {
                            Entry::Dir(path) => {
                                let label = format!("📁 {}", display_name(path));
                                if ui.selectable_label(false, label).clicked() {
                                    next_dir = Some(path.clone());
                                }
                            }
                            Entry::File(path) => {
                                if ui.selectable_label(false, display_name(path)).clicked() {
                                    picked = Some(path.clone());
                                }
                            }
                        }
                    }
                });
            });
        if let Some(dir) = next_dir {
            self.change_dir(dir);
        }
        self.open = open && picked.is_none();
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_dirs_then_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("runs")).unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        for name in ["b.json", "a.JSON", "weights.h5", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let entries = list_entries(dir.path(), &["json".to_string()]).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::Dir(dir.path().join("runs")),
                Entry::File(dir.path().join("a.JSON")),
                Entry::File(dir.path().join("b.json")),
            ]
        );
    }

    #[test]
    fn unreadable_dir_is_reported_in_the_window() {
        let mut browser = FileBrowser::new(&["json"]);
        browser.open(PathBuf::from("/nonexistent/models"));
        assert!(browser.open);
        assert!(browser.entries.is_empty());
        assert!(browser.error.is_some());
    }
}
