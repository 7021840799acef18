//! Workout logging form: pick a date and workout per row, register the
//! entries to a local JSON document, then view or erase them later.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use chrono::Local;
use log::info;

mod activity;
use activity::Activity;
mod dates;
use dates::date_window;
mod rows;
use rows::RowList;
mod store;
use store::{DATA_FILE, DayReport, PendingEntry, Store};

/// Persistent user preferences. Currently just the location of the data
/// file; missing fields fall back to their defaults on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    data_file: Option<String>,
}

impl Settings {
    const FILE: &'static str = "workout_logger_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(cfg) = serde_json::from_str(&data) {
                    return cfg;
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(data) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, data);
            }
        }
    }
}

struct TrackerApp {
    rows: RowList,
    store: Store,
    dates: Vec<String>,
    settings: Settings,
    settings_dirty: bool,
    // Register confirmation flow, advanced one entry per dialog.
    registering: bool,
    pending: Vec<PendingEntry>,
    pending_index: usize,
    confirmed: Vec<PendingEntry>,
    // Saved-data listing window.
    show_saved: bool,
    reports: Vec<DayReport>,
    // Erase dialogs.
    confirm_erase_all: bool,
    erase_day_open: bool,
    erase_day_dates: Vec<String>,
    erase_day_input: String,
    toast: Option<(String, Instant)>,
}

impl Default for TrackerApp {
    fn default() -> Self {
        let settings = Settings::load();
        let store = Store::new(settings.data_file.as_deref().unwrap_or(DATA_FILE));
        Self {
            rows: RowList::new(),
            store,
            dates: date_window(Local::now().date_naive()),
            settings,
            settings_dirty: false,
            registering: false,
            pending: Vec::new(),
            pending_index: 0,
            confirmed: Vec::new(),
            show_saved: false,
            reports: Vec::new(),
            confirm_erase_all: false,
            erase_day_open: false,
            erase_day_dates: Vec::new(),
            erase_day_input: String::new(),
            toast: None,
        }
    }
}

impl TrackerApp {
    fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some((message.into(), Instant::now()));
    }

    /// Parse every row up front. Any invalid row aborts the whole register
    /// call before the first confirmation, so nothing is written.
    fn start_register(&mut self) {
        let mut pending = Vec::new();
        for row in self.rows.rows() {
            match PendingEntry::from_row(row) {
                Ok(entry) => pending.push(entry),
                Err(e) => {
                    self.show_toast(e.to_string());
                    return;
                }
            }
        }
        info!("Confirming {} rows", self.rows.len());
        self.pending = pending;
        self.confirmed.clear();
        self.pending_index = 0;
        self.registering = true;
    }

    fn finish_register(&mut self) {
        self.registering = false;
        match self.store.commit(&self.confirmed) {
            Ok(()) => self.show_toast(format!("Saved {} activities", self.confirmed.len())),
            Err(e) => {
                log::error!("Failed to write {}: {e}", self.store.path().display());
                self.show_toast(e.to_string());
            }
        }
        self.pending.clear();
        self.confirmed.clear();
        self.pending_index = 0;
    }

    fn open_saved_window(&mut self) {
        match self.store.render_all() {
            Ok(reports) => {
                self.reports = reports;
                self.show_saved = true;
            }
            Err(e) => self.show_toast(e.to_string()),
        }
    }

    fn open_erase_day_window(&mut self) {
        match self.store.saved_dates() {
            Ok(dates) => {
                self.erase_day_dates = dates;
                self.erase_day_input.clear();
                self.erase_day_open = true;
            }
            Err(e) => self.show_toast(e.to_string()),
        }
    }

    fn choose_data_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(DATA_FILE)
            .save_file()
        {
            info!("Data file moved to {}", path.display());
            self.settings.data_file = Some(path.display().to_string());
            self.store = Store::new(path);
            self.settings_dirty = true;
        }
    }

    fn entry_rows_ui(&mut self, ui: &mut egui::Ui) {
        let Self { rows, dates, .. } = self;
        for (i, row) in rows.rows_mut().iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.label("On");
                egui::ComboBox::from_id_source(("row_date", i))
                    .selected_text(row.date.as_deref().unwrap_or("Choose a date"))
                    .show_ui(ui, |ui| {
                        for d in dates.iter() {
                            ui.selectable_value(&mut row.date, Some(d.clone()), d);
                        }
                    });
                ui.label("I did");
                egui::ComboBox::from_id_source(("row_activity", i))
                    .selected_text(
                        row.activity
                            .map(Activity::title)
                            .unwrap_or("Choose a workout"),
                    )
                    .show_ui(ui, |ui| {
                        for a in Activity::ALL {
                            ui.selectable_value(&mut row.activity, Some(a), a.title());
                        }
                    });
                ui.label("for:");
                ui.add(egui::TextEdit::singleline(&mut row.duration_text).desired_width(60.0));
                ui.label("minutes");
            });
        }
    }

    fn confirm_entry_ui(&mut self, ctx: &egui::Context) {
        let Some(entry) = self.pending.get(self.pending_index).cloned() else {
            self.finish_register();
            return;
        };
        egui::Window::new("Workout Information")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(entry.describe());
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.confirmed.push(entry.clone());
                        self.pending_index += 1;
                    }
                    if ui.button("Skip").clicked() {
                        self.pending_index += 1;
                    }
                });
            });
    }

    fn saved_window_ui(&mut self, ctx: &egui::Context) {
        let mut open = self.show_saved;
        egui::Window::new("Saved Activities")
            .default_height(300.0)
            .open(&mut open)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for report in &self.reports {
                        ui.heading(&report.date);
                        for line in &report.lines {
                            ui.label(line);
                        }
                        ui.separator();
                    }
                });
            });
        self.show_saved = open;
    }

    fn erase_all_ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("Erase All Data")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to erase all saved data?");
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        self.confirm_erase_all = false;
                        match self.store.erase_all() {
                            Ok(()) => self.show_toast("All data erased successfully"),
                            Err(e) => {
                                log::error!(
                                    "Failed to write {}: {e}",
                                    self.store.path().display()
                                );
                                self.show_toast(e.to_string());
                            }
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.confirm_erase_all = false;
                    }
                });
            });
    }

    fn erase_day_ui(&mut self, ctx: &egui::Context) {
        let mut open = self.erase_day_open;
        let mut delete = false;
        let mut cancel = false;
        egui::Window::new("Delete Data")
            .collapsible(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Available dates:");
                for d in &self.erase_day_dates {
                    ui.monospace(d);
                }
                ui.separator();
                ui.label("Enter the date to delete (format: Day DD Month YYYY)");
                ui.text_edit_singleline(&mut self.erase_day_input);
                ui.horizontal(|ui| {
                    delete = ui.button("Delete").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
        self.erase_day_open = open;
        if cancel {
            self.erase_day_open = false;
        }
        if delete {
            let key = self.erase_day_input.trim().to_string();
            match self.store.erase_day(&key) {
                Ok(()) => {
                    self.erase_day_open = false;
                    self.show_toast("Data deleted successfully");
                }
                Err(e) => self.show_toast(e.to_string()),
            }
        }
    }
}

impl App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Choose data file...").clicked() {
                        self.choose_data_file();
                        ui.close_menu();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("Add Entry").clicked() {
                    self.rows.add_row();
                }
                if ui.button("Remove Last Entry").clicked() {
                    if let Err(e) = self.rows.remove_last_row() {
                        self.show_toast(e.to_string());
                    }
                }
                if ui.button("Register Activities").clicked() && !self.registering {
                    self.start_register();
                }
                if ui.button("Display Saved Activities").clicked() {
                    self.open_saved_window();
                }
                if ui.button("Erase Saved Data").clicked() {
                    self.confirm_erase_all = true;
                }
                if ui.button("Erase Specific Day").clicked() {
                    self.open_erase_day_window();
                }
            });
            ui.separator();
            self.entry_rows_ui(ui);
        });

        if self.registering {
            self.confirm_entry_ui(ctx);
        }
        if self.show_saved {
            self.saved_window_ui(ctx);
        }
        if self.confirm_erase_all {
            self.erase_all_ui(ctx);
        }
        if self.erase_day_open {
            self.erase_day_ui(ctx);
        }

        if let Some((msg, start)) = self.toast.clone() {
            if start.elapsed() < Duration::from_secs(3) {
                egui::Area::new(egui::Id::new("status_toast"))
                    .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(msg);
                    });
            } else {
                self.toast = None;
            }
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "Workout Logger",
        options,
        Box::new(|_cc| Box::new(TrackerApp::default())),
    )
}
