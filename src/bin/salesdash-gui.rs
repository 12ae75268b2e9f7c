/*!
 * GUI application for salesdash - auto-sales dashboard builder
 *
 * A cross-platform desktop application providing an intuitive interface for:
 * - Picking the sales CSV to analyze
 * - Choosing which of the 15 catalog charts to show and how many per row
 * - Rendering the dashboard page to PNG or SVG
 *
 * Platform support: Windows, macOS, Linux
 */

use eframe::egui;
use salesdash::{ChartKind, Dataset, Selection, viz};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 640.0])
            .with_min_inner_size([560.0, 420.0])
            .with_title("Auto Sales Dashboard - salesdash"),
        ..Default::default()
    };

    eframe::run_native(
        "Auto Sales Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalesDashApp::new()))),
    )
}

/// Main application state
struct SalesDashApp {
    // Input fields
    data_path: String,
    selected: [bool; 15],
    columns: u8,

    // Output options
    output_dir: String,
    file_name: String,
    page_format: PageFormat,
    panel_width: u32,
    panel_height: u32,
    locale: String,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background operation
    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

#[derive(Debug, Clone, PartialEq)]
enum PageFormat {
    Png,
    Svg,
}

#[derive(Debug)]
enum OperationResult {
    Success(String),
    Error(String),
}

impl SalesDashApp {
    fn new() -> Self {
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        Self {
            data_path: String::new(),
            // Default: the full catalog.
            selected: [true; 15],
            columns: 3,

            output_dir: home_dir,
            file_name: "dashboard".to_string(),
            page_format: PageFormat::Png,
            panel_width: viz::DEFAULT_PANEL_WIDTH,
            panel_height: viz::DEFAULT_PANEL_HEIGHT,
            locale: "en".to_string(),

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            operation_receiver: None,
        }
    }

    fn selected_charts(&self) -> Vec<ChartKind> {
        ChartKind::ALL
            .into_iter()
            .filter(|k| self.selected[(k.id() - 1) as usize])
            .collect()
    }

    fn validate_inputs(&self) -> Result<(), String> {
        if self.data_path.trim().is_empty() {
            return Err("Please choose a sales CSV file".to_string());
        }
        if self.selected_charts().is_empty() {
            return Err("Please select at least one chart".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("Please specify an output directory".to_string());
        }
        if !(200..=2000).contains(&self.panel_width) || !(200..=2000).contains(&self.panel_height) {
            return Err("Panel size must be between 200 and 2000 pixels".to_string());
        }
        Ok(())
    }

    fn start_operation(&mut self) {
        if let Err(err) = self.validate_inputs() {
            self.error_message = err;
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Rendering dashboard...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);

        // Clone the data we need for the background thread
        let data_path = self.data_path.clone();
        let charts = self.selected_charts();
        let columns = self.columns as usize;
        let extension = match self.page_format {
            PageFormat::Png => "png",
            PageFormat::Svg => "svg",
        };
        let out_path = PathBuf::from(self.output_dir.clone())
            .join(format!("{}.{}", self.file_name.trim(), extension));
        let options = viz::RenderOptions {
            panel_width: self.panel_width,
            panel_height: self.panel_height,
            locale: self.locale.clone(),
        };

        thread::spawn(move || {
            let result = perform_operation(&data_path, charts, columns, &out_path, &options);
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Success(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }
}

fn perform_operation(
    data_path: &str,
    charts: Vec<ChartKind>,
    columns: usize,
    out_path: &PathBuf,
    options: &viz::RenderOptions,
) -> OperationResult {
    let dataset = match Dataset::load(data_path) {
        Ok(ds) => ds,
        Err(err) => return OperationResult::Error(format!("Loading failed: {err}")),
    };
    let selection = match Selection::new(charts, columns) {
        Ok(sel) => sel,
        Err(err) => return OperationResult::Error(err.to_string()),
    };
    match viz::render_dashboard(&dataset, &selection, out_path, options) {
        Ok(report) if report.failures.is_empty() => OperationResult::Success(format!(
            "Rendered {} panels to {}",
            report.rendered.len(),
            out_path.display()
        )),
        Ok(report) => OperationResult::Success(format!(
            "Rendered {} panels to {} ({} failed)",
            report.rendered.len(),
            out_path.display(),
            report.failures.len()
        )),
        Err(err) => OperationResult::Error(format!("Rendering failed: {err}")),
    }
}

impl eframe::App for SalesDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_operation_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Auto Sales Dashboard");
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label("Data");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Sales CSV:");
                        ui.text_edit_singleline(&mut self.data_path)
                            .on_hover_text("Order lines with day/month/year dates");
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new()
                                .add_filter("CSV", &["csv"])
                                .pick_file()
                        {
                            self.data_path = path.to_string_lossy().to_string();
                        }
                    });
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Charts");
                        if ui.button("Select all").clicked() {
                            self.selected = [true; 15];
                        }
                        if ui.button("Clear").clicked() {
                            self.selected = [false; 15];
                        }
                    });
                    ui.add_space(5.0);

                    egui::Grid::new("chart_catalog")
                        .num_columns(2)
                        .spacing([24.0, 4.0])
                        .show(ui, |ui| {
                            for (idx, kind) in ChartKind::ALL.iter().enumerate() {
                                ui.checkbox(
                                    &mut self.selected[idx],
                                    format!("{}. {}", kind.id(), kind.title()),
                                )
                                .on_hover_text(kind.subtitle());
                                if idx % 2 == 1 {
                                    ui.end_row();
                                }
                            }
                        });

                    ui.add_space(5.0);
                    ui.add(egui::Slider::new(&mut self.columns, 1..=5).text("charts per row"));

                    if self.selected_charts().is_empty() {
                        ui.colored_label(
                            egui::Color32::from_rgb(200, 150, 0),
                            "Nothing selected - pick at least one chart to render.",
                        );
                    }
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label("Output");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Directory:");
                        ui.text_edit_singleline(&mut self.output_dir);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder()
                        {
                            self.output_dir = path.to_string_lossy().to_string();
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("File name:");
                        ui.text_edit_singleline(&mut self.file_name);
                        ui.radio_value(&mut self.page_format, PageFormat::Png, "PNG");
                        ui.radio_value(&mut self.page_format, PageFormat::Svg, "SVG");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Panel size:");
                        ui.add(egui::DragValue::new(&mut self.panel_width).range(200..=2000));
                        ui.label("x");
                        ui.add(egui::DragValue::new(&mut self.panel_height).range(200..=2000));
                        ui.label("pixels");
                    });
                });

                ui.add_space(10.0);

                ui.collapsing("Advanced Options", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Locale:");
                        egui::ComboBox::from_label("")
                            .selected_text(&self.locale)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut self.locale, "en".to_string(), "English (en)");
                                ui.selectable_value(&mut self.locale, "de".to_string(), "German (de)");
                                ui.selectable_value(&mut self.locale, "fr".to_string(), "French (fr)");
                                ui.selectable_value(&mut self.locale, "es".to_string(), "Spanish (es)");
                                ui.selectable_value(&mut self.locale, "it".to_string(), "Italian (it)");
                            });
                    });
                });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    let render_button = ui.add_enabled(
                        !self.is_loading,
                        egui::Button::new(if self.is_loading {
                            "Rendering..."
                        } else {
                            "Render dashboard"
                        }),
                    );
                    if render_button.clicked() {
                        self.start_operation();
                    }
                    if self.is_loading {
                        ui.spinner();
                    }
                });

                ui.add_space(10.0);

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::from_rgb(0, 150, 0), &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::from_rgb(200, 0, 0), &self.error_message);
                }
            });
        });
    }
}
