use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use egui::{Color32, Pos2, Sense};
use log::{error, info, warn};

use crate::config::EditorConfig;
use crate::editor::AnnotationEditor;
use crate::element::{ElementType, FontRef, TextStyle};
use crate::event::LoggingEventHandler;
use crate::raster::Raster;
use crate::render::{EguiTextMeasure, FontBook, PainterTarget, TextureCache};
use crate::tools::ToolMode;

/// Tool choices restored across restarts.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)]
struct PersistedTool {
    mode: ToolMode,
    color: [u8; 4],
    stroke_width: f32,
    text_size: f32,
}

impl Default for PersistedTool {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            mode: ToolMode::default(),
            color: config.default_color,
            stroke_width: config.default_stroke_width,
            text_size: config.default_text_size,
        }
    }
}

/// Launch options gathered by `main`.
#[derive(Debug, Default, Clone)]
pub struct LaunchOptions {
    pub image: Option<PathBuf>,
    pub config: EditorConfig,
    pub font: Option<PathBuf>,
}

/// Host window: a toolbar over a zoomable canvas.
pub struct AnnotatorApp {
    editor: AnnotationEditor,
    textures: TextureCache,
    text_input: String,
    stamp_path: String,
    export_path: String,
    status: String,
}

fn read_raster(path: &Path) -> Result<Raster, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Raster::decode(&bytes).map_err(|e| e.to_string())
}

impl AnnotatorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let mut editor = AnnotationEditor::new(options.config)
            .with_text_measure(EguiTextMeasure::new(cc.egui_ctx.clone()));

        if let Some(path) = &options.font {
            let mut fonts = FontBook::new();
            let registered = fs::read(path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| fonts.register("default", false, false, bytes).map_err(|e| e.to_string()));
            match registered {
                Ok(()) => editor = editor.with_fonts(fonts),
                Err(e) => warn!("font {} unusable, exporting with egui's fonts: {e}", path.display()),
            }
        }

        editor.subscribe(LoggingEventHandler::new());

        if let Some(storage) = cc.storage {
            let tool: PersistedTool = eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
            let [r, g, b, a] = tool.color;
            editor.set_stroke_color(Color32::from_rgba_unmultiplied(r, g, b, a));
            editor.set_stroke_width(tool.stroke_width);
            editor.set_text_style(TextStyle::default(), FontRef::default_face(), tool.text_size);
            editor.set_mode(tool.mode);
        }

        let mut status = String::new();
        if let Some(path) = &options.image {
            match read_raster(path) {
                Ok(raster) => editor.open_image(raster),
                Err(e) => {
                    error!("{e}");
                    status = e;
                }
            }
        }

        Self {
            editor,
            textures: TextureCache::new(),
            text_input: String::new(),
            stamp_path: String::new(),
            export_path: "annotated.png".to_owned(),
            status,
        }
    }

    fn export(&mut self) {
        let Some(merged) = self.editor.merge_with_background() else {
            self.status = "Nothing to export".to_owned();
            return;
        };
        let written = merged
            .encode_png()
            .map_err(|e| e.to_string())
            .and_then(|png| fs::write(&self.export_path, png).map_err(|e| e.to_string()));
        match written {
            Ok(()) => {
                info!("exported to {}", self.export_path);
                self.editor.mark_saved();
                self.status = format!("Saved {}", self.export_path);
            }
            Err(e) => {
                error!("export failed: {e}");
                self.status = e;
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for mode in ToolMode::ALL {
                if ui.selectable_label(self.editor.mode() == mode, mode.name()).clicked() {
                    self.editor.set_mode(mode);
                }
            }
            ui.separator();

            let mut color = self.editor.tool().color;
            if ui.color_edit_button_srgba(&mut color).changed() {
                self.editor.set_stroke_color(color);
            }
            let mut width = self.editor.tool().stroke_width;
            if ui.add(egui::Slider::new(&mut width, 1.0..=64.0).text("width")).changed() {
                self.editor.set_stroke_width(width);
            }
            ui.separator();

            if ui.add_enabled(self.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                self.editor.undo();
            }
            if ui.add_enabled(self.editor.can_redo(), egui::Button::new("Redo")).clicked() {
                self.editor.redo();
            }
            ui.separator();

            let has_photo = self.editor.background().is_some();
            if ui.add_enabled(has_photo, egui::Button::new("Rotate")).clicked() {
                self.editor.rotate_background_clockwise();
            }
            if ui.add_enabled(has_photo, egui::Button::new("Mirror")).clicked() {
                self.editor.mirror_background();
            }
        });

        ui.horizontal_wrapped(|ui| {
            let tool = self.editor.tool().clone();
            let mut style = tool.text_style;
            let mut size = tool.text_size;
            let mut changed = ui.checkbox(&mut style.bold, "Bold").changed();
            changed |= ui.checkbox(&mut style.italic, "Italic").changed();
            changed |= ui.checkbox(&mut style.strike, "Strike").changed();
            changed |= ui.add(egui::Slider::new(&mut size, 8.0..=200.0).text("size")).changed();
            if changed {
                self.editor.set_text_style(style, tool.font, size);
            }

            ui.text_edit_singleline(&mut self.text_input);
            if ui.button("Place text").clicked() && !self.text_input.is_empty() {
                self.editor.prepare_text_placement(self.text_input.clone());
            }
            ui.separator();

            ui.text_edit_singleline(&mut self.stamp_path);
            if ui.button("Stamp").clicked() {
                match read_raster(Path::new(&self.stamp_path)) {
                    Ok(raster) => self.editor.prepare_stamp(raster),
                    Err(e) => self.status = e,
                }
            }
            if self.editor.pending_placement().is_some() && ui.button("Cancel placement").clicked() {
                self.editor.cancel_pending_placement();
            }
            ui.separator();

            ui.text_edit_singleline(&mut self.export_path);
            if ui.button("Export").clicked() {
                self.export();
            }
        });

        ui.horizontal(|ui| {
            let dirty = if self.editor.has_unsaved_changes() { " *" } else { "" };
            ui.label(format!(
                "{} elements, zoom {:.0}%{dirty}",
                self.editor.elements().len(),
                self.editor.scale() * 100.0
            ));
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Color32::from_gray(40));

        if self.editor.background().is_none() {
            self.editor.set_view_size(rect.size() / self.editor.scale());
        }

        let zoom = ui.input(|i| i.zoom_delta());
        if zoom != 1.0 && response.hovered() {
            self.editor.on_scale_changed(zoom);
        }

        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        if let Some(pointer) = pointer {
            let view = Pos2::ZERO + (pointer - rect.min);
            if pressed && response.hovered() {
                self.editor.on_pointer_down(view);
            }
            if released {
                self.editor.on_pointer_up(view);
            } else if !self.editor.state().is_idle() {
                self.editor.on_pointer_move(view);
            }
        }

        let painter = painter.with_clip_rect(rect);
        let mut target = PainterTarget::new(&painter, &mut self.textures, rect.min, self.editor.scale());
        self.editor.render(&mut target);

        let live: HashSet<_> = self
            .editor
            .background()
            .map(Raster::id)
            .into_iter()
            .chain(self.editor.elements().iter().filter_map(|element| match element {
                ElementType::Stamp(stamp) => Some(stamp.image().id()),
                _ => None,
            }))
            .collect();
        self.textures.retain(&live);
    }
}

impl eframe::App for AnnotatorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let tool = self.editor.tool();
        let persisted = PersistedTool {
            mode: self.editor.mode(),
            color: tool.color.to_srgba_unmultiplied(),
            stroke_width: tool.stroke_width,
            text_size: tool.text_size,
        };
        eframe::set_value(storage, eframe::APP_KEY, &persisted);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));
    }
}
