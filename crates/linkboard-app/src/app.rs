//! Application shell: palette panel, canvas panel, and event routing.

use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke};
use kurbo::Point;
use linkboard_core::{Editor, SHAPE_PAYLOAD_MIME, default_shapes, palette};
use linkboard_render::{LayoutGeometry, Scene, build_scene, hit_test, style};

/// Top-level application state.
pub struct LinkboardApp {
    editor: Editor,
}

impl Default for LinkboardApp {
    fn default() -> Self {
        Self {
            editor: Editor::new(),
        }
    }
}

impl LinkboardApp {
    /// Create the app over an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }
}

impl eframe::App for LinkboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("palette")
            .resizable(false)
            .default_width(150.0)
            .show(ctx, |ui| self.palette_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas_ui(ui));
    }
}

impl LinkboardApp {
    /// Palette: one drag source per shape template. The payload crosses to
    /// the canvas as the JSON-encoded descriptor.
    fn palette_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Shapes");
        ui.separator();
        for shape in default_shapes() {
            let id = egui::Id::new((SHAPE_PAYLOAD_MIME, shape.id));
            match palette::encode_payload(&shape) {
                Ok(payload) => {
                    ui.dnd_drag_source(id, payload, |ui| {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_min_width(110.0);
                            ui.label(&shape.name);
                        });
                    });
                }
                Err(err) => log::warn!("palette entry {} unavailable: {err}", shape.name),
            }
        }
    }

    /// Canvas: routes pointer events into the editor, then paints the scene.
    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let origin = to_point(response.rect.min);

        // Route events against the layout the user is looking at, then
        // re-measure so this frame's paint reflects the mutations.
        let geometry = LayoutGeometry::capture(self.editor.diagram(), origin);
        self.route_pointer(ui, &response, &geometry);

        if let Some(payload) = response.dnd_release_payload::<String>() {
            if let Some(pos) = ui.input(|i| i.pointer.latest_pos()) {
                self.editor.drop_payload(&payload, to_point(pos), &geometry);
            }
        }

        let geometry = LayoutGeometry::capture(self.editor.diagram(), origin);
        let scene = build_scene(self.editor.diagram(), self.editor.gesture(), &geometry);
        paint_scene(&painter, &scene, response.rect.min.to_vec2());
    }

    fn route_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        geometry: &LayoutGeometry,
    ) {
        let Some(pos) = ui.input(|i| i.pointer.latest_pos()) else {
            return;
        };
        let pointer = to_point(pos);

        if ui.input(|i| i.pointer.primary_pressed()) && response.hovered() {
            let target = hit_test(self.editor.diagram(), geometry, pointer);
            self.editor.pointer_pressed(&target, pointer, geometry);
        }
        if !self.editor.gesture().is_idle() {
            self.editor.pointer_moved(pointer, geometry);
        }
        if ui.input(|i| i.pointer.primary_released()) && !self.editor.gesture().is_idle() {
            let target = hit_test(self.editor.diagram(), geometry, pointer);
            self.editor.pointer_released(&target);
        }
    }
}

/// Paint one frame. Edges go under nodes; the preview goes on top.
fn paint_scene(painter: &egui::Painter, scene: &Scene, offset: egui::Vec2) {
    let node_stroke = Stroke::new(
        style::STROKE_WIDTH as f32,
        color32(style::node_stroke_color()),
    );
    let edge_stroke = Stroke::new(style::STROKE_WIDTH as f32, color32(style::edge_color()));

    for edge in &scene.edges {
        painter.line_segment(
            [to_pos2(edge.start, offset), to_pos2(edge.end, offset)],
            edge_stroke,
        );
        for wing in edge.wings {
            painter.line_segment([to_pos2(wing, offset), to_pos2(edge.end, offset)], edge_stroke);
        }
    }

    for node in &scene.nodes {
        painter.add(egui::Shape::convex_polygon(
            path_points(&node.outline, offset),
            color32(style::node_fill_color()),
            node_stroke,
        ));
        painter.text(
            to_pos2(node.frame.center(), offset),
            Align2::CENTER_CENTER,
            &node.label,
            FontId::proportional(14.0),
            color32(style::node_stroke_color()),
        );
        for anchor in node.anchors {
            painter.circle_filled(
                to_pos2(anchor, offset),
                style::ANCHOR_RADIUS as f32,
                color32(style::anchor_color()),
            );
        }
    }

    if let Some(preview) = &scene.preview {
        let faded = color32(style::edge_color()).gamma_multiply(style::PREVIEW_OPACITY as f32);
        painter.extend(egui::Shape::dashed_line(
            &[to_pos2(preview.start, offset), to_pos2(preview.end, offset)],
            Stroke::new(style::STROKE_WIDTH as f32, faded),
            style::PREVIEW_DASH[0] as f32,
            style::PREVIEW_DASH[1] as f32,
        ));
    }
}

/// Flatten a node outline into a screen-space polygon.
fn path_points(path: &kurbo::BezPath, offset: egui::Vec2) -> Vec<Pos2> {
    let mut points = Vec::new();
    kurbo::flatten(path, 0.25, |el| match el {
        kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => {
            points.push(egui::pos2(p.x as f32, p.y as f32) + offset);
        }
        _ => {}
    });
    points
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

fn to_pos2(p: Point, offset: egui::Vec2) -> Pos2 {
    egui::pos2(p.x as f32, p.y as f32) + offset
}

fn color32(color: peniko::Color) -> Color32 {
    let rgba = color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
}
