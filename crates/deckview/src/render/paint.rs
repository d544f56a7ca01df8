use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Galley, Mesh, Pos2, Rect, Shape, Stroke, Vec2};

use super::image_cache::ImageCache;
use super::layout::{LayoutNode, LayoutTree};
use crate::animation::Keyframe;
use crate::background::{self, Gradient, GradientShape};
use crate::schema::{Alignment, Background, BackgroundKind, ButtonVariant};
use crate::theme::Style;

/// Shared inputs for painting one slide.
pub struct PaintContext<'a> {
    pub style: &'a Style,
    pub images: &'a ImageCache,
    pub scale: f32,
    pub opacity: f32,
}

const CONTENT_WIDTH: f32 = 1500.0;
const PADDING: f32 = 96.0;
const NODE_GAP: f32 = 32.0;
const GRADIENT_STEPS: usize = 24;

/// Paint a slide into `rect` at the given pose.
pub fn paint_slide(
    ui: &egui::Ui,
    background: &Background,
    tree: &LayoutTree,
    pc: &PaintContext,
    rect: Rect,
    pose: &Keyframe,
) {
    let rect = posed_rect(rect, pose, pc.scale);
    let pc = PaintContext {
        opacity: pc.opacity * pose.opacity,
        ..*pc
    };
    if pc.opacity <= 0.0 {
        return;
    }

    paint_background(ui, background, &pc, rect);
    if tree.overlay {
        ui.painter()
            .rect_filled(rect, 0.0, Color32::from_black_alpha((128.0 * pc.opacity) as u8));
    }

    let width = (CONTENT_WIDTH * pc.scale).min(rect.width() - 2.0 * PADDING * pc.scale);
    let left = rect.center().x - width / 2.0;
    let centered = heading_centered(tree);

    // Measure first so the block sits in the vertical middle.
    let height = {
        let mut canvas = Canvas::measuring(ui);
        draw_nodes(&mut canvas, &tree.nodes, &pc, Pos2::new(left, 0.0), width, centered)
    };
    let top = (rect.center().y - height / 2.0).max(rect.top() + PADDING * pc.scale);
    let mut canvas = Canvas::painting(ui);
    draw_nodes(&mut canvas, &tree.nodes, &pc, Pos2::new(left, top), width, centered);
}

/// Apply a transition pose: horizontal offset, uniform scale, and a flip
/// approximated by narrowing the slide.
pub fn posed_rect(rect: Rect, pose: &Keyframe, scale: f32) -> Rect {
    let center = rect.center() + Vec2::new(pose.x * scale, 0.0);
    let squash = pose.rotate_y.to_radians().cos().abs();
    let size = Vec2::new(
        rect.width() * pose.scale * squash,
        rect.height() * pose.scale,
    );
    Rect::from_center_size(center, size)
}

fn heading_centered(tree: &LayoutTree) -> bool {
    tree.nodes
        .iter()
        .find_map(|n| match n {
            LayoutNode::Heading { centered, .. } => Some(*centered),
            _ => None,
        })
        .unwrap_or(tree.alignment == Alignment::Center)
}

fn paint_background(ui: &egui::Ui, bg: &Background, pc: &PaintContext, rect: Rect) {
    let painter = ui.painter_at(rect);
    let fill = Style::with_opacity(pc.style.background, pc.opacity);
    match bg.kind {
        BackgroundKind::Gradient => match background::parse_gradient(&bg.source) {
            Some(gradient) => {
                painter.add(gradient_mesh(&gradient, rect, pc.opacity));
            }
            None => {
                log::debug!("Unpaintable gradient {:?}", bg.source);
                painter.rect_filled(rect, 0.0, fill);
            }
        },
        BackgroundKind::Image => {
            painter.rect_filled(rect, 0.0, fill);
            if let Some(texture) = pc.images.background_texture(ui.ctx(), bg) {
                let cover = cover_rect(texture.size_vec2(), rect);
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                let tint = Color32::from_white_alpha((255.0 * pc.opacity) as u8);
                painter.image(texture.id(), cover, uv, tint);
            }
        }
    }
}

/// Scale an image to cover `area`, cropping whatever overflows.
fn cover_rect(image: Vec2, area: Rect) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return area;
    }
    let k = (area.width() / image.x).max(area.height() / image.y);
    Rect::from_center_size(area.center(), image * k)
}

/// Position along the gradient line for a point, in `[0, 1]`.
fn gradient_t(gradient: &Gradient, rect: Rect, p: Pos2) -> f32 {
    let c = rect.center();
    match gradient.shape {
        GradientShape::Linear => {
            let theta = gradient.angle.to_radians();
            let dir = Vec2::new(theta.sin(), -theta.cos());
            let length = (rect.width() * theta.sin()).abs() + (rect.height() * theta.cos()).abs();
            ((p - c).dot(dir) / length.max(1.0) + 0.5).clamp(0.0, 1.0)
        }
        GradientShape::Radial => {
            let reach = (rect.size() / 2.0).length().max(1.0);
            ((p - c).length() / reach).clamp(0.0, 1.0)
        }
    }
}

fn gradient_mesh(gradient: &Gradient, rect: Rect, opacity: f32) -> Shape {
    let mut mesh = Mesh::default();
    let n = GRADIENT_STEPS;
    for row in 0..=n {
        for col in 0..=n {
            let p = Pos2::new(
                rect.left() + rect.width() * col as f32 / n as f32,
                rect.top() + rect.height() * row as f32 / n as f32,
            );
            let [r, g, b] = gradient.color_at(gradient_t(gradient, rect, p));
            let color = Style::with_opacity(Color32::from_rgb(r, g, b), opacity);
            mesh.colored_vertex(p, color);
        }
    }
    let stride = (n + 1) as u32;
    for row in 0..n as u32 {
        for col in 0..n as u32 {
            let i = row * stride + col;
            mesh.add_triangle(i, i + 1, i + stride);
            mesh.add_triangle(i + 1, i + stride + 1, i + stride);
        }
    }
    Shape::mesh(mesh)
}

/// Lays text out and optionally paints it, so one code path both measures
/// and draws.
struct Canvas<'u> {
    ui: &'u egui::Ui,
    paint: bool,
}

impl<'u> Canvas<'u> {
    fn measuring(ui: &'u egui::Ui) -> Self {
        Self { ui, paint: false }
    }

    fn painting(ui: &'u egui::Ui) -> Self {
        Self { ui, paint: true }
    }

    fn galley(&self, text: &str, size: f32, color: Color32, wrap: f32) -> Arc<Galley> {
        self.ui
            .painter()
            .layout(text.to_string(), FontId::proportional(size), color, wrap)
    }

    /// Draw wrapped text. Returns the height used.
    fn text(
        &mut self,
        text: &str,
        size: f32,
        color: Color32,
        pos: Pos2,
        width: f32,
        centered: bool,
    ) -> f32 {
        let galley = self.galley(text, size, color, width);
        let height = galley.rect.height();
        if self.paint {
            let x = if centered {
                pos.x + (width - galley.rect.width()) / 2.0
            } else {
                pos.x
            };
            self.ui.painter().galley(Pos2::new(x, pos.y), galley, color);
        }
        height
    }

    fn panel(&mut self, rect: Rect, style: &Style, opacity: f32, scale: f32) {
        if self.paint {
            let painter = self.ui.painter();
            painter.rect_filled(
                rect,
                8.0 * scale,
                Style::with_opacity(style.card_background, opacity),
            );
            painter.rect_stroke(
                rect,
                8.0 * scale,
                Stroke::new(1.0, Style::with_opacity(style.card_border, opacity)),
                egui::StrokeKind::Inside,
            );
        }
    }

    fn pill(&mut self, rect: Rect, fill: Color32, stroke: Option<Color32>) {
        if self.paint {
            let painter = self.ui.painter();
            painter.rect_filled(rect, rect.height() / 2.0, fill);
            if let Some(stroke) = stroke {
                painter.rect_stroke(
                    rect,
                    rect.height() / 2.0,
                    Stroke::new(2.0, stroke),
                    egui::StrokeKind::Inside,
                );
            }
        }
    }

    fn label(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        if self.paint {
            self.ui
                .painter()
                .text(pos, anchor, text, FontId::proportional(size), color);
        }
    }
}

/// Unicode stand-ins for the icon names slide documents use.
pub fn icon_glyph(name: &str) -> &'static str {
    match name.to_ascii_lowercase().as_str() {
        "check" | "checkcircle" | "circlecheck" | "badgecheck" => "\u{2714}",
        "x" | "xcircle" | "circlex" => "\u{2716}",
        "star" => "\u{2605}",
        "zap" | "bolt" => "\u{26A1}",
        "heart" => "\u{2665}",
        "trophy" | "award" | "medal" => "\u{1F3C6}",
        "rocket" => "\u{1F680}",
        "target" => "\u{25CE}",
        "shield" | "shieldcheck" => "\u{1F6E1}",
        "clock" | "timer" => "\u{23F1}",
        "users" | "user" => "\u{1F465}",
        "globe" => "\u{1F310}",
        "trendingup" | "chartline" | "barchart" => "\u{1F4C8}",
        "lightbulb" | "idea" => "\u{1F4A1}",
        "sparkles" => "\u{2728}",
        "arrowright" => "\u{2192}",
        _ => "\u{25C6}",
    }
}

fn draw_nodes(
    canvas: &mut Canvas,
    nodes: &[LayoutNode],
    pc: &PaintContext,
    origin: Pos2,
    width: f32,
    centered: bool,
) -> f32 {
    let gap = NODE_GAP * pc.scale;
    let mut y = origin.y;
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            y += gap;
        }
        y += draw_node(canvas, node, pc, Pos2::new(origin.x, y), width, centered);
    }
    y - origin.y
}

fn draw_node(
    canvas: &mut Canvas,
    node: &LayoutNode,
    pc: &PaintContext,
    pos: Pos2,
    width: f32,
    centered: bool,
) -> f32 {
    let s = pc.scale;
    let style = pc.style;
    let fade = |c: Color32| Style::with_opacity(c, pc.opacity);
    let fg = fade(style.foreground);
    let muted = fade(style.muted);

    match node {
        LayoutNode::Badge {
            text,
            color,
            text_color,
        } => {
            let size = style.small_size * s;
            let galley = canvas.galley(text, size, fg, f32::INFINITY);
            let pad = Vec2::new(20.0, 8.0) * s;
            let pill_size = galley.rect.size() + pad * 2.0;
            let x = if centered {
                pos.x + (width - pill_size.x) / 2.0
            } else {
                pos.x
            };
            let pill = Rect::from_min_size(Pos2::new(x, pos.y), pill_size);
            canvas.pill(pill, fade(style.named_color(color)), None);
            canvas.label(
                pill.center(),
                Align2::CENTER_CENTER,
                text,
                size,
                fade(style.named_color(text_color)),
            );
            pill_size.y
        }
        LayoutNode::Heading {
            level,
            text,
            centered,
        } => {
            let color = if *level == 1 { fg } else { muted };
            canvas.text(text, style.heading_size(*level) * s, color, pos, width, *centered)
        }
        LayoutNode::Paragraphs { lines } => {
            let mut h = 0.0;
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    h += 16.0 * s;
                }
                h += canvas.text(
                    line,
                    style.body_size * s,
                    muted,
                    Pos2::new(pos.x, pos.y + h),
                    width,
                    centered,
                );
            }
            h
        }
        LayoutNode::Quote {
            text,
            color,
            centered,
        } => canvas.text(
            text,
            style.h3_size * s,
            fade(style.named_color(color)),
            pos,
            width,
            *centered,
        ),
        LayoutNode::Highlight { text, color } => canvas.text(
            text,
            style.body_size * 1.1 * s,
            fade(style.named_color(color)),
            pos,
            width,
            centered,
        ),
        LayoutNode::ItemPanel { rows, .. } => {
            let lines: Vec<(Option<&str>, &str)> = rows
                .iter()
                .map(|r| {
                    let marker = match (&r.icon, r.check_mark) {
                        (Some(icon), _) => Some(icon_glyph(icon)),
                        (None, true) => Some("\u{2713}"),
                        (None, false) => None,
                    };
                    (marker, r.text.as_str())
                })
                .collect();
            draw_panel_lines(canvas, &lines, pc, pos, width)
        }
        LayoutNode::Checklist { lines } => {
            let lines: Vec<(Option<&str>, &str)> =
                lines.iter().map(|l| (None, l.as_str())).collect();
            draw_panel_lines(canvas, &lines, pc, pos, width)
        }
        LayoutNode::Footer { lines } => {
            let mut h = 0.0;
            for line in lines {
                let (size, color) = if line.emphasized {
                    (style.body_size * s, fg)
                } else {
                    (style.small_size * s, muted)
                };
                h += canvas.text(
                    &line.text,
                    size,
                    color,
                    Pos2::new(pos.x, pos.y + h),
                    width,
                    centered,
                ) + 8.0 * s;
            }
            h
        }
        LayoutNode::CardGrid { columns, cards } => {
            let cells: Vec<[(&str, f32, Color32); 3]> = cards
                .iter()
                .map(|c| {
                    [
                        (icon_glyph(&c.icon), style.h3_size * s, fade(style.accent)),
                        (c.title.as_str(), style.body_size * s, fg),
                        (c.description.as_str(), style.small_size * s, muted),
                    ]
                })
                .collect();
            draw_grid(canvas, *columns, &cells, pc, pos, width, false)
        }
        LayoutNode::StatGrid { columns, stats } => {
            let cells: Vec<[(&str, f32, Color32); 3]> = stats
                .iter()
                .map(|st| {
                    [
                        (st.number.as_str(), style.h2_size * 1.2 * s, fade(style.accent)),
                        (st.label.as_str(), style.body_size * s, fg),
                        ("", style.small_size * s, muted),
                    ]
                })
                .collect();
            draw_grid(canvas, *columns, &cells, pc, pos, width, true)
        }
        LayoutNode::AwardGrid { columns, awards } => {
            let cells: Vec<[(&str, f32, Color32); 3]> = awards
                .iter()
                .map(|a| {
                    [
                        (icon_glyph(&a.icon), style.h3_size * s, fade(style.accent)),
                        (a.title.as_str(), style.body_size * s, fg),
                        (a.source.as_str(), style.small_size * s, muted),
                    ]
                })
                .collect();
            draw_grid(canvas, *columns, &cells, pc, pos, width, true)
        }
        LayoutNode::ListColumns { columns, .. } => {
            let n = columns.len().max(1) as f32;
            let gap = 32.0 * s;
            let col_w = (width - gap * (n - 1.0)) / n;
            let mut tallest: f32 = 0.0;
            for (i, column) in columns.iter().enumerate() {
                let x = pos.x + i as f32 * (col_w + gap);
                let title_h = canvas.text(
                    &column.title,
                    style.h3_size * s,
                    fg,
                    Pos2::new(x, pos.y),
                    col_w,
                    false,
                );
                let lines: Vec<(Option<&str>, &str)> = column
                    .rows
                    .iter()
                    .map(|r| (r.icon.as_deref().map(icon_glyph), r.text.as_str()))
                    .collect();
                let body_h = draw_panel_lines(
                    canvas,
                    &lines,
                    pc,
                    Pos2::new(x, pos.y + title_h + 16.0 * s),
                    col_w,
                );
                tallest = tallest.max(title_h + 16.0 * s + body_h);
            }
            tallest
        }
        LayoutNode::ButtonRow { buttons } => {
            let size = style.body_size * 0.8 * s;
            let pad = Vec2::new(32.0, 20.0) * s;
            let gap = 24.0 * s;
            let sizes: Vec<Vec2> = buttons
                .iter()
                .map(|b| canvas.galley(&b.text, size, fg, f32::INFINITY).rect.size() + pad * 2.0)
                .collect();
            let total: f32 = sizes.iter().map(|v| v.x).sum::<f32>()
                + gap * sizes.len().saturating_sub(1) as f32;
            let mut x = pos.x + (width - total) / 2.0;
            let mut height: f32 = 0.0;
            for (button, size_v) in buttons.iter().zip(&sizes) {
                let rect = Rect::from_min_size(Pos2::new(x, pos.y), *size_v);
                let (fill, stroke, ink) = match button.variant {
                    ButtonVariant::Primary => (fade(Color32::WHITE), None, fade(Color32::BLACK)),
                    ButtonVariant::Outline => (
                        Color32::TRANSPARENT,
                        Some(fade(Color32::WHITE)),
                        fade(Color32::WHITE),
                    ),
                };
                canvas.pill(rect, fill, stroke);
                canvas.label(rect.center(), Align2::CENTER_CENTER, &button.text, size, ink);
                x += size_v.x + gap;
                height = height.max(size_v.y);
            }
            height
        }
    }
}

/// A bordered panel of rows, each with an optional leading marker.
fn draw_panel_lines(
    canvas: &mut Canvas,
    lines: &[(Option<&str>, &str)],
    pc: &PaintContext,
    pos: Pos2,
    width: f32,
) -> f32 {
    let s = pc.scale;
    let pad = 32.0 * s;
    let size = pc.style.body_size * 0.85 * s;
    let fg = Style::with_opacity(pc.style.foreground, pc.opacity);
    let accent = Style::with_opacity(pc.style.accent, pc.opacity);
    let marker_w = size * 1.6;

    let mut rows = Vec::with_capacity(lines.len());
    let mut inner = 0.0;
    for (i, (marker, text)) in lines.iter().enumerate() {
        if i > 0 {
            inner += 16.0 * s;
        }
        let text_w = width - pad * 2.0 - if marker.is_some() { marker_w } else { 0.0 };
        let h = canvas.galley(text, size, fg, text_w).rect.height();
        rows.push((inner, h));
        inner += h;
    }
    let panel = Rect::from_min_size(pos, Vec2::new(width, inner + pad * 2.0));
    canvas.panel(panel, pc.style, pc.opacity, s);

    for ((marker, text), (dy, _)) in lines.iter().zip(&rows) {
        let mut x = pos.x + pad;
        let y = pos.y + pad + dy;
        if let Some(marker) = marker {
            canvas.label(Pos2::new(x, y), Align2::LEFT_TOP, marker, size, accent);
            x += marker_w;
        }
        canvas.text(text, size, fg, Pos2::new(x, y), pos.x + width - pad - x, false);
    }
    panel.height()
}

/// Grid of panels, each holding up to three stacked lines.
fn draw_grid(
    canvas: &mut Canvas,
    columns: usize,
    cells: &[[(&str, f32, Color32); 3]],
    pc: &PaintContext,
    pos: Pos2,
    width: f32,
    centered: bool,
) -> f32 {
    if cells.is_empty() {
        return 0.0;
    }
    let s = pc.scale;
    let columns = columns.clamp(1, cells.len());
    let gap = 24.0 * s;
    let pad = 24.0 * s;
    let cell_w = (width - gap * (columns as f32 - 1.0)) / columns as f32;
    let inner_w = cell_w - pad * 2.0;

    let cell_height = |canvas: &Canvas, cell: &[(&str, f32, Color32); 3]| -> f32 {
        cell.iter()
            .filter(|(t, _, _)| !t.is_empty())
            .map(|(t, size, color)| canvas.galley(t, *size, *color, inner_w).rect.height() + 8.0 * s)
            .sum::<f32>()
            + pad * 2.0
    };

    let mut y = pos.y;
    for row in cells.chunks(columns) {
        let row_h = row
            .iter()
            .map(|c| cell_height(canvas, c))
            .fold(0.0_f32, f32::max);
        for (col, cell) in row.iter().enumerate() {
            let x = pos.x + col as f32 * (cell_w + gap);
            let rect = Rect::from_min_size(Pos2::new(x, y), Vec2::new(cell_w, row_h));
            canvas.panel(rect, pc.style, pc.opacity, s);
            let mut ty = y + pad;
            for (text, size, color) in cell.iter().filter(|(t, _, _)| !t.is_empty()) {
                ty += canvas.text(text, *size, *color, Pos2::new(x + pad, ty), inner_w, centered)
                    + 8.0 * s;
            }
        }
        y += row_h + gap;
    }
    y - gap - pos.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posed_rect_rest_is_identity() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0));
        let posed = posed_rect(rect, &Keyframe::REST, 1.0);
        assert!((posed.width() - rect.width()).abs() < 1e-3);
        assert_eq!(posed.center(), rect.center());
    }

    #[test]
    fn test_posed_rect_scale_and_offset() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
        let pose = Keyframe {
            x: 10.0,
            scale: 0.5,
            ..Keyframe::REST
        };
        let posed = posed_rect(rect, &pose, 2.0);
        assert_eq!(posed.center(), Pos2::new(70.0, 25.0));
        assert_eq!(posed.size(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_gradient_t_follows_angle() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0));
        let g = background::parse_gradient("linear-gradient(90deg, #000000 0%, #ffffff 100%)")
            .unwrap();
        assert!(gradient_t(&g, rect, Pos2::new(0.0, 50.0)) < 0.01);
        assert!(gradient_t(&g, rect, Pos2::new(200.0, 50.0)) > 0.99);
        assert!((gradient_t(&g, rect, rect.center()) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_cover_rect_crops_overflow() {
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(1600.0, 900.0));
        let cover = cover_rect(Vec2::new(100.0, 100.0), area);
        assert_eq!(cover.width(), 1600.0);
        assert_eq!(cover.center(), area.center());
    }

    #[test]
    fn test_icon_glyph_is_case_insensitive() {
        assert_eq!(icon_glyph("Zap"), icon_glyph("zap"));
        assert_eq!(icon_glyph("NoSuchIcon"), "\u{25C6}");
    }
}
