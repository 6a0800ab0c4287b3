//! Draw-command surface
//!
//! Rendering is an external collaborator. Modules draw by pushing shape
//! primitives into a `Canvas`; the host's renderer consumes the command
//! list each frame. Colors are plain straight-alpha RGBA; an HSL helper
//! covers the speed/hue palettes both games use.

use glam::Vec2;

/// Straight-alpha RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert HSL (hue in degrees, s/l in [0, 1]) to RGBA.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::rgba(r + m, g + m, b + m, a)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// A single retained draw primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole surface.
    Clear(Color),
    /// Filled axis-aligned rectangle.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    /// Stroked line segment.
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Filled circle.
    Circle { center: Vec2, radius: f32, color: Color },
    /// Stroked circle outline.
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    /// Filled convex polygon in winding order.
    Polygon { points: Vec<Vec2>, color: Color },
}

/// Per-frame command list.
#[derive(Debug, Default)]
pub struct Canvas {
    cmds: Vec<DrawCmd>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's commands.
    pub fn begin_frame(&mut self) {
        self.cmds.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.cmds.push(DrawCmd::Rect { x, y, w, h, color });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.cmds.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.cmds.push(DrawCmd::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, color: Color) {
        self.cmds.push(DrawCmd::Polygon { points, color });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}
