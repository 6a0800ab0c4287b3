//! Viewport policy and view geometry
//!
//! The host owns the real surface; the shell only needs its logical size,
//! an orientation/size policy to drive automatic pausing, and a per-frame
//! geometry snapshot handed to the active module.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical viewport size in CSS-like pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Orientation requirement for playability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationMode {
    /// Any orientation is fine.
    Any,
    /// Landscape is playable but the host may show a soft warning.
    #[default]
    PortraitPreferred,
    /// Landscape is treated as unplayable.
    PortraitOnly,
}

/// Minimum-size and orientation policy evaluated on every resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPolicy {
    pub min_width: f32,
    pub min_height: f32,
    pub mode: OrientationMode,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            min_width: 280.0,
            min_height: 420.0,
            mode: OrientationMode::PortraitPreferred,
        }
    }
}

impl ViewportPolicy {
    /// Whether gameplay is allowed at this size/orientation.
    pub fn is_playable(&self, vp: &Viewport) -> bool {
        if vp.width < self.min_width || vp.height < self.min_height {
            return false;
        }
        if self.mode == OrientationMode::PortraitOnly && vp.width > vp.height {
            return false;
        }
        true
    }

    /// True when the viewport is playable but the policy would rather it
    /// were portrait.
    pub fn orientation_warning(&self, vp: &Viewport) -> bool {
        self.mode == OrientationMode::PortraitPreferred
            && vp.width > vp.height
            && self.is_playable(vp)
    }
}

/// Fractional lane positions and player baseline margin for the lane game;
/// the shield game only consumes the playfield rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldLayout {
    /// Lane center x positions as fractions of viewport width.
    pub lane_x_left: f32,
    pub lane_x_right: f32,
    /// Distance from the viewport bottom to the player baseline.
    pub player_bottom_margin: f32,
    /// Height reserved for the pause dock while playing/paused.
    pub ui_dock_px: f32,
}

impl Default for PlayfieldLayout {
    fn default() -> Self {
        Self {
            lane_x_left: 0.25,
            lane_x_right: 0.75,
            player_bottom_margin: 64.0,
            ui_dock_px: 48.0,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether the point is inside the rect expanded by `margin` on all sides.
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= self.x - margin
            && p.x <= self.x + self.w + margin
            && p.y >= self.y - margin
            && p.y <= self.y + self.h + margin
    }
}

/// Per-frame geometry snapshot handed to the active module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    pub width: f32,
    pub height: f32,
    /// Lane center x positions, indexed by lane.
    pub lane_x: [f32; 2],
    /// Catch-line / player baseline y.
    pub player_y: f32,
    /// Full playfield rect (shield game spawns on its edges).
    pub playfield: Rect,
    /// UI space reserved at the bottom while playing/paused.
    pub bottom_ui_reserve: f32,
}

impl ViewGeometry {
    pub fn compute(vp: &Viewport, layout: &PlayfieldLayout, reserve: f32) -> Self {
        Self {
            width: vp.width,
            height: vp.height,
            lane_x: [vp.width * layout.lane_x_left, vp.width * layout.lane_x_right],
            player_y: vp.height - layout.player_bottom_margin - reserve,
            playfield: Rect {
                x: 0.0,
                y: 0.0,
                w: vp.width,
                h: vp.height,
            },
            bottom_ui_reserve: reserve,
        }
    }
}
