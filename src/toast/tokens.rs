// SPDX-License-Identifier: MPL-2.0
//! Visual constants for the toast stack.

use iced::{Color, Shadow, Vector};

/// Inner padding of a toast card.
pub const PADDING: f32 = 12.0;

/// Gap between a toast's text and its dismiss button.
pub const GAP: f32 = 8.0;

/// Body text size.
pub const TEXT_SIZE: f32 = 14.0;

/// Accent border width.
pub const BORDER_WIDTH: f32 = 2.0;

/// Corner radius of a toast card.
pub const RADIUS: f32 = 8.0;

/// Corner radius of the dismiss button.
pub const BUTTON_RADIUS: f32 = 4.0;

/// Padding around the dismiss glyph.
pub const BUTTON_PADDING: f32 = 4.0;

/// Opacity of the dismiss button background when hovered.
pub const HOVER_ALPHA: f32 = 0.2;

/// Opacity of the dismiss button background when pressed.
pub const PRESSED_ALPHA: f32 = 0.5;

pub const SHADOW: Shadow = Shadow {
    color: Color::BLACK,
    offset: Vector { x: 0.0, y: 4.0 },
    blur_radius: 8.0,
};

pub const NO_SHADOW: Shadow = Shadow {
    color: Color::BLACK,
    offset: Vector::ZERO,
    blur_radius: 0.0,
};

const _: () = {
    assert!(PRESSED_ALPHA > HOVER_ALPHA);
    assert!(RADIUS > BUTTON_RADIUS);
};
