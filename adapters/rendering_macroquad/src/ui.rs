//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use lifegrid_rendering::{StatusLine, KEY_GUIDE};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Outcome of drawing the guide window for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GuideUiResult {
    /// Whether the play/pause button was pressed.
    pub(crate) toggle_playback: bool,
    /// Whether the step button was pressed.
    pub(crate) step: bool,
    /// Whether the reset button was pressed.
    pub(crate) reset: bool,
}

/// Placement and content of the guide window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GuideUiContext {
    /// Top-left corner of the window in screen coordinates.
    pub(crate) origin: Vec2,
    /// Window dimensions in screen space.
    pub(crate) size: Vec2,
    /// Status shown above the key bindings.
    pub(crate) status: StatusLine,
}

/// Draws the key guide together with the session status and action buttons.
pub(crate) fn draw_guide_ui(ui: &mut Ui, context: GuideUiContext) -> GuideUiResult {
    let background = Color::from_rgba(17, 17, 17, 220);
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .color_selected(background)
        .color_selected_hovered(background)
        .color_inactive(background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 2.0, 2.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(6.0, 6.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = GuideUiResult::default();
    let _ = ui.window(hash!("key_guide"), context.origin, context.size, |ui| {
        ui.label(None, context.status.summary().as_str());
        for (key, action) in KEY_GUIDE {
            ui.label(None, format!("{key:<10} {action}").as_str());
        }

        result.toggle_playback = ui.button(None, "Play / Pause");
        ui.same_line(0.0);
        result.step = ui.button(None, "Step");
        ui.same_line(0.0);
        result.reset = ui.button(None, "Reset");
    });

    ui.pop_skin();
    result
}
