#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lifegrid.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without default features.
//!
//! The key guide is drawn with Macroquad's immediate-mode UI. All UI-specific
//! calls live inside the local `ui` module.

mod ui;

use self::ui::{draw_guide_ui, GuideUiContext, GuideUiResult};
use anyhow::Result;
use glam::Vec2;
use lifegrid_core::Viewport;
use lifegrid_rendering::{
    Color, Frame, FrameInput, MouseButtons, PointerEvent, Presentation, RenderingBackend, Scene,
};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const GUIDE_SIZE: (f32, f32) = (460.0, 330.0);
const GUIDE_MARGIN: f32 = 16.0;

/// Latches guide button presses so they can be merged with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct GuideInputState {
    toggle_playback: bool,
    step: bool,
    reset: bool,
}

impl GuideInputState {
    /// Records a play/pause button press.
    pub fn register_toggle_playback(&mut self) {
        self.toggle_playback = true;
    }

    /// Records a step button press.
    pub fn register_step(&mut self) {
        self.step = true;
    }

    /// Records a reset button press.
    pub fn register_reset(&mut self) {
        self.reset = true;
    }

    /// Returns and clears the latched play/pause press.
    pub fn take_toggle_playback(&mut self) -> bool {
        std::mem::take(&mut self.toggle_playback)
    }

    /// Returns and clears the latched step press.
    pub fn take_step(&mut self) -> bool {
        std::mem::take(&mut self.step)
    }

    /// Returns and clears the latched reset press.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset)
    }

    fn register(&mut self, result: GuideUiResult) {
        if result.toggle_playback {
            self.register_toggle_playback();
        }
        if result.step {
            self.register_step();
        }
        if result.reset {
            self.register_reset();
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `Enter` plays or pauses.
    toggle_playback: bool,
    /// `Space` steps once.
    step: bool,
    /// `R` clears the grid.
    reset: bool,
    /// `L` toggles loop edges.
    toggle_topology: bool,
    /// `E` toggles live edit.
    toggle_live_edit: bool,
    /// `H` hides or shows the guide.
    toggle_guide: bool,
    interval_steps: i32,
    cell_size_delta: i32,
    cell_gap_delta: i32,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let toggle_playback = is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter);
        let step = is_key_pressed(KeyCode::Space);
        let reset = is_key_pressed(KeyCode::R);
        let toggle_topology = is_key_pressed(KeyCode::L);
        let toggle_live_edit = is_key_pressed(KeyCode::E);
        let toggle_guide = is_key_pressed(KeyCode::H);

        Self {
            quit_requested,
            toggle_playback,
            step,
            reset,
            toggle_topology,
            toggle_live_edit,
            toggle_guide,
            interval_steps: key_axis(KeyCode::Up, KeyCode::Down),
            cell_size_delta: key_axis(KeyCode::Equal, KeyCode::Minus),
            cell_gap_delta: key_axis(KeyCode::RightBracket, KeyCode::LeftBracket),
        }
    }
}

fn key_axis(increase: KeyCode, decrease: KeyCode) -> i32 {
    i32::from(is_key_pressed(increase)) - i32::from(is_key_pressed(decrease))
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    show_guide: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_guide: true,
            ..Self::default()
        }
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the key guide is visible when the window opens.
    #[must_use]
    pub fn with_guide(mut self, visible: bool) -> Self {
        self.show_guide = visible;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(
        &mut self,
        frame: Duration,
        update: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += update;
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            show_guide,
        } = self;

        let Presentation {
            window_title,
            viewport,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(viewport.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(viewport.height()).unwrap_or(i32::MAX),
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut show_guide = show_guide;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut guide_input = GuideInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                if keyboard.toggle_guide {
                    show_guide = !show_guide;
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let frame_input = gather_frame_input(
                    keyboard,
                    &mut guide_input,
                    Vec2::new(screen_width, screen_height),
                );

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                draw_frame(&scene.frame);
                if show_guide {
                    let result = draw_guide_ui(
                        &mut macroquad::ui::root_ui(),
                        GuideUiContext {
                            origin: MacroquadVec2::new(GUIDE_MARGIN, GUIDE_MARGIN),
                            size: MacroquadVec2::new(GUIDE_SIZE.0, GUIDE_SIZE.1),
                            status: scene.status,
                        },
                    );
                    guide_input.register(result);
                }
                let render_duration = render_start.elapsed();

                let fps_metrics =
                    fps_counter.record_frame(frame_dt, update_duration, render_duration);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input(
    keyboard: KeyboardShortcuts,
    guide_input: &mut GuideInputState,
    screen: Vec2,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let buttons = MouseButtons {
        primary: is_mouse_button_down(MouseButton::Left),
        secondary: is_mouse_button_down(MouseButton::Right),
    };
    gather_frame_input_from_observations(
        keyboard,
        guide_input,
        Vec2::new(cursor_x, cursor_y),
        buttons,
        screen,
    )
}

fn gather_frame_input_from_observations(
    keyboard: KeyboardShortcuts,
    guide_input: &mut GuideInputState,
    cursor_position: Vec2,
    buttons: MouseButtons,
    screen: Vec2,
) -> FrameInput {
    let pointer = (buttons.primary || buttons.secondary).then_some(PointerEvent {
        position: cursor_position,
        buttons,
    });

    FrameInput {
        toggle_playback: keyboard.toggle_playback | guide_input.take_toggle_playback(),
        step: keyboard.step | guide_input.take_step(),
        reset: keyboard.reset | guide_input.take_reset(),
        toggle_topology: keyboard.toggle_topology,
        toggle_live_edit: keyboard.toggle_live_edit,
        interval_steps: keyboard.interval_steps,
        cell_size_delta: keyboard.cell_size_delta,
        cell_gap_delta: keyboard.cell_gap_delta,
        pointer,
        viewport: surface_viewport(screen),
    }
}

fn surface_viewport(screen: Vec2) -> Option<Viewport> {
    if !(screen.x >= 1.0 && screen.y >= 1.0) {
        return None;
    }
    Some(Viewport::new(screen.x as u32, screen.y as u32))
}

fn draw_frame(frame: &Frame) {
    for quad in &frame.cells {
        macroquad::shapes::draw_rectangle(
            quad.origin.x,
            quad.origin.y,
            quad.size,
            quad.size,
            to_macroquad_color(quad.color),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
