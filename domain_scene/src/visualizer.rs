//! Software-rendered preview window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TECHNIQUE NAME (accent color)                               │
//! │                                                              │
//! │             particle cloud, additively splatted              │
//! │         + index-tip markers       + shadow tendrils          │
//! │                                                              │
//! │  diagnostics status bar                                      │
//! │  key legend                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use glam::{Vec2, Vec3};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use technique_field::shadow_garden::GROUND_Y;

use crate::config::SceneError;
use crate::driver::RenderFrame;
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 960;
pub const WIN_H:       usize = 600;
const STATUS_Y:        usize = WIN_H - 36;
const BG_COLOR:        u32   = 0xFF05050A;
const TEXT_BG:         u32   = 0xFF0F1020;
const MARKER_COLOR:    u32   = 0xFFFFFFFF;
const GARDEN_COLOR:    Vec3  = Vec3::new(0.25, 0.1, 0.45);

/// Camera distance from the scene origin along `+z`.
const CAMERA_Z:        f32   = 55.0;
/// Vertical field of view, degrees.
const FOV_Y:           f32   = 75.0;
const NEAR:            f32   = 0.1;
const TARGET_FPS:      usize = 60;

const GROUND_RADIUS:   f32   = 95.0;
const GROUND_RINGS:    usize = 8;
const GROUND_SPOKES:   usize = 96;

/// Brightness of one fully lit particle at bloom 1.
const SPLAT_GAIN:      f32   = 70.0;

const SIM_KEYS: [(Key, SimPose); 12] = [
    (Key::Key0, SimPose::NoHands),
    (Key::Key1, SimPose::Red),
    (Key::Key2, SimPose::Void),
    (Key::Key3, SimPose::Purple),
    (Key::Key4, SimPose::Shrine),
    (Key::Key5, SimPose::Mahito),
    (Key::Key6, SimPose::Hakari),
    (Key::Key7, SimPose::Megumi),
    (Key::Key8, SimPose::Fist),
    (Key::Key9, SimPose::Dismantle),
    (Key::B,    SimPose::Blood),
    (Key::T,    SimPose::TwinPurple),
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    focal:  f32,
    /// Present only when the keyboard drives a simulation source.
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(sim_tx: Option<Sender<SimInput>>) -> Result<Self, SceneError> {
        let mut window = Window::new(
            "Domain Scene",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| SceneError::Window(e.to_string()))?;

        window.set_target_fps(TARGET_FPS);

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            focal: focal_length(),
            sim_tx,
        })
    }

    pub fn viewport() -> Vec2 {
        Vec2::new(WIN_W as f32, WIN_H as f32)
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard inputs.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            self.send(SimInput::Quit);
            return false;
        }

        let mut inputs = Vec::new();
        for (key, pose) in SIM_KEYS {
            if one_shot(key) {
                inputs.push(SimInput::Pose(pose));
            }
        }
        let step = 0.01;
        for (key, dx, dy) in [
            (Key::Left, -step, 0.0), (Key::Right, step, 0.0),
            (Key::Up, 0.0, -step),   (Key::Down, 0.0, step),
        ] {
            if held(key) {
                inputs.push(SimInput::Drift { dx, dy });
            }
        }
        for input in inputs {
            self.send(input);
        }
        true
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(&mut self, frame: &RenderFrame<'_>) {
        self.buf.fill(BG_COLOR);

        let shake = frame.shake_offset;
        if frame.garden.is_visible() {
            self.draw_garden(frame, shake);
        }
        self.draw_particles(frame, shake);

        // ── Hand markers ──────────────────────────────────────────────────
        for (i, p) in frame.hand_points.iter().enumerate() {
            let (x, y) = (p.x.max(0.0) as usize, p.y.max(0.0) as usize);
            self.draw_diamond(x, y, 5, MARKER_COLOR);
            if let Some(label) = frame.hand_labels.get(i) {
                self.draw_label(label, x + 8, y.saturating_sub(2), 0xFFB4C8FF);
            }
        }

        // ── Technique title ───────────────────────────────────────────────
        let accent = 0xFF000000 | frame.descriptor.accent;
        self.draw_label(frame.descriptor.name, 12, 12, accent);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        let status = frame.diagnostics.to_string();
        self.draw_label(&status, 10, STATUS_Y + 8, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        if self.sim_tx.is_some() {
            self.draw_label(
                "0=none 1=red 2=void 3=purple 4=shrine 5=mahito 6=hakari 7=megumi 8=fist 9=dismantle B=blood T=two hands  arrows=move  Q=quit",
                10, WIN_H - 14, 0xFF888888,
            );
        } else {
            self.draw_label("Q=quit", 10, WIN_H - 14, 0xFF888888);
        }

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Particles ─────────────────────────────────────────────────────────

    fn draw_particles(&mut self, frame: &RenderFrame<'_>, shake: Vec2) {
        let gain = SPLAT_GAIN * (0.5 + frame.descriptor.bloom * 0.25);
        let p = frame.particles;
        for i in 0..p.len() {
            let size = p.sizes[i];
            if size <= 0.01 { continue; }
            let world = frame.rotation * p.position(i);
            let Some(s) = self.project(world) else { continue };
            let s = s + shake;
            let rgb = p.color(i) * gain;
            let r = if size > 1.5 { 1 } else { 0 };
            for dy in -r..=r {
                for dx in -r..=r {
                    self.add_pixel(s.x as isize + dx, s.y as isize + dy, rgb);
                }
            }
        }
    }

    fn project(&self, p: Vec3) -> Option<Vec2> {
        project_point(self.focal, p)
    }

    // ── Shadow garden ─────────────────────────────────────────────────────

    fn draw_garden(&mut self, frame: &RenderFrame<'_>, shake: Vec2) {
        let garden = frame.garden;

        // Ground: rippled rings out to the current spread.
        let ground = GARDEN_COLOR * (90.0 * garden.ground_alpha());
        let reach  = GROUND_RADIUS * garden.expansion();
        for ring in 1..=GROUND_RINGS {
            let r = reach * ring as f32 / GROUND_RINGS as f32;
            for k in 0..GROUND_SPOKES {
                let a = k as f32 / GROUND_SPOKES as f32 * std::f32::consts::TAU;
                let (x, z) = (a.cos() * r, a.sin() * r);
                let y = GROUND_Y + garden.ground_elevation(x, z) * 4.0;
                if let Some(s) = self.project(Vec3::new(x, y, z)) {
                    let s = s + shake;
                    self.add_pixel(s.x as isize, s.y as isize, ground);
                }
            }
        }

        let color = GARDEN_COLOR * (255.0 * garden.tendril_alpha());
        for idx in 0..garden.tendrils().len() {
            let Some((base, tip)) = garden.tendril_segment(idx) else { continue };
            if let (Some(a), Some(b)) = (self.project(base), self.project(tip)) {
                self.draw_line(a + shake, b + shake, color);
            }
        }
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2, rgb: Vec3) {
        let steps = (b - a).abs().max_element().ceil().max(1.0) as usize;
        for s in 0..=steps {
            let p = a.lerp(b, s as f32 / steps as f32);
            self.add_pixel(p.x as isize, p.y as isize, rgb);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn add_pixel(&mut self, x: isize, y: isize, rgb: Vec3) {
        if x < 0 || y < 0 || x as usize >= WIN_W || y as usize >= STATUS_Y { return; }
        let idx = y as usize * WIN_W + x as usize;
        let px = self.buf[idx];
        let add = |shift: u32, c: f32| {
            let cur = (px >> shift) & 0xFF;
            (cur + c.max(0.0) as u32).min(0xFF) << shift
        };
        self.buf[idx] = 0xFF000000 | add(16, rgb.x) | add(8, rgb.y) | add(0, rgb.z);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// 3×5 bitmap text.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Focal length in pixels for the vertical field of view.
fn focal_length() -> f32 {
    (WIN_H as f32 / 2.0) / (FOV_Y.to_radians() / 2.0).tan()
}

/// Perspective projection from a camera at `(0, 0, CAMERA_Z)` looking down
/// `-z`.  `None` behind the near plane.
fn project_point(focal: f32, p: Vec3) -> Option<Vec2> {
    let depth = CAMERA_Z - p.z;
    if depth < NEAR { return None; }
    let k = focal / depth;
    Some(Vec2::new(
        WIN_W as f32 / 2.0 + p.x * k,
        WIN_H as f32 / 2.0 - p.y * k,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_pacing_fits_the_loop_step_clamp() {
        // One display frame must be shorter than the longest step the loop feeds the scene.
        assert!(1.0 / TARGET_FPS as f32 <= 0.1);
    }

    #[test]
    fn origin_projects_to_the_window_centre() {
        let c = project_point(focal_length(), Vec3::ZERO).expect("in front of camera");
        assert_eq!(c, Vec2::new(WIN_W as f32 / 2.0, WIN_H as f32 / 2.0));
    }

    #[test]
    fn top_of_the_view_frustum_maps_to_the_top_edge() {
        let half = (FOV_Y.to_radians() / 2.0).tan() * CAMERA_Z;
        let top = project_point(focal_length(), Vec3::new(0.0, half, 0.0)).expect("visible");
        assert!(top.y.abs() < 1e-3);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        assert!(project_point(focal_length(), Vec3::new(0.0, 0.0, CAMERA_Z + 1.0)).is_none());
    }
}
