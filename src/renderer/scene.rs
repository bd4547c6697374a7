//! Frame assembly
//!
//! Turns a `Snapshot` into triangle-list vertices in arena pixels plus text
//! labels for the HUD. Text rasterization is left to the host.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::launch_vector;
use crate::sim::{GamePhase, Snapshot};

/// Barrel thickness
const BARREL_WIDTH: f32 = 5.0;
/// Pixels of power bar per unit of power
const POWER_BAR_SCALE: f32 = 5.0;
const POWER_BAR_HEIGHT: f32 = 10.0;
const CIRCLE_SEGMENTS: u32 = 16;

const HUD_FONT: f32 = 24.0;
const POWER_UP_FONT: f32 = 16.0;
const FLASH_FONT: f32 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A line of text to draw on top of the geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Anchor in arena pixels (baseline)
    pub pos: Vec2,
    pub size: f32,
    /// RGBA; alpha carries flash opacity
    pub color: [f32; 4],
    pub align: Align,
}

impl Label {
    fn new(text: impl Into<String>, pos: Vec2, size: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            pos,
            size,
            color,
            align: Align::Left,
        }
    }

    fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Arena size the positions are expressed in
    pub arena: Vec2,
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
}

impl Frame {
    /// Map arena pixels to normalized device coordinates for a viewport.
    ///
    /// The arena is letterboxed to keep its aspect ratio; y is flipped since
    /// arena y grows downward.
    pub fn to_ndc(&self, width: u32, height: u32) -> Vec<Vertex> {
        if width == 0 || height == 0 || self.arena.x <= 0.0 || self.arena.y <= 0.0 {
            return Vec::new();
        }
        let viewport_aspect = width as f32 / height as f32;
        let arena_aspect = self.arena.x / self.arena.y;
        let (sx, sy) = if viewport_aspect > arena_aspect {
            // Wider than the arena: bars left and right
            (arena_aspect / viewport_aspect, 1.0)
        } else {
            (1.0, viewport_aspect / arena_aspect)
        };

        self.vertices
            .iter()
            .map(|v| {
                let x = (v.position[0] / self.arena.x * 2.0 - 1.0) * sx;
                let y = (1.0 - v.position[1] / self.arena.y * 2.0) * sy;
                Vertex::new(x, y, v.color)
            })
            .collect()
    }
}

/// Opacity of a flashing announcement `elapsed_ms` after it started
pub fn flash_opacity(elapsed_ms: f64) -> f32 {
    ((elapsed_ms / 100.0).sin() * 0.5 + 0.5) as f32
}

fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] = alpha;
    color
}

/// Build vertices and labels for a snapshot
pub fn build_frame(snapshot: &Snapshot) -> Frame {
    let arena = &snapshot.arena;
    let size = Vec2::new(arena.width, arena.height);
    let mut vertices = Vec::new();

    vertices.extend(shapes::rect(Vec2::ZERO, size, colors::BACKGROUND));

    // Wall
    vertices.extend(shapes::rect(
        Vec2::new(0.0, arena.height - arena.wall_height),
        Vec2::new(arena.wall_width, arena.wall_height),
        colors::WALL,
    ));

    // Cannon
    let cannon = &snapshot.cannon;
    let muzzle = cannon.pos + launch_vector(cannon.angle, cannon.length);
    vertices.extend(shapes::circle(
        cannon.pos,
        BARREL_WIDTH * 2.0,
        colors::CANNON_BASE,
        CIRCLE_SEGMENTS,
    ));
    vertices.extend(shapes::thick_line(
        cannon.pos,
        muzzle,
        BARREL_WIDTH,
        colors::CANNON,
    ));

    for ball in snapshot.cannonballs {
        vertices.extend(shapes::circle(
            ball.pos,
            ball.radius,
            colors::BALL,
            CIRCLE_SEGMENTS,
        ));
    }

    for attacker in snapshot.attackers {
        let color = if attacker.columns >= 2 {
            colors::ATTACKER_WIDE
        } else {
            colors::ATTACKER
        };
        vertices.extend(shapes::rect(
            attacker.pos,
            Vec2::new(attacker.width, attacker.height),
            color,
        ));
    }

    for explosion in snapshot.explosions {
        // Shrinks and fades over its lifetime
        let life = 1.0 - explosion.frame as f32 / crate::consts::EXPLOSION_FRAMES as f32;
        vertices.extend(shapes::circle(
            explosion.pos,
            explosion.size * 0.5 * life.max(0.2),
            with_alpha(colors::EXPLOSION, life.max(0.0)),
            CIRCLE_SEGMENTS,
        ));
    }

    if cannon.charging {
        let origin = Vec2::new(
            arena.wall_width + 10.0,
            arena.height - arena.wall_height - 50.0,
        );
        vertices.extend(shapes::rect(
            origin,
            Vec2::new(cannon.max_power * POWER_BAR_SCALE, POWER_BAR_HEIGHT),
            colors::POWER_BAR_BG,
        ));
        vertices.extend(shapes::rect(
            origin,
            Vec2::new(cannon.power * POWER_BAR_SCALE, POWER_BAR_HEIGHT),
            colors::POWER_BAR,
        ));
    }

    Frame {
        arena: size,
        vertices,
        labels: build_labels(snapshot),
    }
}

fn build_labels(snapshot: &Snapshot) -> Vec<Label> {
    let arena = &snapshot.arena;
    let mut labels = vec![
        Label::new(
            format!("Score: {}", snapshot.score),
            Vec2::new(10.0, 30.0),
            HUD_FONT,
            colors::TEXT,
        ),
        Label::new(
            format!("Time: {}s", snapshot.elapsed_seconds),
            Vec2::new(arena.width - 150.0, 30.0),
            HUD_FONT,
            colors::TEXT,
        ),
    ];

    for (i, name) in snapshot.active_power_ups.iter().enumerate() {
        labels.push(Label::new(
            format!("Active: {name}"),
            Vec2::new(10.0, arena.height - 20.0 - i as f32 * 20.0),
            POWER_UP_FONT,
            colors::POWER_UP_TEXT,
        ));
    }

    let center = Vec2::new(arena.width * 0.5, arena.height * 0.5);
    if let Some(flash) = snapshot.power_up_flash {
        let opacity = flash_opacity(snapshot.now - flash.started);
        labels.push(
            Label::new(
                flash.name,
                center,
                FLASH_FONT,
                with_alpha(colors::ATTACKER, opacity),
            )
            .centered(),
        );
    }

    if let Some(flash) = snapshot.special_event_flash {
        let opacity = flash_opacity(snapshot.now - flash.started);
        labels.push(
            Label::new(
                format!("Special event: {}", flash.name),
                center - Vec2::new(0.0, FLASH_FONT * 1.5),
                FLASH_FONT,
                with_alpha(colors::EVENT_TEXT, opacity),
            )
            .centered(),
        );
    } else if let Some(name) = snapshot.special_event {
        labels.push(Label::new(
            format!("Event: {name}"),
            Vec2::new(arena.width - 250.0, 60.0),
            POWER_UP_FONT,
            colors::EVENT_TEXT,
        ));
    }

    if snapshot.phase == GamePhase::Ended {
        labels.push(
            Label::new("Game Over", center, FLASH_FONT * 1.5, colors::TEXT).centered(),
        );
    }

    labels
}
