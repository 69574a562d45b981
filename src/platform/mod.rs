//! Platform abstraction layer
//!
//! The simulation core never touches devices. It talks to:
//! - an input source it polls once per behavior update
//! - an asset catalog handing out opaque frame/sound handles
//! - a frame sink that receives an enabled-only snapshot every frame

use std::collections::HashMap;
use std::ops::ControlFlow;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geom::Shape;
use crate::sim::EntityId;

/// Closed set of player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Attack,
    Evasive,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Attack, Action::Evasive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::Attack => "ATTACK",
            Action::Evasive => "EVASIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LEFT" => Some(Action::Left),
            "RIGHT" => Some(Action::Right),
            "ATTACK" => Some(Action::Attack),
            "EVASIVE" => Some(Action::Evasive),
            _ => None,
        }
    }
}

/// Non-blocking input query
pub trait InputSource {
    fn is_action_active(&self, action: Action) -> bool;

    /// String-keyed query; unknown action names are never active
    fn is_named_action_active(&self, name: &str) -> bool {
        Action::parse(name).is_some_and(|a| self.is_action_active(a))
    }
}

/// Input state for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub evasive: bool,
}

impl ActionState {
    pub fn with(mut self, action: Action) -> Self {
        match action {
            Action::Left => self.left = true,
            Action::Right => self.right = true,
            Action::Attack => self.attack = true,
            Action::Evasive => self.evasive = true,
        }
        self
    }
}

impl InputSource for ActionState {
    fn is_action_active(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Attack => self.attack,
            Action::Evasive => self.evasive,
        }
    }
}

/// Opaque handle to one renderable frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// Opaque handle to a playable sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundHandle(pub u32);

/// Ordered frames played back with a fixed delay
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSequence {
    pub frames: Vec<FrameHandle>,
    /// Seconds each frame stays on screen
    pub delay: f32,
    /// Whether playback wraps around to the first frame
    pub looping: bool,
}

impl FrameSequence {
    pub fn new(frames: Vec<FrameHandle>, delay: f32, looping: bool) -> Self {
        Self { frames, delay, looping }
    }

    /// Frame to show `elapsed` seconds after playback started
    pub fn frame_at(&self, elapsed: f32) -> Option<FrameHandle> {
        let last = self.frames.len().checked_sub(1)?;
        if self.delay <= 0.0 {
            return self.frames.first().copied();
        }
        let step = (elapsed.max(0.0) / self.delay) as usize;
        let index = if self.looping { step % self.frames.len() } else { step.min(last) };
        Some(self.frames[index])
    }
}

/// Supplies frame sequences and sounds by name
pub trait AssetCatalog {
    fn frames(&self, name: &str) -> Option<FrameSequence>;
    fn sound(&self, name: &str) -> Option<SoundHandle>;
}

/// In-memory catalog; unknown names get deterministic synthetic handles
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    frames: HashMap<String, FrameSequence>,
    sounds: HashMap<String, SoundHandle>,
}

impl StaticAssets {
    pub fn insert_frames(&mut self, name: impl Into<String>, frames: FrameSequence) {
        self.frames.insert(name.into(), frames);
    }

    pub fn insert_sound(&mut self, name: impl Into<String>, sound: SoundHandle) {
        self.sounds.insert(name.into(), sound);
    }

    fn synthetic_id(name: &str) -> u32 {
        // FNV-1a keeps handles stable across runs
        name.bytes()
            .fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
    }
}

impl AssetCatalog for StaticAssets {
    fn frames(&self, name: &str) -> Option<FrameSequence> {
        self.frames.get(name).cloned().or_else(|| {
            let base = Self::synthetic_id(name);
            let frames = (0..4).map(|i| FrameHandle(base.wrapping_add(i))).collect();
            Some(FrameSequence::new(frames, 0.1, !name.contains("explosion")))
        })
    }

    fn sound(&self, name: &str) -> Option<SoundHandle> {
        self.sounds
            .get(name)
            .copied()
            .or(Some(SoundHandle(Self::synthetic_id(name))))
    }
}

/// What a renderer needs to draw one entity
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub angle: f32,
    pub scale: f32,
    pub layer: i32,
    pub shape: Shape,
    pub frame: Option<FrameHandle>,
}

/// Consumer of per-frame snapshots; returning `Break` stops the run loop
pub trait FrameSink {
    fn present(&mut self, frame: u64, snapshot: &[RenderItem]) -> ControlFlow<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(u64, &[RenderItem]) -> ControlFlow<()>,
{
    fn present(&mut self, frame: u64, snapshot: &[RenderItem]) -> ControlFlow<()> {
        self(frame, snapshot)
    }
}
