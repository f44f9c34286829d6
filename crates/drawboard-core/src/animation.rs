//! Per-frame animation state: fading laser and eraser trails and zoom polling.
//!
//! The host's frame loop owns one [`AnimationSession`] and calls [`AnimationSession::tick`]
//! once per frame. Nothing here touches the element store.

use kurbo::Point;
use std::collections::VecDeque;

/// One trail sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub point: Point,
    pub time_ms: f64,
    /// 1.0 when fresh, decays to 0.0 over the fade duration.
    pub alpha: f64,
}

/// A bounded, time-faded polyline.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    max_len: usize,
    fade_ms: f64,
}

impl Trail {
    pub fn new(max_len: usize, fade_ms: f64) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len),
            max_len: max_len.max(1),
            fade_ms: if fade_ms > 0.0 { fade_ms } else { 1.0 },
        }
    }

    /// Append a fresh sample, dropping the oldest beyond the retained length.
    pub fn push(&mut self, point: Point, time_ms: f64) {
        self.points.push_back(TrailPoint {
            point,
            time_ms,
            alpha: 1.0,
        });
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
    }

    /// Recompute alphas for `now_ms` and drop fully faded samples.
    pub fn fade(&mut self, now_ms: f64) {
        let fade_ms = self.fade_ms;
        for p in &mut self.points {
            p.alpha = (1.0 - (now_ms - p.time_ms) / fade_ms).clamp(0.0, 1.0);
        }
        self.points.retain(|p| p.alpha > 0.0);
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// What changed during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameUpdate {
    /// The new zoom level, if it differs from the last polled one.
    pub zoom_changed: Option<f64>,
    /// Whether any trail is still visible and another frame is wanted.
    pub trails_active: bool,
}

/// Animation state owned by the render loop rather than the editing state.
#[derive(Debug, Clone)]
pub struct AnimationSession {
    running: bool,
    laser: Trail,
    eraser: Trail,
    last_zoom: Option<f64>,
}

impl AnimationSession {
    pub fn new(trail_max_len: usize, laser_fade_ms: f64, eraser_fade_ms: f64) -> Self {
        Self {
            running: false,
            laser: Trail::new(trail_max_len, laser_fade_ms),
            eraser: Trail::new(trail_max_len, eraser_fade_ms),
            last_zoom: None,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::debug!("animation session started");
        }
        self.running = true;
    }

    /// Tear down: stop ticking and drop every trail buffer.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("animation session stopped");
        }
        self.running = false;
        self.laser.clear();
        self.eraser.clear();
        self.last_zoom = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn push_laser(&mut self, point: Point, time_ms: f64) {
        if self.running {
            self.laser.push(point, time_ms);
        }
    }

    pub fn push_eraser(&mut self, point: Point, time_ms: f64) {
        if self.running {
            self.eraser.push(point, time_ms);
        }
    }

    pub fn laser_trail(&self) -> &Trail {
        &self.laser
    }

    pub fn eraser_trail(&self) -> &Trail {
        &self.eraser
    }

    /// Whether the host should keep scheduling frames.
    pub fn needs_frame(&self) -> bool {
        self.running && !(self.laser.is_empty() && self.eraser.is_empty())
    }

    /// Advance one frame.
    pub fn tick(&mut self, now_ms: f64, zoom: f64) -> FrameUpdate {
        if !self.running {
            return FrameUpdate::default();
        }
        self.laser.fade(now_ms);
        self.eraser.fade(now_ms);

        let zoom_changed = match self.last_zoom {
            Some(z) if (z - zoom).abs() < f64::EPSILON => None,
            _ => Some(zoom),
        };
        self.last_zoom = Some(zoom);

        FrameUpdate {
            zoom_changed,
            trails_active: !(self.laser.is_empty() && self.eraser.is_empty()),
        }
    }
}
