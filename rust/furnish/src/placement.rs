// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Randomised placement search
//!
//! Each attempt runs `Sampling -> Orienting -> Validating`. Sampling drops the
//! footprint at a random point inside the room, orienting turns it to face
//! away from the nearest wall (and optionally pushes it flush against that
//! wall), validating checks containment, collisions and door clearance. A
//! rejected candidate has its rotation undone and the search starts over until
//! the wall-clock budget (or the optional attempt cap) runs out.

use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::footprint::Footprint;
use crate::resolver::{orient_to_nearest_wall, WallOrientation};
use crate::room::Room;
use crate::types::Obstacle;

/// Default per-item search budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Monotonic time source for the search budget.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated clock that advances by a fixed step on every reading.
///
/// Makes timeouts reproducible: a search with budget `T` reads the clock at
/// most `T / step + 2` times before giving up.
#[derive(Debug, Clone)]
pub struct StepClock {
    elapsed: Cell<Duration>,
    step: Duration,
}

impl StepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            elapsed: Cell::new(Duration::ZERO),
            step,
        }
    }

    /// Number of readings taken so far.
    pub fn readings(&self) -> u128 {
        if self.step.is_zero() {
            return 0;
        }
        self.elapsed.get().as_nanos() / self.step.as_nanos()
    }
}

impl Clock for StepClock {
    fn now(&self) -> Duration {
        let now = self.elapsed.get() + self.step;
        self.elapsed.set(now);
        now
    }
}

/// How a snapped item is pushed off the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// Four-entry direction table keyed by the wall angle; angles between the
    /// entries collapse onto the nearest one.
    #[default]
    Cardinal,
    /// Follow the wall's inward normal, which also handles slanted walls.
    WallNormal,
}

impl SnapMode {
    /// Unit direction from the wall into the room.
    pub fn direction(&self, orientation: &WallOrientation) -> Vector2<f64> {
        match self {
            SnapMode::Cardinal => cardinal_direction(orientation.theta_deg),
            SnapMode::WallNormal => orientation.inward_normal,
        }
    }
}

impl FromStr for SnapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cardinal" => Ok(SnapMode::Cardinal),
            "normal" | "wall-normal" | "wall_normal" => Ok(SnapMode::WallNormal),
            other => Err(format!("unknown snap mode '{other}' (expected cardinal or normal)")),
        }
    }
}

impl fmt::Display for SnapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapMode::Cardinal => f.write_str("cardinal"),
            SnapMode::WallNormal => f.write_str("wall-normal"),
        }
    }
}

/// Snap direction table keyed by `ceil(theta)`: 0, 90, 180, 270 degrees.
fn cardinal_direction(theta_deg: f64) -> Vector2<f64> {
    const TABLE: [[f64; 2]; 4] = [[0.0, -1.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]];
    let key = theta_deg.ceil();
    let slot = ((key / 90.0).round() as i64).rem_euclid(4) as usize;
    Vector2::new(TABLE[slot][0], TABLE[slot][1])
}

/// Search budget and snapping behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Wall-clock budget per `place` call
    pub timeout: Duration,
    /// Optional cap on validated candidates per `place` call
    pub max_attempts: Option<u32>,
    pub snap_mode: SnapMode,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: None,
            snap_mode: SnapMode::Cardinal,
        }
    }
}

/// Why a validated candidate was thrown away.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    OutsideRoom,
    Collision { obstacle: String },
    DoorClearance { door: String, distance: f64, required: f64 },
}

/// Result of a single `place` call.
#[derive(Debug, Clone)]
pub enum PlacementOutcome {
    Committed {
        footprint: Footprint,
        /// Rotation applied by the committing attempt
        theta_deg: f64,
        attempts: u32,
    },
    Failed {
        attempts: u32,
        elapsed: Duration,
    },
}

impl PlacementOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PlacementOutcome::Committed { .. })
    }

    pub fn footprint(&self) -> Option<&Footprint> {
        match self {
            PlacementOutcome::Committed { footprint, .. } => Some(footprint),
            PlacementOutcome::Failed { .. } => None,
        }
    }

    pub fn into_footprint(self) -> Option<Footprint> {
        match self {
            PlacementOutcome::Committed { footprint, .. } => Some(footprint),
            PlacementOutcome::Failed { .. } => None,
        }
    }
}

/// Seam between the orchestrator and the search.
pub trait ItemPlacer {
    fn place(
        &mut self,
        footprint: &Footprint,
        room: &Room,
        obstacles: &[Obstacle],
        snap: bool,
    ) -> PlacementOutcome;
}

enum SearchState {
    Sampling,
    Orienting { candidate: Footprint },
    Validating { candidate: Footprint, theta_deg: f64 },
}

/// Placement search owning its random stream and clock.
pub struct Placer<R, C = MonotonicClock> {
    rng: R,
    clock: C,
    config: PlacementConfig,
}

impl<R: Rng> Placer<R, MonotonicClock> {
    pub fn new(rng: R, config: PlacementConfig) -> Self {
        Self::with_clock(rng, MonotonicClock::new(), config)
    }
}

impl<R: Rng, C: Clock> Placer<R, C> {
    pub fn with_clock(rng: R, clock: C, config: PlacementConfig) -> Self {
        Self { rng, clock, config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Search for a valid pose of `footprint` inside `room`.
    ///
    /// The returned footprint is the committed one; the input is untouched.
    pub fn place(
        &mut self,
        footprint: &Footprint,
        room: &Room,
        obstacles: &[Obstacle],
        snap: bool,
    ) -> PlacementOutcome {
        let start = self.clock.now();
        let mut attempts = 0u32;
        let mut current = footprint.clone();
        let mut state = SearchState::Sampling;

        loop {
            state = match state {
                SearchState::Sampling => {
                    let elapsed = self.clock.now().saturating_sub(start);
                    if elapsed > self.config.timeout
                        || self.config.max_attempts.is_some_and(|cap| attempts >= cap)
                    {
                        return PlacementOutcome::Failed { attempts, elapsed };
                    }
                    match room.sample_point(&mut self.rng) {
                        Some(point) => {
                            let moved = current.centered_at(&point);
                            if room.contains_footprint(&moved) {
                                SearchState::Orienting { candidate: moved }
                            } else {
                                current = moved;
                                SearchState::Sampling
                            }
                        }
                        None => SearchState::Sampling,
                    }
                }
                SearchState::Orienting { candidate } => {
                    match orient_to_nearest_wall(room, &candidate) {
                        Some(orientation) => {
                            let theta_deg = orientation.theta_deg;
                            let rotated = candidate.rotated(theta_deg);
                            let candidate = if snap {
                                self.snap_to_wall(&rotated, &orientation)
                            } else {
                                rotated
                            };
                            SearchState::Validating {
                                candidate,
                                theta_deg,
                            }
                        }
                        None => {
                            current = candidate;
                            SearchState::Sampling
                        }
                    }
                }
                SearchState::Validating {
                    candidate,
                    theta_deg,
                } => {
                    attempts += 1;
                    match validate(&candidate, room, obstacles) {
                        None => {
                            return PlacementOutcome::Committed {
                                footprint: candidate,
                                theta_deg,
                                attempts,
                            };
                        }
                        Some(rejection) => {
                            tracing::trace!(attempt = attempts, ?rejection, "Candidate rejected");
                            current = candidate.rotated(-theta_deg);
                            SearchState::Sampling
                        }
                    }
                }
            };
        }
    }

    /// Move a rotated footprint so its back edge rests on the wall at the snap point.
    fn snap_to_wall(&self, rotated: &Footprint, orientation: &WallOrientation) -> Footprint {
        let depth = rotated.local_extents().y;
        let direction = self.config.snap_mode.direction(orientation);
        let target: Point2<f64> = orientation.snap_point + direction * (depth / 2.0);
        rotated.centered_at(&target)
    }
}

impl<R: Rng, C: Clock> ItemPlacer for Placer<R, C> {
    fn place(
        &mut self,
        footprint: &Footprint,
        room: &Room,
        obstacles: &[Obstacle],
        snap: bool,
    ) -> PlacementOutcome {
        Placer::place(self, footprint, room, obstacles, snap)
    }
}

/// Check a candidate against the room and the obstacle list.
///
/// Windows never collide. Doors additionally demand a center-to-center
/// clearance of the door's largest extent plus half the item's.
pub fn validate(candidate: &Footprint, room: &Room, obstacles: &[Obstacle]) -> Option<Rejection> {
    if !room.contains_footprint(candidate) {
        return Some(Rejection::OutsideRoom);
    }

    if let Some(hit) = obstacles
        .iter()
        .find(|o| o.blocks_placement() && o.footprint.overlaps(candidate))
    {
        return Some(Rejection::Collision {
            obstacle: hit.name.clone(),
        });
    }

    let center = candidate.center();
    let half_item = candidate.largest_extent() / 2.0;
    for door in obstacles.iter().filter(|o| o.is_door()) {
        let required = door.footprint.largest_extent() + half_item;
        let distance = (door.footprint.center() - center).norm();
        if distance < required {
            return Some(Rejection::DoorClearance {
                door: door.name.clone(),
                distance,
                required,
            });
        }
    }

    None
}
