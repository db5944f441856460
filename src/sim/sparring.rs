//! Sparring engine
//!
//! A seeded stand-in for the real fight engine so the presentation loop can
//! run without trained policies. Fighters close distance, strafe and throw
//! random punches; a fully extended fist touching the opponent's body costs
//! one health, a whiff costs the puncher one energy. Neither ever recovers.
//! This is scripted kinematics, not a physics model.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::client::{SimulationClient, SimulationHandle};
use super::state::{
    ACTION_COUNT, Control, FightSnapshot, FistPosture, FistState, MoveX, MoveY, PLAYER_COUNT,
    PlayerState,
};
use crate::catalog::FighterId;
use crate::consts::{BODY_RADIUS, FIST_RADIUS, MAX_ENERGY, MAX_HEALTH, TARGET_FPS, WORLD_SIZE};
use crate::error::{LoadError, StepError};

/// Ticks a policy decision is held for
const DECISION_TICKS: u32 = 6;
/// Ticks spent extending (and again retracting) a punch
const PUNCH_TICKS: u8 = 5;
/// Fist distance from body center at rest
const FIST_REST_REACH: f32 = 30.0;
/// Extra reach at full extension
const FIST_PUNCH_REACH: f32 = 42.0;
/// Angular offset of each fist from the facing direction
const FIST_SPREAD: f32 = 0.6;
/// Movement speed (world units per tick)
const MOVE_SPEED: f32 = 3.0;
/// Preferred distance between fighters
const ENGAGE_DISTANCE: f32 = 85.0;

/// Default round length: 90 seconds of presentation time
pub const DEFAULT_MAX_TICKS: u32 = 90 * TARGET_FPS as u32;

/// Builds seeded sparring bouts
#[derive(Debug, Clone)]
pub struct SparringClient {
    seed: u64,
    max_ticks: u32,
}

impl SparringClient {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    /// Override the round length (ticks)
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

impl SimulationClient for SparringClient {
    type Handle = SparringBout;

    async fn construct(
        &self,
        fighter_a: FighterId,
        fighter_b: FighterId,
    ) -> Result<SparringBout, LoadError> {
        if self.max_ticks == 0 {
            return Err(LoadError("round length must be at least one tick".to_string()));
        }
        // Fighter numbers perturb the seed so different pairings spar differently
        let seed = self.seed ^ ((fighter_a.0 as u64) << 32) ^ fighter_b.0 as u64;
        log::info!(
            "Sparring bout {} vs {} (seed {}, {} ticks)",
            fighter_a,
            fighter_b,
            seed,
            self.max_ticks
        );
        Ok(SparringBout::new(seed, self.max_ticks))
    }
}

/// Per-fist punch progress
#[derive(Debug, Clone, Copy, Default)]
struct Punch {
    posture: FistPosture,
    ticks: u8,
}

#[derive(Debug, Clone)]
struct Fighter {
    pos: Vec2,
    vel: Vec2,
    rotation: f32,
    health: u8,
    energy: u8,
    control: Control,
    punches: [Punch; 2],
}

impl Fighter {
    fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: MAX_HEALTH,
            energy: MAX_ENERGY,
            control: Control::default(),
            punches: [Punch::default(); 2],
        }
    }

    /// Fist center for the given side (0 = left, 1 = right)
    fn fist_pos(&self, side: usize) -> Vec2 {
        let punch = self.punches[side];
        let extension = match punch.posture {
            FistPosture::Resting => 0.0,
            FistPosture::Extending => punch.ticks as f32 / PUNCH_TICKS as f32,
            FistPosture::Retracting => 1.0 - punch.ticks as f32 / PUNCH_TICKS as f32,
        };
        let spread = if side == 0 { -FIST_SPREAD } else { FIST_SPREAD };
        // Punches straighten toward the facing direction as they extend
        let angle = self.rotation + spread * (1.0 - extension);
        self.pos + Vec2::from_angle(angle) * (FIST_REST_REACH + FIST_PUNCH_REACH * extension)
    }

    fn snapshot(&self) -> PlayerState {
        PlayerState {
            pos: self.pos,
            rotation: self.rotation,
            vel: self.vel,
            health: self.health,
            energy: self.energy,
            fists: [0, 1].map(|side| FistState {
                pos: self.fist_pos(side),
                posture: self.punches[side].posture,
            }),
            last_control: self.control,
        }
    }
}

/// A running sparring bout
#[derive(Debug, Clone)]
pub struct SparringBout {
    rng: Pcg32,
    fighters: [Fighter; PLAYER_COUNT],
    tick: u32,
    max_ticks: u32,
    done: bool,
}

impl SparringBout {
    pub fn new(seed: u64, max_ticks: u32) -> Self {
        let mid = WORLD_SIZE / 2.0;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            fighters: [
                Fighter::new(Vec2::new(mid - 80.0, mid)),
                Fighter::new(Vec2::new(mid + 80.0, mid)),
            ],
            tick: 0,
            max_ticks,
            done: false,
        }
    }

    fn choose_controls(&mut self) {
        if self.tick % DECISION_TICKS != 0 {
            return;
        }
        for fighter in &mut self.fighters {
            fighter.control = Control::from_index(self.rng.random_range(0..ACTION_COUNT));
        }
    }

    fn move_fighters(&mut self) {
        let positions = [self.fighters[0].pos, self.fighters[1].pos];
        let min = BODY_RADIUS;
        let max = WORLD_SIZE - BODY_RADIUS;

        for (i, fighter) in self.fighters.iter_mut().enumerate() {
            let to_opponent = positions[1 - i] - positions[i];
            let facing = to_opponent.normalize_or_zero();
            let tangent = facing.perp();

            let mut dir = Vec2::ZERO;
            if fighter.control.move_y == MoveY::Back {
                dir -= facing;
            } else if to_opponent.length() > ENGAGE_DISTANCE {
                dir += facing;
            }
            match fighter.control.move_x {
                MoveX::Left => dir += tangent,
                MoveX::Right => dir -= tangent,
                MoveX::Still => {}
            }

            let old = fighter.pos;
            fighter.pos = (fighter.pos + dir.normalize_or_zero() * MOVE_SPEED)
                .clamp(Vec2::splat(min), Vec2::splat(max));
            fighter.vel = fighter.pos - old;
            fighter.rotation = to_opponent.y.atan2(to_opponent.x);
        }
    }

    /// Advance punches; returns which fighters land a blow this tick
    fn advance_punches(&mut self) -> [bool; PLAYER_COUNT] {
        let mut landed = [false; PLAYER_COUNT];
        let bodies = [self.fighters[0].pos, self.fighters[1].pos];

        for (i, fighter) in self.fighters.iter_mut().enumerate() {
            let wants = [fighter.control.left_punch, fighter.control.right_punch];
            for side in 0..2 {
                let punch = &mut fighter.punches[side];
                match punch.posture {
                    FistPosture::Resting => {
                        if wants[side] && fighter.energy > 0 {
                            *punch = Punch {
                                posture: FistPosture::Extending,
                                ticks: 0,
                            };
                        }
                    }
                    FistPosture::Extending => {
                        punch.ticks += 1;
                        if punch.ticks >= PUNCH_TICKS {
                            *punch = Punch {
                                posture: FistPosture::Retracting,
                                ticks: 0,
                            };
                            // Retracting at tick 0 is still full reach
                            let tip = fighter.fist_pos(side);
                            if tip.distance(bodies[1 - i]) < BODY_RADIUS + FIST_RADIUS {
                                landed[i] = true;
                            } else {
                                // Whiffed punches tire the fighter out
                                fighter.energy = fighter.energy.saturating_sub(1);
                            }
                        }
                    }
                    FistPosture::Retracting => {
                        punch.ticks += 1;
                        if punch.ticks >= PUNCH_TICKS {
                            *punch = Punch::default();
                        }
                    }
                }
            }
        }
        landed
    }
}

impl SimulationHandle for SparringBout {
    fn step(&mut self) -> Result<FightSnapshot, StepError> {
        if self.done {
            return Err(StepError("bout is already over".to_string()));
        }
        self.tick += 1;
        self.choose_controls();
        self.move_fighters();
        let landed = self.advance_punches();
        for (i, hit) in landed.into_iter().enumerate() {
            if hit {
                let target = &mut self.fighters[1 - i];
                target.health = target.health.saturating_sub(1);
            }
        }

        self.done = self.fighters.iter().any(|f| f.health == 0) || self.tick >= self.max_ticks;
        Ok(FightSnapshot {
            players: [self.fighters[0].snapshot(), self.fighters[1].snapshot()],
            is_done: self.done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn bout(seed: u64, max_ticks: u32) -> SparringBout {
        let client = SparringClient::new(seed).with_max_ticks(max_ticks);
        block_on(client.construct(FighterId(25), FighterId(11))).unwrap()
    }

    #[test]
    fn test_zero_length_round_fails_to_load() {
        let result = block_on(
            SparringClient::new(1)
                .with_max_ticks(0)
                .construct(FighterId(25), FighterId(11)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_determinism() {
        let mut a = bout(99999, 500);
        let mut b = bout(99999, 500);
        for _ in 0..200 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
    }

    #[test]
    fn test_bout_terminates_and_health_never_rises() {
        let mut bout = bout(12345, 2000);
        let mut prev = [MAX_HEALTH; 2];
        let mut prev_energy = [MAX_ENERGY; 2];
        let mut steps = 0;
        loop {
            let snap = bout.step().unwrap();
            steps += 1;
            for i in 0..2 {
                assert!(snap.players[i].health <= prev[i]);
                assert!(snap.players[i].energy <= prev_energy[i]);
            }
            prev = snap.healths();
            prev_energy = [snap.players[0].energy, snap.players[1].energy];
            if snap.is_done {
                assert!(prev.contains(&0) || steps == 2000);
                break;
            }
        }
        assert!(steps <= 2000);
        // Stepping a finished bout is an error, never a silent repeat
        assert!(bout.step().is_err());
    }

    #[test]
    fn test_fighters_stay_in_ring() {
        let mut bout = bout(7, 600);
        for _ in 0..600 {
            let snap = bout.step().unwrap();
            for p in &snap.players {
                assert!(p.pos.x >= BODY_RADIUS && p.pos.x <= WORLD_SIZE - BODY_RADIUS);
                assert!(p.pos.y >= BODY_RADIUS && p.pos.y <= WORLD_SIZE - BODY_RADIUS);
            }
            if snap.is_done {
                break;
            }
        }
    }
}
