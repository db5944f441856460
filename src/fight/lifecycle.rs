//! Fight lifecycle: Start, Active, Ended
//!
//! Start waits for confirmation. Active owns the engine handle and the frame
//! scheduler; every scheduled tick steps the engine, reports hits, and
//! redraws. The first done snapshot ends the fight, and the outcome is
//! announced once after the resolution delay. Ended is terminal.

use std::mem;
use std::ops::ControlFlow;

use crate::catalog::{Catalog, FighterDescriptor, FighterId};
use crate::color::Color;
use crate::config::FightConfig;
use crate::effects::EffectSink;
use crate::error::{FightError, LoadError, SurfaceError};
use crate::platform::{FrameHost, Timer, TimerId};
use crate::renderer::{RingGeometry, Surface, render};
use crate::scheduler::{FrameOutcome, FrameScheduler};
use crate::sim::{FightSnapshot, PLAYER_COUNT, SimulationClient, SimulationHandle};

use super::diff::diff;

/// Externally visible lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Start,
    Active,
    Ended,
}

/// How a completed fight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightOutcome {
    /// Strictly more remaining health
    Winner { player: usize, fighter: FighterId },
    /// Both fighters finished on the same health
    Undecided { health: u8 },
}

impl FightOutcome {
    /// Decide a finished fight by remaining health
    pub fn decide(snapshot: &FightSnapshot, fighters: [FighterId; PLAYER_COUNT]) -> Self {
        let [h0, h1] = snapshot.healths();
        match h0.cmp(&h1) {
            std::cmp::Ordering::Greater => FightOutcome::Winner {
                player: 0,
                fighter: fighters[0],
            },
            std::cmp::Ordering::Less => FightOutcome::Winner {
                player: 1,
                fighter: fighters[1],
            },
            std::cmp::Ordering::Equal => FightOutcome::Undecided { health: h0 },
        }
    }

    pub fn winner(&self) -> Option<FighterId> {
        match self {
            FightOutcome::Winner { fighter, .. } => Some(*fighter),
            FightOutcome::Undecided { .. } => None,
        }
    }
}

enum Stage<X, H: FrameHost> {
    Start {
        host: H,
        loading: bool,
    },
    // Field order is drop order: the scheduler goes before the handle
    Active {
        scheduler: FrameScheduler<H>,
        handle: X,
    },
    Ended {
        outcome: Option<FightOutcome>,
    },
}

impl<X, H: FrameHost> Stage<X, H> {
    fn phase(&self) -> LifecyclePhase {
        match self {
            Stage::Start { .. } => LifecyclePhase::Start,
            Stage::Active { .. } => LifecyclePhase::Active,
            Stage::Ended { .. } => LifecyclePhase::Ended,
        }
    }
}

/// Everything a tick touches besides the engine
struct Presenter<D> {
    surface: D,
    geometry: RingGeometry,
    colors: [Color; PLAYER_COUNT],
    effects: Option<Box<dyn EffectSink>>,
    latest: Option<FightSnapshot>,
}

impl<D: Surface> Presenter<D> {
    /// Report hits, draw, and keep the snapshot for the next diff
    fn present(&mut self, snapshot: FightSnapshot, now: f64) -> Result<(), SurfaceError> {
        for hit in diff(self.latest.as_ref(), &snapshot, self.colors) {
            log::debug!("Player {} hit at ({:.0}, {:.0})", hit.player, hit.pos.x, hit.pos.y);
            if let Some(effects) = self.effects.as_mut() {
                effects.on_hit(&hit, now);
            }
        }
        let drawn = self.surface.draw(&render(&snapshot, self.colors, &self.geometry));
        self.latest = Some(snapshot);
        drawn
    }
}

type EndedCallback = Box<dyn FnOnce(FightOutcome)>;

/// A single fight between two catalog fighters
pub struct FightLifecycle<X, H, T, D>
where
    X: SimulationHandle,
    H: FrameHost,
    T: Timer,
    D: Surface,
{
    fighters: [FighterDescriptor; PLAYER_COUNT],
    config: FightConfig,
    presenter: Presenter<D>,
    stage: Stage<X, H>,
    timer: T,
    on_ended: Option<EndedCallback>,
    notification: Option<TimerId>,
    torn_down: bool,
}

impl<X, H, T, D> FightLifecycle<X, H, T, D>
where
    X: SimulationHandle,
    H: FrameHost,
    T: Timer,
    D: Surface,
{
    /// Set up a fight in Start. Fighters and config are fixed from here on.
    pub fn new(
        catalog: &Catalog,
        fighter_ids: [FighterId; PLAYER_COUNT],
        config: FightConfig,
        host: H,
        timer: T,
        surface: D,
    ) -> Result<Self, FightError> {
        config.validate()?;
        let fighters = [
            catalog.get(fighter_ids[0])?.clone(),
            catalog.get(fighter_ids[1])?.clone(),
        ];
        log::info!("Fight set: {} vs {}", fighters[0].tag(), fighters[1].tag());

        Ok(Self {
            presenter: Presenter {
                surface,
                geometry: RingGeometry::from_config(&config),
                colors: [fighters[0].color, fighters[1].color],
                effects: None,
                latest: None,
            },
            fighters,
            config,
            stage: Stage::Start {
                host,
                loading: false,
            },
            timer,
            on_ended: None,
            notification: None,
            torn_down: false,
        })
    }

    /// Receive every hit as it is detected
    pub fn with_effects(mut self, effects: Box<dyn EffectSink>) -> Self {
        self.presenter.effects = Some(effects);
        self
    }

    /// Called once with the outcome, a resolution delay after the fight ends
    pub fn on_fight_ended(mut self, callback: impl FnOnce(FightOutcome) + 'static) -> Self {
        self.on_ended = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.stage.phase()
    }

    /// True between `begin_confirm` and `activate`
    pub fn is_loading(&self) -> bool {
        matches!(self.stage, Stage::Start { loading: true, .. })
    }

    /// Outcome of a completed fight; `None` while running, after failure, or after teardown
    pub fn outcome(&self) -> Option<FightOutcome> {
        match self.stage {
            Stage::Ended { outcome } => outcome,
            _ => None,
        }
    }

    /// Most recent snapshot drawn
    pub fn latest(&self) -> Option<&FightSnapshot> {
        self.presenter.latest.as_ref()
    }

    pub fn fighters(&self) -> &[FighterDescriptor; PLAYER_COUNT] {
        &self.fighters
    }

    pub fn config(&self) -> &FightConfig {
        &self.config
    }

    pub fn surface(&self) -> &D {
        &self.presenter.surface
    }

    fn fighter_ids(&self) -> [FighterId; PLAYER_COUNT] {
        [self.fighters[0].id, self.fighters[1].id]
    }

    /// Load the engine and enter Active
    ///
    /// On a load failure the fight stays in Start and may be confirmed again.
    pub async fn confirm<C>(&mut self, client: &C, now: f64) -> Result<(), FightError>
    where
        C: SimulationClient<Handle = X>,
    {
        let [a, b] = self.begin_confirm()?;
        let loaded = client.construct(a, b).await;
        self.activate(loaded, now)
    }

    /// First half of `confirm`: mark the fight as loading and return who to load
    ///
    /// For hosts that cannot hold the lifecycle borrowed across the load.
    pub fn begin_confirm(&mut self) -> Result<[FighterId; PLAYER_COUNT], FightError> {
        let phase = self.phase();
        if phase != LifecyclePhase::Start || self.is_loading() {
            log::warn!("Confirm ignored ({:?}, loading={})", phase, self.is_loading());
            return Err(FightError::InvalidPhase {
                action: "confirm",
                phase,
            });
        }
        if let Stage::Start { loading, .. } = &mut self.stage {
            *loading = true;
        }
        log::info!("Fight confirmed, loading engine");
        Ok(self.fighter_ids())
    }

    /// Second half of `confirm`: take the loaded engine, draw its first tick, start the loop
    pub fn activate(&mut self, loaded: Result<X, LoadError>, now: f64) -> Result<(), FightError> {
        if self.torn_down {
            log::warn!("Engine finished loading after teardown, dropping it");
            return Ok(());
        }

        let host = match mem::replace(&mut self.stage, Stage::Ended { outcome: None }) {
            Stage::Start {
                host,
                loading: true,
            } => host,
            stage => {
                let phase = stage.phase();
                self.stage = stage;
                log::warn!("Activate ignored ({:?})", phase);
                return Err(FightError::InvalidPhase {
                    action: "activate",
                    phase,
                });
            }
        };

        let mut handle = match loaded {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("{}", e);
                self.stage = Stage::Start {
                    host,
                    loading: false,
                };
                return Err(e.into());
            }
        };

        // One tick is drawn before the loop starts
        let snapshot = handle.step().map_err(|e| self.fail(e.into()))?;
        let done = snapshot.is_done;
        self.presenter
            .present(snapshot, now)
            .map_err(|e| self.fail(e.into()))?;

        if done {
            drop(handle);
            self.resolve();
            return Ok(());
        }

        let mut scheduler = FrameScheduler::new(host, self.config.target_fps);
        scheduler.start();
        self.stage = Stage::Active { scheduler, handle };
        log::info!("Fight active");
        Ok(())
    }

    /// Handle one host frame callback at `now` (ms)
    pub fn on_frame(&mut self, now: f64) -> Result<FrameOutcome, FightError> {
        let Stage::Active { scheduler, handle } = &mut self.stage else {
            return Ok(FrameOutcome::Inert);
        };
        let presenter = &mut self.presenter;

        let result = scheduler.on_frame(now, |now| -> Result<ControlFlow<()>, FightError> {
            let snapshot = handle.step()?;
            let done = snapshot.is_done;
            presenter.present(snapshot, now)?;
            Ok(if done {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        });

        match result {
            Ok(FrameOutcome::Stopped) => {
                self.resolve();
                Ok(FrameOutcome::Stopped)
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Completed: release the engine, decide, and schedule the announcement
    fn resolve(&mut self) {
        let outcome = match &self.presenter.latest {
            Some(snapshot) => FightOutcome::decide(snapshot, self.fighter_ids()),
            None => return,
        };
        self.stage = Stage::Ended {
            outcome: Some(outcome),
        };

        match outcome {
            FightOutcome::Winner { player, .. } => {
                log::info!("Fight over: {} wins", self.fighters[player].tag())
            }
            FightOutcome::Undecided { health } => {
                log::info!("Fight over: undecided at {} health each", health)
            }
        }

        if let Some(on_ended) = self.on_ended.take() {
            let id = self.timer.set_timeout(
                self.config.resolution_delay_ms,
                Box::new(move || on_ended(outcome)),
            );
            self.notification = Some(id);
        }
    }

    /// Step or draw failure: end without an outcome and hand the error back
    fn fail(&mut self, error: FightError) -> FightError {
        log::error!("Fight aborted: {}", error);
        self.stage = Stage::Ended { outcome: None };
        error
    }

    /// Stop the loop, release the engine, cancel a pending announcement
    ///
    /// Safe to call in any phase and more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Stage::Active { scheduler, .. } = &mut self.stage {
            scheduler.cancel();
        }
        if !matches!(self.stage, Stage::Ended { .. }) {
            self.stage = Stage::Ended { outcome: None };
        }
        if let Some(id) = self.notification.take() {
            self.timer.clear_timeout(id);
        }
        self.on_ended = None;
        log::info!("Fight torn down");
    }
}

impl<X, H, T, D> Drop for FightLifecycle<X, H, T, D>
where
    X: SimulationHandle,
    H: FrameHost,
    T: Timer,
    D: Surface,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
