//! Run driver over an external N-body engine
//!
//! The engine owns the particles and the integrator; this crate owns
//! composition, genealogy and persistence. The driver advances the engine one
//! save interval at a time, lets a [`CollisionResolver`] handle collisions
//! in between, and writes a checkpoint after every interval.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use massloss::{RetentionEstimator, build_estimator};
use units::{Length, Time};

use crate::body::{BodyId, Contact};
use crate::checkpoint::{self, CheckpointPaths, RunLock};
use crate::collisions::{CollisionAction, CollisionResolver, TerminalEvent};
use crate::config::RunConfig;
use crate::error::{AccretionError, Result};
use crate::history::Diagnostics;
use crate::initcon::{InitialConditions, SeedBody};
use crate::state::{AbortFlag, BUILD_ID, RunMeta, RunState};

/// Receives collisions from the engine, in simulation-time order
pub trait CollisionHandler {
    /// Called once per overlapping pair; the engine applies the returned action
    fn on_collision(&mut self, time: Time, a: &Contact, b: &Contact) -> CollisionAction;
}

/// Why [`SimulationEngine::integrate`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// The requested time was reached
    Reached,
    /// Every body is gone
    NoParticles,
    /// A collision handler returned [`CollisionAction::Halt`]
    Halted,
}

/// The gravitational integrator, seen from the driver
pub trait SimulationEngine {
    /// Current simulation time
    fn time(&self) -> Time;

    /// Switches collision detection; with it off no handler is ever called
    fn set_collision_detection(&mut self, enabled: bool);

    /// Adds an initial body with the given identity and physical radius
    fn add_seed(&mut self, id: BodyId, seed: &SeedBody, radius: Length) -> Result<()>;

    /// Integrates up to `until`, reporting collisions to `handler`
    fn integrate(&mut self, until: Time, handler: &mut dyn CollisionHandler) -> EngineStatus;

    fn diagnostics(&self) -> Diagnostics;

    /// Escapes and central-body collisions since the last call
    fn take_terminal_events(&mut self) -> Vec<TerminalEvent>;

    /// Persists particle state so a resumed run can restore it
    fn save_snapshot(&mut self, path: &Path) -> Result<()>;
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// `t_max` was reached and the lock released
    Finished { time: Time },
    /// The abort flag was raised; the last checkpoint is written and the lock
    /// file is still on disk
    Aborted { time: Time, lock: PathBuf },
}

/// Drives one run from a fresh start or a checkpoint to completion
pub struct Driver<E: SimulationEngine> {
    engine: E,
    state: RunState,
    estimator: Box<dyn RetentionEstimator>,
    paths: CheckpointPaths,
    lock: RunLock,
    abort: AbortFlag,
    next_target: Time,
}

impl<E: SimulationEngine> Driver<E> {
    /// Sets up a new run: validates the configuration, claims the lock,
    /// builds the estimator and seeds the engine
    pub fn start(
        config: &RunConfig,
        initial: &InitialConditions,
        mut engine: E,
        paths: CheckpointPaths,
    ) -> Result<Self> {
        let kind = config.validate()?;
        if paths.checkpoint.exists() {
            return Err(AccretionError::InvalidConfig(format!(
                "checkpoint {} already exists, resume the run instead",
                paths.checkpoint.display()
            )));
        }
        let lock = RunLock::acquire(&paths.lock)?;

        let prepared = (|| {
            let estimator = build_estimator(kind, &config.estimator_sources())?;
            let mut meta = RunMeta::new(kind, config.t_max, config.num_savesteps);
            meta.initial_conditions = Some(config.initial_conditions.clone());
            meta.no_merging = config.no_merging;
            let mut state = RunState::new(meta);
            engine.set_collision_detection(!config.no_merging);
            seed(&mut state, &mut engine, initial)?;
            state.history.append(engine.diagnostics());
            Ok::<_, AccretionError>((state, estimator))
        })();
        let (state, estimator) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                lock.release()?;
                return Err(err);
            }
        };

        log::info!(
            "starting run {} with {} bodies, {} estimator, t_max {:.3} Myr",
            state.meta.run_id,
            state.meta.initial_n,
            estimator.name(),
            state.meta.t_max.to_myr()
        );
        Ok(Self {
            engine,
            state,
            estimator,
            paths,
            lock,
            abort: AbortFlag::new(),
            next_target: Time::zero(),
        })
    }

    /// Continues a run from its last checkpoint
    ///
    /// `engine` must already be restored from `paths.snapshot`. Refuses to
    /// start while the lock file exists; in that case nothing is read or
    /// written. The checkpoint is copied to the backup path before use. The
    /// estimator recorded in the checkpoint wins over the configured one.
    pub fn resume(config: &RunConfig, mut engine: E, paths: CheckpointPaths) -> Result<Self> {
        let lock = RunLock::acquire(&paths.lock)?;
        let (state, estimator) = match prepare_resume(config, &paths) {
            Ok(prepared) => prepared,
            Err(err) => {
                lock.release()?;
                return Err(err);
            }
        };

        let next_target = state.meta.resume_target();
        engine.set_collision_detection(!state.meta.no_merging);
        let engine_time = engine.time();
        if (engine_time.to_years() - state.meta.current_time.to_years()).abs()
            > state.meta.per_savestep.to_years()
        {
            log::warn!(
                "engine is at {:.0} yr but the checkpoint was written at {:.0} yr",
                engine_time.to_years(),
                state.meta.current_time.to_years()
            );
        }
        log::info!("continuing run {} from {:.0} yr", state.meta.run_id, next_target.to_years());
        Ok(Self {
            engine,
            state,
            estimator,
            paths,
            lock,
            abort: AbortFlag::new(),
            next_target,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn paths(&self) -> &CheckpointPaths {
        &self.paths
    }

    /// Handle for requesting a stop from outside, e.g. a signal handler
    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    /// Runs until `t_max` or until the abort flag is raised
    ///
    /// After each save interval: terminal events are applied, diagnostics are
    /// appended, the engine snapshot and the checkpoint are written, and then
    /// the abort flag is checked. Errors leave the lock file in place.
    pub fn run(mut self) -> Result<RunOutcome> {
        let session = Instant::now();
        let walltime_offset = self.state.meta.walltime;
        let cputime_offset = self.state.meta.cputime;
        let mut integrating = Duration::ZERO;

        while self.next_target <= self.state.meta.t_max {
            let target = self.next_target;
            log::debug!(
                "integrating to {:.0} yr ({:.2}%)",
                target.to_years(),
                100.0 * target.to_years() / self.state.meta.t_max.to_years()
            );

            let started = Instant::now();
            let status = {
                let mut resolver = CollisionResolver::new(
                    &mut self.state,
                    self.estimator.as_mut(),
                    self.abort.clone(),
                );
                self.engine.integrate(target, &mut resolver)
            };
            integrating += started.elapsed();

            match status {
                EngineStatus::Reached => {
                    self.next_target = target + self.state.meta.per_savestep;
                }
                EngineStatus::NoParticles => {
                    log::warn!("no particles left at {:.0} yr", self.engine.time().to_years());
                    self.abort.raise();
                }
                EngineStatus::Halted => {
                    if !self.abort.is_raised() {
                        log::error!("engine halted without a collision failure");
                        self.abort.raise();
                    }
                }
            }

            for event in self.engine.take_terminal_events() {
                self.state.set_terminal(event.id, event.kind, event.time)?;
            }

            self.state.history.append(self.engine.diagnostics());
            let meta = &mut self.state.meta;
            meta.current_time = self.engine.time();
            meta.walltime = walltime_offset + session.elapsed().as_secs_f64();
            meta.cputime = cputime_offset + integrating.as_secs_f64();
            meta.steps_done += 1;

            self.engine.save_snapshot(&self.paths.snapshot)?;
            checkpoint::save(&self.state, &self.paths.checkpoint)?;

            if self.abort.is_raised() {
                let time = self.state.meta.current_time;
                log::error!("run aborted at {:.0} yr", time.to_years());
                return Ok(RunOutcome::Aborted {
                    time,
                    lock: self.lock.keep(),
                });
            }
        }

        self.lock.release()?;
        let time = self.state.meta.current_time;
        log::info!(
            "run {} finished at {:.0} yr after {:.1} s",
            self.state.meta.run_id,
            time.to_years(),
            self.state.meta.walltime
        );
        Ok(RunOutcome::Finished { time })
    }
}

fn seed<E: SimulationEngine>(
    state: &mut RunState,
    engine: &mut E,
    initial: &InitialConditions,
) -> Result<()> {
    for body in &initial.bodies {
        let id = state.register_seed(body.record()?)?;
        engine.add_seed(id, body, body.radius())?;
    }
    let meta = &mut state.meta;
    meta.initial_n = initial.bodies.len() as u32;
    meta.initial_n_embryo = initial.num_embryos;
    meta.initial_n_planetesimal = initial.num_planetesimals;
    meta.n_active = initial.n_active();
    Ok(())
}

fn prepare_resume(
    config: &RunConfig,
    paths: &CheckpointPaths,
) -> Result<(RunState, Box<dyn RetentionEstimator>)> {
    let configured = config.validate()?;
    checkpoint::backup(paths)?;
    let state = checkpoint::load(&paths.checkpoint)?;

    if state.meta.build != BUILD_ID {
        log::warn!(
            "the checkpoint was written by version {}, this is version {}",
            state.meta.build,
            BUILD_ID
        );
    }
    if state.meta.method != configured {
        log::warn!(
            "configured estimator {} differs from the run's {}, keeping {}",
            configured,
            state.meta.method,
            state.meta.method
        );
    }
    if state.meta.no_merging != config.no_merging {
        log::warn!(
            "configured no_merging={} differs from the run's {}, keeping the run's",
            config.no_merging,
            state.meta.no_merging
        );
    }
    let estimator = build_estimator(state.meta.method, &config.estimator_sources())?;
    Ok((state, estimator))
}
