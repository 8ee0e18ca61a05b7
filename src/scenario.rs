//! Scripted lock-on session for the headless sandbox

use glam::Vec3;
use lotus_core::GameTime;
use lotus_ecs::Entity;
use lotus_game::TrainingGround;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::settings::{SandboxSettings, ScenarioSettings};

/// What happened during a session
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionReport {
    /// Lock attempts made by the script
    pub toggles: u32,
    /// Attempts that ended with a lock
    pub acquisitions: u32,
    /// Locks that ended without the script asking
    pub automatic_releases: u32,
    /// Fixed steps simulated
    pub steps: u64,
}

/// Scatter dummies and practice targets in an arc in front of the origin
pub fn populate(ground: &mut TrainingGround, scenario: &ScenarioSettings) -> Vec<Entity> {
    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let mut spawned = Vec::new();

    let min = scenario.min_spawn_distance.max(0.0);
    let max = scenario.max_spawn_distance.max(min + 1.0);
    let arc = scenario.spawn_arc_degrees.abs().to_radians();

    let place = |rng: &mut StdRng| {
        let yaw = if arc > 0.0 { rng.gen_range(-arc..=arc) } else { 0.0 };
        let distance = rng.gen_range(min..=max);
        Vec3::new(yaw.sin(), 0.0, -yaw.cos()) * distance
    };

    for _ in 0..scenario.dummy_count {
        let position = place(&mut rng);
        spawned.push(ground.spawn_dummy(position));
    }
    for _ in 0..scenario.practice_target_count {
        let position = place(&mut rng) + Vec3::Y * rng.gen_range(50.0..=250.0);
        spawned.push(ground.spawn_practice_target(position));
    }

    info!(
        dummies = scenario.dummy_count,
        practice_targets = scenario.practice_target_count,
        seed = scenario.seed,
        "training ground populated"
    );
    spawned
}

/// Run the scripted session on a fixed timestep.
///
/// The script locks on, knocks the target down, re-acquires, and finally
/// clears the lock.
pub fn run_session(ground: &mut TrainingGround, settings: &SandboxSettings) -> SessionReport {
    let mut time = GameTime::new(settings.time.clone());
    let dt = settings.time.fixed_timestep;
    let mut report = SessionReport::default();
    let mut was_locked = false;
    let mut script = Script::default();

    while time.total_time < f64::from(settings.scenario.duration) {
        time.update(dt);
        for _ in 0..time.fixed_steps() {
            let now = report.steps as f32 * dt;
            script.run(now, ground, &mut report);
            ground.tick(dt);

            let locked = ground.is_locked_on();
            if was_locked && !locked && !script.released_manually {
                report.automatic_releases += 1;
            }
            script.released_manually = false;
            was_locked = locked;
            report.steps += 1;
        }
    }

    info!(
        toggles = report.toggles,
        acquisitions = report.acquisitions,
        automatic_releases = report.automatic_releases,
        steps = report.steps,
        "session finished"
    );
    report
}

/// Timed actions of the session
#[derive(Default)]
struct Script {
    next: usize,
    released_manually: bool,
}

impl Script {
    const CUES: [f32; 4] = [0.5, 2.0, 2.5, 4.5];

    fn run(&mut self, now: f32, ground: &mut TrainingGround, report: &mut SessionReport) {
        let Some(&cue) = Self::CUES.get(self.next) else {
            return;
        };
        if now < cue {
            return;
        }

        match self.next {
            0 | 2 => {
                report.toggles += 1;
                if ground.toggle_lock_on() {
                    report.acquisitions += 1;
                    info!(
                        entity = ?ground.current_target(),
                        at = ?ground.current_target_location(),
                        "script locked on"
                    );
                }
            }
            1 => {
                if let Some(target) = ground.current_target() {
                    ground.kill(target);
                }
            }
            _ => {
                if ground.is_locked_on() {
                    self.released_manually = true;
                }
                ground.clear_lock_on();
            }
        }
        self.next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotus_game::LockOnConfig;

    fn ground_with_player() -> TrainingGround {
        let mut ground = TrainingGround::new(LockOnConfig::default());
        ground.spawn_player(Vec3::ZERO);
        ground
    }

    #[test]
    fn test_populate_is_deterministic() {
        let scenario = ScenarioSettings::default();
        let mut a = ground_with_player();
        let mut b = ground_with_player();
        populate(&mut a, &scenario);
        populate(&mut b, &scenario);

        let locations = |ground: &TrainingGround| {
            ground
                .world()
                .iter::<lotus_game::DummyEnemy>()
                .map(|(_, dummy)| dummy.transform.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(locations(&a), locations(&b));
        assert_eq!(locations(&a).len(), scenario.dummy_count as usize);
    }

    #[test]
    fn test_session_locks_and_reacquires() {
        let mut settings = SandboxSettings::default();
        settings.scenario.dummy_count = 0;
        settings.scenario.practice_target_count = 0;

        let mut ground = ground_with_player();
        let first = ground.spawn_dummy(Vec3::new(0.0, 0.0, -500.0));
        let second = ground.spawn_dummy(Vec3::new(100.0, 0.0, -1100.0));

        let report = run_session(&mut ground, &settings);

        assert_eq!(report.toggles, 2);
        assert_eq!(report.acquisitions, 2);
        // The knocked-down dummy releases the first lock on its own
        assert_eq!(report.automatic_releases, 1);
        assert!(!ground.is_locked_on());
        assert!(!ground.world().get::<lotus_game::DummyEnemy>(first).unwrap().alive);
        assert!(ground.world().get::<lotus_game::DummyEnemy>(second).unwrap().alive);
    }
}
