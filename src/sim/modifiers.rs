//! Power-ups and special events
//!
//! Both run on their own period, but nothing here fires on its own timer:
//! every grant, trigger, flash expiry and revert is a command in a
//! time-ordered queue that the frame loop drains at the start of each frame.

use rand::Rng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::consts::{FLASH_DURATION_MS, FRAME_MS, SPECIAL_EVENT_DURATION_MS};

/// Permanent-for-session upgrade
#[derive(Debug, Clone, Copy)]
pub struct PowerUp {
    pub name: &'static str,
    pub effect: fn(&mut GameConfig),
}

/// Timed global modifier; `revert` exactly undoes `effect`
#[derive(Debug, Clone, Copy)]
pub struct SpecialEvent {
    pub name: &'static str,
    pub effect: fn(&mut GameConfig),
    pub revert: fn(&mut GameConfig),
}

pub const POWER_UPS: [PowerUp; 5] = [
    PowerUp {
        name: "+5 base cannon power",
        effect: |c| c.min_power = (c.min_power + 5.0).min(c.max_power),
    },
    PowerUp {
        name: "Faster reload",
        effect: |c| c.reload_time = (c.reload_time - 100.0).max(0.0),
    },
    PowerUp {
        name: "Faster power build",
        effect: |c| c.power_increment += 0.1,
    },
    PowerUp {
        name: "+1 cannon ball",
        effect: |c| c.cannon_balls += 1,
    },
    PowerUp {
        name: "+1 pierce",
        effect: |c| c.pierce += 1,
    },
];

// Multipliers are powers of two so apply/revert round-trips exactly
pub const SPECIAL_EVENTS: [SpecialEvent; 5] = [
    SpecialEvent {
        name: "Reverse gravity",
        effect: |c| c.gravity = -c.gravity,
        revert: |c| c.gravity = -c.gravity,
    },
    SpecialEvent {
        name: "Heavy gravity",
        effect: |c| c.gravity *= 2.0,
        revert: |c| c.gravity *= 0.5,
    },
    SpecialEvent {
        name: "Low gravity",
        effect: |c| c.gravity *= 0.5,
        revert: |c| c.gravity *= 2.0,
    },
    SpecialEvent {
        name: "Swarm",
        effect: |c| c.spawn_interval_scale *= 0.5,
        revert: |c| c.spawn_interval_scale *= 2.0,
    },
    SpecialEvent {
        name: "Rusty barrel",
        effect: |c| c.cannon_angle_speed *= 0.5,
        revert: |c| c.cannon_angle_speed *= 2.0,
    },
];

/// Deferred modifier work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    GrantPowerUp,
    TriggerSpecialEvent,
    EndPowerUpFlash { token: u64 },
    EndEventFlash { token: u64 },
    RevertSpecialEvent { token: u64 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    at: f64,
    command: Command,
}

/// An on-screen announcement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub name: &'static str,
    /// Session time the flash started (ms)
    pub started: f64,
    /// Session time the flash ends (ms)
    pub until: f64,
    #[serde(skip)]
    token: u64,
}

impl Flash {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.until - now).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveEvent {
    index: usize,
    token: u64,
}

/// Power-up and special-event scheduler
#[derive(Debug, Clone)]
pub struct ModifierSystem {
    /// Pending commands, sorted by time (ties keep insertion order)
    queue: Vec<Scheduled>,
    /// Names of every power-up granted this session
    active_power_ups: Vec<&'static str>,
    power_up_flash: Option<Flash>,
    active_event: Option<ActiveEvent>,
    event_flash: Option<Flash>,
    next_token: u64,
}

impl ModifierSystem {
    /// Schedule the first grant and the first event one period after `now`
    pub fn new(now: f64, config: &GameConfig) -> Self {
        let mut system = Self {
            queue: Vec::new(),
            active_power_ups: Vec::new(),
            power_up_flash: None,
            active_event: None,
            event_flash: None,
            next_token: 1,
        };
        if let Some(period) = Self::period(config.power_up_period) {
            system.schedule(now + period, Command::GrantPowerUp);
        }
        if let Some(period) = Self::period(config.special_event_period) {
            system.schedule(now + period, Command::TriggerSpecialEvent);
        }
        system
    }

    /// Enabled period, never shorter than one frame
    fn period(period: f64) -> Option<f64> {
        (period.is_finite() && period > 0.0).then_some(period.max(FRAME_MS))
    }

    fn schedule(&mut self, at: f64, command: Command) {
        let index = self.queue.partition_point(|s| s.at <= at);
        self.queue.insert(index, Scheduled { at, command });
    }

    fn token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    /// Run every command due at or before `now`
    pub fn update<R: Rng>(&mut self, now: f64, config: &mut GameConfig, rng: &mut R) {
        while self.queue.first().is_some_and(|s| s.at <= now) {
            let Scheduled { at, command } = self.queue.remove(0);
            match command {
                Command::GrantPowerUp => {
                    self.grant_power_up(at, config, rng);
                    if let Some(period) = Self::period(config.power_up_period) {
                        self.schedule(at + period, Command::GrantPowerUp);
                    }
                }
                Command::TriggerSpecialEvent => {
                    self.trigger_special_event(at, config, rng);
                    if let Some(period) = Self::period(config.special_event_period) {
                        self.schedule(at + period, Command::TriggerSpecialEvent);
                    }
                }
                Command::EndPowerUpFlash { token } => {
                    if self.power_up_flash.as_ref().is_some_and(|f| f.token == token) {
                        self.power_up_flash = None;
                        log::debug!("Power-up flash ended");
                    }
                }
                Command::EndEventFlash { token } => {
                    if self.event_flash.as_ref().is_some_and(|f| f.token == token) {
                        self.event_flash = None;
                    }
                }
                Command::RevertSpecialEvent { token } => {
                    if self.active_event.is_some_and(|e| e.token == token) {
                        self.revert_special_event(config);
                    }
                }
            }
        }
    }

    /// Apply a random power-up now and announce it
    pub fn grant_power_up<R: Rng>(
        &mut self,
        now: f64,
        config: &mut GameConfig,
        rng: &mut R,
    ) -> &'static str {
        let power_up = POWER_UPS[rng.random_range(0..POWER_UPS.len())];
        (power_up.effect)(config);
        self.active_power_ups.push(power_up.name);

        let token = self.token();
        self.power_up_flash = Some(Flash {
            name: power_up.name,
            started: now,
            until: now + FLASH_DURATION_MS,
            token,
        });
        self.schedule(now + FLASH_DURATION_MS, Command::EndPowerUpFlash { token });

        log::info!("Power-up granted: {}", power_up.name);
        power_up.name
    }

    /// Replace the live special event with a random one
    pub fn trigger_special_event<R: Rng>(
        &mut self,
        now: f64,
        config: &mut GameConfig,
        rng: &mut R,
    ) -> &'static str {
        self.revert_special_event(config);

        let index = rng.random_range(0..SPECIAL_EVENTS.len());
        let event = SPECIAL_EVENTS[index];
        (event.effect)(config);

        let token = self.token();
        self.active_event = Some(ActiveEvent { index, token });
        self.event_flash = Some(Flash {
            name: event.name,
            started: now,
            until: now + FLASH_DURATION_MS,
            token,
        });
        self.schedule(now + FLASH_DURATION_MS, Command::EndEventFlash { token });
        self.schedule(
            now + SPECIAL_EVENT_DURATION_MS,
            Command::RevertSpecialEvent { token },
        );

        log::info!("Special event: {}", event.name);
        event.name
    }

    /// Undo the live special event, if any
    pub fn revert_special_event(&mut self, config: &mut GameConfig) {
        if let Some(active) = self.active_event.take() {
            let event = SPECIAL_EVENTS[active.index];
            (event.revert)(config);
            log::info!("Special event ended: {}", event.name);
        }
    }

    /// Drop every pending command (session teardown)
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn active_power_ups(&self) -> &[&'static str] {
        &self.active_power_ups
    }

    pub fn power_up_flash(&self) -> Option<&Flash> {
        self.power_up_flash.as_ref()
    }

    /// Name of the special event currently in effect
    pub fn active_event(&self) -> Option<&'static str> {
        self.active_event.map(|e| SPECIAL_EVENTS[e.index].name)
    }

    pub fn event_flash(&self) -> Option<&Flash> {
        self.event_flash.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn quiet_config() -> GameConfig {
        GameConfig {
            power_up_period: 0.0,
            special_event_period: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_every_event_reverts_exactly() {
        for event in SPECIAL_EVENTS {
            let before = GameConfig {
                gravity: 0.37,
                spawn_interval_scale: 0.9,
                cannon_angle_speed: 2.3,
                ..Default::default()
            };
            let mut config = before.clone();
            (event.effect)(&mut config);
            assert_ne!(config, before, "{} changed nothing", event.name);
            (event.revert)(&mut config);
            assert_eq!(config, before, "{} did not revert", event.name);
        }
    }

    #[test]
    fn test_power_up_grant_is_permanent() {
        let mut config = quiet_config();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut system = ModifierSystem::new(0.0, &config);

        let before = config.clone();
        let name = system.grant_power_up(0.0, &mut config, &mut rng);
        assert_ne!(config, before);
        assert_eq!(system.active_power_ups(), &[name]);
        assert_eq!(system.power_up_flash().map(|f| f.name), Some(name));

        // Flash ends after 3s, effect stays
        let granted = config.clone();
        system.update(FLASH_DURATION_MS, &mut config, &mut rng);
        assert!(system.power_up_flash().is_none());
        assert_eq!(config, granted);
        assert_eq!(system.active_power_ups().len(), 1);
    }

    #[test]
    fn test_min_power_never_exceeds_max() {
        let mut config = GameConfig::default();
        for _ in 0..20 {
            (POWER_UPS[0].effect)(&mut config);
        }
        assert_eq!(config.min_power, config.max_power);
    }

    #[test]
    fn test_reload_floors_at_zero() {
        let mut config = GameConfig::default();
        for _ in 0..20 {
            (POWER_UPS[1].effect)(&mut config);
        }
        assert_eq!(config.reload_time, 0.0);
    }

    #[test]
    fn test_special_event_auto_reverts() {
        let mut config = quiet_config();
        let original = config.clone();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut system = ModifierSystem::new(0.0, &config);

        let name = system.trigger_special_event(0.0, &mut config, &mut rng);
        assert_eq!(system.active_event(), Some(name));
        assert_ne!(config, original);

        system.update(FLASH_DURATION_MS, &mut config, &mut rng);
        assert!(system.event_flash().is_none());
        assert_eq!(system.active_event(), Some(name));

        system.update(SPECIAL_EVENT_DURATION_MS - 1.0, &mut config, &mut rng);
        assert_eq!(system.active_event(), Some(name));

        system.update(SPECIAL_EVENT_DURATION_MS, &mut config, &mut rng);
        assert_eq!(system.active_event(), None);
        assert_eq!(config, original);
    }

    #[test]
    fn test_new_event_reverts_previous() {
        let mut config = quiet_config();
        let original = config.clone();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut system = ModifierSystem::new(0.0, &config);

        system.trigger_special_event(0.0, &mut config, &mut rng);
        let second = system.trigger_special_event(1000.0, &mut config, &mut rng);

        // Only the second event's effect is live
        let mut expected = original.clone();
        let event = SPECIAL_EVENTS.iter().find(|e| e.name == second).unwrap();
        (event.effect)(&mut expected);
        assert_eq!(config, expected);

        // The first event's stale revert must not touch the second
        system.update(SPECIAL_EVENT_DURATION_MS, &mut config, &mut rng);
        assert_eq!(system.active_event(), Some(second));
        assert_eq!(config, expected);

        system.update(1000.0 + SPECIAL_EVENT_DURATION_MS, &mut config, &mut rng);
        assert_eq!(system.active_event(), None);
        assert_eq!(config, original);
    }

    #[test]
    fn test_periodic_schedule() {
        let mut config = GameConfig {
            power_up_period: 15_000.0,
            special_event_period: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut system = ModifierSystem::new(0.0, &config);

        system.update(14_999.0, &mut config, &mut rng);
        assert!(system.active_power_ups().is_empty());
        system.update(15_000.0, &mut config, &mut rng);
        assert_eq!(system.active_power_ups().len(), 1);
        system.update(45_000.0, &mut config, &mut rng);
        assert_eq!(system.active_power_ups().len(), 3);
    }

    #[test]
    fn test_cancel_all_stops_everything() {
        let mut config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut system = ModifierSystem::new(0.0, &config);
        assert_eq!(system.pending(), 2);

        system.cancel_all();
        let before = config.clone();
        system.update(1e9, &mut config, &mut rng);
        assert_eq!(config, before);
        assert!(system.active_power_ups().is_empty());
    }

    #[test]
    fn test_flash_remaining() {
        let mut config = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut system = ModifierSystem::new(0.0, &config);
        system.trigger_special_event(100.0, &mut config, &mut rng);
        let flash = system.event_flash().unwrap();
        assert_eq!(flash.remaining(1100.0), 2000.0);
        assert_eq!(flash.remaining(1e6), 0.0);
    }

    #[test]
    fn test_tiny_period_fires_at_most_once_per_frame() {
        let mut config = GameConfig {
            power_up_period: 1e-12,
            special_event_period: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        let mut system = ModifierSystem::new(0.0, &config);
        system.update(1000.0, &mut config, &mut rng);
        let grants = system.active_power_ups().len();
        assert!((59..=60).contains(&grants), "{grants} grants");
    }
}
