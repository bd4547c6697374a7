//! Cannonball vs attacker collision resolution
//!
//! Both lists are scanned newest first: the most recently fired ball is
//! tested first, and a ball is consumed by the most recently spawned
//! attacker it overlaps. Pierce duplicates are separate balls, so several of
//! them can land on the same attacker in one pass.

use glam::Vec2;

use super::state::{Attacker, CannonBall, Explosion};
use crate::consts::ATTACKER_SCORE;

/// What one resolution pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub score_delta: u64,
    pub explosions: Vec<Explosion>,
    pub removed_balls: Vec<u32>,
    pub removed_attackers: Vec<u32>,
}

/// Ball bounding square overlaps the attacker rectangle on both axes
#[inline]
pub fn ball_overlaps_attacker(pos: Vec2, radius: f32, attacker: &Attacker) -> bool {
    pos.x + radius > attacker.pos.x
        && pos.x - radius < attacker.pos.x + attacker.width
        && pos.y + radius > attacker.pos.y
        && pos.y - radius < attacker.pos.y + attacker.height
}

/// Resolve every ball against the live attackers.
///
/// Consumed balls and destroyed attackers are removed from the collections;
/// the outcome lists their ids (in resolution order) along with score and
/// explosions.
pub fn resolve(
    cannonballs: &mut Vec<CannonBall>,
    attackers: &mut Vec<Attacker>,
    arena_height: f32,
    wall_height: f32,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    // Removing index i leaves the unvisited lower indices in place
    for i in (0..cannonballs.len()).rev() {
        let ball = &cannonballs[i];
        let Some(index) = attackers
            .iter()
            .rposition(|a| ball_overlaps_attacker(ball.pos, ball.radius, a))
        else {
            continue;
        };

        outcome.explosions.push(Explosion::new(ball.pos));
        outcome.removed_balls.push(ball.id);

        let attacker = &mut attackers[index];
        if attacker.take_hit(arena_height) && attacker.is_destroyed(wall_height) {
            outcome.removed_attackers.push(attacker.id);
            outcome.score_delta += ATTACKER_SCORE;
            attackers.remove(index);
        }
        cannonballs.remove(i);
    }

    outcome
}
