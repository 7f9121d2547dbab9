// Per-node backoff state machine

use crate::edca_backoff::BackoffSource;
use crate::edca_params::{AccessClass, ContentionParams};

/// Identifies one collision domain. Nodes in different groups never collide.
pub type GroupId = u64;

/// Distinguishes a node from the others in its group.
pub type NodeId = u64;

/// One contending station or access point.
///
/// A node cycles `READY(backoff = 0) -> ATTEMPTING -> SUCCEEDED | COLLIDED ->
/// redraw -> READY` for the life of the simulation. Both outcome recordings
/// redraw the backoff counter from the current effective window, so the
/// counter is never stale after an attempt. Consecutive failures widen the
/// window exponentially up to `cw_max`; a success resets the streak.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    params: ContentionParams,
    class: AccessClass,
    group_id: GroupId,
    node_id: NodeId,
    backoff: u32,
    fail_streak: u32,
    success_count: usize,
    failure_count: usize,
}

impl Node {
    /// Creates a node with an initial backoff drawn from `[0, cw_min]`
    /// (`fail_streak` starts at 0).
    pub fn new(
        params: ContentionParams,
        class: AccessClass,
        group_id: GroupId,
        node_id: NodeId,
        rng: &mut dyn BackoffSource,
    ) -> Self {
        let backoff = rng.draw(params.effective_cw(0));
        Self {
            params,
            class,
            group_id,
            node_id,
            backoff,
            fail_streak: 0,
            success_count: 0,
            failure_count: 0,
        }
    }

    pub fn class(&self) -> AccessClass {
        self.class
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn backoff(&self) -> u32 {
        self.backoff
    }

    pub fn fail_streak(&self) -> u32 {
        self.fail_streak
    }

    /// Cumulative (successes, failures).
    pub fn tallies(&self) -> (usize, usize) {
        (self.success_count, self.failure_count)
    }

    /// A node is ready to transmit exactly when its counter reached zero.
    pub fn is_ready(&self) -> bool {
        self.backoff == 0
    }

    /// Counts one idle slot down.
    ///
    /// Contract: `backoff > 0`. The round algorithm only decrements nodes it
    /// has just scanned as not ready, so the contract holds by construction;
    /// the assert documents it rather than guarding it.
    pub fn decrement(&mut self) -> u32 {
        debug_assert!(self.backoff > 0, "decrement on a ready node");
        self.backoff -= 1;
        self.backoff
    }

    /// Records a successful transmission, resets the failure streak and
    /// redraws the counter. Returns the new backoff.
    pub fn record_success(&mut self, rng: &mut dyn BackoffSource) -> u32 {
        self.success_count += 1;
        self.fail_streak = 0;
        self.redraw(rng)
    }

    /// Records a collided transmission, widens the window and redraws the
    /// counter. Returns the new backoff.
    pub fn record_failure(&mut self, rng: &mut dyn BackoffSource) -> u32 {
        self.failure_count += 1;
        self.fail_streak += 1;
        self.redraw(rng)
    }

    fn redraw(&mut self, rng: &mut dyn BackoffSource) -> u32 {
        self.backoff = rng.draw(self.params.effective_cw(self.fail_streak));
        debug_assert!(self.backoff <= self.params.cw_max());
        self.backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedBackoff;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sta_params(cw_min: u32, cw_max: u32) -> ContentionParams {
        ContentionParams::new(AccessClass::Sta, 2, cw_min, cw_max).unwrap()
    }

    #[test]
    fn test_initial_draw_uses_cw_min_window() {
        let mut rng = StdRng::from_seed([1u8; 32]);
        let params = sta_params(15, 1023);

        for id in 0..200 {
            let node = Node::new(params, AccessClass::Sta, 0, id, &mut rng);
            assert!(node.backoff() <= 15);
            assert_eq!(node.fail_streak(), 0);
            assert_eq!(node.tallies(), (0, 0));
        }
    }

    #[test]
    fn test_decrement_counts_down_to_ready() {
        let mut draws = ScriptedBackoff::new([3]);
        let mut node = Node::new(sta_params(3, 7), AccessClass::Sta, 0, 1, &mut draws);

        assert_eq!(node.backoff(), 3);
        assert!(!node.is_ready());
        assert_eq!(node.decrement(), 2);
        assert_eq!(node.decrement(), 1);
        assert_eq!(node.decrement(), 0);
        assert!(node.is_ready());
    }

    #[test]
    fn test_failure_widens_window_and_success_resets_it() {
        let mut draws = ScriptedBackoff::new([0, 0, 0, 0]);
        let mut node = Node::new(sta_params(15, 1023), AccessClass::Sta, 0, 1, &mut draws);

        node.record_failure(&mut draws);
        node.record_failure(&mut draws);
        assert_eq!(node.fail_streak(), 2);
        // two failures on a cw_min=15 class widen the window to 63
        assert_eq!(draws.last_window(), Some(63));

        node.record_success(&mut draws);
        assert_eq!(node.fail_streak(), 0);
        assert_eq!(draws.last_window(), Some(15));
        assert_eq!(node.tallies(), (1, 2));
    }

    #[test]
    fn test_every_outcome_redraws_the_counter() {
        let mut draws = ScriptedBackoff::new([5, 9, 4]);
        let mut node = Node::new(sta_params(15, 1023), AccessClass::Sta, 0, 1, &mut draws);

        assert_eq!(node.backoff(), 5);
        assert_eq!(node.record_failure(&mut draws), 9);
        assert_eq!(node.record_success(&mut draws), 4);
    }

    #[test]
    fn test_long_failure_streak_stays_clamped_at_cw_max() {
        let mut rng = StdRng::from_seed([9u8; 32]);
        let params = sta_params(15, 1023);
        let mut node = Node::new(params, AccessClass::Sta, 0, 1, &mut rng);

        for _ in 0..100 {
            let backoff = node.record_failure(&mut rng);
            assert!(backoff <= 1023);
        }
        assert_eq!(params.effective_cw(node.fail_streak()), 1023);
        assert_eq!(node.tallies(), (0, 100));
    }
}
