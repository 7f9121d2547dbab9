// Result reporting for a finished simulation

use indexmap::IndexMap;

use crate::edca_node::{GroupId, Node, NodeId};
use crate::edca_params::AccessClass;

/// Final cumulative tallies of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeReport {
    pub class: AccessClass,
    pub group_id: GroupId,
    pub node_id: NodeId,
    pub successes: usize,
    pub failures: usize,
}

impl NodeReport {
    pub fn from_node(node: &Node) -> Self {
        let (successes, failures) = node.tallies();
        Self {
            class: node.class(),
            group_id: node.group_id(),
            node_id: node.node_id(),
            successes,
            failures,
        }
    }

    pub fn attempts(&self) -> usize {
        self.successes + self.failures
    }

    /// Fraction of this node's attempts that went through uncollided.
    pub fn success_rate(&self) -> f64 {
        if self.attempts() == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts() as f64
        }
    }
}

/// Simulation result: per-node tallies plus run-wide aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct SimResult {
    /// Seed used for the run, for reproduction
    pub seed_used: [u8; 32],

    /// Number of rounds completed
    pub rounds_completed: usize,

    /// Attempts across all rounds (every attempt records exactly one outcome)
    pub total_attempts: usize,

    /// Attempts that succeeded
    pub total_successes: usize,

    /// Attempts that collided
    pub total_collisions: usize,

    /// Simulated idle slots spent across all rounds
    pub total_slots: u64,

    /// One report per node, APs first, in creation order
    pub nodes: Vec<NodeReport>,
}

impl SimResult {
    /// (successes, failures) aggregated per collision domain, in creation
    /// order of the groups.
    pub fn group_totals(&self) -> IndexMap<GroupId, (usize, usize)> {
        let mut totals: IndexMap<GroupId, (usize, usize)> = IndexMap::new();
        for report in &self.nodes {
            let entry = totals.entry(report.group_id).or_insert((0, 0));
            entry.0 += report.successes;
            entry.1 += report.failures;
        }
        totals
    }

    /// Print a summary of the simulation results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        EDCA Contention Simulation Results              ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        println!("  Seed: {:?}", self.seed_used);
        println!("  Rounds: {}\n", self.rounds_completed);

        println!("Channel Statistics:");
        println!("  Total attempts: {}", self.total_attempts);
        println!("  Successes: {}", self.total_successes);
        println!("  Collisions: {}", self.total_collisions);
        if self.rounds_completed > 0 {
            println!(
                "  Avg slots/round: {:.2}",
                self.total_slots as f64 / self.rounds_completed as f64
            );
        }
        println!();

        println!("Per-Group Statistics:");
        for (group, (successes, failures)) in self.group_totals() {
            let attempts = successes + failures;
            let rate = if attempts > 0 {
                successes as f64 / attempts as f64
            } else {
                0.0
            };
            println!(
                "  group {}: attempts={}, successes={}, prob success={:.4}",
                group, attempts, successes, rate
            );
        }
        println!();

        println!("Per-Node Statistics:");
        for report in &self.nodes {
            println!(
                "  {} {} (group {}): attempts={}, prob success={:.4}",
                report.class,
                report.node_id,
                report.group_id,
                report.attempts(),
                report.success_rate()
            );
        }
        println!();
    }
}
