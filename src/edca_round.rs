// One contention round: class-differentiated countdown plus per-group
// collision resolution

use indexmap::IndexMap;

use crate::edca_backoff::BackoffSource;
use crate::edca_node::{GroupId, Node};

/// Position of a queued attempt in the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeRef {
    Ap(usize),
    Sta(usize),
}

/// What one round produced, for logging and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Nodes that reached zero backoff and attempted this round
    pub attempts: usize,

    /// Attempts that were alone in their group
    pub successes: usize,

    /// Attempts that shared their group with a competitor
    pub collisions: usize,

    /// Simulated idle slots spent before the attempt
    pub slots: u32,
}

/// Resolves one full contention round over the node population.
///
/// Phase A gives stations the head start their shorter AIFS earns them: for
/// up to `daifs` slots only stations are scanned. Phase B opens the window
/// to APs and stations alike. Phase C partitions the attempt queue by group
/// and records exactly one outcome per queued node: success iff its group
/// contributed a single attempt.
///
/// Slot semantics, applied uniformly in both phases: scan first, then count
/// one idle slot down on every scanned node that is *not* in the queue.
/// Queued nodes keep their zero counter until the outcome redraws it, so
/// `decrement` is never called on a ready node. Because an empty scan still
/// counts the slot down, the node with the smallest counter is ready after
/// at most that many slots, which bounds Phase B by the largest counter in
/// the population instead of trusting an unbounded loop.
///
/// Backoff and streak state carries over between rounds; nothing here
/// resets it.
pub fn contend(
    aps: &mut [Node],
    stas: &mut [Node],
    daifs: u32,
    rng: &mut dyn BackoffSource,
) -> RoundOutcome {
    debug_assert!(
        !aps.is_empty() || !stas.is_empty(),
        "contention round over an empty population"
    );

    let mut queue: Vec<NodeRef> = Vec::new();
    let mut slots = 0;

    // Phase A: stations contend alone while the AP class is still waiting
    // out its longer AIFS
    for _ in 0..daifs {
        slots += 1;
        scan(&mut queue, stas, NodeRef::Sta);
        countdown(stas);
        if !queue.is_empty() {
            break;
        }
    }

    // Phase B: joint window, bounded by the largest live counter
    if queue.is_empty() {
        let horizon = aps
            .iter()
            .chain(stas.iter())
            .map(Node::backoff)
            .max()
            .unwrap_or(0);
        for _ in 0..=horizon {
            slots += 1;
            scan(&mut queue, aps, NodeRef::Ap);
            scan(&mut queue, stas, NodeRef::Sta);
            countdown(aps);
            countdown(stas);
            if !queue.is_empty() {
                break;
            }
        }
    }
    debug_assert!(!queue.is_empty(), "no node became ready within the horizon");

    // Phase C: an attempt succeeds iff no other queued node shares its
    // group. Identity never repeats in the queue (one entry per node), so
    // the pairwise different-id/same-group rule reduces to a group count.
    let mut group_attempts: IndexMap<GroupId, usize> = IndexMap::new();
    for node_ref in &queue {
        let group = node(aps, stas, *node_ref).group_id();
        *group_attempts.entry(group).or_insert(0) += 1;
    }

    let mut successes = 0;
    let mut collisions = 0;
    for node_ref in &queue {
        let node = node_mut(aps, stas, *node_ref);
        if group_attempts[&node.group_id()] == 1 {
            node.record_success(rng);
            successes += 1;
        } else {
            node.record_failure(rng);
            collisions += 1;
        }
    }

    RoundOutcome {
        attempts: queue.len(),
        successes,
        collisions,
        slots,
    }
}

/// Appends every ready node, in scan order, to the attempt queue.
fn scan(queue: &mut Vec<NodeRef>, nodes: &[Node], make_ref: fn(usize) -> NodeRef) {
    queue.extend(
        nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_ready())
            .map(|(i, _)| make_ref(i)),
    );
}

/// Counts one idle slot down on every node still above zero.
fn countdown(nodes: &mut [Node]) {
    for node in nodes.iter_mut().filter(|n| !n.is_ready()) {
        node.decrement();
    }
}

fn node<'a>(aps: &'a [Node], stas: &'a [Node], node_ref: NodeRef) -> &'a Node {
    match node_ref {
        NodeRef::Ap(i) => &aps[i],
        NodeRef::Sta(i) => &stas[i],
    }
}

fn node_mut<'a>(aps: &'a mut [Node], stas: &'a mut [Node], node_ref: NodeRef) -> &'a mut Node {
    match node_ref {
        NodeRef::Ap(i) => &mut aps[i],
        NodeRef::Sta(i) => &mut stas[i],
    }
}
