//! Graph searches that know nothing about grids. Nodes only need to be hashable and clonable;
//! the caller supplies successors and a goal test as closures. The A* routine follows the
//! structure of [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! but keeps an explicit closed flag per node.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::Hash;

/// What a search produced: the node sequence from start to goal with its total cost (if any),
/// and how many nodes were expanded on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome<N, C> {
    pub path: Option<(Vec<N>, C)>,
    pub expanded: usize,
}

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then prefers the node furthest from the start
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

struct NodeState<C> {
    parent: usize,
    cost: C,
    closed: bool,
}

/// Follows parent indices from `last` back to the root (whose parent is [usize::MAX]) and
/// returns the nodes in root-to-`last` order.
fn reverse_path<N, F>(mut node_at: F, last: usize) -> Vec<N>
where
    F: FnMut(usize) -> Option<(N, usize)>,
{
    let mut path = Vec::new();
    let mut index = last;
    while let Some((node, parent)) = node_at(index) {
        path.push(node);
        index = parent;
    }
    path.reverse();
    path
}

/// A* search. `heuristic` should not overestimate for the result to be optimal. Nodes are
/// closed once expanded and never reopened; heap entries made stale by a later improvement are
/// skipped when popped.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> SearchOutcome<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, NodeState<C>> = FxIndexMap::default();
    parents.insert(
        start.clone(),
        NodeState {
            parent: usize::MAX,
            cost: Zero::zero(),
            closed: false,
        },
    );
    let mut expanded = 0;
    while let Some(SmallestCostHolder { index, .. }) = to_see.pop() {
        let (successors, cost) = {
            let Some((node, state)) = parents.get_index_mut(index) else {
                continue;
            };
            if state.closed {
                continue;
            }
            if success(node) {
                let cost = state.cost;
                let path = reverse_path(
                    |i| parents.get_index(i).map(|(n, s)| (n.clone(), s.parent)),
                    index,
                );
                return SearchOutcome {
                    path: Some((path, cost)),
                    expanded,
                };
            }
            state.closed = true;
            expanded += 1;
            (successors(node), state.cost)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(NodeState {
                        parent: index,
                        cost: new_cost,
                        closed: false,
                    });
                }
                Occupied(mut e) => {
                    if !e.get().closed && e.get().cost > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert(NodeState {
                            parent: index,
                            cost: new_cost,
                            closed: false,
                        });
                    } else {
                        continue;
                    }
                }
            }

            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    SearchOutcome {
        path: None,
        expanded,
    }
}

/// Breadth-first search with unit step cost. Nodes are marked visited when popped, not when
/// queued, so a node may sit in the frontier more than once; later copies are skipped. Every
/// frontier entry points into a trail of `(node, parent)` records from which the path to the
/// goal is read back.
pub fn bfs<N, FN, IN, FS>(start: &N, mut successors: FN, mut success: FS) -> SearchOutcome<N, usize>
where
    N: Eq + Hash + Clone,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = N>,
    FS: FnMut(&N) -> bool,
{
    let mut trail: Vec<(N, usize)> = vec![(start.clone(), usize::MAX)];
    let mut frontier: VecDeque<usize> = VecDeque::from([0]);
    let mut visited: FxHashSet<N> = FxHashSet::default();
    let mut expanded = 0;
    while let Some(index) = frontier.pop_front() {
        let node = trail[index].0.clone();
        if success(&node) {
            let path = reverse_path(|i| trail.get(i).cloned(), index);
            let steps = path.len() - 1;
            return SearchOutcome {
                path: Some((path, steps)),
                expanded,
            };
        }
        if !visited.insert(node.clone()) {
            continue;
        }
        expanded += 1;
        for successor in successors(&node) {
            if !visited.contains(&successor) {
                trail.push((successor, index));
                frontier.push_back(trail.len() - 1);
            }
        }
    }
    SearchOutcome {
        path: None,
        expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Line graph 0 - 1 - 2 - 3 with a shortcut 0 - 3 of cost 5.
    fn line_successors(n: &u32) -> Vec<(u32, u32)> {
        let mut succ = Vec::new();
        if *n > 0 {
            succ.push((n - 1, 1));
        }
        if *n < 3 {
            succ.push((n + 1, 1));
        }
        if *n == 0 {
            succ.push((3, 5));
        }
        succ
    }

    #[test]
    fn astar_prefers_cheaper_longer_route() {
        let outcome = astar(&0u32, line_successors, |_| 0, |n| *n == 3);
        assert_eq!(outcome.path, Some((vec![0, 1, 2, 3], 3)));
    }

    #[test]
    fn astar_start_is_goal() {
        let outcome = astar(&2u32, line_successors, |_| 0, |n| *n == 2);
        assert_eq!(outcome.path, Some((vec![2], 0)));
        assert_eq!(outcome.expanded, 0);
    }

    #[test]
    fn astar_exhausts_without_goal() {
        let outcome = astar(&0u32, line_successors, |_| 0, |n| *n == 7);
        assert!(outcome.path.is_none());
        assert_eq!(outcome.expanded, 4);
    }

    #[test]
    fn bfs_counts_edges_not_costs() {
        let outcome = bfs(
            &0u32,
            |n| line_successors(n).into_iter().map(|(m, _)| m),
            |n| *n == 3,
        );
        assert_eq!(outcome.path, Some((vec![0, 3], 1)));
    }

    #[test]
    fn bfs_skips_duplicate_frontier_entries() {
        // Diamond 0 -> {1, 2} -> 3 -> 4; node 3 is queued twice.
        let succ = |n: &u32| -> Vec<u32> {
            match n {
                0 => vec![1, 2],
                1 | 2 => vec![3],
                3 => vec![4],
                _ => vec![],
            }
        };
        let outcome = bfs(&0u32, succ, |n| *n == 4);
        assert_eq!(outcome.path, Some((vec![0, 1, 3, 4], 3)));
        assert_eq!(outcome.expanded, 4);
        let outcome = bfs(&0u32, succ, |n| *n == 9);
        assert!(outcome.path.is_none());
        assert_eq!(outcome.expanded, 5);
    }
}
