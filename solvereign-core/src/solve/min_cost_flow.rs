//! A small min-cost max-flow solver (successive shortest augmenting paths
//! via SPFA/Bellman-Ford) backing the block-heuristic assignment (C4).
//!
//! Spec §4.4 only requires "any standard successive-shortest-paths or
//! cost-scaling implementation"; no specific back-end identity is
//! load-bearing, so this stays intentionally small and self-contained
//! rather than pulling in an external graph-optimization crate.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
struct FlowEdge {
    to: usize,
    cap: i64,
    original_cap: i64,
    cost: i64,
}

/// A directed flow network over integer node indices, built from paired
/// forward/residual arcs (arc `id` and its residual always sit at `id`/`id^1`).
#[derive(Debug)]
pub struct MinCostFlow {
    edges: Vec<FlowEdge>,
    adj: Vec<Vec<usize>>,
}

impl MinCostFlow {
    /// Builds an empty network over `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self { edges: Vec::new(), adj: vec![Vec::new(); node_count] }
    }

    /// Adds a directed arc `from -> to` with the given capacity and cost,
    /// plus its zero-capacity residual reverse arc. Returns the forward
    /// arc's id, for reading back its carried flow after [`solve`].
    pub fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: i64) -> usize {
        let id = self.edges.len();
        self.edges.push(FlowEdge { to, cap, original_cap: cap, cost });
        self.adj[from].push(id);
        self.edges.push(FlowEdge { to: from, cap: 0, original_cap: 0, cost: -cost });
        self.adj[to].push(id + 1);
        id
    }

    /// Flow currently carried on the forward arc `id` (as returned by [`add_edge`]).
    pub fn flow_on(&self, id: usize) -> i64 {
        self.edges[id].original_cap - self.edges[id].cap
    }

    /// Runs successive shortest augmenting paths from `source` to `sink`
    /// until no augmenting path remains. Returns `(total_flow, total_cost)`.
    pub fn solve(&mut self, source: usize, sink: usize) -> (i64, i64) {
        let n = self.adj.len();
        let mut total_flow = 0i64;
        let mut total_cost = 0i64;

        loop {
            let mut dist = vec![i64::MAX; n];
            let mut in_queue = vec![false; n];
            let mut prev_edge: Vec<Option<usize>> = vec![None; n];
            dist[source] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(source);
            in_queue[source] = true;

            while let Some(u) = queue.pop_front() {
                in_queue[u] = false;
                if dist[u] == i64::MAX {
                    continue;
                }
                for &edge_id in &self.adj[u] {
                    let edge = self.edges[edge_id];
                    if edge.cap > 0 && dist[u] + edge.cost < dist[edge.to] {
                        dist[edge.to] = dist[u] + edge.cost;
                        prev_edge[edge.to] = Some(edge_id);
                        if !in_queue[edge.to] {
                            in_queue[edge.to] = true;
                            queue.push_back(edge.to);
                        }
                    }
                }
            }

            if dist[sink] == i64::MAX {
                break;
            }

            let mut augment = i64::MAX;
            let mut v = sink;
            while v != source {
                let edge_id = prev_edge[v].expect("BFS-reachable node has a predecessor edge");
                augment = augment.min(self.edges[edge_id].cap);
                v = self.edges[edge_id ^ 1].to;
            }

            let mut v = sink;
            while v != source {
                let edge_id = prev_edge[v].expect("BFS-reachable node has a predecessor edge");
                self.edges[edge_id].cap -= augment;
                self.edges[edge_id ^ 1].cap += augment;
                v = self.edges[edge_id ^ 1].to;
            }

            total_flow += augment;
            total_cost += augment * dist[sink];
        }

        (total_flow, total_cost)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/solve/min_cost_flow_test.rs"]
mod min_cost_flow_test;
