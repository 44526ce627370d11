// Route networks: per-group pair searches and the cache that holds them.
//
// A `NetworkRequest` names a group, its hub, its member locations, a caller
// seed, and a logical tick. Endpoints are indexed hub = 0, members = 1..=n.
// The pairing policy turns endpoints into an ordered pair list; each pair
// gets one `PathPlanner` search with a tie-break seed derived from
// (caller seed, group, endpoint indices, endpoint coordinates). Failed and
// skipped pairs are reported in the build's `PairOutcome` list and left out
// of the network. A build never fails as a whole.
//
// `NetworkBuild` runs one pair per `step()` so a host that must yield can do
// so between searches, never inside one. `finish()` runs whatever is left
// and assembles a `NetworkReport`.
//
// `PathNetworkCache` maps `GroupId` to `Arc<PathNetwork>` under an `RwLock`.
// A rebuild constructs the new network completely, then swaps the pointer
// in one write, so readers see either the old network or the new one. All
// builds run on the cache's rayon pool, whose thread count is the planner
// concurrency cap; requests past the cap queue in the pool.
//
// See also: `planner.rs` for the search, `obstacle.rs` for the snapshot
// every search in a build shares, `digest.rs` for route digests.
//
// **Critical constraint: determinism.** Pair order, pair seeds, and the
// network contents depend only on the request, the config, the terrain,
// and the obstacle snapshot. `build_many` publishes results in request
// order regardless of which worker finished first.

use crate::config::{PairingPolicy, PlannerConfig, SearchBudget};
use crate::cost::CategoryCounts;
use crate::digest::RouteDigest;
use crate::error::Result;
use crate::obstacle::ObstacleField;
use crate::planner::{PathPlanner, PathRoute, SearchFailure};
use crate::terrain::TerrainOracle;
use crate::types::{GridPos, GroupId};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};
use trailwright_prng::derive_seed;

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// Everything needed to build one group's network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub group: GroupId,
    pub hub: GridPos,
    pub members: Vec<GridPos>,
    pub seed: u64,
    /// Logical tick stamped on the resulting network.
    pub built_at: u64,
    /// Replaces the configured search budget for this group when set.
    pub budget: Option<SearchBudget>,
    /// Replaces the configured pairing policy for this group when set.
    pub pairing: Option<PairingPolicy>,
}

impl NetworkRequest {
    pub fn new(group: GroupId, hub: GridPos, members: Vec<GridPos>, seed: u64) -> Self {
        Self {
            group,
            hub,
            members,
            seed,
            built_at: 0,
            budget: None,
            pairing: None,
        }
    }

    pub fn at_tick(mut self, tick: u64) -> Self {
        self.built_at = tick;
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_pairing(mut self, pairing: PairingPolicy) -> Self {
        self.pairing = Some(pairing);
        self
    }

    /// Hub followed by members.
    pub fn endpoints(&self) -> Vec<GridPos> {
        std::iter::once(self.hub)
            .chain(self.members.iter().copied())
            .collect()
    }
}

/// Endpoint index pairs for `endpoint_count` endpoints (hub first).
pub fn pair_indices(policy: PairingPolicy, endpoint_count: usize) -> Vec<(usize, usize)> {
    match policy {
        PairingPolicy::HubAndSpoke => (1..endpoint_count).map(|m| (0, m)).collect(),
        PairingPolicy::Chain => (1..endpoint_count).map(|m| (m - 1, m)).collect(),
        PairingPolicy::Complete => (0..endpoint_count)
            .flat_map(|a| (a + 1..endpoint_count).map(move |b| (a, b)))
            .collect(),
    }
}

/// Diagnostic record for one attempted pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairOutcome {
    /// Position in the build's pair list.
    pub pair: usize,
    /// Endpoint indices (hub = 0).
    pub from: usize,
    pub to: usize,
    pub start: GridPos,
    pub goal: GridPos,
    /// Tie-break seed the search ran with.
    pub seed: u64,
    pub result: std::result::Result<PathRoute, SearchFailure>,
}

impl PairOutcome {
    pub fn route(&self) -> Option<&PathRoute> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<SearchFailure> {
        self.result.as_ref().err().copied()
    }

    /// Nodes dequeued by the search, successful or not.
    pub fn explored(&self) -> u32 {
        match &self.result {
            Ok(route) => route.explored_nodes,
            Err(failure) => failure.explored(),
        }
    }
}

// ---------------------------------------------------------------------------
// PathNetwork
// ---------------------------------------------------------------------------

/// An accepted route and the endpoints it joins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkRoute {
    pub from: usize,
    pub to: usize,
    pub route: PathRoute,
}

/// Aggregates over a network's accepted routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub attempted: u32,
    pub accepted: u32,
    /// Distinct cells covered by accepted routes. Shared cells count once.
    pub total_cells: u32,
    pub total_cost: f64,
    pub counts: CategoryCounts,
}

/// One group's accepted routes. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathNetwork {
    pub group: GroupId,
    pub hub: GridPos,
    pub members: Vec<GridPos>,
    pub built_at: u64,
    pub routes: Vec<NetworkRoute>,
    pub stats: NetworkStats,
}

impl PathNetwork {
    fn assemble(request: &NetworkRequest, outcomes: &[PairOutcome]) -> Self {
        let routes: Vec<NetworkRoute> = outcomes
            .iter()
            .filter_map(|o| {
                o.route().map(|route| NetworkRoute {
                    from: o.from,
                    to: o.to,
                    route: route.clone(),
                })
            })
            .collect();

        let mut cells = BTreeSet::new();
        let mut stats = NetworkStats {
            attempted: outcomes.len() as u32,
            accepted: routes.len() as u32,
            ..NetworkStats::default()
        };
        for r in &routes {
            cells.extend(r.route.points.iter().copied());
            stats.total_cost += f64::from(r.route.total_cost);
            stats.counts.add(&r.route.counts);
        }
        stats.total_cells = cells.len() as u32;

        Self {
            group: request.group,
            hub: request.hub,
            members: request.members.clone(),
            built_at: request.built_at,
            routes,
            stats,
        }
    }

    pub fn total_cells(&self) -> u32 {
        self.stats.total_cells
    }

    /// Route digests in pair order.
    pub fn digests(&self) -> Vec<RouteDigest> {
        self.routes.iter().map(|r| r.route.digest).collect()
    }

    /// Fraction of members reachable from the hub, directly or through
    /// other routes. Routes that share a cell are joined at that cell. A
    /// network with no members is fully connected.
    pub fn connectivity_ratio(&self) -> f64 {
        if self.members.is_empty() {
            return 1.0;
        }
        let mut sets = DisjointSets::new(self.members.len() + 1);
        let mut first_owner: BTreeMap<GridPos, usize> = BTreeMap::new();
        for r in &self.routes {
            sets.union(r.from, r.to);
            for &cell in &r.route.points {
                match first_owner.get(&cell) {
                    Some(&owner) => sets.union(owner, r.from),
                    None => {
                        first_owner.insert(cell, r.from);
                    }
                }
            }
        }
        let hub = sets.find(0);
        let reached = (1..=self.members.len())
            .filter(|&m| sets.find(m) == hub)
            .count();
        reached as f64 / self.members.len() as f64
    }
}

/// Union-find over endpoint indices.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Lower index becomes the root so results do not depend on
            // union order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkBuild
// ---------------------------------------------------------------------------

/// Result of a finished build: the network plus one record per pair.
#[derive(Clone, Debug)]
pub struct NetworkReport {
    pub network: Arc<PathNetwork>,
    pub outcomes: Vec<PairOutcome>,
}

/// An in-progress build that runs one pair search per `step()`.
pub struct NetworkBuild<'a, T: TerrainOracle + ?Sized> {
    terrain: &'a T,
    obstacles: Arc<ObstacleField>,
    planner: PathPlanner,
    request: NetworkRequest,
    endpoints: Vec<GridPos>,
    pairs: Vec<(usize, usize)>,
    outcomes: Vec<PairOutcome>,
}

impl<'a, T: TerrainOracle + ?Sized> NetworkBuild<'a, T> {
    /// Prepare a build. `obstacles` is the snapshot every pair will see.
    pub fn new(
        terrain: &'a T,
        obstacles: Arc<ObstacleField>,
        config: &PlannerConfig,
        request: NetworkRequest,
    ) -> Self {
        let mut planner = PathPlanner::from_config(config);
        if let Some(budget) = request.budget {
            match budget.validate() {
                Ok(()) => planner = planner.with_budget(budget),
                Err(e) => log::warn!(
                    "{} budget override ignored, using configured budget: {e}",
                    request.group
                ),
            }
        }
        let endpoints = request.endpoints();
        let pairs = pair_indices(request.pairing.unwrap_or(config.pairing), endpoints.len());
        Self {
            terrain,
            obstacles,
            planner,
            request,
            endpoints,
            pairs,
            outcomes: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcomes.len() == self.pairs.len()
    }

    /// Pairs not yet searched.
    pub fn remaining(&self) -> usize {
        self.pairs.len() - self.outcomes.len()
    }

    /// Outcomes recorded so far, in pair order.
    pub fn outcomes(&self) -> &[PairOutcome] {
        &self.outcomes
    }

    /// Search the next pair. Returns `None` once every pair is done.
    pub fn step(&mut self) -> Option<&PairOutcome> {
        let pair = self.outcomes.len();
        let &(from, to) = self.pairs.get(pair)?;
        let start = self.endpoints[from];
        let goal = self.endpoints[to];
        let seed = pair_seed(&self.request, from, to, start, goal);

        let result = self.planner.plan(
            self.terrain,
            &self.obstacles,
            start,
            goal.column(),
            seed,
        );
        match &result {
            Ok(route) => log::debug!(
                "{} pair {pair} ({from}->{to}): {} cells, cost {}, explored {}, digest {}",
                self.request.group,
                route.points.len(),
                route.total_cost,
                route.explored_nodes,
                route.digest
            ),
            Err(failure @ SearchFailure::BudgetExceeded { .. }) => log::warn!(
                "{} pair {pair} ({from}->{to}): {failure}",
                self.request.group
            ),
            Err(failure) => log::debug!(
                "{} pair {pair} ({from}->{to}): {failure}",
                self.request.group
            ),
        }

        self.outcomes.push(PairOutcome {
            pair,
            from,
            to,
            start,
            goal,
            seed,
            result,
        });
        self.outcomes.last()
    }

    /// Run the remaining pairs and assemble the network.
    pub fn finish(mut self) -> NetworkReport {
        while self.step().is_some() {}
        let network = PathNetwork::assemble(&self.request, &self.outcomes);
        log::info!(
            "{} network built at tick {}: {}/{} routes, {} cells",
            network.group,
            network.built_at,
            network.stats.accepted,
            network.stats.attempted,
            network.stats.total_cells
        );
        NetworkReport {
            network: Arc::new(network),
            outcomes: self.outcomes,
        }
    }
}

/// Tie-break seed for one pair: caller seed folded with the group and the
/// pair's identity.
fn pair_seed(request: &NetworkRequest, from: usize, to: usize, start: GridPos, goal: GridPos) -> u64 {
    let coord = |v: i32| v as u32 as u64;
    derive_seed(
        request.seed,
        &[
            request.group.0,
            from as u64,
            to as u64,
            coord(start.x),
            coord(start.y),
            coord(start.z),
            coord(goal.x),
            coord(goal.y),
            coord(goal.z),
        ],
    )
}

// ---------------------------------------------------------------------------
// PathNetworkCache
// ---------------------------------------------------------------------------

/// Current network per group, plus the pool every build runs on.
pub struct PathNetworkCache {
    config: PlannerConfig,
    entries: RwLock<BTreeMap<GroupId, Arc<PathNetwork>>>,
    pool: ThreadPool,
}

impl PathNetworkCache {
    /// Validate `config` and start a pool of `max_concurrent_searches`
    /// workers.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_searches)
            .thread_name(|i| format!("trailwright-search-{i}"))
            .build()?;
        Ok(Self {
            config,
            entries: RwLock::new(BTreeMap::new()),
            pool,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Number of workers, i.e. the most searches that can run at once.
    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Build `request`'s network against `obstacles` and publish it,
    /// replacing any previous network for the group.
    pub fn build<T: TerrainOracle + Sync + ?Sized>(
        &self,
        terrain: &T,
        obstacles: &Arc<ObstacleField>,
        request: NetworkRequest,
    ) -> NetworkReport {
        let report = self.pool.install(|| {
            NetworkBuild::new(terrain, Arc::clone(obstacles), &self.config, request).finish()
        });
        self.store(Arc::clone(&report.network));
        report
    }

    /// Build several groups' networks in parallel on the pool. Reports come
    /// back in request order and are published in that order, so a group
    /// requested twice ends up with its last request's network.
    pub fn build_many<T: TerrainOracle + Sync + ?Sized>(
        &self,
        terrain: &T,
        obstacles: &Arc<ObstacleField>,
        requests: Vec<NetworkRequest>,
    ) -> Vec<NetworkReport> {
        let reports: Vec<NetworkReport> = self.pool.install(|| {
            requests
                .into_par_iter()
                .map(|request| {
                    NetworkBuild::new(terrain, Arc::clone(obstacles), &self.config, request)
                        .finish()
                })
                .collect()
        });
        for report in &reports {
            self.store(Arc::clone(&report.network));
        }
        reports
    }

    /// Publish a finished network. Returns the one it replaced.
    pub fn store(&self, network: Arc<PathNetwork>) -> Option<Arc<PathNetwork>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(network.group, network)
    }

    pub fn get(&self, group: GroupId) -> Option<Arc<PathNetwork>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&group)
            .cloned()
    }

    /// Drop a group's network. Readers holding the old `Arc` keep it.
    pub fn invalidate(&self, group: GroupId) -> Option<Arc<PathNetwork>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&group)
    }

    /// Cached groups in id order.
    pub fn groups(&self) -> Vec<GroupId> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}
