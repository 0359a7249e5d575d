use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wumpus_core::{CaveMut, CaveView, Coord, Direction, Percepts};
use wumpus_logic::{Expr, InferenceEngine, KnowledgeBase};
use wumpus_nav::{PlanningModule, Route};

use crate::config::AgentConfig;
use crate::risk;
use crate::trace::{Decision, DecisionKind, DecisionLog};

/// Result of one [`HybridAgent::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Moved one cell or fired the arrow.
    Progress,
    /// Nothing executed this turn. The caller decides whether to call again.
    Stalled,
    /// Climbed out with the gold.
    Escaped,
    /// Climbed out empty-handed.
    ClimbedOut,
    Dead,
}

impl TurnOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Escaped | Self::ClimbedOut | Self::Dead)
    }

    pub fn made_progress(self) -> bool {
        self == Self::Progress
    }
}

/// Where and how to fire at a confirmed wumpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotPlan {
    pub threat: Coord,
    /// Safe cell sharing a row or column with the threat.
    pub position: Coord,
    /// Heading to fire along once at `position`.
    pub heading: Direction,
    pub route: Route,
}

enum Plan {
    Move,
    Acted,
    Idle,
}

/// Knowledge-based agent combining logical inference with route planning.
///
/// Owns its knowledge base, planner and per-cell state. The cave is passed in on every
/// turn and only reached through [`CaveView`]/[`CaveMut`].
#[derive(Debug, Clone)]
pub struct HybridAgent {
    config: AgentConfig,
    size: i32,
    origin: Coord,
    kb: KnowledgeBase,
    planner: PlanningModule,
    visited: BTreeSet<Coord>,
    risk: BTreeMap<Coord, f64>,
    wumpus_at: BTreeSet<Coord>,
    pits_at: BTreeSet<Coord>,
    route: Route,
    has_gold: bool,
    has_arrow: bool,
    leaving: bool,
    finished: Option<TurnOutcome>,
    inference_calls: u64,
    turn: u64,
    log: DecisionLog,
}

fn at_args(at: Coord) -> [String; 2] {
    [at.x.to_string(), at.y.to_string()]
}

fn atom(name: &str, at: Coord) -> Expr {
    Expr::pred(name, at_args(at))
}

fn literal(name: &str, at: Coord, holds: bool) -> Expr {
    if holds {
        atom(name, at)
    } else {
        Expr::not(atom(name, at))
    }
}

impl HybridAgent {
    /// Start an agent at the cave's current position, which becomes its exit.
    pub fn new<W: CaveView>(world: &W, config: AgentConfig) -> Self {
        let origin = world.agent_position();
        let mut agent = Self {
            config,
            size: world.size(),
            origin,
            kb: KnowledgeBase::new(),
            planner: PlanningModule::new(),
            visited: BTreeSet::new(),
            risk: BTreeMap::new(),
            wumpus_at: BTreeSet::new(),
            pits_at: BTreeSet::new(),
            route: Route::default(),
            has_gold: false,
            has_arrow: true,
            leaving: false,
            finished: None,
            inference_calls: 0,
            turn: 0,
            log: DecisionLog::default(),
        };
        agent.mark_visited(origin);
        agent
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn planner(&self) -> &PlanningModule {
        &self.planner
    }

    pub fn visited(&self) -> &BTreeSet<Coord> {
        &self.visited
    }

    /// Last lethal-risk estimate for `cell`, if it was ever assessed.
    pub fn cell_risk(&self, cell: Coord) -> Option<f64> {
        self.risk.get(&cell).copied()
    }

    pub fn confirmed_threats(&self) -> impl Iterator<Item = Coord> + '_ {
        self.wumpus_at.iter().copied()
    }

    pub fn confirmed_pits(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pits_at.iter().copied()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    /// True once the agent has decided to head for the exit.
    pub fn is_leaving(&self) -> bool {
        self.leaving
    }

    /// Number of probability queries issued so far.
    pub fn inference_calls(&self) -> u64 {
        self.inference_calls
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn decisions(&self) -> &DecisionLog {
        &self.log
    }

    /// Record `cell` as occupied and therefore safe.
    pub fn mark_visited(&mut self, cell: Coord) {
        self.visited.insert(cell);
        self.planner.add_safe_cell(cell);
        self.risk.insert(cell, 0.0);
    }

    /// Mark every in-bounds neighbor of `at` safe without inference.
    ///
    /// Returns how many cells were new to the safe space.
    pub fn add_adjacent_safe_cells(&mut self, at: Coord) -> usize {
        let mut added = 0;
        for n in at.neighbors_within(self.size) {
            if self.planner.add_safe_cell(n) {
                added += 1;
            }
            self.risk.insert(n, 0.0);
        }
        added
    }

    /// Cheapest route to a safe cell not yet visited.
    pub fn nearest_unvisited_safe_cell(&self, at: Coord, facing: Direction) -> Option<(Coord, Route)> {
        let candidates = self
            .planner
            .safe_cells()
            .filter(|cell| !self.visited.contains(cell));
        self.planner.nearest_goal_route(at, candidates, facing)
    }

    /// Cheapest safe firing position lined up with a confirmed threat.
    pub fn find_shoot_route(&self, at: Coord, facing: Direction) -> Option<ShotPlan> {
        let mut lines: Vec<(Coord, Coord)> = Vec::new();
        for threat in &self.wumpus_at {
            for cell in self.planner.safe_cells() {
                if cell.line_of_fire(*threat).is_some() {
                    lines.push((cell, *threat));
                }
            }
        }

        let (position, route) =
            self.planner
                .nearest_goal_route(at, lines.iter().map(|(cell, _)| *cell), facing)?;
        let (_, threat) = lines.iter().find(|(cell, _)| *cell == position)?;
        let heading = position.line_of_fire(*threat)?;
        Some(ShotPlan {
            threat: *threat,
            position,
            heading,
            route,
        })
    }

    /// Fold the percepts sensed at `at` into the knowledge base.
    ///
    /// Returns how many facts and rules were new.
    pub fn update_knowledge(&mut self, at: Coord, percepts: Percepts) -> usize {
        let mut facts = vec![
            literal("Stench", at, percepts.stench),
            literal("Breeze", at, percepts.breeze),
            literal("Pit", at, false),
            literal("Wumpus", at, false),
        ];
        let mut rules = Vec::new();

        let neighbors: Vec<Coord> = at.neighbors_within(self.size).collect();
        for (sensed, percept, hazard) in [
            (percepts.stench, "Stench", "Wumpus"),
            (percepts.breeze, "Breeze", "Pit"),
        ] {
            if !sensed {
                facts.extend(neighbors.iter().map(|n| literal(hazard, *n, false)));
            } else if let Some(cause) = Expr::try_any(neighbors.iter().map(|n| atom(hazard, *n))) {
                rules.push(Expr::implies(atom(percept, at), cause));
            }
        }

        let facts = self.kb.extend_facts(facts);
        let rules = self.kb.extend_rules(rules);
        facts.added + rules.added
    }

    /// Query both hazards for every unexplored neighbor of `at`.
    fn assess_neighbors(&mut self, at: Coord) {
        let engine = InferenceEngine::new(&self.kb).with_config(self.config.inference);
        let mut calls = 0;
        let mut assessed = Vec::new();
        for n in at.neighbors_within(self.size) {
            if self.visited.contains(&n) || self.planner.is_safe(n) {
                continue;
            }
            let wumpus = engine.assess(&atom("Wumpus", n));
            let pit = engine.assess(&atom("Pit", n));
            calls += 2;
            assessed.push((
                n,
                risk::known_probability(&wumpus),
                risk::known_probability(&pit),
            ));
        }
        self.inference_calls += calls;

        for (n, wumpus, pit) in assessed {
            let lethal = risk::lethal_probability(wumpus, pit);
            tracing::trace!(cell = %n, ?wumpus, ?pit, lethal, "assessed neighbor");
            self.risk.insert(n, lethal);
            if risk::is_proven_safe(wumpus, pit) {
                self.planner.add_safe_cell(n);
            }
            if wumpus == Some(1.0) {
                self.wumpus_at.insert(n);
            }
            if pit == Some(1.0) {
                self.pits_at.insert(n);
            }
        }
    }

    fn record(&mut self, at: Coord, kind: DecisionKind) {
        self.log.push(Decision {
            turn: self.turn,
            at,
            kind,
        });
    }

    fn head_for_exit(&mut self, at: Coord, facing: Direction) {
        self.leaving = true;
        self.route = self
            .planner
            .find_route(at, self.origin, facing)
            .unwrap_or_default();
    }

    /// Least risky assessed cell under the threshold that borders the safe space.
    fn gamble_target(&self, at: Coord, facing: Direction) -> Option<(Coord, f64)> {
        let mut candidates: Vec<(Coord, f64)> = self
            .risk
            .iter()
            .map(|(cell, risk)| (*cell, *risk))
            .filter(|(cell, risk)| {
                *risk < self.config.risk_threshold
                    && !self.visited.contains(cell)
                    && !self.planner.is_safe(*cell)
                    && !self.pits_at.contains(cell)
                    && !self.wumpus_at.contains(cell)
            })
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        candidates.into_iter().find(|(cell, _)| {
            cell.neighbors()
                .into_iter()
                .filter(|n| self.planner.is_safe(*n))
                .any(|n| self.planner.find_route(at, n, facing).is_some())
        })
    }

    /// Pick the next goal once the route buffer is empty.
    fn plan<W: CaveMut>(&mut self, world: &mut W, at: Coord, facing: Direction) -> Plan {
        if let Some((target, route)) = self.nearest_unvisited_safe_cell(at, facing) {
            self.record(at, DecisionKind::Explore { target });
            self.route = route;
            return Plan::Move;
        }

        if self.has_arrow {
            if let Some(shot) = self.find_shoot_route(at, facing) {
                if shot.route.is_empty() {
                    self.fire(world, at, facing, shot.threat, shot.heading);
                    return Plan::Acted;
                }
                self.record(
                    at,
                    DecisionKind::Hunt {
                        threat: shot.threat,
                        position: shot.position,
                    },
                );
                self.route = shot.route;
                return Plan::Move;
            }
        }

        if let Some((target, risk)) = self.gamble_target(at, facing) {
            self.record(at, DecisionKind::Gamble { target, risk });
            self.planner.add_safe_cell(target);
            if let Some(route) = self.planner.find_route(at, target, facing) {
                self.route = route;
                return Plan::Move;
            }
        }

        self.record(at, DecisionKind::Retreat);
        self.head_for_exit(at, facing);
        Plan::Idle
    }

    fn fire<W: CaveMut>(
        &mut self,
        world: &mut W,
        at: Coord,
        facing: Direction,
        target: Coord,
        heading: Direction,
    ) {
        turn_towards(world, facing, heading);
        let hit = world.shoot();
        self.has_arrow = false;
        if hit {
            self.wumpus_at.remove(&target);
            self.risk.remove(&target);
            self.kb.update_kb(literal("Wumpus", target, false));
        }
        self.record(at, DecisionKind::Fire { target, hit });
    }

    /// Run one turn against `world`.
    pub fn step<W: CaveMut>(&mut self, world: &mut W) -> TurnOutcome {
        if let Some(outcome) = self.finished {
            return outcome;
        }
        self.turn += 1;

        if !world.agent_alive() {
            tracing::debug!(turn = self.turn, "agent is dead; nothing to do");
            return self.finish(TurnOutcome::Dead);
        }

        let at = world.agent_position();
        let facing = world.agent_facing();

        if self.leaving && at == self.origin {
            self.record(at, DecisionKind::Climb);
            world.climb_out();
            let outcome = if self.has_gold {
                TurnOutcome::Escaped
            } else {
                TurnOutcome::ClimbedOut
            };
            return self.finish(outcome);
        }

        self.mark_visited(at);
        let percepts = world.percepts();
        self.update_knowledge(at, percepts);

        if percepts.glitter && !self.has_gold && world.grab() {
            self.has_gold = true;
            self.record(at, DecisionKind::Grab);
            self.head_for_exit(at, facing);
        }

        if percepts.any_hazard() {
            self.assess_neighbors(at);
        } else {
            self.add_adjacent_safe_cells(at);
        }

        if self.route.is_empty() {
            if self.leaving {
                self.head_for_exit(at, facing);
            } else {
                match self.plan(world, at, facing) {
                    Plan::Move => {}
                    Plan::Acted => return TurnOutcome::Progress,
                    Plan::Idle => return TurnOutcome::Stalled,
                }
            }
        }

        let Some(next) = self.route.advance() else {
            return TurnOutcome::Stalled;
        };
        move_to(world, at, facing, next);
        if !world.agent_alive() {
            tracing::info!(turn = self.turn, at = %next, "agent walked into a hazard");
            return self.finish(TurnOutcome::Dead);
        }
        self.visited.insert(next);
        TurnOutcome::Progress
    }

    fn finish(&mut self, outcome: TurnOutcome) -> TurnOutcome {
        self.finished = Some(outcome);
        outcome
    }
}

fn turn_towards<W: CaveMut>(world: &mut W, facing: Direction, heading: Direction) {
    match facing.quarter_turns_to(heading) {
        0 => {}
        1 => world.turn_right(),
        -1 => world.turn_left(),
        _ => {
            world.turn_right();
            world.turn_right();
        }
    }
}

/// Turn as needed and step onto the adjacent cell `next`.
///
/// # Panics
///
/// If `next` is not adjacent to `at`.
fn move_to<W: CaveMut>(world: &mut W, at: Coord, facing: Direction, next: Coord) {
    let Some(heading) = at.direction_to(next) else {
        panic!("route step {next} is not adjacent to {at}");
    };
    turn_towards(world, facing, heading);
    world.move_forward();
}
