//! Breadth-first search over board states.
//!
//! Boards are expanded in FIFO order and deduplicated by their canonical
//! form, so each distinct layout is queued at most once. Move histories live
//! in a shared parent-pointer arena; a queued node only carries the index of
//! its last move.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, PieceLocations};
use crate::canonical::{baseform, CanonicalBoard};
use crate::goal::Goal;
use crate::moves::{apply_move, successors_with, Move};

/// How repeated slides of the same piece are merged into double moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionMode {
    /// Merge while searching: a node whose move repeats its parent's last
    /// move is re-queued at the front with a doubled move. Found paths are
    /// not guaranteed shortest.
    #[default]
    Inline,
    /// Plain breadth-first search, then merge pairs in the found path.
    PostProcess,
    /// Plain breadth-first search, unit moves reported as found.
    Off,
}

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub compression: CompressionMode,
    /// Stop once this many distinct layouts have been recorded
    pub max_states: Option<usize>,
    /// Maximum time to search
    pub timeout: Option<Duration>,
    /// Expansions between progress log lines (0 disables them)
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            compression: CompressionMode::Inline,
            max_states: None,
            timeout: None,
            progress_interval: 100_000,
        }
    }
}

/// Final board and the moves leading to it from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub board: Board,
    pub moves: Vec<Move>,
}

impl Solution {
    /// Number of reported moves (a double move counts once)
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The moves with every double move split into single-cell slides
    pub fn unit_moves(&self) -> Vec<Move> {
        self.moves.iter().flat_map(|mv| mv.unit_steps()).collect()
    }

    pub fn unit_len(&self) -> usize {
        self.moves.iter().map(Move::distance).sum()
    }

    /// Play the solution from `start`, one cell at a time.
    ///
    /// Returns `None` if any step is illegal on the board it is applied to.
    pub fn replay(&self, start: &Board) -> Option<Board> {
        self.unit_moves()
            .into_iter()
            .try_fold(start.clone(), |board, mv| apply_move(&board, mv))
    }
}

/// Caller-imposed bound that stopped a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    States,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every reachable layout was explored without meeting the goal
    Exhausted,
    LimitReached(SearchLimit),
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: SearchOutcome,
    /// Distinct canonical layouts recorded
    pub states_visited: usize,
    /// Nodes taken off the queue and expanded
    pub nodes_expanded: usize,
    /// Largest queue length seen
    pub max_frontier: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    mv: Move,
    parent: Option<usize>,
}

/// A board waiting in the queue
#[derive(Debug)]
struct SearchNode {
    board: Board,
    /// Last move in the history arena, `None` for the start
    tail: Option<usize>,
    /// Single-cell moves from the start
    depth: usize,
}

/// Search state for one run: work queue, visited layouts and move history.
///
/// All of it is owned here and cleared at the start of every `solve`.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    queue: VecDeque<SearchNode>,
    visited: FxHashSet<CanonicalBoard>,
    history: Vec<HistoryEntry>,
    nodes_expanded: usize,
    max_frontier: usize,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            visited: FxHashSet::default(),
            history: Vec::new(),
            nodes_expanded: 0,
            max_frontier: 0,
        }
    }

    /// Distinct canonical layouts recorded by the last run
    pub fn states_visited(&self) -> usize {
        self.visited.len()
    }

    /// Whether the last run recorded a layout equivalent to `board`
    pub fn has_visited(&self, board: &Board) -> bool {
        self.visited.contains(&baseform(board))
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.history.clear();
        self.nodes_expanded = 0;
        self.max_frontier = 0;
    }

    /// Search for the first board reachable from `start` that satisfies
    /// `goal`.
    pub fn solve(&mut self, start: &Board, goal: &Goal) -> SolverResult {
        let start_time = Instant::now();
        let deadline = self.config.timeout.map(|timeout| start_time + timeout);
        let inline = self.config.compression == CompressionMode::Inline;

        self.reset();
        self.visited.insert(baseform(start));

        if goal.is_satisfied(start) {
            let solution = Solution {
                board: start.clone(),
                moves: Vec::new(),
            };
            return self.finish(start_time, SearchOutcome::Solved(solution));
        }

        self.queue.push_back(SearchNode {
            board: start.clone(),
            tail: None,
            depth: 0,
        });
        self.max_frontier = 1;

        while let Some(node) = self.queue.pop_front() {
            if deadline.is_some_and(|deadline| Instant::now() > deadline) {
                return self.finish(start_time, SearchOutcome::LimitReached(SearchLimit::Timeout));
            }
            if self
                .config
                .max_states
                .is_some_and(|max| self.visited.len() >= max)
            {
                return self.finish(start_time, SearchOutcome::LimitReached(SearchLimit::States));
            }

            self.nodes_expanded += 1;
            if self.config.progress_interval > 0
                && self.nodes_expanded % self.config.progress_interval == 0
            {
                debug!(
                    "expanded {} nodes: {} layouts, frontier {}, depth {}",
                    self.nodes_expanded,
                    self.visited.len(),
                    self.queue.len(),
                    node.depth
                );
            }

            let locations = PieceLocations::of(&node.board);
            for (next, mv) in successors_with(&node.board, &locations) {
                let canonical = baseform(&next);
                if self.visited.contains(&canonical) {
                    continue;
                }

                if goal.is_satisfied(&next) {
                    let moves = self.path_with(node.tail, mv);
                    let solution = Solution { board: next, moves };
                    return self.finish(start_time, SearchOutcome::Solved(solution));
                }

                self.visited.insert(canonical);

                let depth = node.depth + 1;
                match node.tail {
                    Some(tail) if inline && self.history[tail].mv == mv => {
                        let parent = self.history[tail].parent;
                        let tail = self.record(mv.doubled(), parent);
                        self.queue.push_front(SearchNode {
                            board: next,
                            tail: Some(tail),
                            depth,
                        });
                    }
                    _ => {
                        let tail = self.record(mv, node.tail);
                        self.queue.push_back(SearchNode {
                            board: next,
                            tail: Some(tail),
                            depth,
                        });
                    }
                }
            }

            self.max_frontier = self.max_frontier.max(self.queue.len());
        }

        self.finish(start_time, SearchOutcome::Exhausted)
    }

    fn record(&mut self, mv: Move, parent: Option<usize>) -> usize {
        self.history.push(HistoryEntry { mv, parent });
        self.history.len() - 1
    }

    /// Moves from the start to `tail`, followed by `last`.
    fn path_with(&self, tail: Option<usize>, last: Move) -> Vec<Move> {
        let mut moves = vec![last];
        let mut cursor = tail;
        while let Some(index) = cursor {
            let entry = self.history[index];
            moves.push(entry.mv);
            cursor = entry.parent;
        }
        moves.reverse();

        match self.config.compression {
            CompressionMode::PostProcess => compress_moves(&moves),
            CompressionMode::Inline | CompressionMode::Off => moves,
        }
    }

    fn finish(&self, start_time: Instant, outcome: SearchOutcome) -> SolverResult {
        let result = SolverResult {
            outcome,
            states_visited: self.visited.len(),
            nodes_expanded: self.nodes_expanded,
            max_frontier: self.max_frontier,
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        match &result.outcome {
            SearchOutcome::Solved(solution) => info!(
                "found solution, moves: {} ({} unit), layouts explored: {}",
                solution.len(),
                solution.unit_len(),
                result.states_visited
            ),
            SearchOutcome::Exhausted => info!(
                "no solution, search exhausted after {} layouts",
                result.states_visited
            ),
            SearchOutcome::LimitReached(limit) => info!(
                "search stopped by {:?} limit after {} layouts",
                limit, result.states_visited
            ),
        }

        result
    }
}

/// Merge each pair of identical consecutive single-cell slides into one
/// double move. A run of three becomes a double followed by a single.
pub fn compress_moves(moves: &[Move]) -> Vec<Move> {
    let mut compressed: Vec<Move> = Vec::with_capacity(moves.len());
    for &mv in moves {
        match compressed.last_mut() {
            Some(last) if *last == mv && mv.distance() == 1 => *last = mv.doubled(),
            _ => compressed.push(mv),
        }
    }
    compressed
}

/// Run a fresh search with `config`.
pub fn solve(start: &Board, goal: &Goal, config: &SolverConfig) -> SolverResult {
    Solver::new(config.clone()).solve(start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{parse_board as board, Cell, PieceId, PieceKind};
    use crate::moves::Direction;

    fn id(label: &str) -> PieceId {
        PieceId::parse(label).unwrap()
    }

    fn goal(kind: char, cells: &[(usize, usize)]) -> Goal {
        Goal::new(
            PieceKind::new(kind).unwrap(),
            cells.iter().map(|&(row, col)| Cell::new(row, col)).collect(),
        )
    }

    fn config(compression: CompressionMode) -> SolverConfig {
        SolverConfig {
            compression,
            ..Default::default()
        }
    }

    #[test]
    fn test_one_move_solution() {
        // x1 is three wide and can never move
        let start = board(&["r  _1 _2", "x1 x1 x1"]);
        let result = solve(&start, &goal('r', &[(0, 1)]), &SolverConfig::default());

        let solution = result.solution().unwrap();
        assert_eq!(solution.moves, vec![Move::unit(id("r"), Direction::Right)]);
        assert_eq!(solution.board, board(&["_1 r  _2", "x1 x1 x1"]));
        assert_eq!(result.nodes_expanded, 1);
    }

    #[test]
    fn test_start_already_solved() {
        let start = board(&["_1 r", "x1 _2"]);
        let mut solver = Solver::new(SolverConfig::default());
        let result = solver.solve(&start, &goal('r', &[(0, 1)]));

        let solution = result.solution().unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.board, start);
        assert_eq!(result.nodes_expanded, 0);
        assert_eq!(result.states_visited, 1);
    }

    #[test]
    fn test_locked_board_has_no_solution() {
        let start = board(&["_1 _2"]);
        let mut solver = Solver::new(SolverConfig::default());
        let result = solver.solve(&start, &goal('r', &[(0, 0)]));

        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.states_visited, 1);
        assert_eq!(solver.states_visited(), 1);
        assert!(solver.has_visited(&start));
    }

    #[test]
    fn test_exhausts_reachable_layouts() {
        let start = board(&["r", "_1", "_2"]);
        let result = solve(&start, &goal('g', &[(0, 0)]), &SolverConfig::default());

        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.states_visited, 3);
        assert_eq!(result.nodes_expanded, 3);
    }

    #[test]
    fn test_goal_move_is_not_merged() {
        let start = board(&["r _1 _2"]);
        let result = solve(&start, &goal('r', &[(0, 2)]), &config(CompressionMode::Inline));

        let right = Move::unit(id("r"), Direction::Right);
        assert_eq!(result.solution().unwrap().moves, vec![right, right]);
    }

    #[test]
    fn test_post_process_merges_pairs() {
        let start = board(&["r _1 _2"]);
        let result = solve(&start, &goal('r', &[(0, 2)]), &config(CompressionMode::PostProcess));

        let right = Move::unit(id("r"), Direction::Right);
        let solution = result.solution().unwrap();
        assert_eq!(solution.moves, vec![right.doubled()]);
        assert_eq!(solution.unit_len(), 2);
    }

    #[test]
    fn test_compress_moves() {
        let up = Move::unit(id("a1"), Direction::Up);
        let left = Move::unit(id("b1"), Direction::Left);

        assert!(compress_moves(&[]).is_empty());
        assert_eq!(compress_moves(&[up, left]), vec![up, left]);
        assert_eq!(compress_moves(&[up, up, left]), vec![up.doubled(), left]);
        assert_eq!(compress_moves(&[up, up, up]), vec![up.doubled(), up]);
        assert_eq!(
            compress_moves(&[up, up, up, up]),
            vec![up.doubled(), up.doubled()]
        );
    }

    #[test]
    fn test_state_limit() {
        let start = board(&["r", "_1", "_2"]);
        let solver_config = SolverConfig {
            max_states: Some(2),
            ..Default::default()
        };
        let result = solve(&start, &goal('g', &[(0, 0)]), &solver_config);

        assert_eq!(result.outcome, SearchOutcome::LimitReached(SearchLimit::States));
        assert_eq!(result.states_visited, 2);
    }

    #[test]
    fn test_solver_is_reusable() {
        let mut solver = Solver::new(SolverConfig::default());
        let first = solver.solve(&board(&["r", "_1", "_2"]), &goal('g', &[(0, 0)]));
        assert_eq!(first.states_visited, 3);

        let second = solver.solve(&board(&["_1 _2"]), &goal('r', &[(0, 0)]));
        assert_eq!(second.states_visited, 1);
    }

    #[test]
    fn test_replay_rejects_foreign_moves() {
        let start = board(&["r _1 _2"]);
        let solution = Solution {
            board: start.clone(),
            moves: vec![Move::unit(id("r"), Direction::Left)],
        };
        assert!(solution.replay(&start).is_none());
    }
}
