use klotski_solver::{
    baseform, solve, successors, CompressionMode, Direction, Move, PieceId, PuzzleConfig,
    SearchOutcome, SolverConfig,
};

fn config(compression: CompressionMode) -> SolverConfig {
    SolverConfig {
        compression,
        ..Default::default()
    }
}

#[test]
fn reference_shortest_path_is_138_slides() {
    let (start, goal) = PuzzleConfig::builtin("reference").unwrap().build().unwrap();

    let result = solve(&start, &goal, &config(CompressionMode::Off));
    let solution = result.solution().unwrap();
    assert_eq!(solution.len(), 138);
    assert_eq!(solution.unit_len(), 138);
    assert!(solution.moves.iter().all(|mv| mv.distance() == 1));

    let replayed = solution.replay(&start).unwrap();
    assert_eq!(replayed, solution.board);
    assert!(goal.is_satisfied(&replayed));
}

#[test]
fn post_processing_keeps_the_shortest_path() {
    let (start, goal) = PuzzleConfig::builtin("reference").unwrap().build().unwrap();

    let result = solve(&start, &goal, &config(CompressionMode::PostProcess));
    let solution = result.solution().unwrap();
    assert_eq!(solution.unit_len(), 138);
    assert!(solution.len() < 138);
    assert!(goal.is_satisfied(&solution.replay(&start).unwrap()));
}

#[test]
fn classic_shortest_path_is_116_slides() {
    let (start, goal) = PuzzleConfig::builtin("classic").unwrap().build().unwrap();

    let result = solve(&start, &goal, &config(CompressionMode::Off));
    assert_eq!(result.solution().unwrap().unit_len(), 116);
}

#[test]
fn reference_inline_solution_is_pinned() {
    let (start, goal) = PuzzleConfig::builtin("reference").unwrap().build().unwrap();

    let result = solve(&start, &goal, &SolverConfig::default());
    let solution = result.solution().unwrap();
    assert_eq!(solution.len(), 114);
    assert_eq!(solution.unit_len(), 138);
    assert_eq!(result.states_visited, 28048);

    let piece = |label| PieceId::parse(label).unwrap();
    assert_eq!(
        solution.moves[..3],
        [
            Move::unit(piece("g4"), Direction::Right),
            Move::unit(piece("g3"), Direction::Right),
            Move::unit(piece("w2"), Direction::Down),
        ]
    );
}

#[test]
fn inline_compression_is_valid_but_not_always_shortest() {
    for name in ["reference", "classic"] {
        let (start, goal) = PuzzleConfig::builtin(name).unwrap().build().unwrap();

        let shortest = solve(&start, &goal, &config(CompressionMode::Off));
        let inline = solve(&start, &goal, &config(CompressionMode::Inline));

        let shortest = shortest.solution().unwrap();
        let inline = inline.solution().unwrap();
        assert!(inline.unit_len() >= shortest.unit_len());
        assert!(inline.len() <= inline.unit_len());

        let replayed = inline.replay(&start).unwrap();
        assert_eq!(replayed, inline.board);
        assert!(goal.is_satisfied(&replayed));
    }
}

#[test]
fn every_reachable_layout_keeps_two_holes() {
    let (start, goal) = PuzzleConfig::builtin("classic").unwrap().build().unwrap();
    let result = solve(&start, &goal, &config(CompressionMode::Off));
    let solution = result.solution().unwrap();

    let mut board = start;
    for mv in solution.unit_moves() {
        for (next, _) in successors(&board) {
            assert_eq!(next.hole_count(), 2);
            let canonical = baseform(&next);
            assert_eq!(baseform(canonical.as_board()), canonical);
        }
        board = klotski_solver::apply_move(&board, mv).unwrap();
    }
}

#[test]
fn state_limit_stops_the_search() {
    let (start, goal) = PuzzleConfig::builtin("reference").unwrap().build().unwrap();
    let solver_config = SolverConfig {
        max_states: Some(500),
        ..Default::default()
    };

    let result = solve(&start, &goal, &solver_config);
    assert!(matches!(result.outcome, SearchOutcome::LimitReached(_)));
    assert!(result.states_visited >= 500);
}
