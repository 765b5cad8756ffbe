#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    use std::time::Duration;

    use crate::{
        apply_move, best_move,
        board::{Board, Cell, Player},
        error::{InvalidMove, SearchError},
        evaluation::EvaluatorProfile,
        is_terminal, legal_columns,
        solver::{SearchConfig, SearchResult, Solver, WIN_SCORE},
        winner, HEIGHT, WIDTH,
    };

    // computer (O) holds three on the bottom row, column 3 completes it
    const THREE_IN_A_ROW: [&str; HEIGHT] = [
        ".......",
        ".......",
        ".......",
        ".......",
        "XX.....",
        "OOO.X.X",
    ];

    // X threatens column 3, O to move has no win of its own
    const BLOCK_THREAT: [&str; HEIGHT] = [
        ".......",
        ".......",
        ".......",
        ".......",
        "O......",
        "XXX...O",
    ];

    const FULL_DRAW: [&str; HEIGHT] = [
        "OXOXOXO",
        "XOXOXOX",
        "XOXOXOX",
        "OXOXOXO",
        "OXOXOXO",
        "XOXOXOX",
    ];

    /// Plays a random alternating game of up to `moves` moves, stopping at a win
    fn random_game(rng: &mut StdRng, moves: usize) -> Result<(Board, Player)> {
        let mut board = Board::new();
        let mut player = Player::One;
        for _ in 0..moves {
            let column = match legal_columns(&board).choose(rng) {
                Some(&column) => column,
                None => break,
            };
            board = apply_move(&board, column, player)?;
            player = player.other();
            if winner(&board).is_some() {
                break;
            }
        }
        Ok((board, player))
    }

    fn assert_gravity(board: &Board) {
        for column in 0..WIDTH {
            for row in 1..HEIGHT {
                if !board.get(row, column).is_empty() {
                    assert!(
                        !board.get(row - 1, column).is_empty(),
                        "floating piece at row {}, column {}\n{}",
                        row,
                        column,
                        board
                    );
                }
            }
        }
    }

    #[test]
    pub fn legal_sequences_keep_gravity() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut board = Board::new();
            let mut player = Player::One;
            let moves = rng.gen_range(0..=WIDTH * HEIGHT);
            for k in 1..=moves {
                let column = match legal_columns(&board).choose(&mut rng) {
                    Some(&column) => column,
                    None => break,
                };
                board = apply_move(&board, column, player)?;
                player = player.other();

                let occupied = (0..HEIGHT)
                    .flat_map(|row| (0..WIDTH).map(move |column| (row, column)))
                    .filter(|&(row, column)| !board.get(row, column).is_empty())
                    .count();
                assert_eq!(occupied, k);
                assert_eq!(board.num_moves(), k);
                assert_gravity(&board);
            }
        }
        Ok(())
    }

    #[test]
    pub fn full_column_is_rejected() -> Result<()> {
        let board = Board::from_moves("333333")?;
        assert!(!board.is_legal(3));
        assert_eq!(legal_columns(&board), vec![0, 1, 2, 4, 5, 6]);

        let before = board;
        for &player in [Player::One, Player::Two].iter() {
            assert_eq!(
                apply_move(&board, 3, player),
                Err(InvalidMove::ColumnFull { column: 3 })
            );
            assert_eq!(
                apply_move(&board, WIDTH, player),
                Err(InvalidMove::ColumnOutOfRange { column: WIDTH })
            );
        }
        assert_eq!(board, before);
        assert_eq!(board.to_string(), before.to_string());
        Ok(())
    }

    #[test]
    pub fn place_never_overwrites_or_floats() -> Result<()> {
        let board = Board::from_moves("2")?;
        assert_eq!(
            board.place(0, 2, Player::Two),
            Err(InvalidMove::CellOccupied { row: 0, column: 2 })
        );
        assert_eq!(
            board.place(3, 4, Player::Two),
            Err(InvalidMove::Unsupported { row: 3, column: 4 })
        );
        assert_eq!(
            board.place(HEIGHT, 4, Player::Two),
            Err(InvalidMove::RowOutOfRange { row: HEIGHT })
        );

        let row = board.next_free_row(2);
        assert_eq!(row, 1);
        let next = board.place(row, 2, Player::Two)?;
        assert_eq!(next.get(1, 2), Cell::PlayerTwo);
        // copy-on-write
        assert_eq!(board.get(1, 2), Cell::Empty);
        Ok(())
    }

    #[test]
    #[should_panic]
    pub fn next_free_row_of_full_column_panics() {
        if let Ok(board) = Board::from_moves("000000") {
            board.next_free_row(0);
        }
    }

    #[test]
    pub fn row_pictures_round_trip() -> Result<()> {
        let board = Board::from_rows(&THREE_IN_A_ROW)?;
        assert_eq!(board.num_moves(), 7);
        assert_eq!(board.get(0, 0), Cell::PlayerTwo);
        assert_eq!(board.get(1, 1), Cell::PlayerOne);
        assert_eq!(board.to_string(), THREE_IN_A_ROW.join("\n") + "\n");

        let floating = [
            ".......",
            ".......",
            ".......",
            ".......",
            "...X...",
            ".......",
        ];
        assert!(Board::from_rows(&floating).is_err());
        assert!(Board::from_rows(&THREE_IN_A_ROW[1..]).is_err());
        assert!(Board::from_moves("37").is_err());
        assert!(Board::from_moves("3a").is_err());
        Ok(())
    }

    #[test]
    pub fn winner_reported_on_completion_only() -> Result<()> {
        let cases = [
            ("0011223", Player::One),     // horizontal
            ("0101010", Player::One),     // vertical
            ("01123223363", Player::One), // rising diagonal
            ("65543443303", Player::One), // falling diagonal
            ("10201020", Player::Two),    // vertical, second player
        ];
        for &(moves, expected) in cases.iter() {
            let mut board = Board::new();
            let mut player = Player::One;
            let columns: Vec<usize> = moves
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|c| c as usize)
                .collect();
            for (i, &column) in columns.iter().enumerate() {
                assert_eq!(winner(&board), None, "{} won early at move {}", moves, i);
                assert!(!is_terminal(&board));
                board = apply_move(&board, column, player)?;
                player = player.other();
            }
            assert_eq!(winner(&board), Some(expected), "{}", moves);
            assert!(is_terminal(&board));
        }
        Ok(())
    }

    #[test]
    pub fn pruning_never_changes_the_result() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..80 {
            let moves = rng.gen_range(0..24);
            let (board, to_move) = random_game(&mut rng, moves)?;
            let depth = rng.gen_range(0..=4);

            for &player in [to_move, to_move.other()].iter() {
                let mut pruned = Solver::new(board, player);
                let mut plain =
                    Solver::new(board, player).with_config(SearchConfig::default().without_pruning());

                let with = pruned.search(depth)?;
                let without = plain.search(depth)?;
                assert_eq!(with, without, "depth {}\n{}", depth, board);
                assert!(pruned.node_count <= plain.node_count);
            }
        }
        Ok(())
    }

    #[test]
    pub fn pruning_skips_nodes() -> Result<()> {
        let mut pruned = Solver::new(Board::new(), Player::One);
        let mut plain = Solver::new(Board::new(), Player::One)
            .with_config(SearchConfig::default().without_pruning());
        assert_eq!(pruned.search(5)?, plain.search(5)?);
        assert!(pruned.node_count < plain.node_count);
        Ok(())
    }

    #[test]
    pub fn depth_zero_is_greedy_on_the_evaluator() -> Result<()> {
        let profile = EvaluatorProfile::STANDARD;
        let mut rng = StdRng::seed_from_u64(3);
        let mut checked = 0;

        while checked < 50 {
            let moves = rng.gen_range(0..30);
            let (board, player) = random_game(&mut rng, moves)?;
            if is_terminal(&board) {
                continue;
            }
            let children = legal_columns(&board)
                .into_iter()
                .map(|column| -> Result<(usize, Board)> {
                    Ok((column, apply_move(&board, column, player)?))
                })
                .collect::<Result<Vec<_>>>()?;
            // decided children score ±WIN_SCORE instead of the heuristic
            if children.iter().any(|(_, child)| is_terminal(child)) {
                continue;
            }

            let mut expected = None;
            let mut best = i32::MIN;
            for (column, child) in children.iter() {
                let score = profile.score(child, player);
                if score > best {
                    best = score;
                    expected = Some(*column);
                }
            }

            let result = best_move(&board, player, 0)?;
            assert_eq!(
                result,
                SearchResult {
                    column: expected,
                    score: best
                }
            );
            checked += 1;
        }
        Ok(())
    }

    #[test]
    pub fn empty_board_opens_in_the_centre() -> Result<()> {
        for &player in [Player::One, Player::Two].iter() {
            let result = best_move(&Board::new(), player, 4)?;
            assert_eq!(result.column, Some(3));
        }
        Ok(())
    }

    #[test]
    pub fn completes_three_in_a_row() -> Result<()> {
        let board = Board::from_rows(&THREE_IN_A_ROW)?;
        for depth in 1..=6 {
            let result = best_move(&board, Player::Two, depth)?;
            assert_eq!(
                result,
                SearchResult {
                    column: Some(3),
                    score: WIN_SCORE
                },
                "depth {}",
                depth
            );
            assert!(result.is_forced_win());
        }
        Ok(())
    }

    #[test]
    pub fn immediate_win_beats_a_slower_forced_win() -> Result<()> {
        // column 0 also wins for O two moves later, column 3 wins now
        let board = Board::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            ".OO.X.X",
            "OOO.X.X",
        ])?;
        let expected = SearchResult {
            column: Some(3),
            score: WIN_SCORE,
        };
        for depth in 0..=6 {
            assert_eq!(best_move(&board, Player::Two, depth)?, expected, "depth {}", depth);

            let mut unpruned = Solver::new(board, Player::Two)
                .with_config(SearchConfig::default().without_pruning());
            assert_eq!(unpruned.search(depth)?, expected, "depth {}", depth);
        }
        Ok(())
    }

    #[test]
    pub fn blocks_an_immediate_threat() -> Result<()> {
        let board = Board::from_rows(&BLOCK_THREAT)?;
        for column in legal_columns(&board) {
            let child = apply_move(&board, column, Player::Two)?;
            assert_ne!(winner(&child), Some(Player::Two));
        }
        for depth in 2..=5 {
            let result = best_move(&board, Player::Two, depth)?;
            assert_eq!(result.column, Some(3), "depth {}", depth);
            assert!(!result.is_forced_loss());
        }
        Ok(())
    }

    #[test]
    pub fn full_board_without_winner_is_a_draw() -> Result<()> {
        let board = Board::from_rows(&FULL_DRAW)?;
        assert!(board.is_full());
        assert!(is_terminal(&board));
        assert_eq!(winner(&board), None);
        assert!(legal_columns(&board).is_empty());

        for depth in 0..4 {
            for &player in [Player::One, Player::Two].iter() {
                assert_eq!(
                    best_move(&board, player, depth)?,
                    SearchResult {
                        column: None,
                        score: 0
                    }
                );
            }
        }
        Ok(())
    }

    #[test]
    pub fn decided_board_returns_terminal_score() -> Result<()> {
        let board = Board::from_moves("0101010")?;
        assert_eq!(
            best_move(&board, Player::One, 3)?,
            SearchResult {
                column: None,
                score: WIN_SCORE
            }
        );
        assert_eq!(
            best_move(&board, Player::Two, 3)?,
            SearchResult {
                column: None,
                score: -WIN_SCORE
            }
        );

        let mut biased = Solver::new(board, Player::Two)
            .with_config(SearchConfig::default().with_loss_bias(5_000));
        assert_eq!(biased.search(3)?.score, -WIN_SCORE - 5_000);
        Ok(())
    }

    #[test]
    pub fn search_is_deterministic() -> Result<()> {
        let board = Board::from_moves("3324")?;
        let first = best_move(&board, Player::One, 5)?;
        for _ in 0..3 {
            assert_eq!(best_move(&board, Player::One, 5)?, first);
        }
        Ok(())
    }

    #[test]
    pub fn budgets_abort_the_search() -> Result<()> {
        let mut solver = Solver::new(Board::new(), Player::One)
            .with_config(SearchConfig::default().with_node_budget(10));
        assert_eq!(
            solver.search(4),
            Err(SearchError::BudgetExhausted { nodes: 11 })
        );

        let mut solver = Solver::new(Board::new(), Player::One).with_config(
            SearchConfig::default()
                .without_pruning()
                .with_time_limit(Duration::from_secs(0)),
        );
        assert!(matches!(
            solver.search(6),
            Err(SearchError::DeadlineExceeded { .. })
        ));

        // a generous budget changes nothing
        let mut solver = Solver::new(Board::new(), Player::One)
            .with_config(SearchConfig::default().with_node_budget(1_000_000));
        assert_eq!(solver.search(3)?, best_move(&Board::new(), Player::One, 3)?);
        Ok(())
    }
}
