use kibitz::{
    fen::Fen,
    search::{self, SearchConfig, Searcher, MAX_EVAL, MIN_EVAL},
    uci::Uci,
    Engine, Move, Position, State, Strategy, Weights,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn pos(fen: &str) -> Position {
    fen.parse::<Fen>().expect("valid fen").into_position()
}

fn uci(m: &Move) -> String {
    Uci::from_move(m).to_string()
}

fn minimax(fen: &str) -> (String, i32) {
    init_logging();
    let mut searcher = Searcher::default();
    let (best, eval) = searcher.minimax(&pos(fen));
    (uci(&best), eval)
}

#[test]
fn test_mate_in_one() {
    init_logging();
    let mut searcher = Searcher::default();
    let (best, eval) = searcher.minimax(&pos("1r4k1/5Npp/4Q3/8/8/8/6K1/8 w - -"));
    assert_eq!(uci(&best), "f7h6");
    assert_eq!(eval, MAX_EVAL - 1);
    assert_eq!(searcher.stats().nodes, 50_780);

    assert_eq!(
        minimax("8/8/2kN4/8/8/8/3r2r1/2K5 b - -"),
        ("d2d6".to_owned(), MIN_EVAL + 1)
    );
}

#[test]
fn test_back_rank_mates() {
    let (best, eval) = minimax("6k1/5ppp/8/8/8/8/8/R5K1 w - -");
    assert_eq!((best.as_str(), eval), ("a1a8", MAX_EVAL - 1));

    let (best, eval) = minimax("r5k1/8/8/8/8/8/5PPP/6K1 b - -");
    assert_eq!((best.as_str(), eval), ("a8a1", MIN_EVAL + 1));
}

#[test]
fn test_tactics() {
    assert_eq!(minimax("8/8/5q2/8/4N3/2r1k3/8/4K3 w - -"), ("e4c3".to_owned(), -288));
    assert_eq!(minimax("3n4/ppB5/1P6/8/K1k5/P7/1r6/8 b - -"), ("b2b5".to_owned(), -7934));
    assert_eq!(minimax("8/8/pp2r3/1kprpP2/3p4/1KPP4/8/2B5 w - -"), ("c3c4".to_owned(), -54));
    assert_eq!(minimax("1k1r4/pp1b4/3q4/8/8/8/1PP2B2/2K5 b - -"), ("d6f4".to_owned(), -544));
    assert_eq!(minimax("4k3/8/8/3q4/8/8/8/3RK3 w - -"), ("d1d5".to_owned(), 160));
}

#[test]
fn test_pawn_endings() {
    assert_eq!(minimax("k7/1pK5/1P1PP3/8/8/8/8/8 w - -"), ("c7d7".to_owned(), 117));
    assert_eq!(minimax("3k4/8/4K3/3P4/8/8/8/8 w - - 0 1"), ("d5d6".to_owned(), 56));
}

#[test]
fn test_quiet_positions() {
    assert_eq!(minimax("7k/8/8/8/8/8/8/K7 w - -"), ("a1b1".to_owned(), 0));
    assert_eq!(minimax("4k3/8/8/8/8/8/8/4K2R w K -"), ("e1d1".to_owned(), 160));
}

#[test]
fn test_solvers() {
    init_logging();
    let mut searcher = Searcher::default();

    assert_eq!(uci(&searcher.capture_move(&pos("4k3/8/8/3q4/8/8/8/3RK3 w - -"))), "d1d5");
    assert_eq!(uci(&searcher.checkmate_move(&pos("6k1/5ppp/8/8/8/8/8/R5K1 w - -"))), "a1a8");
    assert_eq!(uci(&searcher.checkmate_move(&pos("7k/8/8/8/8/8/8/K7 w - -"))), "a1b1");
}

#[test]
fn test_capture_now_beats_capture_later() {
    init_logging();
    // The pawn on d3 is blocked and can be taken at any time. Quiet king
    // and bishop moves come first and reach the same material score.
    let start = pos("k7/8/8/8/8/R2p4/3B4/4K3 w - -");
    assert_eq!(uci(&start.possible_moves()[0]), "e1d1");
    assert_eq!(uci(&search::ordered_moves(&start)[0]), "a3d3");

    let mut searcher = Searcher::new(SearchConfig::default(), Weights::MATERIAL);
    let (best, eval) = searcher.minimax(&start);
    assert_eq!(uci(&best), "a3d3");
    assert_eq!(eval, 8);
    assert_eq!(searcher.stats().nodes, 1948);
}

#[test]
fn test_shallow_config() {
    init_logging();
    let config = SearchConfig {
        quiet: 1,
        check: 1,
        capture: 1,
    };
    let mut searcher = Searcher::new(config, Weights::MATERIAL);
    let start = pos("4k3/8/8/3q4/8/8/8/3RK3 w - -");
    let (best, eval) = searcher.minimax(&start);
    assert_eq!(uci(&best), "d1d5");
    assert_eq!(eval, 5);
    assert_eq!(searcher.stats().nodes, start.possible_moves().len() as u64);
    assert_eq!(searcher.stats().nodes, 10);
}

#[test]
fn test_engine_plays_mate() {
    init_logging();
    let mut engine = Engine::new(Strategy::Minimax);
    engine.set_position(pos("6k1/5ppp/8/8/8/8/8/R5K1 w - -"));

    let m = engine.best_move();
    assert_eq!(uci(&m), "a1a8");
    assert_eq!(engine.last_move(), m);
    assert_eq!(engine.position().state(), State::Checkmate);

    assert_eq!(engine.best_move(), Move::EMPTY);
    assert_eq!(engine.last_move(), m);
}

#[test]
fn test_engine_terminal_positions() {
    init_logging();
    for strategy in Strategy::ALL {
        for fen in ["7k/5Q2/6K1/8/8/8/8/8 b - -", "k7/8/1Q6/8/8/8/8/K7 b - -"] {
            let start = pos(fen);
            assert_eq!(start.state(), State::Stalemate);

            let mut engine = Engine::new(strategy);
            engine.set_position(start);
            assert_eq!(engine.best_move(), Move::EMPTY);
            assert_eq!(*engine.position(), start);
        }
    }
}

#[test]
fn test_engine_game() {
    init_logging();
    let mut white = Engine::with_config(
        Strategy::Capture,
        SearchConfig::default(),
        Weights::default(),
    );
    let mut black = Engine::new(Strategy::Checkmate);

    for _ in 0..10 {
        let m = white.best_move();
        assert!(!m.is_empty());
        black.move_done(&m);
        assert_eq!(white.position(), black.position());

        let m = black.best_move();
        assert!(!m.is_empty());
        white.move_done(&m);
        assert_eq!(white.position(), black.position());
    }
}
