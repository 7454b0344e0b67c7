// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end checks of the public evaluation interface.

use variantfish::evaluate::Evaluator;
use variantfish::position::Position;
use variantfish::types::*;

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn pos(fen: &str, v: Variant) -> Position {
    let mut p = Position::new();
    p.set(fen, v, false);
    p
}

// Mirrors a FEN vertically, exchanging the colors, the side to move, the
// castling rights, any Crazyhouse pocket and any remaining-checks field.
fn mirror_fen(fen: &str) -> String {
    fn swap_case(c: char) -> char {
        if c.is_ascii_uppercase() {
            c.to_ascii_lowercase()
        } else if c.is_ascii_lowercase() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    let mut parts: Vec<String> = fen.split_whitespace().map(str::to_string).collect();

    let (board, pocket) = match parts[0].find('[') {
        Some(i) => (
            parts[0][..i].to_string(),
            Some(parts[0][i..].chars().map(swap_case).collect::<String>()),
        ),
        None => (parts[0].clone(), None),
    };
    let mirrored_board = board
        .split('/')
        .rev()
        .map(|rank| rank.chars().map(swap_case).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");
    parts[0] = match pocket {
        Some(p) => format!("{}{}", mirrored_board, p),
        None => mirrored_board,
    };

    parts[1] = if parts[1] == "w" { "b".into() } else { "w".into() };
    parts[2] = parts[2].chars().map(swap_case).collect();

    for part in parts.iter_mut().skip(4) {
        if let Some(i) = part.find('+') {
            let (w, b) = part.split_at(i);
            *part = format!("{}+{}", &b[1..], w);
        }
    }

    parts.join(" ")
}

fn tempo_of(v: Variant) -> Value {
    variantfish::params::TEMPO[v.index()]
}

#[test]
fn start_position_is_tempo_only() {
    let p = pos(STARTPOS, Variant::Chess);
    let mut ev = Evaluator::new();
    assert_eq!(ev.evaluate(&p), tempo_of(Variant::Chess));
}

#[test]
fn evaluation_is_antisymmetric_under_mirroring() {
    let cases = [
        (
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 4",
            Variant::Chess,
        ),
        (
            "r1bq1rk1/pp2ppbp/2np1np1/8/3NP3/2N1BP2/PPPQ2PP/R3KB1R w KQ - 0 9",
            Variant::Chess,
        ),
        (
            "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 3",
            Variant::Atomic,
        ),
        (
            "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R[] w KQkq - 0 3",
            Variant::Crazyhouse,
        ),
        (
            "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2+3 0 3",
            Variant::ThreeCheck,
        ),
    ];

    for (fen, v) in cases {
        let p = pos(fen, v);
        let m = pos(&mirror_fen(fen), v);
        let mut ev_p = Evaluator::new();
        let mut ev_m = Evaluator::new();
        let vp = ev_p.evaluate(&p) - tempo_of(v);
        let vm = ev_m.evaluate(&m) - tempo_of(v);
        assert_eq!(vp, -vm, "asymmetric evaluation for {}", fen);
    }
}

#[test]
fn evaluations_are_reproducible_across_evaluators() {
    let fen = "r2q1rk1/1b2bppp/p1np1n2/1p2p3/4P3/1BP2N2/PP1P1PPP/RNBQR1K1 w - - 0 10";
    let p = pos(fen, Variant::Chess);
    let mut ev1 = Evaluator::new();
    let mut ev2 = Evaluator::new();
    let v = ev1.evaluate(&p);
    assert_eq!(v, ev1.evaluate(&p));
    assert_eq!(v, ev2.evaluate(&p));
}

#[test]
fn a_clean_rook_up_is_winning_for_the_side_to_move() {
    let board = "1nbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
    let white_to_move = pos(&format!("{} w Kkq - 0 1", board), Variant::Chess);
    let black_to_move = pos(&format!("{} b Kkq - 0 1", board), Variant::Chess);
    let mut ev = Evaluator::new();
    assert!(ev.evaluate(&white_to_move) > Value(200));
    assert!(ev.evaluate(&black_to_move) < Value(-200));
}

#[test]
fn contempt_shifts_the_evaluation() {
    let p = pos(STARTPOS, Variant::Chess);
    let mut neutral = Evaluator::new();
    let mut optimistic = Evaluator::with_contempt(Score::make(40, 20));
    assert!(optimistic.evaluate(&p) > neutral.evaluate(&p));
}

#[test]
fn every_variant_evaluates_its_start_position() {
    let cases: [(&str, Variant); 13] = [
        (STARTPOS, Variant::Chess),
        (STARTPOS, Variant::Anti),
        (STARTPOS, Variant::Atomic),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1",
            Variant::Crazyhouse,
        ),
        (STARTPOS, Variant::Extinction),
        (STARTPOS, Variant::Grid),
        (
            "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1",
            Variant::Horde,
        ),
        (STARTPOS, Variant::Koth),
        (STARTPOS, Variant::Losers),
        ("8/8/8/8/8/8/krbnNBRK/qrbnNBRQ w - - 0 1", Variant::Race),
        (STARTPOS, Variant::Relay),
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 3+3 0 1",
            Variant::ThreeCheck,
        ),
        (
            "rnbqkknr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKKNR w - - 0 1",
            Variant::TwoKings,
        ),
    ];

    for (fen, v) in cases {
        let p = pos(fen, v);
        assert!(!p.is_variant_end(), "start position already over: {:?}", v);
        let mut ev = Evaluator::new();
        let value = ev.evaluate(&p);
        assert!(
            value.abs() < Value::KNOWN_WIN,
            "implausible start evaluation {:?} for {:?}",
            value.0,
            v
        );
    }
}

#[test]
fn trace_renders_the_full_table() {
    let p = pos(
        "r1bq1rk1/pp2ppbp/2np1np1/8/3NP3/2N1BP2/PPPQ2PP/R3KB1R w KQ - 0 9",
        Variant::Chess,
    );
    let mut ev = Evaluator::new();
    let v = ev.evaluate(&p);
    let rendered = ev.trace(&p);

    assert!(rendered.contains("Eval term"));
    assert!(rendered.contains("King safety"));
    assert!(rendered.contains("Passed pawns"));

    let line = rendered
        .lines()
        .find(|l| l.starts_with("Total Evaluation:"))
        .expect("no total line");
    let total: f64 = line
        .trim_start_matches("Total Evaluation:")
        .trim()
        .trim_end_matches("(white side)")
        .trim()
        .parse()
        .unwrap();
    assert!((total - f64::from(v.0) / f64::from(PawnValueEg.0)).abs() < 0.006);
}

#[test]
fn three_check_exhaustion_is_terminal() {
    let p = pos(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0+3 0 1",
        Variant::ThreeCheck,
    );
    assert!(p.is_variant_end());
    let mut ev = Evaluator::new();
    // White has delivered all three checks; black, to move, is lost.
    assert_eq!(ev.evaluate(&p), mated_in(0) + tempo_of(Variant::ThreeCheck));
}
