// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use crate::bitboard::*;
use crate::endgame::{self, EvalFn, ScaleFn};
use crate::position::Position;
use crate::types::*;

const TABLE_SIZE: usize = 8192;

// material::Entry contains various information about a material
// configuration. A lookup in the material hash table (through
// Table::probe) returns a reference to an Entry.
pub struct Entry {
    key: Key,
    evaluation_function: Option<EvalFn>,
    scaling_function: [Option<ScaleFn>; 2],
    eval_side: Color,
    value: i16,
    factor: [u8; 2],
    game_phase: Phase,
}

impl Entry {
    fn new() -> Entry {
        Entry {
            key: Key(0),
            evaluation_function: None,
            scaling_function: [None; 2],
            eval_side: WHITE,
            value: 0,
            factor: [ScaleFactor::NORMAL.0 as u8; 2],
            game_phase: 0,
        }
    }

    pub fn imbalance(&self) -> Score {
        Score::make(self.value as i32, self.value as i32)
    }

    pub fn game_phase(&self) -> Phase {
        self.game_phase
    }

    pub fn specialized_eval_exists(&self) -> bool {
        self.evaluation_function.is_some()
    }

    pub fn evaluate(&self, pos: &Position) -> Value {
        self.evaluation_function.expect("no specialized eval")(pos, self.eval_side)
    }

    pub fn scale_factor(&self, pos: &Position, c: Color) -> ScaleFactor {
        let sf = match self.scaling_function[c.0 as usize] {
            Some(f) => f(pos, c),
            None => ScaleFactor::NONE,
        };
        if sf != ScaleFactor::NONE {
            sf
        } else {
            ScaleFactor(self.factor[c.0 as usize] as i32)
        }
    }
}

// Polynomial material imbalance parameters

#[rustfmt::skip]
const QUADRATIC_OURS: [[i32; 6]; 6] = [
    //             OUR PIECES
    // pair pawn knight bishop rook queen
    [1667,   0,    0,     0,    0,    0], // Bishop pair
    [  40,   0,    0,     0,    0,    0], // Pawn
    [  32, 255,   -3,     0,    0,    0], // Knight      OUR PIECES
    [   0, 104,    4,     0,    0,    0], // Bishop
    [ -26,  -2,   47,   105, -149,    0], // Rook
    [-189,  24,  117,   133, -134,  -10], // Queen
];

#[rustfmt::skip]
const QUADRATIC_THEIRS: [[i32; 6]; 6] = [
    //             THEIR PIECES
    // pair pawn knight bishop rook queen
    [   0,   0,    0,     0,    0,    0], // Bishop pair
    [  36,   0,    0,     0,    0,    0], // Pawn
    [   9,  63,    0,     0,    0,    0], // Knight      OUR PIECES
    [  59,  65,   42,     0,    0,    0], // Bishop
    [  46,  39,   24,   -24,    0,    0], // Rook
    [  97, 100,  -42,   137,  268,    0], // Queen
];

// Helpers used to detect a given material distribution

fn is_kxk(pos: &Position, us: Color) -> bool {
    !more_than_one(pos.pieces_c(!us)) && pos.non_pawn_material_c(us) >= RookValueMg
}

fn is_kbpsk(pos: &Position, us: Color) -> bool {
    pos.non_pawn_material_c(us) == BishopValueMg
        && pos.count(us, BISHOP) == 1
        && pos.count(us, PAWN) >= 1
}

fn is_kqkrps(pos: &Position, us: Color) -> bool {
    pos.count(us, PAWN) == 0
        && pos.non_pawn_material_c(us) == QueenValueMg
        && pos.count(us, QUEEN) == 1
        && pos.count(!us, ROOK) == 1
        && pos.count(!us, PAWN) >= 1
}

// imbalance() calculates the imbalance by comparing the piece counts of
// both colors, using Tord Romstad's second-degree polynomial.
fn imbalance(pc: &[[i32; 6]; 2], us: Color) -> i32 {
    let them = !us;

    let mut bonus = 0;

    for pt1 in 0..6 {
        if pc[us.0 as usize][pt1] == 0 {
            continue;
        }

        let mut v = 0;

        for pt2 in 0..=pt1 {
            v += QUADRATIC_OURS[pt1][pt2] * pc[us.0 as usize][pt2]
                + QUADRATIC_THEIRS[pt1][pt2] * pc[them.0 as usize][pt2];
        }

        bonus += pc[us.0 as usize][pt1] * v;
    }

    bonus
}

// The material table is a caller-owned hash cache: one per evaluator (and
// so per search thread). Entries are recomputed when a new material key
// hashes to an occupied slot.
pub struct Table {
    entries: Vec<Entry>,
}

impl Table {
    pub fn new() -> Table {
        Table {
            entries: (0..TABLE_SIZE).map(|_| Entry::new()).collect(),
        }
    }

    pub fn probe(&mut self, pos: &Position) -> &mut Entry {
        let key = pos.material_key();
        let e = &mut self.entries[(key.0 & (TABLE_SIZE as u64 - 1)) as usize];

        if e.key == key {
            return e;
        }

        e.key = key;
        e.evaluation_function = None;
        e.scaling_function = [None; 2];
        e.factor = [ScaleFactor::NORMAL.0 as u8; 2];
        e.value = 0;

        // Map total non-pawn material into [PHASE_ENDGAME, PHASE_MIDGAME]
        let npm_w = pos.non_pawn_material_c(WHITE);
        let npm_b = pos.non_pawn_material_c(BLACK);
        let npm = std::cmp::max(
            ENDGAME_LIMIT,
            std::cmp::min(npm_w + npm_b, MIDGAME_LIMIT),
        );
        e.game_phase = ((npm - ENDGAME_LIMIT) * PHASE_MIDGAME) / (MIDGAME_LIMIT - ENDGAME_LIMIT);

        // Specialized evaluations and scalings encode standard-chess
        // endgame knowledge; the variants keep the generic path.
        if pos.variant() == Variant::Chess {
            for &c in &[WHITE, BLACK] {
                if is_kxk(pos, c) {
                    e.evaluation_function = Some(endgame::evaluate_kxk as EvalFn);
                    e.eval_side = c;
                    return e;
                }
            }

            for &c in &[WHITE, BLACK] {
                if is_kbpsk(pos, c) {
                    e.scaling_function[c.0 as usize] = Some(endgame::scale_kbpsk as ScaleFn);
                } else if is_kqkrps(pos, c) {
                    e.scaling_function[c.0 as usize] = Some(endgame::scale_kqkrps as ScaleFn);
                }
            }

            // Zero or just one pawn makes it difficult to win, even with a
            // small material advantage. This catches trivial draws like KK,
            // KBK and KNK and gives a drawish factor for KRKBP-like cases.
            if pos.count(WHITE, PAWN) == 0 && npm_w - npm_b <= BishopValueMg {
                e.factor[WHITE.0 as usize] = if npm_w < RookValueMg {
                    ScaleFactor::DRAW.0 as u8
                } else if npm_b <= BishopValueMg {
                    4
                } else {
                    14
                };
            }

            if pos.count(BLACK, PAWN) == 0 && npm_b - npm_w <= BishopValueMg {
                e.factor[BLACK.0 as usize] = if npm_b < RookValueMg {
                    ScaleFactor::DRAW.0 as u8
                } else if npm_w <= BishopValueMg {
                    4
                } else {
                    14
                };
            }

            if pos.count(WHITE, PAWN) == 1 && npm_w - npm_b <= BishopValueMg {
                e.factor[WHITE.0 as usize] = ScaleFactor::ONEPAWN.0 as u8;
            }

            if pos.count(BLACK, PAWN) == 1 && npm_b - npm_w <= BishopValueMg {
                e.factor[BLACK.0 as usize] = ScaleFactor::ONEPAWN.0 as u8;
            }
        }

        // Evaluate the material imbalance. The bishop-pair slot acts as an
        // extended piece type.
        let pc = [
            [
                (pos.count(WHITE, BISHOP) > 1) as i32,
                pos.count(WHITE, PAWN),
                pos.count(WHITE, KNIGHT),
                pos.count(WHITE, BISHOP),
                pos.count(WHITE, ROOK),
                pos.count(WHITE, QUEEN),
            ],
            [
                (pos.count(BLACK, BISHOP) > 1) as i32,
                pos.count(BLACK, PAWN),
                pos.count(BLACK, KNIGHT),
                pos.count(BLACK, BISHOP),
                pos.count(BLACK, ROOK),
                pos.count(BLACK, QUEEN),
            ],
        ];

        e.value = ((imbalance(&pc, WHITE) - imbalance(&pc, BLACK)) / 16) as i16;

        e
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str, v: Variant) -> Position {
        let mut p = Position::new();
        p.set(fen, v, false);
        p
    }

    #[test]
    fn startpos_is_balanced_and_midgame() {
        let p = pos(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            Variant::Chess,
        );
        let mut table = Table::new();
        let e = table.probe(&p);
        assert_eq!(e.imbalance(), Score::ZERO);
        assert_eq!(e.game_phase(), PHASE_MIDGAME);
        assert!(!e.specialized_eval_exists());
    }

    #[test]
    fn kxk_installs_a_specialized_eval() {
        let p = pos("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1", Variant::Chess);
        let mut table = Table::new();
        let e = table.probe(&p);
        assert!(e.specialized_eval_exists());
        assert!(e.evaluate(&p) > Value::KNOWN_WIN);
    }

    #[test]
    fn kxk_is_not_installed_for_atomic() {
        let p = pos("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1", Variant::Atomic);
        let mut table = Table::new();
        let e = table.probe(&p);
        assert!(!e.specialized_eval_exists());
    }

    #[test]
    fn bishop_pair_is_worth_something() {
        let two_bishops = pos("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1", Variant::Chess);
        let bishop_knight = pos("4k3/8/8/8/8/8/8/2B1KN2 w - - 0 1", Variant::Chess);
        let mut table = Table::new();
        let pair = table.probe(&two_bishops).imbalance();
        let mixed = table.probe(&bishop_knight).imbalance();
        assert!(pair.mg() > mixed.mg());
    }

    #[test]
    fn one_pawn_configurations_use_the_onepawn_factor() {
        // Opposite-colored bishops, one pawn each
        let p = pos("4k3/3b4/8/8/7p/P7/3B4/4K3 w - - 0 1", Variant::Chess);
        let mut table = Table::new();
        let e = table.probe(&p);
        assert_eq!(e.scale_factor(&p, WHITE), ScaleFactor::ONEPAWN);
        assert_eq!(e.scale_factor(&p, BLACK), ScaleFactor::ONEPAWN);
    }
}
