// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use crate::bitboard::*;
use crate::position::Position;
use crate::types::*;

pub type EvalFn = fn(&Position, Color) -> Value;
pub type ScaleFn = fn(&Position, Color) -> ScaleFactor;

// Table used to drive the king towards the edge of the board in KX vs K.
#[rustfmt::skip]
const PUSH_TO_EDGES: [i32; 64] = [
    100, 90, 80, 70, 70, 80, 90, 100,
     90, 70, 60, 50, 50, 60, 70,  90,
     80, 60, 40, 30, 30, 40, 60,  80,
     70, 50, 30, 20, 20, 30, 50,  70,
     70, 50, 30, 20, 20, 30, 50,  70,
     80, 60, 40, 30, 30, 40, 60,  80,
     90, 70, 60, 50, 50, 60, 70,  90,
    100, 90, 80, 70, 70, 80, 90, 100,
];

// Table used to drive a piece towards another piece.
const PUSH_CLOSE: [i32; 8] = [0, 0, 100, 80, 60, 40, 20, 10];

fn verify_material(pos: &Position, c: Color, npm: Value, pawns_cnt: i32) -> bool {
    pos.non_pawn_material_c(c) == npm && pos.count(c, PAWN) == pawns_cnt
}

// Mate with KX vs K. Gives the attacking side a bonus for driving the
// defending king towards the edge of the board and for keeping the distance
// between the two kings small.
pub fn evaluate_kxk(pos: &Position, strong_side: Color) -> Value {
    let weak_side = !strong_side;

    debug_assert!(verify_material(pos, weak_side, Value::ZERO, 0));
    debug_assert!(pos.checkers() == 0);

    let winner_ksq = pos.square(strong_side, KING);
    let loser_ksq = pos.square(weak_side, KING);

    let mut result = pos.non_pawn_material_c(strong_side)
        + pos.count(strong_side, PAWN) * PawnValueEg
        + PUSH_TO_EDGES[loser_ksq.0 as usize]
        + PUSH_CLOSE[Square::distance(winner_ksq, loser_ksq) as usize];

    if pos.pieces_pp(QUEEN, ROOK) != 0
        || (pos.pieces_p(BISHOP) != 0 && pos.pieces_p(KNIGHT) != 0)
        || (pos.pieces_p(BISHOP) & !DARK_SQUARES != 0
            && pos.pieces_p(BISHOP) & DARK_SQUARES != 0)
    {
        result = std::cmp::min(result + Value::KNOWN_WIN, Value::MATE - 1);
    }

    if strong_side == pos.side_to_move() {
        result
    } else {
        -result
    }
}

// KB and one or more pawns vs K. Detects draws with a rook pawn and a
// bishop of the wrong color, and fortress draws against a pawn on B7/G7.
// Returns ScaleFactor::NONE when no draw pattern applies.
pub fn scale_kbpsk(pos: &Position, strong_side: Color) -> ScaleFactor {
    let weak_side = !strong_side;

    debug_assert!(pos.non_pawn_material_c(strong_side) == BishopValueMg);
    debug_assert!(pos.count(strong_side, PAWN) >= 1);

    let pawns = pos.pieces_cp(strong_side, PAWN);
    let pawns_file = lsb(pawns).file();

    // All pawns on a single rook file?
    if (pawns_file == FILE_A || pawns_file == FILE_H) && pawns & !file_bb(pawns_file) == 0 {
        let bishop_sq = pos.square(strong_side, BISHOP);
        let queening_sq = Square::make(pawns_file, RANK_8).relative(strong_side);
        let king_sq = pos.square(weak_side, KING);

        if opposite_colors(queening_sq, bishop_sq)
            && Square::distance(queening_sq, king_sq) <= 1
        {
            return ScaleFactor::DRAW;
        }
    }

    // All pawns on the same B or G file blocked on the seventh rank
    if (pawns_file == FILE_B || pawns_file == FILE_G)
        && pos.pieces_p(PAWN) & !file_bb(pawns_file) == 0
        && pos.non_pawn_material_c(weak_side) == Value::ZERO
        && pos.count(weak_side, PAWN) >= 1
    {
        let weak_pawn_sq = backmost_sq(weak_side, pos.pieces_cp(weak_side, PAWN));
        let strong_king_sq = pos.square(strong_side, KING);
        let weak_king_sq = pos.square(weak_side, KING);
        let bishop_sq = pos.square(strong_side, BISHOP);

        if weak_pawn_sq.relative_rank(strong_side) == RANK_7
            && pos.pieces_cp(strong_side, PAWN) & (weak_pawn_sq + pawn_push(weak_side)) != 0
            && (opposite_colors(bishop_sq, weak_pawn_sq) || pos.count(strong_side, PAWN) == 1)
        {
            let strong_king_dist = Square::distance(weak_pawn_sq, strong_king_sq);
            let weak_king_dist = Square::distance(weak_pawn_sq, weak_king_sq);

            if weak_king_sq.relative_rank(strong_side) >= RANK_7
                && weak_king_dist <= 2
                && weak_king_dist <= strong_king_dist
            {
                return ScaleFactor::DRAW;
            }
        }
    }

    ScaleFactor::NONE
}

// KQ vs KR and one or more pawns. Tests for a fortress with the rook on the
// third rank defended by a pawn.
pub fn scale_kqkrps(pos: &Position, strong_side: Color) -> ScaleFactor {
    let weak_side = !strong_side;

    debug_assert!(verify_material(pos, strong_side, QueenValueMg, 0));
    debug_assert!(pos.count(weak_side, ROOK) == 1);
    debug_assert!(pos.count(weak_side, PAWN) >= 1);

    let king_sq = pos.square(weak_side, KING);
    let rsq = pos.square(weak_side, ROOK);

    if king_sq.relative_rank(weak_side) <= RANK_2
        && pos.square(strong_side, KING).relative_rank(weak_side) >= RANK_4
        && rsq.relative_rank(weak_side) == RANK_3
        && pos.pieces_cp(weak_side, PAWN)
            & pos.attacks_from(KING, king_sq)
            & pos.attacks_from_pawn(rsq, strong_side)
            != 0
    {
        return ScaleFactor::DRAW;
    }

    ScaleFactor::NONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn pos(fen: &str) -> Position {
        let mut p = Position::new();
        p.set(fen, Variant::Chess, false);
        p
    }

    #[test]
    fn kxk_prefers_cornered_defender() {
        let cornered = pos("7k/8/5K2/8/8/8/8/1Q6 w - - 0 1");
        let central = pos("8/8/3k1K2/8/8/8/8/1Q6 w - - 0 1");
        assert!(evaluate_kxk(&cornered, WHITE) > evaluate_kxk(&central, WHITE));
        assert!(evaluate_kxk(&cornered, WHITE) > Value::KNOWN_WIN);
    }

    #[test]
    fn wrong_bishop_rook_pawn_is_a_draw() {
        // The c1 bishop does not control a8; the defending king sits there.
        let p = pos("k7/8/8/8/8/P7/8/2B3K1 w - - 0 1");
        assert_eq!(scale_kbpsk(&p, WHITE), ScaleFactor::DRAW);
    }

    #[test]
    fn right_bishop_rook_pawn_is_not_scaled() {
        // The b1 bishop shares a8's color and can chase the king away.
        let p = pos("k7/8/8/8/8/P7/8/1B4K1 w - - 0 1");
        assert_eq!(scale_kbpsk(&p, WHITE), ScaleFactor::NONE);
    }
}
