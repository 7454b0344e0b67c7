// SPDX-License-Identifier: GPL-3.0-or-later

use crate::bitboard::*;
use crate::material;
use crate::params::*;
use crate::pawns;
use crate::position::Position;
use crate::types::*;

use std::fmt::Write as _;

const CENTER: Bitboard = Bitboard(0x0000001818000000);
const QUEEN_SIDE: Bitboard = Bitboard(0x0f0f0f0f0f0f0f0f);
const CENTER_FILES: Bitboard = Bitboard(0x3c3c3c3c3c3c3c3c);
const KING_SIDE: Bitboard = Bitboard(0xf0f0f0f0f0f0f0f0);

const KING_FLANK: [Bitboard; 8] = [
    QUEEN_SIDE, QUEEN_SIDE, QUEEN_SIDE, CENTER_FILES,
    CENTER_FILES, KING_SIDE, KING_SIDE, KING_SIDE,
];

// Trace terms. The first eight slots are piece types; the named terms
// follow, matching the rows of the rendered table.
const TERM_MATERIAL: usize = 8;
const TERM_IMBALANCE: usize = 9;
const TERM_MOBILITY: usize = 10;
const TERM_THREAT: usize = 11;
const TERM_PASSED: usize = 12;
const TERM_SPACE: usize = 13;
const TERM_INITIATIVE: usize = 14;
const TERM_TOTAL: usize = 15;
const TERM_NB: usize = 16;

// A Tracer records the per-term, per-color contributions of one evaluation.
// It lives on the stack of the tracing call; the non-tracing path never
// touches one.
struct Tracer {
    scores: [[Score; 2]; TERM_NB],
}

impl Tracer {
    fn new() -> Tracer {
        Tracer {
            scores: [[Score::ZERO; 2]; TERM_NB],
        }
    }

    fn add(&mut self, term: usize, w: Score, b: Score) {
        self.scores[term][WHITE.0 as usize] = w;
        self.scores[term][BLACK.0 as usize] = b;
    }

    fn add_white(&mut self, term: usize, w: Score) {
        self.add(term, w, Score::ZERO);
    }

    fn to_cp(v: Value) -> f64 {
        f64::from(v.0) / f64::from(PawnValueEg.0)
    }

    fn row(&self, out: &mut String, name: &str, term: usize) {
        let w = self.scores[term][WHITE.0 as usize];
        let b = self.scores[term][BLACK.0 as usize];

        write!(out, "{:>15} | ", name).unwrap();

        match term {
            TERM_MATERIAL | TERM_IMBALANCE | TERM_INITIATIVE | TERM_TOTAL => {
                out.push_str("  ---   --- |   ---   --- | ");
            }
            t if t == PAWN.0 as usize => {
                out.push_str("  ---   --- |   ---   --- | ");
            }
            _ => {
                write!(
                    out,
                    "{:5.2} {:5.2} | {:5.2} {:5.2} | ",
                    Self::to_cp(w.mg()),
                    Self::to_cp(w.eg()),
                    Self::to_cp(b.mg()),
                    Self::to_cp(b.eg())
                )
                .unwrap();
            }
        }

        writeln!(
            out,
            "{:5.2} {:5.2} ",
            Self::to_cp(w.mg()) - Self::to_cp(b.mg()),
            Self::to_cp(w.eg()) - Self::to_cp(b.eg())
        )
        .unwrap();
    }

    fn render(&self, v: Value) -> String {
        let mut out = String::new();
        out.push_str("      Eval term |    White    |    Black    |    Total    \n");
        out.push_str("                |   MG    EG  |   MG    EG  |   MG    EG  \n");
        out.push_str("----------------+-------------+-------------+-------------\n");
        self.row(&mut out, "Material", TERM_MATERIAL);
        self.row(&mut out, "Imbalance", TERM_IMBALANCE);
        self.row(&mut out, "Pawns", PAWN.0 as usize);
        self.row(&mut out, "Knights", KNIGHT.0 as usize);
        self.row(&mut out, "Bishops", BISHOP.0 as usize);
        self.row(&mut out, "Rooks", ROOK.0 as usize);
        self.row(&mut out, "Queens", QUEEN.0 as usize);
        self.row(&mut out, "Mobility", TERM_MOBILITY);
        self.row(&mut out, "King safety", KING.0 as usize);
        self.row(&mut out, "Threats", TERM_THREAT);
        self.row(&mut out, "Passed pawns", TERM_PASSED);
        self.row(&mut out, "Space", TERM_SPACE);
        self.row(&mut out, "Initiative", TERM_INITIATIVE);
        out.push_str("----------------+-------------+-------------+-------------\n");
        self.row(&mut out, "Total", TERM_TOTAL);
        write!(out, "\nTotal Evaluation: {:.2} (white side)\n", Self::to_cp(v)).unwrap();
        out
    }
}

// EvalInfo contains the information computed and shared by the evaluation
// functions. One is built per call to value() and discarded on return.
struct EvalInfo<'a> {
    me: &'a material::Entry,
    pe: &'a mut pawns::Entry,
    mobility_area: [Bitboard; 2],
    mobility: [Score; 2],

    // attacked_by[color][piece type] is a bitboard representing all squares
    // attacked by a given color and piece type. The synthetic "piece types"
    // QUEEN_DIAGONAL and ALL_PIECES are also calculated.
    attacked_by: [[Bitboard; 8]; 2],

    // attacked_by2[color] are the squares attacked at least twice by a
    // given color, possibly via x-ray or by one pawn and one piece.
    attacked_by2: [Bitboard; 2],

    // king_ring[color] is the zone around the king considered by the king
    // safety evaluation: the squares adjacent to the king, extended by one
    // rank forward when the king is on its first rank. Zero when king
    // safety is disabled for this color.
    king_ring: [Bitboard; 2],

    // king_attackers_count[color] is the number of pieces of the given
    // color which attack a square in the king_ring of the enemy king.
    king_attackers_count: [i32; 2],

    // king_attackers_weight[color] is the sum of the KING_ATTACK_WEIGHTS of
    // those pieces.
    king_attackers_weight: [i32; 2],

    // king_adjacent_zone_attacks_count[color] is the number of attacks by
    // the given color to squares directly adjacent to the enemy king.
    // Pieces which attack more than one such square are counted once per
    // square.
    king_adjacent_zone_attacks_count: [i32; 2],
}

impl<'a> EvalInfo<'a> {
    fn new(me: &'a material::Entry, pe: &'a mut pawns::Entry) -> EvalInfo<'a> {
        EvalInfo {
            me,
            pe,
            mobility_area: [Bitboard(0); 2],
            mobility: [Score::ZERO; 2],
            attacked_by: [[Bitboard(0); 8]; 2],
            attacked_by2: [Bitboard(0); 2],
            king_ring: [Bitboard(0); 2],
            king_attackers_count: [0; 2],
            king_attackers_weight: [0; 2],
            king_adjacent_zone_attacks_count: [0; 2],
        }
    }
}

// initialize() computes king and pawn attacks and the king ring bitboard
// for a given color, at the beginning of the evaluation.

fn initialize<Us: ColorTrait>(pos: &Position, ei: &mut EvalInfo) {
    let us = Us::COLOR;
    let them = !us;
    let up = if us == WHITE { NORTH } else { SOUTH };
    let down = if us == WHITE { SOUTH } else { NORTH };
    let low_ranks = if us == WHITE {
        RANK2_BB | RANK3_BB
    } else {
        RANK7_BB | RANK6_BB
    };

    // Our pawns on the first two ranks and those which are blocked
    let b = pos.pieces_cp(us, PAWN) & (pos.pieces().shift(down) | low_ranks);

    // Squares occupied by those pawns, by our king, or controlled by enemy
    // pawns are excluded from the mobility area. In Anti the whole board
    // counts.
    if pos.is_anti() {
        ei.mobility_area[us.0 as usize] = ALL_SQUARES;
    } else {
        let ksq = pos.square(us, KING);
        let king_bb = if ksq == Square::NONE {
            Bitboard(0)
        } else {
            ksq.bb()
        };
        ei.mobility_area[us.0 as usize] = !(b | king_bb | ei.pe.pawn_attacks(them));
    }

    // Initialize the attack bitboards with the king and pawn information.
    // Anti and Extinction allow several kings; a Horde side may have none.
    let b = if pos.is_anti() || pos.is_extinction() {
        let mut attacks = Bitboard(0);
        for &ksq in pos.squares(us, KING) {
            attacks |= pos.attacks_from(KING, ksq);
        }
        attacks
    } else {
        let ksq = pos.square(us, KING);
        if ksq == Square::NONE {
            Bitboard(0)
        } else {
            pos.attacks_from(KING, ksq)
        }
    };
    ei.attacked_by[us.0 as usize][KING.0 as usize] = b;
    ei.attacked_by[us.0 as usize][PAWN.0 as usize] = ei.pe.pawn_attacks(us);

    ei.attacked_by2[us.0 as usize] = b & ei.pe.pawn_attacks(us);
    ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize] = b | ei.pe.pawn_attacks(us);

    // Init our king safety tables only if we are going to use them
    if (!pos.is_anti()
        && !pos.is_extinction()
        && pos.non_pawn_material_c(them) >= RookValueMg + KnightValueMg)
        || pos.is_house()
    {
        ei.king_ring[us.0 as usize] = b;
        let ksq = pos.square(us, KING);
        if ksq != Square::NONE && ksq.relative_rank(us) == RANK_1 {
            ei.king_ring[us.0 as usize] |= b.shift(up);
        }

        ei.king_attackers_count[them.0 as usize] =
            popcount(b & ei.pe.pawn_attacks(them)) as i32;
        ei.king_adjacent_zone_attacks_count[them.0 as usize] = 0;
        ei.king_attackers_weight[them.0 as usize] = 0;
    } else {
        ei.king_ring[us.0 as usize] = Bitboard(0);
        ei.king_attackers_count[them.0 as usize] = 0;
    }
}

// evaluate_pieces() assigns bonuses and penalties to the pieces of a given
// color and type.

fn evaluate_pieces<Us: ColorTrait, Pt: PieceTypeTrait>(
    pos: &Position,
    ei: &mut EvalInfo,
) -> Score {
    let us = Us::COLOR;
    let pt = Pt::TYPE;
    let them = !us;
    let v = pos.variant().index();
    let outpost_ranks = if us == WHITE {
        RANK4_BB | RANK5_BB | RANK6_BB
    } else {
        RANK5_BB | RANK4_BB | RANK3_BB
    };

    let mut score = Score::ZERO;

    ei.attacked_by[us.0 as usize][pt.0 as usize] = Bitboard(0);

    if pt == QUEEN {
        ei.attacked_by[us.0 as usize][QUEEN_DIAGONAL.0 as usize] = Bitboard(0);
    }

    for &s in pos.squares(us, pt) {
        // Find attacked squares, including x-ray attacks for bishops and
        // rooks
        let mut b = match pt {
            BISHOP => attacks_bb(BISHOP, s, pos.pieces() ^ pos.pieces_p(QUEEN)),
            ROOK => attacks_bb(
                ROOK,
                s,
                pos.pieces() ^ pos.pieces_p(QUEEN) ^ pos.pieces_cp(us, ROOK),
            ),
            _ => pos.attacks_from(pt, s),
        };

        if pos.is_grid() {
            b &= !pos.grid_bb(s);
        }

        if pos.pinned_pieces(us) & s != 0 {
            b &= line_bb(pos.square(us, KING), s);
        }

        ei.attacked_by2[us.0 as usize] |=
            ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize] & b;
        ei.attacked_by[us.0 as usize][pt.0 as usize] |= b;
        ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize] |= b;

        if pt == QUEEN {
            ei.attacked_by[us.0 as usize][QUEEN_DIAGONAL.0 as usize] |=
                b & pseudo_attacks(BISHOP, s);
        }

        if b & ei.king_ring[them.0 as usize] != 0 {
            ei.king_attackers_count[us.0 as usize] += 1;
            ei.king_attackers_weight[us.0 as usize] += KING_ATTACK_WEIGHTS[v][pt.0 as usize];
            ei.king_adjacent_zone_attacks_count[us.0 as usize] +=
                popcount(b & ei.attacked_by[them.0 as usize][KING.0 as usize]) as i32;
        }

        let mob = popcount(b & ei.mobility_area[us.0 as usize]);

        ei.mobility[us.0 as usize] += MOBILITY_BONUS[v][(pt.0 - 2) as usize][mob as usize];

        // Nothing below applies to the capture-forced games, and the horde
        // side has no king to protect.
        if pos.is_anti() {
            continue;
        }

        if !pos.is_horde_color(us) {
            // Bonus for this piece as a king protector
            score += KING_PROTECTOR[(pt.0 - 2) as usize]
                * Square::distance(s, pos.square(us, KING)) as i32;
        }

        if pt == BISHOP || pt == KNIGHT {
            // Bonus for outpost squares
            let mut bb = outpost_ranks & !ei.pe.pawn_attacks_span(them);
            if bb & s != 0 {
                score += OUTPOST[(pt == BISHOP) as usize]
                    [(ei.attacked_by[us.0 as usize][PAWN.0 as usize] & s != 0) as usize]
                    * 2;
            } else {
                bb &= b & !pos.pieces_c(us);
                if bb != 0 {
                    score += OUTPOST[(pt == BISHOP) as usize]
                        [(ei.attacked_by[us.0 as usize][PAWN.0 as usize] & bb != 0) as usize];
                }
            }

            // Bonus when behind a pawn
            if s.relative_rank(us) < RANK_5 && pos.pieces_p(PAWN) & (s + pawn_push(us)) != 0 {
                score += MINOR_BEHIND_PAWN;
            }

            if pt == BISHOP {
                // Penalty for pawns on the same color square as the bishop
                score -= BISHOP_PAWNS * ei.pe.pawns_on_same_color_squares(us, s);

                // Bonus for a bishop on a long diagonal which can "see"
                // both center squares
                if more_than_one(CENTER & (attacks_bb(BISHOP, s, pos.pieces_p(PAWN)) | s)) {
                    score += LONG_RANGED_BISHOP;
                }
            }

            // An important Chess960 pattern: a cornered bishop blocked by
            // a friendly pawn diagonally in front of it is a very serious
            // problem, especially when that pawn is also blocked.
            if pt == BISHOP
                && pos.is_chess960()
                && (s == Square::A1.relative(us) || s == Square::H1.relative(us))
            {
                let d = pawn_push(us) + if s.file() == FILE_A { EAST } else { WEST };
                if pos.piece_on(s + d) == Piece::make(us, PAWN) {
                    score -= if !pos.empty(s + d + pawn_push(us)) {
                        TRAPPED_BISHOP_A1H1 * 4
                    } else if pos.piece_on(s + d + d) == Piece::make(us, PAWN) {
                        TRAPPED_BISHOP_A1H1 * 2
                    } else {
                        TRAPPED_BISHOP_A1H1
                    };
                }
            }
        }

        if pt == ROOK {
            // Bonus for aligning with enemy pawns on the same rank/file
            if s.relative_rank(us) >= RANK_5 {
                score += ROOK_ON_PAWN
                    * popcount(pos.pieces_cp(them, PAWN) & pseudo_attacks(ROOK, s)) as i32;
            }

            // Bonus when on an open or semi-open file
            if ei.pe.semiopen_file(us, s.file()) != 0 {
                score +=
                    ROOK_ON_FILE[(ei.pe.semiopen_file(them, s.file()) != 0) as usize];
            }
            // Penalty when trapped by the king, even more if the king
            // cannot castle
            else if mob <= 3 {
                let ksq = pos.square(us, KING);

                if ksq != Square::NONE
                    && (ksq.file() < FILE_E) == (s.file() < ksq.file())
                    && ei.pe.semiopen_side(us, ksq.file(), s.file() < ksq.file()) == 0
                {
                    score -= (TRAPPED_ROOK - Score::make(mob as i32 * 22, 0))
                        * (1 + !pos.can_castle(us) as i32);
                }
            }
        }

        if pt == QUEEN {
            // Penalty if any relative pin or discovered attack against the
            // queen
            let mut pinners = Bitboard(0);
            if pos.slider_blockers(pos.pieces_cpp(them, ROOK, BISHOP), s, &mut pinners) != 0 {
                score -= WEAK_QUEEN;
            }
        }
    }

    score
}

// evaluate_king() assigns bonuses and penalties to a king of a given color.

fn evaluate_king<Us: ColorTrait>(pos: &Position, ei: &mut EvalInfo) -> Score {
    let us = Us::COLOR;
    let them = !us;
    let v = pos.variant().index();
    let camp = if us == WHITE {
        ALL_SQUARES ^ RANK6_BB ^ RANK7_BB ^ RANK8_BB
    } else {
        ALL_SQUARES ^ RANK1_BB ^ RANK2_BB ^ RANK3_BB
    };

    let ksq = pos.square(us, KING);
    if ksq == Square::NONE {
        return Score::ZERO;
    }

    // King shelter and enemy pawns storm
    let mut score = ei.pe.king_safety::<Us>(pos, ksq);

    // Main king safety evaluation
    if ei.king_attackers_count[them.0 as usize] > 1 - pos.count(them, QUEEN) {
        // Attacked squares defended at most once by our queen or king. In
        // Atomic, undefended enemy pieces next to our king are weaknesses
        // too, and a defense by the queen alone does not count.
        let weak = if pos.is_atomic() {
            (ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                | (pos.pieces_c(them) ^ pos.pieces_cp(them, KING)))
                & (ei.attacked_by[us.0 as usize][KING.0 as usize]
                    | (ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
                        & !ei.attacked_by2[us.0 as usize])
                    | !ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize])
        } else {
            ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                & !ei.attacked_by2[us.0 as usize]
                & (ei.attacked_by[us.0 as usize][KING.0 as usize]
                    | ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
                    | !ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize])
        };

        let mut king_danger = 0i32;
        let mut unsafe_checks = Bitboard(0);

        // Analyse the safe enemy checks which are possible on the next
        // move
        let mut safe = !pos.pieces_c(them)
            & (!ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize]
                | (weak & ei.attacked_by2[them.0 as usize]));
        if pos.is_atomic() {
            safe |= ei.attacked_by[us.0 as usize][KING.0 as usize];
        }

        // Queen drops land on weak empty squares
        let h = if pos.is_house() && pos.count_in_hand(them, QUEEN) > 0 {
            weak & !pos.pieces()
        } else {
            Bitboard(0)
        };

        // Squares defended by our queen or king only; drop targets are
        // safe there as well
        let dqko = !ei.attacked_by2[us.0 as usize]
            & (ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
                | ei.attacked_by[us.0 as usize][KING.0 as usize]);
        let drop_safe = (safe
            | (ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] & dqko))
            & !pos.pieces_c(us);

        let b1 = attacks_bb(ROOK, ksq, pos.pieces() ^ pos.pieces_cp(us, QUEEN));
        let b2 = attacks_bb(BISHOP, ksq, pos.pieces() ^ pos.pieces_cp(us, QUEEN));

        // Enemy queen safe checks
        if (b1 | b2)
            & (h | ei.attacked_by[them.0 as usize][QUEEN.0 as usize])
            & safe
            & !ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
            != 0
        {
            king_danger += QUEEN_SAFE_CHECK;
        }

        // After a first check, any further checking square works
        if pos.is_three_check() && pos.checks_given(them) > 0 {
            safe = !pos.pieces_c(them);
        }

        // Enemy rook checks
        let h = if pos.is_house() && pos.count_in_hand(them, ROOK) > 0 {
            !pos.pieces()
        } else {
            Bitboard(0)
        };
        if b1
            & ((ei.attacked_by[them.0 as usize][ROOK.0 as usize] & safe) | (h & drop_safe))
            != 0
        {
            king_danger += ROOK_SAFE_CHECK;
        } else {
            unsafe_checks |= b1 & (ei.attacked_by[them.0 as usize][ROOK.0 as usize] | h);
        }

        // Enemy bishop checks
        let h = if pos.is_house() && pos.count_in_hand(them, BISHOP) > 0 {
            !pos.pieces()
        } else {
            Bitboard(0)
        };
        if b2
            & ((ei.attacked_by[them.0 as usize][BISHOP.0 as usize] & safe) | (h & drop_safe))
            != 0
        {
            king_danger += BISHOP_SAFE_CHECK;
        } else {
            unsafe_checks |= b2 & (ei.attacked_by[them.0 as usize][BISHOP.0 as usize] | h);
        }

        // Enemy knight checks
        let b = pos.attacks_from(KNIGHT, ksq);
        let h = if pos.is_house() && pos.count_in_hand(them, KNIGHT) > 0 {
            !pos.pieces()
        } else {
            Bitboard(0)
        };
        if b & ((ei.attacked_by[them.0 as usize][KNIGHT.0 as usize] & safe) | (h & drop_safe))
            != 0
        {
            king_danger += KNIGHT_SAFE_CHECK;
        } else {
            unsafe_checks |= b & (ei.attacked_by[them.0 as usize][KNIGHT.0 as usize] | h);
        }

        // Unsafe or occupied checking squares are counted too, as long as
        // the square is in the attacker's mobility area.
        unsafe_checks &= ei.mobility_area[them.0 as usize];

        let kdp = &KING_DANGER_PARAMS[v];
        king_danger += ei.king_attackers_count[them.0 as usize]
            * ei.king_attackers_weight[them.0 as usize]
            + kdp[0] * ei.king_adjacent_zone_attacks_count[them.0 as usize]
            + kdp[1] * popcount(ei.king_ring[us.0 as usize] & weak) as i32
            + kdp[2] * popcount(pos.pinned_pieces(us) | unsafe_checks) as i32
            + kdp[3] * (pos.count(them, QUEEN) == 0) as i32
            + kdp[4] * score.mg().0 / 8
            + kdp[5];

        if pos.is_house() {
            king_danger +=
                KING_DANGER_IN_HAND[ALL_PIECES.0 as usize] * pos.count_in_hand(them, ALL_PIECES);
            for pt in &[PAWN, KNIGHT, BISHOP, ROOK, QUEEN] {
                king_danger += KING_DANGER_IN_HAND[pt.0 as usize] * pos.count_in_hand(them, *pt);
            }
        }

        if pos.is_atomic() {
            king_danger += INDIRECT_KING_ATTACK
                * popcount(
                    pos.attacks_from(KING, ksq)
                        & pos.pieces_c(us)
                        & ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize],
                ) as i32;
            score -= Score::make(100, 100)
                * popcount(ei.attacked_by[us.0 as usize][KING.0 as usize] & pos.pieces()) as i32;
        }

        // Transform the king_danger units into a Score and subtract it
        // from the evaluation
        if king_danger > 0 {
            if pos.is_three_check() {
                king_danger = THREE_CHECK_KS_FACTORS
                    [std::cmp::min(pos.checks_given(them), 3) as usize]
                    * king_danger
                    / 256;
            }
            let mut vd = king_danger * king_danger / 4096;
            if pos.is_atomic() && vd > QueenValueMg.0 {
                vd = QueenValueMg.0;
            }
            if pos.is_house() && us == pos.side_to_move() {
                vd -= vd / 10;
            }
            if (pos.is_house() || pos.is_three_check()) && vd > QueenValueMg.0 {
                vd = QueenValueMg.0;
            }
            score -= Score::make(vd, king_danger / 16 + kdp[6] * vd / 256);
        }
    }

    // King tropism: first, find squares that the opponent attacks in our
    // king flank
    let kf = ksq.file();
    let b = ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] & KING_FLANK[kf as usize] & camp;

    debug_assert!(((if us == WHITE { b << 4 } else { b >> 4 }) & b) == 0);
    debug_assert!(popcount(if us == WHITE { b << 4 } else { b >> 4 }) == popcount(b));

    // Second, add the squares which are attacked twice in that flank and
    // which are not defended by our pawns.
    let b = (if us == WHITE { b << 4 } else { b >> 4 })
        | (b & ei.attacked_by2[them.0 as usize]
            & !ei.attacked_by[us.0 as usize][PAWN.0 as usize]);

    score -= CLOSE_ENEMIES[v] * popcount(b) as i32;

    // Penalty when our king is on a pawnless flank
    if pos.pieces_p(PAWN) & KING_FLANK[kf as usize] == 0 {
        score -= PAWNLESS_FLANK;
    }

    score
}

// evaluate_threats() assigns bonuses according to the types of the
// attacking and the attacked pieces. Anti and Losers invert the logic:
// being able to capture is a liability there.

fn evaluate_threats<Us: ColorTrait>(pos: &Position, ei: &EvalInfo) -> Score {
    let us = Us::COLOR;
    let them = !us;
    let up = if us == WHITE { NORTH } else { SOUTH };
    let left = if us == WHITE { NORTH_WEST } else { SOUTH_EAST };
    let right = if us == WHITE { NORTH_EAST } else { SOUTH_WEST };
    let trank3bb = if us == WHITE { RANK3_BB } else { RANK6_BB };

    let mut score = Score::ZERO;

    if pos.is_anti() || pos.is_losers() {
        let trank2bb = if us == WHITE { RANK2_BB } else { RANK7_BB };
        let (attacks, threats) = if pos.is_anti() {
            (&ATTACKS_ANTI, &THREATS_ANTI)
        } else {
            (&ATTACKS_LOSERS, &THREATS_LOSERS)
        };

        let we_capture =
            ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize] & pos.pieces_c(them) != 0;
        let they_capture =
            ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] & pos.pieces_c(us) != 0;

        // Penalties for possible captures
        if we_capture {
            // Penalty if we only attack unprotected pieces
            let they_defended = ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize]
                & pos.pieces_c(them)
                & ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                != 0;
            for pt in 1..=6usize {
                let attacked = ei.attacked_by[us.0 as usize][pt] & pos.pieces_c(them);
                if attacked & !ei.attacked_by2[us.0 as usize] != 0 {
                    score -= attacks[they_capture as usize][they_defended as usize][pt];
                } else if attacked != 0 {
                    score -= attacks[they_capture as usize][they_defended as usize][0];
                }
            }
            // If both colors attack pieces, increase the penalty with our
            // piece count
            if pos.is_anti() && they_capture {
                score -= PIECE_COUNT_ANTI * pos.count(us, ALL_PIECES);
            }
        }

        // Bonus if we threaten to force captures, ignoring discoveries
        if !we_capture || they_capture {
            let b = pos.pieces_cp(us, PAWN);
            let pawn_pushes =
                (b | ((b & trank2bb).shift(up) & !pos.pieces())).shift(up) & !pos.pieces();
            let piece_moves = (ei.attacked_by[us.0 as usize][KNIGHT.0 as usize]
                | ei.attacked_by[us.0 as usize][BISHOP.0 as usize]
                | ei.attacked_by[us.0 as usize][ROOK.0 as usize]
                | ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
                | ei.attacked_by[us.0 as usize][KING.0 as usize])
                & !pos.pieces();
            let all_threats = pawn_pushes | piece_moves;
            let unprotected_pawn_pushes =
                pawn_pushes & !ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize];
            let unprotected_piece_moves = piece_moves & !ei.attacked_by2[us.0 as usize];
            let safe_threats = unprotected_pawn_pushes | unprotected_piece_moves;

            score += threats[0]
                * popcount(
                    ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] & all_threats,
                ) as i32;
            score += threats[1]
                * popcount(
                    ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] & safe_threats,
                ) as i32;
        }

        return score;
    }

    if pos.is_atomic() {
        return score;
    }

    // Non-pawn enemies attacked by a pawn
    let weak = (pos.pieces_c(them) ^ pos.pieces_cp(them, PAWN))
        & ei.attacked_by[us.0 as usize][PAWN.0 as usize];

    if weak != 0 {
        let b = pos.pieces_cp(us, PAWN)
            & (!ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                | ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize]);

        let safe_threats = (b.shift(right) | b.shift(left)) & weak;

        score += THREAT_BY_SAFE_PAWN * popcount(safe_threats) as i32;

        if weak ^ safe_threats != 0 {
            score += THREAT_BY_HANGING_PAWN;
        }
    }

    // Squares strongly protected by the opponent: either attacked by a
    // pawn, or attacked twice while we attack them at most once.
    let strongly_protected = ei.attacked_by[them.0 as usize][PAWN.0 as usize]
        | (ei.attacked_by2[them.0 as usize] & !ei.attacked_by2[us.0 as usize]);

    // Non-pawn enemies, strongly protected
    let defended = (pos.pieces_c(them) ^ pos.pieces_cp(them, PAWN)) & strongly_protected;

    // Enemies not strongly protected and under our attack
    let weak = pos.pieces_c(them)
        & !strongly_protected
        & ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize];

    // Add a bonus according to the kind of attacking pieces
    if defended | weak != 0 {
        let b = (defended | weak)
            & (ei.attacked_by[us.0 as usize][KNIGHT.0 as usize]
                | ei.attacked_by[us.0 as usize][BISHOP.0 as usize]);
        for s in b {
            score += THREAT_BY_MINOR[pos.piece_on(s).piece_type().0 as usize];
            if pos.piece_on(s).piece_type() != PAWN {
                score += THREAT_BY_RANK * s.relative_rank(them) as i32;
            }
        }

        let b = (pos.pieces_cp(them, QUEEN) | weak)
            & ei.attacked_by[us.0 as usize][ROOK.0 as usize];
        for s in b {
            score += THREAT_BY_ROOK[pos.piece_on(s).piece_type().0 as usize];
            if pos.piece_on(s).piece_type() != PAWN {
                score += THREAT_BY_RANK * s.relative_rank(them) as i32;
            }
        }

        score += HANGING
            * popcount(weak & !ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]) as i32;

        let b = weak & ei.attacked_by[us.0 as usize][KING.0 as usize];
        if b != 0 {
            score += THREAT_BY_KING[more_than_one(b) as usize];
        }
    }

    // Bonus for opponent unopposed weak pawns
    if pos.pieces_cpp(us, ROOK, QUEEN) != 0 {
        score += WEAK_UNOPPOSED_PAWN * ei.pe.weak_unopposed(them);
    }

    // Find squares where our pawns can push on the next move
    let mut b = pos.pieces_cp(us, PAWN).shift(up) & !pos.pieces();
    b |= (b & trank3bb).shift(up) & !pos.pieces();

    // Keep only the squares which are not completely unsafe
    b &= !ei.attacked_by[them.0 as usize][PAWN.0 as usize]
        & (ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize]
            | !ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]);

    // Add a bonus for each new pawn threat from those squares
    let b = (b.shift(left) | b.shift(right))
        & pos.pieces_c(them)
        & !ei.attacked_by[us.0 as usize][PAWN.0 as usize];

    score += THREAT_BY_PAWN_PUSH * popcount(b) as i32;

    if pos.is_three_check() {
        score += CHECKS_GIVEN_BONUS[std::cmp::min(pos.checks_given(us), 3) as usize];
    }

    // Bonus according to how close we are to breaking through the horde's
    // pawn wall
    if pos.is_horde() && pos.is_horde_color(them) && pos.pieces_cpp(us, ROOK, QUEEN) != 0 {
        let mut min_wall = 8;
        if (ei.attacked_by[us.0 as usize][QUEEN.0 as usize]
            | ei.attacked_by[us.0 as usize][ROOK.0 as usize])
            & rank_bb(RANK_1)
            != 0
        {
            min_wall = 0;
        } else {
            for f in FILE_A..=FILE_H {
                let pawns = popcount(pos.pieces_cp(them, PAWN) & file_bb(f)) as i32;
                let pawns_l = if f > FILE_A {
                    std::cmp::min(
                        popcount(pos.pieces_cp(them, PAWN) & file_bb(f - 1)) as i32,
                        pawns,
                    )
                } else {
                    0
                };
                let pawns_r = if f < FILE_H {
                    std::cmp::min(
                        popcount(pos.pieces_cp(them, PAWN) & file_bb(f + 1)) as i32,
                        pawns,
                    )
                } else {
                    0
                };
                min_wall = std::cmp::min(min_wall, pawns_l + pawns_r);
            }
        }
        score += THREAT_BY_HANGING_PAWN * pos.count(them, PAWN)
            / (1 + min_wall)
            / if pos.pieces_cp(us, QUEEN) != 0 { 2 } else { 4 };
    }

    // Bonus for safe slider attack threats on the opponent queen
    let safe_threats = !pos.pieces_c(us)
        & !ei.attacked_by2[them.0 as usize]
        & ei.attacked_by2[us.0 as usize];
    let b = (ei.attacked_by[us.0 as usize][BISHOP.0 as usize]
        & ei.attacked_by[them.0 as usize][QUEEN_DIAGONAL.0 as usize])
        | (ei.attacked_by[us.0 as usize][ROOK.0 as usize]
            & ei.attacked_by[them.0 as usize][QUEEN.0 as usize]
            & !ei.attacked_by[them.0 as usize][QUEEN_DIAGONAL.0 as usize]);

    score += THREAT_BY_ATTACK_ON_QUEEN * popcount(b & safe_threats) as i32;

    score
}

// evaluate_passed_pawns() evaluates the passed pawns and candidate passed
// pawns of the given color. Race replaces the whole term with a bonus for
// the king's remaining safe distance to the eighth rank, and KoTH adds the
// center-proximity bonus here.

fn evaluate_passed_pawns<Us: ColorTrait>(pos: &Position, ei: &EvalInfo) -> Score {
    let us = Us::COLOR;
    let them = !us;
    let up = if us == WHITE { NORTH } else { SOUTH };
    let v = pos.variant().index();

    let mut score = Score::ZERO;

    if pos.is_race() {
        let ksq = pos.square(us, KING);
        let mut togo = ksq.relative_rank(BLACK) as i32;
        let kr = ksq.rank();
        for r in (kr + 1)..=RANK_8 {
            if rank_bb(r)
                & distance_ring_bb(ksq, (r - 1 - kr) as i32)
                & !ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                & !pos.pieces_c(us)
                == 0
            {
                togo += 1;
            }
        }
        return KING_RACE_BONUS[std::cmp::min(togo, 7) as usize];
    }

    if pos.is_koth() {
        let ksq = pos.square(us, KING);
        for &center in &[Square::E4, Square::D4, Square::D5, Square::E5] {
            let dist = Square::distance(ksq, center) as i32
                + popcount(pos.attackers_to(center) & pos.pieces_c(them)) as i32
                + popcount(pos.pieces_c(us) & center) as i32;
            debug_assert!(dist > 0);
            score += KOTH_DISTANCE_BONUS[std::cmp::min(dist - 1, 5) as usize];
        }
    }

    for s in ei.pe.passed_pawns(us) {
        debug_assert!(pos.pieces_cp(them, PAWN) & forward_file_bb(us, s + up) == 0);

        let bb = forward_file_bb(us, s)
            & (ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize] | pos.pieces_c(them));
        score -= HINDER_PASSED_PAWN * popcount(bb) as i32;

        let r = std::cmp::max(s.relative_rank(us) as i32 - RANK_2 as i32, 0);
        let rr = r * (r - 1);

        let mut mbonus = PASSED[v][MG][r as usize];
        let mut ebonus = PASSED[v][EG][r as usize];

        if rr != 0 {
            let block_sq = s + up;

            if pos.is_horde() {
                // Assume a horde king distance of approximately 5
                if pos.is_horde_color(us) {
                    ebonus += Square::distance(pos.square(them, KING), block_sq) as i32 * 5 * rr
                        - 10 * rr;
                } else {
                    ebonus += 25 * rr
                        - Square::distance(pos.square(us, KING), block_sq) as i32 * 2 * rr;
                }
            } else if pos.is_anti() {
                // No kings to race the pawn
            } else if pos.is_atomic() {
                ebonus += Square::distance(pos.square(them, KING), block_sq) as i32 * 5 * rr;
            } else {
                // Adjust bonus based on the kings' proximity
                ebonus += Square::distance(pos.square(them, KING), block_sq) as i32 * 5 * rr
                    - Square::distance(pos.square(us, KING), block_sq) as i32 * 2 * rr;

                // If block_sq is not the queening square, consider also a
                // second push
                if block_sq.relative_rank(us) != RANK_8 {
                    ebonus -=
                        Square::distance(pos.square(us, KING), block_sq + up) as i32 * rr;
                }
            }

            // If the pawn is free to advance, increase the bonus
            if pos.empty(block_sq) {
                // If there is a rook or queen attacking/defending the pawn
                // from behind, consider all the squares to queen.
                // Otherwise consider only the squares in the pawn's path
                // attacked or occupied by the enemy.
                let mut defended_squares = forward_file_bb(us, s);
                let mut unsafe_squares = defended_squares;
                let squares_to_queen = defended_squares;

                let bb = forward_file_bb(them, s)
                    & pos.pieces_pp(ROOK, QUEEN)
                    & pos.attacks_from(ROOK, s);

                if pos.pieces_c(us) & bb == 0 {
                    defended_squares &= ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize];
                }

                if pos.pieces_c(them) & bb == 0 {
                    unsafe_squares &= ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]
                        | pos.pieces_c(them);
                }

                // If there are no enemy attacks, assign a big bonus.
                // Otherwise assign a smaller bonus if the block square is
                // not attacked.
                let mut k = if unsafe_squares == 0 {
                    18
                } else if unsafe_squares & block_sq == 0 {
                    8
                } else {
                    0
                };

                // If the path to the queen is fully defended, assign a big
                // bonus. Otherwise assign a smaller bonus if the block
                // square is defended.
                if defended_squares == squares_to_queen {
                    k += 6;
                } else if defended_squares & block_sq != 0 {
                    k += 4;
                }

                mbonus += k * rr;
                ebonus += k * rr;
            } else if pos.pieces_c(us) & block_sq != 0 {
                mbonus += rr + r * 2;
                ebonus += rr + r * 2;
            }
        }

        // Scale down bonus for candidate passers which need more than one
        // pawn push to become passed, or have a pawn in front of them.
        if !pos.pawn_passed(us, s + up) || pos.pieces_p(PAWN) & forward_file_bb(us, s) != 0 {
            mbonus /= 2;
            ebonus /= 2;
        }

        score += Score::make(mbonus, ebonus) + PASSED_FILE[s.file() as usize];
    }

    score
}

// evaluate_space() computes a space bonus based on the number of safe
// squares available for minor pieces on the central four files on ranks 2
// to 4. Safe squares one, two or three squares behind a friendly pawn are
// counted twice.

fn evaluate_space<Us: ColorTrait>(pos: &Position, ei: &EvalInfo) -> Score {
    let us = Us::COLOR;
    let them = !us;
    let space_mask = if us == WHITE {
        CENTER_FILES & (RANK2_BB | RANK3_BB | RANK4_BB)
    } else {
        CENTER_FILES & (RANK7_BB | RANK6_BB | RANK5_BB)
    };

    // A square is unsafe if it is attacked by an enemy pawn, or if it is
    // undefended and attacked by an enemy piece.
    let safe = space_mask
        & !pos.pieces_cp(us, PAWN)
        & !ei.attacked_by[them.0 as usize][PAWN.0 as usize]
        & (ei.attacked_by[us.0 as usize][ALL_PIECES.0 as usize]
            | !ei.attacked_by[them.0 as usize][ALL_PIECES.0 as usize]);

    // Find all squares which are at most three squares behind some
    // friendly pawn
    let mut behind = pos.pieces_cp(us, PAWN);
    behind |= if us == WHITE { behind >> 8 } else { behind << 8 };
    behind |= if us == WHITE { behind >> 16 } else { behind << 16 };

    // Since the space mask is fully on our half of the board...
    debug_assert!((safe >> if us == WHITE { 32 } else { 0 }).0 as u32 == 0);

    // ...count safe + (behind & safe) with a single popcount.
    let bonus = popcount(
        (if us == WHITE { safe << 32 } else { safe >> 32 }) | (behind & safe),
    ) as i32;
    let weight = pos.count(us, ALL_PIECES) - 2 * ei.pe.open_files();

    if pos.is_koth() {
        return Score::make(bonus * weight * weight / 22, 0)
            + KOTH_SAFE_CENTER
                * popcount(safe & behind & (RANK4_BB | RANK5_BB) & (FILED_BB | FILEE_BB)) as i32;
    }

    Score::make(bonus * weight * weight / 16, 0)
}

// evaluate_initiative() computes the initiative correction value for the
// position: a second-order bonus or malus based on the known
// attacking/defending status of the players.

fn evaluate_initiative(pos: &Position, ei: &EvalInfo, eg: Value) -> Score {
    let king_distance = u32::distance(
        pos.square(WHITE, KING).file(),
        pos.square(BLACK, KING).file(),
    ) as i32
        - u32::distance(
            pos.square(WHITE, KING).rank(),
            pos.square(BLACK, KING).rank(),
        ) as i32;
    let both_flanks =
        pos.pieces_p(PAWN) & QUEEN_SIDE != 0 && pos.pieces_p(PAWN) & KING_SIDE != 0;

    // Compute the initiative bonus for the attacking side
    let initiative = 8 * (ei.pe.pawn_asymmetry() + king_distance - 17)
        + 12 * (pos.count(WHITE, PAWN) + pos.count(BLACK, PAWN))
        + 16 * both_flanks as i32;

    // Now apply the bonus: note that we find the attacking side by
    // extracting the sign of the endgame value, and that we carefully cap
    // the bonus so that the endgame score will never change sign after the
    // bonus.
    let v = ((eg > Value::ZERO) as i32 - (eg < Value::ZERO) as i32)
        * std::cmp::max(initiative, -eg.abs().0);

    Score::make(0, v)
}

// evaluate_scale_factor() computes the scale factor for the winning side.

fn evaluate_scale_factor(pos: &Position, ei: &EvalInfo, eg: Value) -> ScaleFactor {
    let strong_side = if eg > Value::DRAW { WHITE } else { BLACK };
    let mut sf = ei.me.scale_factor(pos, strong_side);

    // If we don't already have an unusual scale factor, check for certain
    // types of endgames and use a lower scale for those.
    if !pos.is_atomic() && (sf == ScaleFactor::NORMAL || sf == ScaleFactor::ONEPAWN) {
        if pos.opposite_bishops() {
            // Endgame with opposite-colored bishops and no other pieces
            // (ignoring pawns) is almost a draw. In case of KBP vs KB, it
            // is even more a draw.
            if pos.non_pawn_material_c(WHITE) == BishopValueMg
                && pos.non_pawn_material_c(BLACK) == BishopValueMg
            {
                return if more_than_one(pos.pieces_p(PAWN)) {
                    ScaleFactor(31)
                } else {
                    ScaleFactor(9)
                };
            }

            // Endgame with opposite-colored bishops, but also other
            // pieces. Still a bit drawish, but not as drawish as with only
            // the two bishops.
            return ScaleFactor(46);
        } else if eg.abs() <= BishopValueEg
            && pos.count(strong_side, PAWN) <= 2
            && pos.square(!strong_side, KING) != Square::NONE
            && !pos.pawn_passed(!strong_side, pos.square(!strong_side, KING))
        {
            // The weaker side's king can park in front of the pawns
            return ScaleFactor(37 + 7 * pos.count(strong_side, PAWN));
        }
    }

    if pos.is_horde() {
        let horde_color = if pos.is_horde_color(WHITE) { WHITE } else { BLACK };
        if pos.non_pawn_material_c(horde_color) >= QueenValueMg
            && !pos.is_horde_color(strong_side)
        {
            sf = ScaleFactor(10);
        }
    }

    sf
}

// The Evaluator owns what the evaluation needs besides the position: the
// material and pawn hash caches and the contempt score. One per search
// thread; dropping it releases the caches. Identical inputs (position,
// cache contents, contempt) produce identical results.
pub struct Evaluator {
    pub contempt: Score,
    material: material::Table,
    pawns: pawns::Table,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator::with_contempt(Score::ZERO)
    }

    pub fn with_contempt(contempt: Score) -> Evaluator {
        Evaluator {
            contempt,
            material: material::Table::new(),
            pawns: pawns::Table::new(),
        }
    }

    // evaluate() is the evaluator for the outer world. It returns a static
    // evaluation of the position from the point of view of the side to
    // move, including the per-variant tempo bonus.
    pub fn evaluate(&mut self, pos: &Position) -> Value {
        self.value(pos, &mut None) + TEMPO[pos.variant().index()]
    }

    // trace() is like evaluate(), but returns a string with the detailed
    // descriptions and values of each evaluation term, from white's point
    // of view. Useful for debugging.
    pub fn trace(&mut self, pos: &Position) -> String {
        let mut tracer = Tracer::new();
        let v = {
            let mut opt = Some(&mut tracer);
            self.value(pos, &mut opt) + TEMPO[pos.variant().index()]
        };
        let v = if pos.side_to_move() == WHITE { v } else { -v };
        tracer.render(v)
    }

    // value() computes the various parts of the evaluation and returns the
    // value of the position from the point of view of the side to move.
    fn value(&mut self, pos: &Position, tracer: &mut Option<&mut Tracer>) -> Value {
        debug_assert!(pos.checkers() == 0);

        // A position already decided by the variant's own rule
        if pos.is_variant_end() {
            return pos.variant_result();
        }

        // Probe the material hash table
        let me = self.material.probe(pos);

        // If we have a specialized evaluation function for the current
        // material configuration, call it and return.
        if me.specialized_eval_exists() {
            return me.evaluate(pos);
        }

        // Initialize score by reading the incrementally updated scores
        // included in the position object (material + piece square tables)
        // and the material imbalance. Score is computed internally from
        // the white point of view.
        let mut score = pos.psq_score() + me.imbalance() + self.contempt;

        // Probe the pawn hash table
        let pe = self.pawns.probe(pos);
        score += pe.pawns_score();

        // Early exit if the score is high
        let lazy = (score.mg() + score.eg()) / 2;
        if pos.variant() == Variant::Chess && lazy.abs() > LAZY_THRESHOLD {
            return if pos.side_to_move() == WHITE { lazy } else { -lazy };
        }

        // Main evaluation begins here

        let v = pos.variant().index();
        let mut ei = EvalInfo::new(me, pe);

        initialize::<White>(pos, &mut ei);
        initialize::<Black>(pos, &mut ei);

        let knights_w = evaluate_pieces::<White, Knight>(pos, &mut ei);
        let knights_b = evaluate_pieces::<Black, Knight>(pos, &mut ei);
        let bishops_w = evaluate_pieces::<White, Bishop>(pos, &mut ei);
        let bishops_b = evaluate_pieces::<Black, Bishop>(pos, &mut ei);
        let rooks_w = evaluate_pieces::<White, Rook>(pos, &mut ei);
        let rooks_b = evaluate_pieces::<Black, Rook>(pos, &mut ei);
        let queens_w = evaluate_pieces::<White, Queen>(pos, &mut ei);
        let queens_b = evaluate_pieces::<Black, Queen>(pos, &mut ei);

        score += knights_w - knights_b;
        score += bishops_w - bishops_b;
        score += rooks_w - rooks_b;
        score += queens_w - queens_b;

        score += ei.mobility[WHITE.0 as usize] - ei.mobility[BLACK.0 as usize];

        let mut king_w = Score::ZERO;
        let mut king_b = Score::ZERO;
        if !pos.is_anti() && !pos.is_extinction() && !pos.is_race() {
            king_w = evaluate_king::<White>(pos, &mut ei);
            king_b = evaluate_king::<Black>(pos, &mut ei);
            score += king_w - king_b;
        }

        let threats_w = evaluate_threats::<White>(pos, &ei);
        let threats_b = evaluate_threats::<Black>(pos, &ei);
        score += threats_w - threats_b;

        let passed_w = evaluate_passed_pawns::<White>(pos, &ei);
        let passed_b = evaluate_passed_pawns::<Black>(pos, &ei);
        score += passed_w - passed_b;

        let mut space_w = Score::ZERO;
        let mut space_b = Score::ZERO;
        if !pos.is_horde() && pos.non_pawn_material() >= SPACE_THRESHOLD[v] {
            space_w = evaluate_space::<White>(pos, &ei);
            space_b = evaluate_space::<Black>(pos, &ei);
            score += space_w - space_b;
        }

        let mut initiative = Score::ZERO;
        if !pos.is_anti() && !pos.is_horde() {
            initiative = evaluate_initiative(pos, &ei, score.eg());
            score += initiative;
        }

        // Interpolate between a middlegame and a (scaled by sf) endgame
        // score
        let sf = evaluate_scale_factor(pos, &ei, score.eg());
        let mut blended = score.mg() * ei.me.game_phase()
            + score.eg() * (PHASE_MIDGAME - ei.me.game_phase()) * sf.0 / ScaleFactor::NORMAL.0;
        blended /= PHASE_MIDGAME;

        if let Some(t) = tracer.as_deref_mut() {
            t.add_white(TERM_MATERIAL, pos.psq_score());
            t.add_white(TERM_IMBALANCE, ei.me.imbalance());
            t.add_white(PAWN.0 as usize, ei.pe.pawns_score());
            t.add(KNIGHT.0 as usize, knights_w, knights_b);
            t.add(BISHOP.0 as usize, bishops_w, bishops_b);
            t.add(ROOK.0 as usize, rooks_w, rooks_b);
            t.add(QUEEN.0 as usize, queens_w, queens_b);
            t.add(
                TERM_MOBILITY,
                ei.mobility[WHITE.0 as usize],
                ei.mobility[BLACK.0 as usize],
            );
            t.add(KING.0 as usize, king_w, king_b);
            t.add(TERM_THREAT, threats_w, threats_b);
            t.add(TERM_PASSED, passed_w, passed_b);
            t.add(TERM_SPACE, space_w, space_b);
            t.add_white(TERM_INITIATIVE, initiative);
            t.add_white(TERM_TOTAL, score);
        }

        // Side to move point of view
        if pos.side_to_move() == WHITE {
            blended
        } else {
            -blended
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const MIDGAME: &str = "r1bq1rk1/pp2ppbp/2np1np1/8/3NP3/2N1BP2/PPPQ2PP/R3KB1R w KQ - 0 9";

    fn pos(fen: &str, v: Variant) -> Position {
        let mut p = Position::new();
        p.set(fen, v, false);
        p
    }

    // Runs initialize and the four piece evaluations for both colors, then
    // hands the populated EvalInfo to the check.
    fn with_eval_info<R>(p: &Position, f: impl FnOnce(&mut EvalInfo) -> R) -> R {
        let mut mt = material::Table::new();
        let mut pwt = pawns::Table::new();
        let me = mt.probe(p);
        let pe = pwt.probe(p);
        let mut ei = EvalInfo::new(me, pe);
        initialize::<White>(p, &mut ei);
        initialize::<Black>(p, &mut ei);
        evaluate_pieces::<White, Knight>(p, &mut ei);
        evaluate_pieces::<Black, Knight>(p, &mut ei);
        evaluate_pieces::<White, Bishop>(p, &mut ei);
        evaluate_pieces::<Black, Bishop>(p, &mut ei);
        evaluate_pieces::<White, Rook>(p, &mut ei);
        evaluate_pieces::<Black, Rook>(p, &mut ei);
        evaluate_pieces::<White, Queen>(p, &mut ei);
        evaluate_pieces::<Black, Queen>(p, &mut ei);
        f(&mut ei)
    }

    #[test]
    fn startpos_evaluates_to_exactly_tempo() {
        let p = pos(STARTPOS, Variant::Chess);
        let mut ev = Evaluator::new();
        assert_eq!(ev.evaluate(&p), TEMPO[Variant::Chess.index()]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let p = pos(MIDGAME, Variant::Chess);
        let mut ev1 = Evaluator::new();
        let mut ev2 = Evaluator::new();
        let first = ev1.evaluate(&p);
        assert_eq!(first, ev1.evaluate(&p));
        assert_eq!(first, ev2.evaluate(&p));
    }

    #[test]
    fn all_pieces_attacks_are_the_union_of_piece_attacks() {
        let p = pos(MIDGAME, Variant::Chess);
        with_eval_info(&p, |ei| {
            for c in 0..2 {
                let mut union = Bitboard(0);
                for pt in [PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING] {
                    union |= ei.attacked_by[c][pt.0 as usize];
                }
                assert_eq!(ei.attacked_by[c][ALL_PIECES.0 as usize], union);

                // Squares hit by both a pawn and the king are double
                // attacks by construction.
                let pawn_and_king = ei.attacked_by[c][PAWN.0 as usize]
                    & ei.attacked_by[c][KING.0 as usize];
                assert_eq!(ei.attacked_by2[c] & pawn_and_king, pawn_and_king);
            }
        });
    }

    #[test]
    fn queen_diagonal_attacks_are_a_subset_of_queen_attacks() {
        let p = pos(MIDGAME, Variant::Chess);
        with_eval_info(&p, |ei| {
            for c in 0..2 {
                let qd = ei.attacked_by[c][QUEEN_DIAGONAL.0 as usize];
                assert_eq!(qd & ei.attacked_by[c][QUEEN.0 as usize], qd);
            }
        });
    }

    #[test]
    fn king_ring_is_disabled_for_anti() {
        let p = pos(STARTPOS, Variant::Anti);
        with_eval_info(&p, |ei| {
            for c in 0..2 {
                assert_eq!(ei.king_ring[c], Bitboard(0));
                assert_eq!(ei.king_attackers_count[c], 0);
                assert_eq!(ei.mobility_area[c], ALL_SQUARES);
            }
        });
    }

    #[test]
    fn king_ring_is_disabled_against_bare_material() {
        // The enemy cannot muster rook + knight: no king safety for either
        // side.
        let p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Variant::Chess);
        with_eval_info(&p, |ei| {
            assert_eq!(ei.king_ring[WHITE.0 as usize], Bitboard(0));
            assert_eq!(ei.king_ring[BLACK.0 as usize], Bitboard(0));
        });
    }

    #[test]
    fn king_ring_is_active_at_the_start_position() {
        let p = pos(STARTPOS, Variant::Chess);
        with_eval_info(&p, |ei| {
            assert!(ei.king_ring[WHITE.0 as usize] != 0);
            assert!(ei.king_ring[BLACK.0 as usize] != 0);
        });
    }

    #[test]
    fn lone_passed_pawn_is_scored_for_its_owner_only() {
        let p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Variant::Chess);
        with_eval_info(&p, |ei| {
            let white = evaluate_passed_pawns::<White>(&p, ei);
            let black = evaluate_passed_pawns::<Black>(&p, ei);
            assert!(white != Score::ZERO);
            assert_eq!(black, Score::ZERO);
        });
    }

    #[test]
    fn advanced_passer_is_strictly_positive() {
        let p = pos("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1", Variant::Chess);
        with_eval_info(&p, |ei| {
            let white = evaluate_passed_pawns::<White>(&p, ei);
            assert!(white.mg() > Value::ZERO);
            assert!(white.eg() > Value::ZERO);
        });
    }

    #[test]
    fn pure_opposite_bishops_with_pawns_scale_to_31() {
        let p = pos("4k3/3b4/8/8/7p/P7/3B4/4K3 w - - 0 1", Variant::Chess);
        with_eval_info(&p, |ei| {
            assert_eq!(evaluate_scale_factor(&p, ei, Value(100)), ScaleFactor(31));
        });
    }

    #[test]
    fn horde_against_heavy_horde_material_scales_to_10() {
        let p = pos("4k3/8/8/8/8/2Q5/PPPP4/8 w - - 0 1", Variant::Horde);
        assert!(p.is_horde_color(WHITE));
        with_eval_info(&p, |ei| {
            assert_eq!(evaluate_scale_factor(&p, ei, Value(-100)), ScaleFactor(10));
        });
    }

    #[test]
    fn delivered_checks_tilt_the_three_check_score() {
        let base = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -";
        let none = pos(&format!("{} 3+3 0 4", base), Variant::ThreeCheck);
        let two_by_black = pos(&format!("{} 3+1 0 4", base), Variant::ThreeCheck);
        let mut ev = Evaluator::new();
        let v_none = ev.evaluate(&none);
        let v_two = ev.evaluate(&two_by_black);
        // White to move in both; two delivered checks by black must hurt.
        assert!(v_two < v_none);
    }

    #[test]
    fn queen_in_hand_raises_king_danger() {
        let board = "5rk1/6pp/8/8/6n1/8/5PPP/6K1";
        let empty_hand = pos(&format!("{} w - - 0 1", board), Variant::Crazyhouse);
        let queen_in_hand =
            pos(&format!("{}[q] w - - 0 1", board), Variant::Crazyhouse);
        let mut ev = Evaluator::new();
        let v_empty = ev.evaluate(&empty_hand);
        let v_queen = ev.evaluate(&queen_in_hand);
        assert!(v_queen < v_empty);
    }

    #[test]
    fn lazy_exit_blends_the_material_score() {
        let p = pos("4k3/7p/8/8/8/8/PPPP4/QQQQK3 w - - 0 1", Variant::Chess);
        let mut mt = material::Table::new();
        let mut pwt = pawns::Table::new();
        let score =
            p.psq_score() + mt.probe(&p).imbalance() + pwt.probe(&p).pawns_score();
        let expected = (score.mg() + score.eg()) / 2;
        assert!(expected.abs() > LAZY_THRESHOLD);

        let mut ev = Evaluator::new();
        assert_eq!(ev.evaluate(&p), expected + TEMPO[Variant::Chess.index()]);
    }

    #[test]
    fn initiative_never_flips_the_endgame_sign() {
        let p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Variant::Chess);
        with_eval_info(&p, |ei| {
            for eg in [Value(50), Value(-50), Value(3), Value(-3)] {
                let init = evaluate_initiative(&p, ei, eg);
                assert_eq!(init.mg(), Value::ZERO);
                assert!((eg + init.eg()).0 * eg.0 >= 0);
            }
        });
    }

    #[test]
    fn grid_attacks_exclude_the_own_cell() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1";
        let chess = pos(fen, Variant::Chess);
        let grid = pos(fen, Variant::Grid);
        let chess_rook = with_eval_info(&chess, |ei| {
            ei.attacked_by[WHITE.0 as usize][ROOK.0 as usize]
        });
        let grid_rook = with_eval_info(&grid, |ei| {
            ei.attacked_by[WHITE.0 as usize][ROOK.0 as usize]
        });
        let a2 = Square::make(FILE_A, RANK_2);
        assert!(chess_rook & a2 != 0 && chess_rook & Square::B1 != 0);
        assert_eq!(grid_rook & a2, Bitboard(0));
        assert_eq!(grid_rook & Square::B1, Bitboard(0));
        assert_eq!(grid_rook, chess_rook & !grid.grid_bb(Square::A1));
    }

    #[test]
    fn atomic_contributes_no_threat_score() {
        let p = pos(MIDGAME, Variant::Atomic);
        with_eval_info(&p, |ei| {
            assert_eq!(evaluate_threats::<White>(&p, ei), Score::ZERO);
            assert_eq!(evaluate_threats::<Black>(&p, ei), Score::ZERO);
        });
    }

    #[test]
    fn race_rewards_the_king_closer_to_the_goal() {
        let near = pos("8/6K1/8/8/8/8/8/1k6 w - - 0 1", Variant::Race);
        let far = pos("8/8/8/8/8/8/6K1/1k6 w - - 0 1", Variant::Race);
        let near_bonus =
            with_eval_info(&near, |ei| evaluate_passed_pawns::<White>(&near, ei));
        let far_bonus = with_eval_info(&far, |ei| evaluate_passed_pawns::<White>(&far, ei));
        assert!(near_bonus.mg() > far_bonus.mg());
        assert!(near_bonus.eg() > far_bonus.eg());
    }

    #[test]
    fn koth_win_short_circuits_evaluation() {
        let p = pos("4k3/8/8/8/3K4/8/8/8 w - - 0 1", Variant::Koth);
        let mut ev = Evaluator::new();
        assert_eq!(
            ev.evaluate(&p),
            mate_in(0) + TEMPO[Variant::Koth.index()]
        );
    }

    #[test]
    fn trace_total_matches_evaluate() {
        for fen in [STARTPOS, MIDGAME] {
            let p = pos(fen, Variant::Chess);
            let mut ev = Evaluator::new();
            let v = ev.evaluate(&p);
            let rendered = ev.trace(&p);
            let line = rendered
                .lines()
                .find(|l| l.starts_with("Total Evaluation:"))
                .expect("trace is missing the total line");
            let total: f64 = line
                .trim_start_matches("Total Evaluation:")
                .trim()
                .trim_end_matches("(white side)")
                .trim()
                .parse()
                .unwrap();
            // White to move in both positions, so the white-side total is
            // the side-to-move value.
            assert!((total - f64::from(v.0) / f64::from(PawnValueEg.0)).abs() < 0.006);
        }
    }

    #[test]
    fn trace_lists_every_term() {
        let p = pos(MIDGAME, Variant::Chess);
        let mut ev = Evaluator::new();
        let rendered = ev.trace(&p);
        for name in [
            "Material", "Imbalance", "Pawns", "Knights", "Bishops", "Rooks", "Queens",
            "Mobility", "King safety", "Threats", "Passed pawns", "Space", "Initiative",
            "Total",
        ] {
            assert!(rendered.contains(name), "missing row {}", name);
        }
    }
}
