// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use arrayvec::ArrayVec;

use crate::bitboard::*;
use crate::psqt;
use crate::types::*;

// Zobrist keys for the pawn and material hash tables. The material key also
// mixes in the variant so that entries computed under one rule-set are never
// served to another.
pub mod zobrist {
    use once_cell::sync::Lazy;

    use crate::misc::Prng;
    use crate::types::*;

    struct Keys {
        psq: [[Key; 64]; 16],
        material: [[Key; 16]; 16],
        variant: [Key; VARIANT_NB],
    }

    static KEYS: Lazy<Box<Keys>> = Lazy::new(|| {
        let mut rng = Prng::new(1070372);
        let mut k = Box::new(Keys {
            psq: [[Key(0); 64]; 16],
            material: [[Key(0); 16]; 16],
            variant: [Key(0); VARIANT_NB],
        });
        for pc in 0..16 {
            for s in 0..64 {
                k.psq[pc][s] = Key(rng.rand64());
            }
        }
        for pc in 0..16 {
            for n in 0..16 {
                k.material[pc][n] = Key(rng.rand64());
            }
        }
        for v in 0..VARIANT_NB {
            k.variant[v] = Key(rng.rand64());
        }
        k
    });

    pub fn psq(pc: Piece, s: Square) -> Key {
        KEYS.psq[pc.0 as usize][s.0 as usize]
    }

    pub fn material(pc: Piece, num: i32) -> Key {
        KEYS.material[pc.0 as usize][num as usize]
    }

    pub fn variant(v: Variant) -> Key {
        KEYS.variant[v.index()]
    }
}

// A Position holds the piece placement and the evaluation-relevant facts
// about it: side to move, castling rights, variant identity, pocket counts
// for drop variants, delivered-check counters, and the state derived once
// at setup time (piece-square score, non-pawn material, hash keys and the
// checkers bitboard). It answers the board and attack queries the evaluator
// makes; move generation and move making live with the search, not here.
pub struct Position {
    board: [Piece; 64],
    by_color_bb: [Bitboard; 2],
    by_type_bb: [Bitboard; 8],
    piece_count: [i32; 16],
    piece_list: [ArrayVec<Square, 40>; 16],
    king_square: [Square; 2],
    in_hand: [[i32; 8]; 2],
    checks_given: [i32; 2],
    castling_rights: CastlingRight,
    ep_square: Square,
    side_to_move: Color,
    variant: Variant,
    chess960: bool,
    game_ply: i32,
    psq: Score,
    non_pawn_material: [Value; 2],
    pawn_key: Key,
    material_key: Key,
    checkers: Bitboard,
}

const PIECE_TO_CHAR: &str = " PNBRQK  pnbrqk";

const CENTER_4: Bitboard = Bitboard(0x0000001818000000);

impl Position {
    pub fn new() -> Position {
        Position {
            board: [NO_PIECE; 64],
            by_color_bb: [Bitboard(0); 2],
            by_type_bb: [Bitboard(0); 8],
            piece_count: [0; 16],
            piece_list: Default::default(),
            king_square: [Square::NONE; 2],
            in_hand: [[0; 8]; 2],
            checks_given: [0; 2],
            castling_rights: NO_CASTLING,
            ep_square: Square::NONE,
            side_to_move: WHITE,
            variant: Variant::Chess,
            chess960: false,
            game_ply: 0,
            psq: Score::ZERO,
            non_pawn_material: [Value::ZERO; 2],
            pawn_key: Key(0),
            material_key: Key(0),
            checkers: Bitboard(0),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn empty(&self, s: Square) -> bool {
        self.board[s.0 as usize] == NO_PIECE
    }

    pub fn piece_on(&self, s: Square) -> Piece {
        self.board[s.0 as usize]
    }

    pub fn pieces(&self) -> Bitboard {
        self.by_type_bb[ALL_PIECES.0 as usize]
    }

    pub fn pieces_p(&self, pt: PieceType) -> Bitboard {
        self.by_type_bb[pt.0 as usize]
    }

    pub fn pieces_pp(&self, pt1: PieceType, pt2: PieceType) -> Bitboard {
        self.pieces_p(pt1) | self.pieces_p(pt2)
    }

    pub fn pieces_c(&self, c: Color) -> Bitboard {
        self.by_color_bb[c.0 as usize]
    }

    pub fn pieces_cp(&self, c: Color, pt: PieceType) -> Bitboard {
        self.pieces_c(c) & self.pieces_p(pt)
    }

    pub fn pieces_cpp(&self, c: Color, pt1: PieceType, pt2: PieceType) -> Bitboard {
        self.pieces_c(c) & (self.pieces_p(pt1) | self.pieces_p(pt2))
    }

    pub fn count(&self, c: Color, pt: PieceType) -> i32 {
        self.piece_count[Piece::make(c, pt).0 as usize]
    }

    pub fn squares(&self, c: Color, pt: PieceType) -> &[Square] {
        &self.piece_list[Piece::make(c, pt).0 as usize]
    }

    // The square of the (first) piece of the given type, Square::NONE when
    // the side has none. Variants allow kingless sides and multiple kings.
    pub fn square(&self, c: Color, pt: PieceType) -> Square {
        if pt == KING {
            return self.king_square[c.0 as usize];
        }
        match self.piece_list[Piece::make(c, pt).0 as usize].first() {
            Some(&s) => s,
            None => Square::NONE,
        }
    }

    pub fn ep_square(&self) -> Square {
        self.ep_square
    }

    pub fn has_castling_right(&self, cr: CastlingRight) -> bool {
        self.castling_rights & cr != 0
    }

    pub fn castling_rights(&self, c: Color) -> CastlingRight {
        CastlingRight(self.castling_rights.0 & (3 << (2 * c.0)))
    }

    pub fn can_castle(&self, c: Color) -> bool {
        self.castling_rights(c) != 0
    }

    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn is_anti(&self) -> bool {
        self.variant == Variant::Anti
    }

    pub fn is_atomic(&self) -> bool {
        self.variant == Variant::Atomic
    }

    pub fn is_house(&self) -> bool {
        self.variant == Variant::Crazyhouse
    }

    pub fn is_extinction(&self) -> bool {
        self.variant == Variant::Extinction
    }

    pub fn is_grid(&self) -> bool {
        self.variant == Variant::Grid
    }

    pub fn is_horde(&self) -> bool {
        self.variant == Variant::Horde
    }

    pub fn is_koth(&self) -> bool {
        self.variant == Variant::Koth
    }

    pub fn is_losers(&self) -> bool {
        self.variant == Variant::Losers
    }

    pub fn is_race(&self) -> bool {
        self.variant == Variant::Race
    }

    pub fn is_relay(&self) -> bool {
        self.variant == Variant::Relay
    }

    pub fn is_three_check(&self) -> bool {
        self.variant == Variant::ThreeCheck
    }

    pub fn is_two_kings(&self) -> bool {
        self.variant == Variant::TwoKings
    }

    // The horde side is the one playing without a king.
    pub fn is_horde_color(&self, c: Color) -> bool {
        self.is_horde() && self.king_square[c.0 as usize] == Square::NONE
    }

    pub fn count_in_hand(&self, c: Color, pt: PieceType) -> i32 {
        self.in_hand[c.0 as usize][pt.0 as usize]
    }

    pub fn checks_given(&self, c: Color) -> i32 {
        self.checks_given[c.0 as usize]
    }

    // The 2x2 cell of the grid that contains s. In Grid chess no piece
    // attacks the squares sharing its own cell.
    pub fn grid_bb(&self, s: Square) -> Bitboard {
        let base = (s.rank() & !1) * 8 + (s.file() & !1);
        Bitboard(0x0303u64 << base)
    }

    pub fn attacks_from_pawn(&self, s: Square, c: Color) -> Bitboard {
        pawn_attacks(c, s)
    }

    pub fn attacks_from(&self, pt: PieceType, s: Square) -> Bitboard {
        debug_assert!(pt != PAWN);
        match pt {
            BISHOP | ROOK | QUEEN => attacks_bb(pt, s, self.pieces()),
            _ => pseudo_attacks(pt, s),
        }
    }

    pub fn attackers_to_occ(&self, s: Square, occupied: Bitboard) -> Bitboard {
        (pawn_attacks(BLACK, s) & self.pieces_cp(WHITE, PAWN))
            | (pawn_attacks(WHITE, s) & self.pieces_cp(BLACK, PAWN))
            | (pseudo_attacks(KNIGHT, s) & self.pieces_p(KNIGHT))
            | (attacks_bb(ROOK, s, occupied) & self.pieces_pp(ROOK, QUEEN))
            | (attacks_bb(BISHOP, s, occupied) & self.pieces_pp(BISHOP, QUEEN))
            | (pseudo_attacks(KING, s) & self.pieces_p(KING))
    }

    pub fn attackers_to(&self, s: Square) -> Bitboard {
        self.attackers_to_occ(s, self.pieces())
    }

    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    // slider_blockers() returns the pieces (of either color) that block a
    // slider attack from the given candidate sliders towards 's'. Snipers
    // pinning a piece of the same color as the one on 's' are collected in
    // 'pinners'.
    pub fn slider_blockers(
        &self,
        sliders: Bitboard,
        s: Square,
        pinners: &mut Bitboard,
    ) -> Bitboard {
        let mut blockers = Bitboard(0);
        *pinners = Bitboard(0);

        let snipers = ((pseudo_attacks(ROOK, s) & self.pieces_pp(QUEEN, ROOK))
            | (pseudo_attacks(BISHOP, s) & self.pieces_pp(QUEEN, BISHOP)))
            & sliders;

        for sniper_sq in snipers {
            let b = between_bb(s, sniper_sq) & self.pieces();
            if b != 0 && !more_than_one(b) {
                blockers |= b;
                if b & self.pieces_c(self.piece_on(s).color()) != 0 {
                    *pinners |= sniper_sq;
                }
            }
        }

        blockers
    }

    pub fn pinned_pieces(&self, c: Color) -> Bitboard {
        // No royal piece, no pins
        if self.is_anti() || self.is_extinction() {
            return Bitboard(0);
        }
        let ksq = self.king_square[c.0 as usize];
        if ksq == Square::NONE {
            return Bitboard(0);
        }
        let mut pinners = Bitboard(0);
        self.slider_blockers(self.pieces_c(!c), ksq, &mut pinners) & self.pieces_c(c)
    }

    pub fn pawn_passed(&self, c: Color, s: Square) -> bool {
        self.pieces_cp(!c, PAWN) & passed_pawn_mask(c, s) == 0
    }

    pub fn pawn_key(&self) -> Key {
        self.pawn_key
    }

    pub fn material_key(&self) -> Key {
        self.material_key
    }

    pub fn psq_score(&self) -> Score {
        self.psq
    }

    pub fn non_pawn_material_c(&self, c: Color) -> Value {
        self.non_pawn_material[c.0 as usize]
    }

    pub fn non_pawn_material(&self) -> Value {
        self.non_pawn_material[0] + self.non_pawn_material[1]
    }

    pub fn opposite_bishops(&self) -> bool {
        self.piece_count[W_BISHOP.0 as usize] == 1
            && self.piece_count[B_BISHOP.0 as usize] == 1
            && opposite_colors(self.square(WHITE, BISHOP), self.square(BLACK, BISHOP))
    }

    // is_variant_end() reports whether the variant's own winning condition
    // has already been reached; variant_result() gives the game-theoretic
    // value from the side to move's perspective. Conditions that require
    // move generation (stalemate-based wins in Anti/Losers) are left to the
    // search.
    pub fn is_variant_end(&self) -> bool {
        match self.variant {
            Variant::Atomic => self.count(WHITE, KING) == 0 || self.count(BLACK, KING) == 0,
            Variant::Anti | Variant::Losers => {
                self.count(WHITE, ALL_PIECES) == 0 || self.count(BLACK, ALL_PIECES) == 0
            }
            Variant::Extinction => self.extinct_side().is_some(),
            Variant::Horde => {
                (self.is_horde_color(WHITE) && self.count(WHITE, ALL_PIECES) == 0)
                    || (self.is_horde_color(BLACK) && self.count(BLACK, ALL_PIECES) == 0)
            }
            Variant::Koth => self.pieces_p(KING) & CENTER_4 != 0,
            Variant::Race => self.pieces_p(KING) & RANK8_BB != 0,
            Variant::ThreeCheck => self.checks_given[0] >= 3 || self.checks_given[1] >= 3,
            _ => false,
        }
    }

    pub fn variant_result(&self) -> Value {
        debug_assert!(self.is_variant_end());

        let winner = match self.variant {
            Variant::Atomic => {
                if self.count(WHITE, KING) == 0 {
                    Some(BLACK)
                } else {
                    Some(WHITE)
                }
            }
            // Shedding all pieces wins
            Variant::Anti | Variant::Losers => {
                if self.count(WHITE, ALL_PIECES) == 0 {
                    Some(WHITE)
                } else {
                    Some(BLACK)
                }
            }
            Variant::Extinction => self.extinct_side().map(|c| !c),
            Variant::Horde => {
                if self.is_horde_color(WHITE) {
                    Some(BLACK)
                } else {
                    Some(WHITE)
                }
            }
            Variant::Koth => {
                if self.pieces_cp(WHITE, KING) & CENTER_4 != 0 {
                    Some(WHITE)
                } else {
                    Some(BLACK)
                }
            }
            Variant::Race => {
                let w = self.pieces_cp(WHITE, KING) & RANK8_BB != 0;
                let b = self.pieces_cp(BLACK, KING) & RANK8_BB != 0;
                if w && b {
                    None
                } else if w {
                    Some(WHITE)
                } else {
                    Some(BLACK)
                }
            }
            Variant::ThreeCheck => {
                if self.checks_given[WHITE.0 as usize] >= 3 {
                    Some(WHITE)
                } else {
                    Some(BLACK)
                }
            }
            _ => None,
        };

        match winner {
            None => Value::DRAW,
            Some(c) if c == self.side_to_move => mate_in(0),
            Some(_) => mated_in(0),
        }
    }

    // A side in Extinction loses as soon as any of its piece types has
    // disappeared from the board.
    fn extinct_side(&self) -> Option<Color> {
        for &c in &[WHITE, BLACK] {
            for &pt in &[PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING] {
                if self.count(c, pt) == 0 {
                    return Some(c);
                }
            }
        }
        None
    }

    fn put_piece(&mut self, pc: Piece, s: Square) {
        self.board[s.0 as usize] = pc;
        self.by_type_bb[ALL_PIECES.0 as usize] |= s;
        self.by_type_bb[pc.piece_type().0 as usize] |= s;
        self.by_color_bb[pc.color().0 as usize] |= s;
        self.piece_count[pc.0 as usize] += 1;
        self.piece_count[Piece::make(pc.color(), ALL_PIECES).0 as usize] += 1;
        self.piece_list[pc.0 as usize].push(s);
        if pc.piece_type() == KING && self.king_square[pc.color().0 as usize] == Square::NONE {
            self.king_square[pc.color().0 as usize] = s;
        }
    }

    // set() initializes the position from a FEN string for the given
    // variant. Beyond the six standard fields it accepts a Crazyhouse
    // pocket in brackets after the board field ("...R1K1[QRb] w ...") and a
    // lichess-style remaining-checks field ("3+1") between the en passant
    // and halfmove fields. Malformed strings are a caller bug and panic.
    pub fn set(&mut self, fen_str: &str, v: Variant, chess960: bool) {
        *self = Position::new();
        self.variant = v;
        self.chess960 = chess960;

        let mut tokens = fen_str.split_whitespace();

        // 1. Piece placement, with optional pocket
        let board_str = tokens.next().expect("fen: missing board");
        let (board_part, pocket_part) = match board_str.find('[') {
            Some(i) => (
                &board_str[..i],
                Some(board_str[i + 1..].trim_end_matches(']')),
            ),
            None => (board_str, None),
        };

        let mut sq = Square::A8;
        for ch in board_part.chars() {
            match ch {
                '1'..='8' => sq += (ch as i32 - '0' as i32) * EAST,
                '/' => sq += 2 * SOUTH,
                '~' => {} // promoted-piece marker in drop variants
                _ => {
                    let idx = PIECE_TO_CHAR
                        .find(ch)
                        .unwrap_or_else(|| panic!("fen: bad piece '{}'", ch));
                    self.put_piece(Piece(idx as u32), sq);
                    sq += EAST;
                }
            }
        }

        if let Some(pocket) = pocket_part {
            for ch in pocket.chars() {
                let idx = PIECE_TO_CHAR
                    .find(ch)
                    .unwrap_or_else(|| panic!("fen: bad pocket piece '{}'", ch));
                let pc = Piece(idx as u32);
                self.in_hand[pc.color().0 as usize][pc.piece_type().0 as usize] += 1;
                self.in_hand[pc.color().0 as usize][ALL_PIECES.0 as usize] += 1;
            }
        }

        // 2. Side to move
        self.side_to_move = match tokens.next() {
            Some("b") => BLACK,
            _ => WHITE,
        };

        // 3. Castling availability
        if let Some(castling) = tokens.next() {
            for ch in castling.chars() {
                match ch {
                    'K' => self.castling_rights |= WHITE_OO,
                    'Q' => self.castling_rights |= WHITE_OOO,
                    'k' => self.castling_rights |= BLACK_OO,
                    'q' => self.castling_rights |= BLACK_OOO,
                    'A'..='H' => {
                        // Shredder-FEN file letter
                        let kf = self.king_square[WHITE.0 as usize].file();
                        self.castling_rights |= if (ch as u32 - 'A' as u32) > kf {
                            WHITE_OO
                        } else {
                            WHITE_OOO
                        };
                    }
                    'a'..='h' => {
                        let kf = self.king_square[BLACK.0 as usize].file();
                        self.castling_rights |= if (ch as u32 - 'a' as u32) > kf {
                            BLACK_OO
                        } else {
                            BLACK_OOO
                        };
                    }
                    _ => {}
                }
            }
        }

        // 4. En passant square
        if let Some(ep) = tokens.next() {
            let bytes = ep.as_bytes();
            if bytes.len() == 2
                && (b'a'..=b'h').contains(&bytes[0])
                && (b'1'..=b'8').contains(&bytes[1])
            {
                self.ep_square =
                    Square::make((bytes[0] - b'a') as File, (bytes[1] - b'1') as Rank);
            }
        }

        // 5. Optional remaining-checks field ("3+1" means white needs three
        // more checks to win, black one), then the move counters.
        let mut next = tokens.next();
        if let Some(tok) = next {
            if let Some(plus) = tok.find('+') {
                let w: i32 = tok[..plus].parse().unwrap_or(3);
                let b: i32 = tok[plus + 1..].parse().unwrap_or(3);
                self.checks_given[WHITE.0 as usize] = 3 - w;
                self.checks_given[BLACK.0 as usize] = 3 - b;
                next = tokens.next();
            }
        }
        let _rule50: i32 = next.and_then(|t| t.parse().ok()).unwrap_or(0);
        let fullmove: i32 = tokens.next().and_then(|t| t.parse().ok()).unwrap_or(1);
        self.game_ply =
            std::cmp::max(2 * (fullmove - 1), 0) + (self.side_to_move == BLACK) as i32;

        // Derived state
        for s in self.pieces() {
            let pc = self.piece_on(s);
            self.psq += psqt::psq(pc, s);
            if pc.piece_type() == PAWN {
                self.pawn_key ^= zobrist::psq(pc, s);
            } else if pc.piece_type() != KING {
                self.non_pawn_material[pc.color().0 as usize] += piece_value(MG, pc);
            }
        }

        self.material_key = zobrist::variant(v);
        for c in 0..2u32 {
            for pt in 1..=6u32 {
                let pc = Piece::make(Color(c), PieceType(pt));
                for n in 0..self.piece_count[pc.0 as usize] {
                    self.material_key ^= zobrist::material(pc, n);
                }
            }
        }

        self.checkers = if self.is_anti() {
            Bitboard(0)
        } else {
            let ksq = self.king_square[self.side_to_move.0 as usize];
            if ksq == Square::NONE {
                Bitboard(0)
            } else {
                self.attackers_to(ksq) & self.pieces_c(!self.side_to_move)
            }
        };
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn pos(fen: &str, v: Variant) -> Position {
        let mut p = Position::new();
        p.set(fen, v, false);
        p
    }

    #[test]
    fn startpos_counts_and_state() {
        let p = pos(STARTPOS, Variant::Chess);
        assert_eq!(p.count(WHITE, PAWN), 8);
        assert_eq!(p.count(BLACK, ALL_PIECES), 16);
        assert_eq!(p.square(WHITE, KING), Square::E1);
        assert_eq!(p.square(BLACK, KING), Square::E8);
        assert_eq!(p.psq_score(), Score::ZERO);
        assert_eq!(p.checkers(), Bitboard(0));
        assert!(p.can_castle(WHITE) && p.can_castle(BLACK));
        assert_eq!(p.non_pawn_material_c(WHITE), p.non_pawn_material_c(BLACK));
    }

    #[test]
    fn checkers_detects_a_rook_check() {
        let p = pos("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1", Variant::Chess);
        assert_eq!(p.checkers(), Square::make(FILE_E, RANK_2).bb());
    }

    #[test]
    fn pinned_pieces_on_a_file() {
        // White knight on e2 pinned by the e8 rook
        let p = pos("4r3/8/8/8/8/8/4N3/4K2k w - - 0 1", Variant::Chess);
        assert_eq!(p.pinned_pieces(WHITE), Square::make(FILE_E, RANK_2).bb());
        assert_eq!(p.pinned_pieces(BLACK), Bitboard(0));
    }

    #[test]
    fn crazyhouse_pocket_is_parsed() {
        let p = pos(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[QRb] w KQkq - 0 1",
            Variant::Crazyhouse,
        );
        assert_eq!(p.count_in_hand(WHITE, QUEEN), 1);
        assert_eq!(p.count_in_hand(WHITE, ROOK), 1);
        assert_eq!(p.count_in_hand(BLACK, BISHOP), 1);
        assert_eq!(p.count_in_hand(WHITE, ALL_PIECES), 2);
    }

    #[test]
    fn three_check_field_is_parsed() {
        let p = pos(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 1+3 0 1",
            Variant::ThreeCheck,
        );
        assert_eq!(p.checks_given(WHITE), 2);
        assert_eq!(p.checks_given(BLACK), 0);
    }

    #[test]
    fn horde_side_has_no_king() {
        let p = pos(
            "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1",
            Variant::Horde,
        );
        assert!(p.is_horde_color(WHITE));
        assert!(!p.is_horde_color(BLACK));
        assert_eq!(p.square(WHITE, KING), Square::NONE);
    }

    #[test]
    fn koth_center_ends_the_game() {
        let p = pos("4k3/8/8/8/3K4/8/8/8 b - - 0 1", Variant::Koth);
        assert!(p.is_variant_end());
        assert_eq!(p.variant_result(), mated_in(0));
    }

    #[test]
    fn grid_cells_are_two_by_two() {
        let p = pos(STARTPOS, Variant::Grid);
        let cell = p.grid_bb(Square::A1);
        assert_eq!(
            cell,
            Square::A1.bb()
                | Square::B1
                | Square::make(FILE_A, RANK_2)
                | Square::make(FILE_B, RANK_2)
        );
        assert_eq!(p.grid_bb(Square::make(FILE_B, RANK_2)), cell);
    }

    #[test]
    fn material_keys_differ_between_variants() {
        let a = pos(STARTPOS, Variant::Chess);
        let b = pos(STARTPOS, Variant::Atomic);
        assert!(a.material_key() != b.material_key());
        assert_eq!(a.pawn_key(), b.pawn_key());
    }
}
