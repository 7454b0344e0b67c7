// SPDX-License-Identifier: GPL-3.0-or-later

//! Evaluation parameters. Tables indexed by [`Variant`] have one column per
//! rule-set, in discriminant order; a variant that never reaches a code path
//! keeps an all-zero column there.

#![allow(dead_code)]

use crate::types::*;

macro_rules! S {
    ($x:expr, $y:expr) => {
        Score::make($x, $y)
    };
}
macro_rules! V {
    ($x:expr) => {
        Value($x)
    };
}

// Rows of MOBILITY_BONUS have as many live entries as the piece has maximum
// mobility; pad32 zero-fills the rest so all rows index uniformly.
const fn pad32(src: &[Score]) -> [Score; 32] {
    let mut out = [Score::ZERO; 32];
    let mut i = 0;
    while i < src.len() {
        out[i] = src[i];
        i += 1;
    }
    out
}

// MOBILITY_BONUS[variant][piece type - 2][attacked] contains bonuses for
// middle and end game, indexed by piece type and number of attacked squares
// in the mobility area.
#[rustfmt::skip]
pub const MOBILITY_BONUS: [[[Score; 32]; 4]; VARIANT_NB] = [
    [ // Chess
        pad32(&[ S!(-75,-76), S!(-57,-54), S!( -9,-28), S!( -2,-10), S!(  6,  5), S!( 14, 12), // Knights
                 S!( 22, 26), S!( 29, 29), S!( 36, 29) ]),
        pad32(&[ S!(-48,-59), S!(-20,-23), S!( 16, -3), S!( 26, 13), S!( 38, 24), S!( 51, 42), // Bishops
                 S!( 55, 54), S!( 63, 57), S!( 63, 65), S!( 68, 73), S!( 81, 78), S!( 81, 86),
                 S!( 91, 88), S!( 98, 97) ]),
        pad32(&[ S!(-58,-76), S!(-27,-18), S!(-15, 28), S!(-10, 55), S!( -5, 69), S!( -2, 82), // Rooks
                 S!(  9,112), S!( 16,118), S!( 30,132), S!( 29,142), S!( 32,155), S!( 38,165),
                 S!( 46,166), S!( 48,169), S!( 58,171) ]),
        pad32(&[ S!(-39,-36), S!(-21,-15), S!(  3,  8), S!(  3, 18), S!( 14, 34), S!( 22, 54), // Queens
                 S!( 28, 61), S!( 41, 73), S!( 43, 79), S!( 48, 92), S!( 56, 94), S!( 60,104),
                 S!( 60,113), S!( 66,120), S!( 67,123), S!( 70,126), S!( 71,133), S!( 73,136),
                 S!( 79,140), S!( 88,143), S!( 88,148), S!( 99,166), S!(102,170), S!(102,175),
                 S!(106,184), S!(109,191), S!(113,206), S!(116,212) ]),
    ],
    [ // Anti
        pad32(&[ S!(-150,-152), S!(-112,-108), S!(-18,-52), S!( -4,-20), S!( 12, 10), S!( 30, 22),
                 S!(  44,  52), S!(  60,  56), S!( 72, 58) ]),
        pad32(&[ S!(-96,-116), S!(-42,-38), S!( 32, -4), S!( 52, 24), S!( 74, 44), S!(102, 84),
                 S!(108, 108), S!(126,116), S!(130,126), S!(142,140), S!(158,148), S!(162,172),
                 S!(184, 180), S!(194,188) ]),
        pad32(&[ S!(-112,-156), S!(-50,-36), S!(-22, 52), S!(-10,110), S!( -8,140), S!( -2,162),
                 S!(  16, 218), S!( 28,240), S!( 42,256), S!( 46,286), S!( 62,308), S!( 64,320),
                 S!(  86, 330), S!( 98,336), S!(118,338) ]),
        pad32(&[ S!(-80,-70), S!(-50,-24), S!(  4, 14), S!(  8, 38), S!( 28, 74), S!( 48,110),
                 S!( 50,124), S!( 80,152), S!( 86,158), S!( 94,174), S!(108,188), S!(112,204),
                 S!(120,222), S!(140,232), S!(144,236), S!(146,244), S!(150,256), S!(154,260),
                 S!(170,266), S!(188,272), S!(198,280), S!(216,314), S!(224,316), S!(226,322),
                 S!(236,348), S!(238,354), S!(246,382), S!(256,398) ]),
    ],
    [ // Atomic
        pad32(&[ S!(-85,-78), S!(-78,-63), S!(-35,-40), S!( -2,-24), S!( 14,  8), S!( 23, 25),
                 S!( 39, 26), S!( 30, 23), S!( 36, 29) ]),
        pad32(&[ S!(-55,-64), S!(-17,-34), S!( 13, -9), S!( 24, 20), S!( 22, 25), S!( 57, 38),
                 S!( 32, 52), S!( 67, 66), S!( 52, 52), S!( 57, 74), S!( 73, 77), S!( 85, 81),
                 S!( 92, 90), S!(110, 86) ]),
        pad32(&[ S!(-60,-73), S!(-33,-28), S!(-18,  9), S!(-19, 30), S!(-19, 58), S!( 20, 77),
                 S!( 12,106), S!( 11,133), S!( 21,134), S!( 33,165), S!( 34,169), S!( 39,183),
                 S!( 25,171), S!( 61,181), S!( 58,158) ]),
        pad32(&[ S!(-43,-43), S!(-14,-16), S!( -5,  1), S!(  0, 23), S!(  6, 24), S!( 24, 58),
                 S!( 20, 55), S!( 31, 67), S!( 47, 90), S!( 28, 79), S!( 47, 89), S!( 69,104),
                 S!( 64,111), S!( 75,128), S!( 72,114), S!( 48,132), S!( 58,130), S!( 76,134),
                 S!( 84,124), S!(109,131), S!(114,143), S!(103,140), S!(105,146), S!(109,165),
                 S!(116,156), S!(127,176), S!(130,174), S!(129,204) ]),
    ],
    [ // Crazyhouse
        pad32(&[ S!(-126, -96), S!(-103,-31), S!(-90,-27), S!(-40,  3), S!(  0,  3), S!(  4,  0),
                 S!(  20,  12), S!(  15, 33), S!( 50, 46) ]),
        pad32(&[ S!(-156, -79), S!(-115,-43), S!( 42,-14), S!( 35, 26), S!( 64, 26), S!( 74, 38),
                 S!(  70,  46), S!(  83, 71), S!( 70, 68), S!( 66, 80), S!( 64, 68), S!( 70, 77),
                 S!(  97,  92), S!(  89, 98) ]),
        pad32(&[ S!( -53, -53), S!( -22, -8), S!(-48, 30), S!(-14, 57), S!( -4, 77), S!( 11, 87),
                 S!(   7, 115), S!(  12,123), S!( 27,120), S!(  6,140), S!( 55,156), S!( 18,161),
                 S!(  51, 161), S!(  54,171), S!( 52,166) ]),
        pad32(&[ S!( -26, -56), S!( -24,-14), S!(  7, 14), S!(  8, 15), S!( 18, 34), S!( 14, 41),
                 S!(  28,  58), S!(  33, 66), S!( 40, 70), S!( 47, 74), S!( 50,100), S!( 52,106),
                 S!(  59, 111), S!(  50, 95), S!( 60,115), S!( 61,126), S!( 75,144), S!( 82,119),
                 S!(  95, 137), S!( 102,138), S!(100,142), S!(119,154), S!(129,156), S!(107,156),
                 S!( 111, 177), S!( 115,181), S!(124,197), S!(124,199) ]),
    ],
    [ // Extinction
        pad32(&[ S!(-123, -90), S!( -91,-32), S!(-61,-29), S!(-38,  3), S!(  0,  3), S!(  4,  0),
                 S!(  19,  12), S!(  15, 33), S!( 52, 45) ]),
        pad32(&[ S!(-153, -80), S!(-112,-41), S!( 41,-14), S!( 35, 24), S!( 62, 26), S!( 75, 41),
                 S!(  72,  48), S!(  85, 74), S!( 74, 65), S!( 66, 79), S!( 64, 69), S!( 73, 80),
                 S!( 107,  92), S!(  96,101) ]),
        pad32(&[ S!( -59, -51), S!( -20, -8), S!(-54, 32), S!(-15, 54), S!( -4, 70), S!( 11, 84),
                 S!(   6, 113), S!(  13,123), S!( 27,114), S!(  6,144), S!( 60,162), S!( 19,162),
                 S!(  48, 170), S!(  57,170), S!( 52,177) ]),
        pad32(&[ S!( -27, -56), S!( -24,-14), S!(  7, 13), S!(  9, 16), S!( 18, 37), S!( 14, 40),
                 S!(  29,  56), S!(  34, 64), S!( 39, 73), S!( 49, 65), S!( 50, 98), S!( 50,106),
                 S!(  60, 107), S!(  53, 92), S!( 62,119), S!( 69,130), S!( 77,145), S!( 84,120),
                 S!(  90, 153), S!(  98,131), S!(106,139), S!(116,147), S!(127,157), S!(112,154),
                 S!( 121, 174), S!( 124,167), S!(126,194), S!(130,190) ]),
    ],
    [ // Grid
        pad32(&[ S!(-75,-76), S!(-57,-54), S!( -9,-28), S!( -2,-10), S!(  6,  5), S!( 14, 12),
                 S!( 22, 26), S!( 29, 29), S!( 36, 29) ]),
        pad32(&[ S!(-48,-59), S!(-20,-23), S!( 16, -3), S!( 26, 13), S!( 38, 24), S!( 51, 42),
                 S!( 55, 54), S!( 63, 57), S!( 63, 65), S!( 68, 73), S!( 81, 78), S!( 81, 86),
                 S!( 91, 88), S!( 98, 97) ]),
        pad32(&[ S!(-58,-76), S!(-27,-18), S!(-15, 28), S!(-10, 55), S!( -5, 69), S!( -2, 82),
                 S!(  9,112), S!( 16,118), S!( 30,132), S!( 29,142), S!( 32,155), S!( 38,165),
                 S!( 46,166), S!( 48,169), S!( 58,171) ]),
        pad32(&[ S!(-39,-36), S!(-21,-15), S!(  3,  8), S!(  3, 18), S!( 14, 34), S!( 22, 54),
                 S!( 28, 61), S!( 41, 73), S!( 43, 79), S!( 48, 92), S!( 56, 94), S!( 60,104),
                 S!( 60,113), S!( 66,120), S!( 67,123), S!( 70,126), S!( 71,133), S!( 73,136),
                 S!( 79,140), S!( 88,143), S!( 88,148), S!( 99,166), S!(102,170), S!(102,175),
                 S!(106,184), S!(109,191), S!(113,206), S!(116,212) ]),
    ],
    [ // Horde
        pad32(&[ S!(-126,-90), S!( -7,-22), S!( -46,-25), S!( 19,  7), S!( -53, 71), S!( 31, -1),
                 S!(  -6, 51), S!(-12, 47), S!(  -9,-56) ]),
        pad32(&[ S!( -46, -2), S!( 30, 66), S!(  18,-27), S!( 86, 21), S!(  65, 11), S!(147, 45),
                 S!(  98, 38), S!( 95, 52), S!( 122, 45), S!( 95, 33), S!(  89,103), S!( 85, -9),
                 S!( 105, 70), S!(131, 82) ]),
        pad32(&[ S!( -56,-78), S!(-25,-18), S!( -11, 26), S!( -5, 55), S!(  -4, 70), S!( -1, 81),
                 S!(   8,109), S!( 14,120), S!(  21,128), S!( 23,143), S!(  31,154), S!( 32,160),
                 S!(  43,165), S!( 49,168), S!(  59,169) ]),
        pad32(&[ S!( -40,-35), S!(-25,-12), S!(   2,  7), S!(  4, 19), S!(  14, 37), S!( 24, 55),
                 S!(  25, 62), S!( 40, 76), S!(  43, 79), S!( 47, 87), S!(  54, 94), S!( 56,102),
                 S!(  60,111), S!( 70,116), S!(  72,118), S!( 73,122), S!(  75,128), S!( 77,130),
                 S!(  85,133), S!( 94,136), S!(  99,140), S!(108,157), S!( 112,158), S!(113,161),
                 S!( 118,174), S!(119,177), S!( 123,191), S!(128,199) ]),
    ],
    [ // KoTH
        pad32(&[ S!(-75,-76), S!(-56,-54), S!( -9,-26), S!( -2,-10), S!(  6,  5), S!( 15, 11),
                 S!( 22, 26), S!( 30, 28), S!( 36, 29) ]),
        pad32(&[ S!(-48,-58), S!(-21,-19), S!( 16, -2), S!( 26, 12), S!( 37, 22), S!( 51, 42),
                 S!( 54, 54), S!( 63, 58), S!( 65, 63), S!( 71, 70), S!( 79, 74), S!( 81, 86),
                 S!( 92, 90), S!( 97, 94) ]),
        pad32(&[ S!(-56,-78), S!(-25,-18), S!(-11, 26), S!( -5, 55), S!( -4, 70), S!( -1, 81),
                 S!(  8,109), S!( 14,120), S!( 21,128), S!( 23,143), S!( 31,154), S!( 32,160),
                 S!( 43,165), S!( 49,168), S!( 59,169) ]),
        pad32(&[ S!(-40,-35), S!(-25,-12), S!(  2,  7), S!(  4, 19), S!( 14, 37), S!( 24, 55),
                 S!( 25, 62), S!( 40, 76), S!( 43, 79), S!( 47, 87), S!( 54, 94), S!( 56,102),
                 S!( 60,111), S!( 70,116), S!( 72,118), S!( 73,122), S!( 75,128), S!( 77,130),
                 S!( 85,133), S!( 94,136), S!( 99,140), S!(108,157), S!(112,158), S!(113,161),
                 S!(118,174), S!(119,177), S!(123,191), S!(128,199) ]),
    ],
    [ // Losers
        pad32(&[ S!(-150,-152), S!(-112,-108), S!(-18,-52), S!( -4,-20), S!( 12, 10), S!( 30, 22),
                 S!(  44,  52), S!(  60,  56), S!( 72, 58) ]),
        pad32(&[ S!(-96,-116), S!(-42,-38), S!( 32, -4), S!( 52, 24), S!( 74, 44), S!(102, 84),
                 S!(108, 108), S!(126,116), S!(130,126), S!(142,140), S!(158,148), S!(162,172),
                 S!(184, 180), S!(194,188) ]),
        pad32(&[ S!(-112,-156), S!(-50,-36), S!(-22, 52), S!(-10,110), S!( -8,140), S!( -2,162),
                 S!(  16, 218), S!( 28,240), S!( 42,256), S!( 46,286), S!( 62,308), S!( 64,320),
                 S!(  86, 330), S!( 98,336), S!(118,338) ]),
        pad32(&[ S!(-80,-70), S!(-50,-24), S!(  4, 14), S!(  8, 38), S!( 28, 74), S!( 48,110),
                 S!( 50,124), S!( 80,152), S!( 86,158), S!( 94,174), S!(108,188), S!(112,204),
                 S!(120,222), S!(140,232), S!(144,236), S!(146,244), S!(150,256), S!(154,260),
                 S!(170,266), S!(188,272), S!(198,280), S!(216,314), S!(224,316), S!(226,322),
                 S!(236,348), S!(238,354), S!(246,382), S!(256,398) ]),
    ],
    [ // Race
        pad32(&[ S!(-132,-117), S!( -89,-110), S!(-13,-49), S!(-11,-15), S!(-10,-30), S!( 29, 17),
                 S!(  13,  32), S!(  79,  69), S!(109, 79) ]),
        pad32(&[ S!(-101,-119), S!( -19, -27), S!( 27, -9), S!( 35, 30), S!( 62, 31), S!(115, 72),
                 S!(  91,  99), S!( 138, 122), S!(129,119), S!(158,156), S!(153,162), S!(143,189),
                 S!( 172, 181), S!( 196, 204) ]),
        pad32(&[ S!(-131,-162), S!( -57, -37), S!( -8, 47), S!( 12, 93), S!(  3,127), S!( 10,139),
                 S!(   3, 240), S!(  18, 236), S!( 44,251), S!( 44,291), S!( 49,301), S!( 67,316),
                 S!( 100, 324), S!(  97, 340), S!(110,324) ]),
        pad32(&[ S!( -87, -68), S!( -73,  -2), S!( -7,  9), S!( -5, 16), S!( 39, 76), S!( 39,118),
                 S!(  64, 131), S!(  86, 169), S!( 86,175), S!( 78,166), S!( 97,195), S!(123,216),
                 S!( 137, 200), S!( 155, 247), S!(159,260), S!(136,252), S!(156,279), S!(160,251),
                 S!( 165, 251), S!( 194, 267), S!(204,271), S!(216,331), S!(226,304), S!(223,295),
                 S!( 239, 316), S!( 228, 365), S!(240,385), S!(249,377) ]),
    ],
    [ // Relay
        pad32(&[ S!(-75,-76), S!(-56,-54), S!( -9,-26), S!( -2,-10), S!(  6,  5), S!( 15, 11),
                 S!( 22, 26), S!( 30, 28), S!( 36, 29) ]),
        pad32(&[ S!(-48,-58), S!(-21,-19), S!( 16, -2), S!( 26, 12), S!( 37, 22), S!( 51, 42),
                 S!( 54, 54), S!( 63, 58), S!( 65, 63), S!( 71, 70), S!( 79, 74), S!( 81, 86),
                 S!( 92, 90), S!( 97, 94) ]),
        pad32(&[ S!(-56,-78), S!(-25,-18), S!(-11, 26), S!( -5, 55), S!( -4, 70), S!( -1, 81),
                 S!(  8,109), S!( 14,120), S!( 21,128), S!( 23,143), S!( 31,154), S!( 32,160),
                 S!( 43,165), S!( 49,168), S!( 59,169) ]),
        pad32(&[ S!(-40,-35), S!(-25,-12), S!(  2,  7), S!(  4, 19), S!( 14, 37), S!( 24, 55),
                 S!( 25, 62), S!( 40, 76), S!( 43, 79), S!( 47, 87), S!( 54, 94), S!( 56,102),
                 S!( 60,111), S!( 70,116), S!( 72,118), S!( 73,122), S!( 75,128), S!( 77,130),
                 S!( 85,133), S!( 94,136), S!( 99,140), S!(108,157), S!(112,158), S!(113,161),
                 S!(118,174), S!(119,177), S!(123,191), S!(128,199) ]),
    ],
    [ // Three-check
        pad32(&[ S!(-74,-76), S!(-55,-54), S!( -9,-26), S!( -2,-10), S!(  6,  5), S!( 15, 11),
                 S!( 22, 26), S!( 31, 27), S!( 37, 29) ]),
        pad32(&[ S!(-49,-56), S!(-23,-18), S!( 15, -2), S!( 25, 12), S!( 36, 22), S!( 50, 42),
                 S!( 53, 54), S!( 64, 57), S!( 67, 63), S!( 71, 68), S!( 84, 76), S!( 79, 87),
                 S!( 95, 91), S!( 98, 93) ]),
        pad32(&[ S!(-57,-76), S!(-25,-18), S!(-11, 25), S!( -5, 53), S!( -4, 70), S!( -1, 78),
                 S!(  8,111), S!( 14,116), S!( 22,125), S!( 24,148), S!( 31,159), S!( 31,173),
                 S!( 44,163), S!( 50,162), S!( 56,168) ]),
        pad32(&[ S!(-42,-35), S!(-25,-12), S!(  2,  7), S!(  4, 19), S!( 14, 37), S!( 24, 53),
                 S!( 26, 63), S!( 39, 80), S!( 42, 77), S!( 48, 88), S!( 53, 96), S!( 57, 96),
                 S!( 61,108), S!( 71,116), S!( 70,116), S!( 74,125), S!( 75,133), S!( 78,133),
                 S!( 85,137), S!( 97,135), S!(103,141), S!(107,165), S!(109,153), S!(115,162),
                 S!(119,164), S!(121,184), S!(121,192), S!(131,203) ]),
    ],
    [ // Two kings
        pad32(&[ S!(-75,-76), S!(-57,-54), S!( -9,-28), S!( -2,-10), S!(  6,  5), S!( 14, 12),
                 S!( 22, 26), S!( 29, 29), S!( 36, 29) ]),
        pad32(&[ S!(-48,-59), S!(-20,-23), S!( 16, -3), S!( 26, 13), S!( 38, 24), S!( 51, 42),
                 S!( 55, 54), S!( 63, 57), S!( 63, 65), S!( 68, 73), S!( 81, 78), S!( 81, 86),
                 S!( 91, 88), S!( 98, 97) ]),
        pad32(&[ S!(-58,-76), S!(-27,-18), S!(-15, 28), S!(-10, 55), S!( -5, 69), S!( -2, 82),
                 S!(  9,112), S!( 16,118), S!( 30,132), S!( 29,142), S!( 32,155), S!( 38,165),
                 S!( 46,166), S!( 48,169), S!( 58,171) ]),
        pad32(&[ S!(-39,-36), S!(-21,-15), S!(  3,  8), S!(  3, 18), S!( 14, 34), S!( 22, 54),
                 S!( 28, 61), S!( 41, 73), S!( 43, 79), S!( 48, 92), S!( 56, 94), S!( 60,104),
                 S!( 60,113), S!( 66,120), S!( 67,123), S!( 70,126), S!( 71,133), S!( 73,136),
                 S!( 79,140), S!( 88,143), S!( 88,148), S!( 99,166), S!(102,170), S!(102,175),
                 S!(106,184), S!(109,191), S!(113,206), S!(116,212) ]),
    ],
];

// OUTPOST[knight/bishop][supported by pawn] contains bonuses for minor
// pieces if they can reach an outpost square, bigger if that square is
// supported by a pawn. If the minor piece occupies an outpost square the
// score is doubled.
pub const OUTPOST: [[Score; 2]; 2] = [
    [S!(22, 6), S!(36, 12)], // Knight
    [S!(9, 2), S!(15, 5)],   // Bishop
];

// ROOK_ON_FILE[semiopen/open] contains bonuses for each rook when there is
// no friendly pawn on the rook file.
pub const ROOK_ON_FILE: [Score; 2] = [S!(20, 7), S!(45, 20)];

// THREAT_BY_MINOR/BY_ROOK[attacked piece type] contains bonuses according
// to which piece type attacks which one. Attacks on lesser pieces which are
// pawn-defended are not considered.
pub const THREAT_BY_MINOR: [Score; 8] = [
    S!(0, 0), S!(0, 33), S!(45, 43), S!(46, 47), S!(72, 107), S!(48, 118),
    Score::ZERO, Score::ZERO,
];

pub const THREAT_BY_ROOK: [Score; 8] = [
    S!(0, 0), S!(0, 25), S!(40, 62), S!(40, 59), S!(0, 34), S!(35, 48),
    Score::ZERO, Score::ZERO,
];

// THREAT_BY_KING[on one/on many] contains bonuses for king attacks on pawns
// or pieces which are not pawn-defended.
pub const THREAT_BY_KING: [Score; 2] = [S!(3, 62), S!(9, 138)];

// PASSED[variant][mg/eg][r] contains midgame and endgame bonuses for passed
// pawns, indexed by r = relative rank - RANK_2. The two components are
// processed independently, so no Score is used.
#[rustfmt::skip]
pub const PASSED: [[[i32; 6]; 2]; VARIANT_NB] = [
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Chess
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Anti
    [ [95, 118, 94, 142, 196, 204], [86, 43, 61, 62, 150, 256] ], // Atomic
    [ [15, 23, 13, 88, 177, 229], [27, 13, 19, 111, 140, 203] ],  // Crazyhouse
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Extinction
    [ [11, 4, 27, 58, 168, 251], [2, 0, 34, 17, 165, 253] ],      // Grid
    [ [-66, -25, 66, 68, 72, 250], [10, 7, -12, 81, 210, 258] ],  // Horde
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // KoTH
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Losers
    [ [0; 6], [0; 6] ],                                           // Race (unreached)
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Relay
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Three-check
    [ [5, 5, 31, 73, 166, 252], [7, 14, 38, 73, 166, 252] ],      // Two kings
];

// PASSED_FILE[file] contains a bonus according to the file of a passed pawn.
pub const PASSED_FILE: [Score; 8] = [
    S!(9, 10), S!(2, 10), S!(1, -8), S!(-20, -12),
    S!(-20, -12), S!(1, -8), S!(2, 10), S!(9, 10),
];

// KING_PROTECTOR[piece type - 2] contains a bonus according to the distance
// from the own king.
pub const KING_PROTECTOR: [Score; 4] = [S!(-3, -5), S!(-4, -3), S!(-3, 0), S!(-1, 1)];

// Assorted bonuses and penalties
pub const MINOR_BEHIND_PAWN: Score = S!(16, 0);
pub const BISHOP_PAWNS: Score = S!(8, 12);
pub const LONG_RANGED_BISHOP: Score = S!(22, 0);
pub const ROOK_ON_PAWN: Score = S!(8, 24);
pub const TRAPPED_ROOK: Score = S!(92, 0);
pub const WEAK_QUEEN: Score = S!(50, 10);
pub const PAWNLESS_FLANK: Score = S!(20, 80);
pub const THREAT_BY_HANGING_PAWN: Score = S!(71, 61);
pub const THREAT_BY_SAFE_PAWN: Score = S!(192, 175);
pub const THREAT_BY_RANK: Score = S!(16, 3);
pub const HANGING: Score = S!(48, 27);
pub const WEAK_UNOPPOSED_PAWN: Score = S!(5, 25);
pub const THREAT_BY_PAWN_PUSH: Score = S!(38, 22);
pub const THREAT_BY_ATTACK_ON_QUEEN: Score = S!(38, 22);
pub const HINDER_PASSED_PAWN: Score = S!(7, 0);
pub const TRAPPED_BISHOP_A1H1: Score = S!(50, 50);

// CLOSE_ENEMIES[variant] weights the king-tropism count.
pub const CLOSE_ENEMIES: [Score; VARIANT_NB] = [
    S!(7, 0),   // Chess
    S!(0, 0),   // Anti
    S!(17, 0),  // Atomic
    S!(14, 20), // Crazyhouse
    S!(0, 0),   // Extinction
    S!(7, 0),   // Grid
    S!(7, 0),   // Horde
    S!(7, 0),   // KoTH
    S!(7, 0),   // Losers
    S!(0, 0),   // Race
    S!(7, 0),   // Relay
    S!(16, 9),  // Three-check
    S!(7, 0),   // Two kings
];

// KING_ATTACK_WEIGHTS[variant][piece type] contains king attack weights.
// Variants with king safety disabled keep an all-zero column.
pub const KING_ATTACK_WEIGHTS: [[i32; 8]; VARIANT_NB] = [
    [0, 0, 78, 56, 45, 11, 0, 0],  // Chess
    [0; 8],                        // Anti
    [0, 0, 76, 64, 46, 11, 0, 0],  // Atomic
    [0, 0, 112, 87, 63, 2, 0, 0],  // Crazyhouse
    [0; 8],                        // Extinction
    [0, 0, 89, 62, 47, 11, 0, 0],  // Grid
    [0, 0, 78, 56, 45, 11, 0, 0],  // Horde
    [0, 0, 76, 48, 44, 10, 0, 0],  // KoTH
    [0, 0, 78, 56, 45, 11, 0, 0],  // Losers
    [0; 8],                        // Race
    [0, 0, 78, 56, 45, 11, 0, 0],  // Relay
    [0, 0, 115, 64, 62, 35, 0, 0], // Three-check
    [0, 0, 78, 56, 45, 11, 0, 0],  // Two kings
];

// KING_DANGER_PARAMS[variant] holds the per-variant linear terms of the
// king-danger formula: adjacent-zone attacks, weak squares in the ring,
// pins and unsafe checks, the no-enemy-queen rebate, the mg-score divisor
// term, a constant, and the eg leak factor.
pub const KING_DANGER_PARAMS: [[i32; 7]; VARIANT_NB] = [
    [102, 191, 143, -848, -9, 40, 0],    // Chess
    [0; 7],                              // Anti
    [274, 166, 146, -654, -12, -7, 29],  // Atomic
    [119, 439, 130, -613, -6, -1, 320],  // Crazyhouse
    [0; 7],                              // Extinction
    [119, 211, 158, -722, -9, 41, 0],    // Grid
    [101, 235, 134, -717, -11, -5, 0],   // Horde
    [85, 229, 131, -658, -9, -5, 0],     // KoTH
    [101, 235, 134, -717, -357, -5, 0],  // Losers
    [0; 7],                              // Race
    [101, 235, 134, -717, -11, -5, 0],   // Relay
    [85, 136, 106, -613, -7, -73, 181],  // Three-check
    [92, 155, 136, -967, -8, 38, 0],     // Two kings
];

// Penalties for enemy's safe checks
pub const QUEEN_SAFE_CHECK: i32 = 780;
pub const ROOK_SAFE_CHECK: i32 = 880;
pub const BISHOP_SAFE_CHECK: i32 = 435;
pub const KNIGHT_SAFE_CHECK: i32 = 790;

// Atomic: own pieces next to the king amplify an attack on it.
pub const INDIRECT_KING_ATTACK: i32 = 883;

// Three-check: king-safety multipliers in Q8 fixed point, indexed by the
// number of checks the attacker has already delivered.
pub const THREE_CHECK_KS_FACTORS: [i32; 4] = [571, 619, 858, 0];

// Three-check: flat bonus per check already delivered.
pub const CHECKS_GIVEN_BONUS: [Score; 4] = [S!(0, 0), S!(444, 181), S!(2425, 603), S!(0, 0)];

// KoTH: bonus by effective king distance from each center square.
pub const KOTH_DISTANCE_BONUS: [Score; 6] = [
    S!(1949, 1934), S!(454, 364), S!(151, 158), S!(75, 85), S!(42, 49), S!(0, 0),
];
pub const KOTH_SAFE_CENTER: Score = S!(163, 207);

// Anti: capture-forcing parameters. ATTACKS_ANTI is indexed by
// [they capture][they defend][attacked piece type], where slot 0 stands for
// attacks that are not forced captures.
pub const PIECE_COUNT_ANTI: Score = S!(119, 123);
pub const THREATS_ANTI: [Score; 2] = [S!(192, 203), S!(411, 322)];
#[rustfmt::skip]
pub const ATTACKS_ANTI: [[[Score; 7]; 2]; 2] = [
    [
        [ S!( 30, 141), S!( 26,  94), S!(161, 105), S!( 70, 123), S!( 61,  72), S!( 78, 12), S!(139, 115) ],
        [ S!( 56,  89), S!( 82, 107), S!(114,  93), S!(110, 115), S!(188, 112), S!( 73, 59), S!(122,  59) ],
    ],
    [
        [ S!(119, 142), S!( 99, 105), S!(123, 193), S!(142,  37), S!(118,  96), S!( 50, 12), S!( 91,  85) ],
        [ S!( 58,  81), S!( 66, 110), S!(105, 153), S!(100, 143), S!(140, 113), S!(145, 73), S!(153, 154) ],
    ],
];

// Losers: same scheme as Anti with its own weights.
pub const THREATS_LOSERS: [Score; 2] = [S!(216, 279), S!(441, 341)];
#[rustfmt::skip]
pub const ATTACKS_LOSERS: [[[Score; 7]; 2]; 2] = [
    [
        [ S!( 27, 140), S!( 23,  95), S!(160, 112), S!( 78, 129), S!( 65,  75), S!( 70, 13), S!(146, 123) ],
        [ S!( 58,  82), S!( 80, 112), S!(124,  87), S!(103, 110), S!(185, 107), S!( 72, 60), S!(126,  62) ],
    ],
    [
        [ S!(111, 127), S!(102,  95), S!(121, 183), S!(140,  37), S!(120,  99), S!( 55, 11), S!( 88,  93) ],
        [ S!( 56,  69), S!( 72, 124), S!(109, 154), S!( 98, 149), S!(129, 113), S!(147, 72), S!(157, 152) ],
    ],
];

// Crazyhouse: king-danger units per piece the attacker holds in hand,
// indexed by piece type with slot 0 for the whole hand.
pub const KING_DANGER_IN_HAND: [i32; 6] = [79, 16, 200, 61, 138, 152];

// Race: bonus by the number of ranks the king still has to cross, counting
// ranks whose safe entry squares are all denied.
pub const KING_RACE_BONUS: [Score; 8] = [
    S!(14282, 14493), S!(6369, 5378), S!(4224, 3557), S!(2633, 2219),
    S!(1614, 1456), S!(975, 885), S!(528, 502), S!(0, 0),
];

// Thresholds for lazy and space evaluation
pub const LAZY_THRESHOLD: Value = V!(1500);
pub const SPACE_THRESHOLD: [Value; VARIANT_NB] = [
    V!(12222),   // Chess
    V!(12222),   // Anti
    V!(12222),   // Atomic
    V!(12222),   // Crazyhouse
    V!(12222),   // Extinction
    V!(12222),   // Grid
    Value::ZERO, // Horde
    Value::ZERO, // KoTH
    V!(12222),   // Losers
    V!(12222),   // Race
    V!(12222),   // Relay
    V!(12222),   // Three-check
    V!(12222),   // Two kings
];

// TEMPO[variant] is the side-to-move bonus added on top of the blended
// score. Move pressure is worth less in the capture-forced games and more
// when reinforcements can be dropped.
pub const TEMPO: [Value; VARIANT_NB] = [
    V!(20), // Chess
    V!(10), // Anti
    V!(20), // Atomic
    V!(25), // Crazyhouse
    V!(20), // Extinction
    V!(20), // Grid
    V!(20), // Horde
    V!(20), // KoTH
    V!(10), // Losers
    V!(20), // Race
    V!(20), // Relay
    V!(20), // Three-check
    V!(20), // Two kings
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_variants_have_zero_king_safety_columns() {
        for v in [Variant::Anti, Variant::Extinction, Variant::Race] {
            assert!(KING_ATTACK_WEIGHTS[v.index()].iter().all(|&w| w == 0));
            assert!(KING_DANGER_PARAMS[v.index()].iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn race_passed_column_is_unreachable_and_zero() {
        assert!(PASSED[Variant::Race.index()][MG].iter().all(|&v| v == 0));
        assert!(PASSED[Variant::Race.index()][EG].iter().all(|&v| v == 0));
    }

    #[test]
    fn mobility_rows_are_padded_with_zeros() {
        for v in 0..VARIANT_NB {
            // A knight attacks at most 8 squares.
            for m in 9..32 {
                assert_eq!(MOBILITY_BONUS[v][0][m], Score::ZERO);
            }
            // A queen attacks at most 27.
            for m in 28..32 {
                assert_eq!(MOBILITY_BONUS[v][3][m], Score::ZERO);
            }
        }
    }
}
