//! Canned programs with known behaviour.

/// Halts with `A + B` on the first step.
pub const ADDER: &str = "\
. A .
B + S
. . .";

/// A number walks right through three movers, then stops at the edge.
/// Reaches `. > . > . > 1` after three steps.
pub const MOVER_CHAIN: &str = "1 > . > . > .";

/// Two movers aim at the same cell; the left one wins.
pub const MOVER_CONFLICT: &str = "1 > . < 2";

/// Advances once, then warps back to step 0 forever.
pub const WARP_LOOP: &str = "\
2 > . .
. 2 @ 0
S . 1 .";

/// `A` drops onto the warp, which sends it back one step into the
/// upper operand of `+`. The replay halts with `A + 1`.
pub const WARP_TO_SINK: &str = "\
. . . A .
. . . v .
1 + S . .
. . 2 @ 2
. . . 1 .";

/// A warp with dx=0, dy=0, dt=2 and value 7 whose `dt` operand arrives
/// after five steps. It then rewrites its own cell at step 3.
pub const WARP_ROUND_TRIP: &str = "\
. 7 .
0 @ 0
. . .
. ^ .
. . .
. ^ .
. . .
. ^ .
. . .
. ^ .
. . .
. ^ .
. 2 .";

/// Fires at step 0 asking for three steps back.
pub const UNDERFLOW: &str = "\
. 1 .
0 @ 0
. 3 .";

/// Every fixture above.
pub const ALL: [&str; 7] = [
    ADDER,
    MOVER_CHAIN,
    MOVER_CONFLICT,
    WARP_LOOP,
    WARP_TO_SINK,
    WARP_ROUND_TRIP,
    UNDERFLOW,
];
