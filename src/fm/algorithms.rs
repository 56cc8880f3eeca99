//! FM algorithms.
//!
//! The raw structure of each algorithm is stored as one byte per operator, in
//! the storage order of the voice data (highest operator first):
//!
//! - `OUTPUT`: the operator is a carrier and is summed into the mix.
//! - `FEEDBACK`: the operator receives the feedback signal. Its single
//!   modulation bit names the operator the feedback is taken from.
//! - `modulated_by(k)`: the operator's phase is modulated by the operator in
//!   row `k`.
//!
//! At first use this data is compiled into typed graphs indexed by operator
//! slot (slot `k` is operator `k + 1`). Operators are rendered from the highest
//! slot down to slot 0, so every modulation source except the feedback loop
//! must sit at a higher slot than the operator it modulates. All tables obey
//! this evaluation order contract, see [`Algorithm::respects_evaluation_order`].
//!
//! The 4-operator algorithms don't have their own graphs. Each of them maps to
//! one of the 6-operator graphs, using the four operators rendered first.

// Algorithm table based on code (c) 2020 by Oleg Burdaev (dukesrg@gmail.com)

use spin::Once;

use super::patch::Format;

pub const MAX_OPERATORS: usize = 6;
pub const NUM_SIX_OP_ALGORITHMS: usize = 32;
pub const NUM_FOUR_OP_ALGORITHMS: usize = 8;

pub const OUTPUT: u8 = 0x80;
pub const FEEDBACK: u8 = 0x40;
pub const MODULATION_MASK: u8 = 0x3F;

/// Modulation bit for the operator in a row.
#[inline]
pub const fn modulated_by(row: usize) -> u8 {
    1 << row
}

#[rustfmt::skip]
pub const SIX_OP_MASKS: [[u8; 6]; NUM_SIX_OP_ALGORITHMS] = [
    [0x41, 0x01, 0x02, 0x84, 0x00, 0x90], // 1
    [0x00, 0x01, 0x02, 0x84, 0x50, 0x90], // 2
    [0x41, 0x01, 0x82, 0x00, 0x08, 0x90], // 3
    [0x44, 0x01, 0x82, 0x00, 0x08, 0x90], // 4
    [0x41, 0x81, 0x00, 0x84, 0x00, 0x90], // 5
    [0x42, 0x81, 0x00, 0x84, 0x00, 0x90], // 6
    [0x41, 0x01, 0x00, 0x86, 0x00, 0x90], // 7
    [0x00, 0x01, 0x44, 0x86, 0x00, 0x90], // 8
    [0x00, 0x01, 0x00, 0x86, 0x50, 0x90], // 9
    [0x00, 0x00, 0x83, 0x48, 0x08, 0x90], // 10
    [0x41, 0x00, 0x83, 0x00, 0x08, 0x90], // 11
    [0x00, 0x00, 0x00, 0x87, 0x50, 0x90], // 12
    [0x41, 0x00, 0x00, 0x87, 0x00, 0x90], // 13
    [0x41, 0x00, 0x03, 0x84, 0x00, 0x90], // 14
    [0x00, 0x00, 0x03, 0x84, 0x50, 0x90], // 15
    [0x41, 0x01, 0x00, 0x04, 0x00, 0x9A], // 16
    [0x00, 0x01, 0x00, 0x04, 0x50, 0x9A], // 17
    [0x00, 0x01, 0x02, 0x48, 0x00, 0x9C], // 18
    [0x41, 0x81, 0x81, 0x00, 0x08, 0x90], // 19
    [0x00, 0x00, 0x83, 0x48, 0x88, 0x88], // 20
    [0x00, 0x81, 0x81, 0x48, 0x88, 0x88], // 21
    [0x41, 0x81, 0x81, 0x81, 0x00, 0x90], // 22
    [0x41, 0x81, 0x81, 0x00, 0x88, 0x80], // 23
    [0x41, 0x81, 0x81, 0x81, 0x80, 0x80], // 24
    [0x41, 0x81, 0x81, 0x80, 0x80, 0x80], // 25
    [0x41, 0x00, 0x83, 0x00, 0x88, 0x80], // 26
    [0x00, 0x00, 0x83, 0x48, 0x88, 0x80], // 27
    [0x80, 0x42, 0x02, 0x84, 0x00, 0x90], // 28
    [0x41, 0x81, 0x00, 0x84, 0x80, 0x80], // 29
    [0x80, 0x42, 0x02, 0x84, 0x80, 0x80], // 30
    [0x41, 0x81, 0x80, 0x80, 0x80, 0x80], // 31
    [0xC1, 0x80, 0x80, 0x80, 0x80, 0x80], // 32
];

/// 6-operator graph used by each 4-operator algorithm.
pub const FOUR_OP_ALGORITHM_MAP: [usize; NUM_FOUR_OP_ALGORITHMS] = [0, 13, 7, 6, 4, 21, 30, 31];

/// Graph row used by each operator (storage order) of 4-operator algorithm 3.
///
/// Graph 8 has the right topology, but with the feedback loop on its third
/// row instead of the first.
pub const FOUR_OP_ALGORITHM_3_PLACEMENT: [usize; 4] = [2, 0, 1, 3];

const IDENTITY_PLACEMENT: [usize; MAX_OPERATORS] = [0, 1, 2, 3, 4, 5];

/// Routing of a single operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Route {
    carrier: bool,
    modulators: [usize; MAX_OPERATORS],
    num_modulators: usize,
}

impl Route {
    /// The operator is summed into the audible mix.
    #[inline]
    pub fn is_carrier(&self) -> bool {
        self.carrier
    }

    /// Slots whose current output modulates this operator's phase.
    #[inline]
    pub fn modulators(&self) -> &[usize] {
        &self.modulators[..self.num_modulators]
    }

    fn add_modulator(&mut self, slot: usize) {
        self.modulators[self.num_modulators] = slot;
        self.num_modulators += 1;
    }
}

/// Self or cross feedback loop of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackLoop {
    /// Slot whose phase is modulated by the feedback signal.
    pub receiver: usize,

    /// Slot whose output history feeds the loop.
    pub source: usize,
}

/// Modulation graph of one algorithm, indexed by operator slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Algorithm {
    num_operators: usize,
    routes: [Route; MAX_OPERATORS],
    feedback: Option<FeedbackLoop>,
}

impl Algorithm {
    /// Compile a graph from raw rows in storage order.
    ///
    /// `placement[i]` is the row used by the operator in storage position `i`.
    /// Modulation bits pointing beyond the operator count are ignored.
    pub fn from_masks(masks: &[u8], placement: &[usize]) -> Self {
        let num_operators = masks.len();
        let mut row_to_slot = [0; MAX_OPERATORS];

        for (position, row) in placement.iter().take(num_operators).enumerate() {
            row_to_slot[*row] = num_operators - 1 - position;
        }

        let mut routes = [Route::default(); MAX_OPERATORS];
        let mut feedback = None;

        for (row, mask) in masks.iter().enumerate() {
            let slot = row_to_slot[row];
            let sources = mask & MODULATION_MASK & ((1 << num_operators) - 1) as u8;

            routes[slot].carrier = (mask & OUTPUT) != 0;

            if (mask & FEEDBACK) != 0 {
                let source = if sources != 0 {
                    row_to_slot[sources.trailing_zeros() as usize]
                } else {
                    slot
                };
                feedback = Some(FeedbackLoop {
                    receiver: slot,
                    source,
                });
            } else {
                for (position, source_slot) in row_to_slot.iter().take(num_operators).enumerate() {
                    if (sources & modulated_by(position)) != 0 {
                        routes[slot].add_modulator(*source_slot);
                    }
                }
            }
        }

        Self {
            num_operators,
            routes,
            feedback,
        }
    }

    #[inline]
    pub fn num_operators(&self) -> usize {
        self.num_operators
    }

    #[inline]
    pub fn route(&self, slot: usize) -> &Route {
        &self.routes[slot]
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes[..self.num_operators]
    }

    #[inline]
    pub fn feedback(&self) -> Option<FeedbackLoop> {
        self.feedback
    }

    #[inline]
    pub fn is_carrier(&self, slot: usize) -> bool {
        self.routes[slot].carrier
    }

    /// True if every non-feedback modulator is rendered before the operator
    /// it modulates.
    pub fn respects_evaluation_order(&self) -> bool {
        self.routes()
            .iter()
            .enumerate()
            .all(|(slot, route)| route.modulators().iter().all(|source| *source > slot))
    }
}

static SIX_OP_ALGORITHMS: Once<[Algorithm; NUM_SIX_OP_ALGORITHMS]> = Once::new();
static FOUR_OP_ALGORITHMS: Once<[Algorithm; NUM_FOUR_OP_ALGORITHMS]> = Once::new();

#[inline]
pub fn six_op_algorithms() -> &'static [Algorithm; NUM_SIX_OP_ALGORITHMS] {
    SIX_OP_ALGORITHMS.call_once(|| {
        core::array::from_fn(|i| Algorithm::from_masks(&SIX_OP_MASKS[i], &IDENTITY_PLACEMENT))
    })
}

#[inline]
pub fn four_op_algorithms() -> &'static [Algorithm; NUM_FOUR_OP_ALGORITHMS] {
    FOUR_OP_ALGORITHMS.call_once(|| {
        core::array::from_fn(|i| {
            let masks = &SIX_OP_MASKS[FOUR_OP_ALGORITHM_MAP[i]][..4];
            let placement: &[usize] = if i == 2 {
                &FOUR_OP_ALGORITHM_3_PLACEMENT
            } else {
                &IDENTITY_PLACEMENT
            };
            Algorithm::from_masks(masks, placement)
        })
    })
}

/// Graph of an algorithm selector (0-based) for a voice format.
///
/// Selectors beyond the table wrap around.
#[inline]
pub fn algorithm(format: Format, selector: usize) -> &'static Algorithm {
    match format {
        Format::SixOp => &six_op_algorithms()[selector % NUM_SIX_OP_ALGORITHMS],
        Format::FourOp => &four_op_algorithms()[selector % NUM_FOUR_OP_ALGORITHMS],
    }
}
