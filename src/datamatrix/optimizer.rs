//! Encodation planning.
//!
//! A backward pass computes, for every position and every mode we might be
//! in, the number of codewords needed to encode the rest of the message. A
//! forward pass then walks the message from the start and assigns a mode to
//! every byte, staying in the current mode whenever another one is not
//! strictly cheaper.

use log::trace;

use super::codewords::{c40_len, is_edifact, x12_value};
use crate::error::{EncodeError, Result};
use crate::gs1::GS;

/// ECC200 encodation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

impl Mode {
    pub const ALL: [Mode; 6] = [Mode::Ascii, Mode::C40, Mode::Text, Mode::X12, Mode::Edifact, Mode::Base256];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Codeword switching from ASCII into this mode.
    pub const fn latch(self) -> Option<u8> {
        match self {
            Mode::Ascii => None,
            Mode::C40 => Some(230),
            Mode::Text => Some(239),
            Mode::X12 => Some(238),
            Mode::Edifact => Some(240),
            Mode::Base256 => Some(231),
        }
    }
}

/// Cost of switching, rows are the mode we leave. Leaving Base256 is
/// overestimated since the length prefix makes it free.
const SWITCH_COST: [[u32; 6]; 6] = [
    [0, 1, 1, 1, 1, 1],
    [1, 0, 2, 2, 2, 1],
    [1, 2, 0, 2, 2, 1],
    [1, 2, 2, 0, 2, 1],
    [1, 2, 2, 2, 0, 1],
    [1, 3, 3, 3, 3, 0],
];

/// Cost of ending the message in a mode (the unlatch).
const END_COST: [u32; 6] = [0, 1, 1, 1, 1, 0];

/// Added per ASCII unit when another mode was forced, so ASCII only shows
/// up where the forced mode can not finish the message.
const FORCED_PENALTY: u32 = 1000;

const INFINITE: u32 = u32::MAX / 4;

/// Smallest piece of input a mode encodes on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    len: usize,
    cost: u32,
    /// Mode active after the unit
    next: Mode,
}

struct Planner<'a> {
    data: &'a [u8],
    gs1: bool,
    forced: Option<Mode>,
}

impl<'a> Planner<'a> {
    fn allowed(&self, mode: Mode) -> bool {
        match self.forced {
            None => true,
            Some(forced) => mode == forced || mode == Mode::Ascii,
        }
    }

    fn penalty(&self, mode: Mode) -> u32 {
        match self.forced {
            Some(forced) if forced != Mode::Ascii && mode == Mode::Ascii => FORCED_PENALTY,
            _ => 0,
        }
    }

    /// Calls `f` with every unit `mode` can encode starting at `i`.
    fn units(&self, mode: Mode, i: usize, mut f: impl FnMut(Unit)) {
        let data = self.data;
        let n = data.len();
        match mode {
            Mode::Ascii => {
                let c = data[i];
                let unit = if c.is_ascii_digit() && data.get(i + 1).map_or(false, u8::is_ascii_digit) {
                    Unit { len: 2, cost: 1, next: mode }
                } else if c > 127 {
                    Unit { len: 1, cost: 2, next: mode }
                } else {
                    Unit { len: 1, cost: 1, next: mode }
                };
                f(unit);
            }
            Mode::C40 | Mode::Text => {
                let text = mode == Mode::Text;
                let mut symbols = 0;
                for (j, &c) in data.iter().enumerate().skip(i) {
                    symbols += c40_len(c, text, self.gs1);
                    if symbols % 3 == 0 {
                        f(Unit { len: j + 1 - i, cost: symbols / 3 * 2, next: mode });
                        return;
                    }
                }
                // End of data, two symbols are completed with a shift 1 pad
                if symbols % 3 == 2 {
                    f(Unit { len: n - i, cost: (symbols + 1) / 3 * 2, next: mode });
                }
            }
            Mode::X12 => {
                if let Some(triple) = data.get(i..i + 3) {
                    if triple.iter().all(|&c| x12_value(c).is_some()) {
                        f(Unit { len: 3, cost: 2, next: mode });
                    }
                }
            }
            Mode::Edifact => {
                let run = data[i..].iter().take(4).take_while(|&&c| is_edifact(c)).count();
                if run == 4 {
                    f(Unit { len: 4, cost: 3, next: mode });
                }
                // Up to three values followed by the unlatch, back in ASCII
                for k in 1..=run.min(3) {
                    f(Unit { len: k, cost: (6 * (k as u32 + 1)).div_ceil(8), next: Mode::Ascii });
                }
            }
            Mode::Base256 => {
                if !(self.gs1 && data[i] == GS) {
                    f(Unit { len: 1, cost: 1, next: mode });
                }
            }
        }
    }

    /// Cheapest continuation from position `i` in mode `from`, along with
    /// the chosen target mode and unit. `from` is tried first so it wins
    /// ties.
    fn best(&self, costs: &[[u32; 6]], i: usize, from: Mode) -> Option<(u32, Mode, Unit)> {
        let mut best: Option<(u32, Mode, Unit)> = None;
        let order = core::iter::once(from).chain(Mode::ALL.into_iter().filter(|&m| m != from));
        for target in order.filter(|&m| self.allowed(m)) {
            let base = SWITCH_COST[from.index()][target.index()] + self.penalty(target);
            self.units(target, i, |unit| {
                let cost = base + unit.cost + costs[i + unit.len][unit.next.index()];
                if best.map_or(true, |(b, _, _)| cost < b) {
                    best = Some((cost, target, unit));
                }
            });
        }
        best.filter(|&(cost, _, _)| cost < INFINITE)
    }

    fn plan(&self) -> Result<Vec<Mode>> {
        let n = self.data.len();
        let mut costs = vec![[INFINITE; 6]; n + 1];
        costs[n] = END_COST;
        for i in (0..n).rev() {
            for mode in Mode::ALL {
                costs[i][mode.index()] = self.best(&costs, i, mode).map_or(INFINITE, |(c, _, _)| c);
            }
        }

        let mut plan = Vec::with_capacity(n + 1);
        let mut mode = Mode::Ascii;
        while plan.len() < n {
            let i = plan.len();
            let (_, target, unit) = self.best(&costs, i, mode)
                .ok_or_else(|| EncodeError::InvalidCharacter(format!("no encodation for byte {:#04x} at {i}", self.data[i])))?;
            plan.extend(core::iter::repeat(target).take(unit.len));
            mode = unit.next;
        }
        plan.push(mode);

        trace!("data matrix plan: {} codewords estimated, modes {:?}", costs[0][Mode::Ascii.index()], runs(&plan));
        Ok(plan)
    }
}

fn runs(plan: &[Mode]) -> Vec<(Mode, usize)> {
    let mut runs: Vec<(Mode, usize)> = Vec::new();
    for &mode in &plan[..plan.len().saturating_sub(1)] {
        match runs.last_mut() {
            Some((m, len)) if *m == mode => *len += 1,
            _ => runs.push((mode, 1)),
        }
    }
    runs
}

/// Assigns an encodation mode to every byte of `data`. The returned plan
/// holds one extra entry, the mode active once the data is consumed.
///
/// With `forced` set, only that mode is used plus ASCII where the forced
/// mode can not end the message.
pub fn plan(data: &[u8], gs1: bool, forced: Option<Mode>) -> Result<Vec<Mode>> {
    Planner { data, gs1, forced }.plan()
}
