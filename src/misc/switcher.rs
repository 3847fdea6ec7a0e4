/* =======================================================================
Arctic is a chess engine core.

Licensed under the terms of the GNU General Public License version 3 as
published by the Free Software Foundation. Arctic is distributed in the
hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
See the GNU General Public License for more details.
======================================================================= */

//! A round-robin cooperative yield between two participants, arbitrating
//! between a blocking UI stdin read and a long-running driver task using a
//! pair of semaphores so that exactly one side runs at a time and control
//! passes only on an explicit yield call. The UI/driver themselves are out
//! of scope; this is the bare primitive a driver built on top of this
//! crate could use.

use crossbeam_channel::{bounded, Receiver, Sender};

/// One half of a `Switcher` pair. Call `take_turn` when this participant
/// wants to run; it blocks until the other half calls `yield_turn`.
pub struct Switcher {
    wait_for_turn: Receiver<()>,
    hand_off: Sender<()>,
}

impl Switcher {
    /// Builds both halves of a pair, with `first` given the initial turn.
    pub fn pair() -> (Switcher, Switcher) {
        let (tx_a, rx_a) = bounded::<()>(0);
        let (tx_b, rx_b) = bounded::<()>(0);
        let a = Switcher { wait_for_turn: rx_b, hand_off: tx_a };
        let b = Switcher { wait_for_turn: rx_a, hand_off: tx_b };
        (a, b)
    }

    /// Blocks until the other participant yields to us.
    pub fn take_turn(&self) {
        let _ = self.wait_for_turn.recv();
    }

    /// Passes control to the other participant. Blocks only as long as it
    /// takes the rendezvous channel to hand off; the caller must not call
    /// this again until it has `take_turn`'d back.
    pub fn yield_turn(&self) {
        let _ = self.hand_off.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn control_passes_exactly_one_at_a_time() {
        let (a, b) = Switcher::pair();
        let handle = thread::spawn(move || {
            b.take_turn();
            b.yield_turn();
        });
        a.yield_turn();
        a.take_turn();
        handle.join().unwrap();
    }
}
