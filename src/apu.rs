// APU port bridge - mailbox and catch-up contract for the audio coprocessor
//
// The audio coprocessor runs on its own clock and is simulated lazily: the
// bus asks it to catch up to the current master cycle immediately before
// either side touches the four-byte mailbox, and notifies it at the end of
// every video frame. The coprocessor itself lives behind the
// `AudioCoprocessor` trait and is not part of this core.

use crate::emulator::save_state::StateHandler;

/// Four-byte mailbox in each direction, memory-mapped at B-bus $40-$7F
///
/// `input` is written by the CPU and read by the coprocessor; `output` is
/// the reverse. Each port is mirrored every four bytes across the range.
pub struct ApuPorts {
    pub input: [u8; 4],
    pub output: [u8; 4],
}

impl ApuPorts {
    pub fn new() -> Self {
        ApuPorts {
            input: [0; 4],
            output: [0; 4],
        }
    }

    pub fn reset(&mut self) {
        self.input = [0; 4];
        self.output = [0; 4];
    }

    pub(crate) fn handle_state(&mut self, sh: &mut StateHandler) {
        sh.handle_u8_array(&mut self.input);
        sh.handle_u8_array(&mut self.output);
    }
}

impl Default for ApuPorts {
    fn default() -> Self {
        Self::new()
    }
}

/// Contract for an externally supplied audio coprocessor
///
/// Implementations own all SPC/DSP state; the core only schedules them.
pub trait AudioCoprocessor {
    /// Simulate up to `master_cycle` on the shared clock, exchanging data
    /// through the mailbox as needed.
    fn run_cycles(&mut self, master_cycle: u64, ports: &mut ApuPorts);

    /// Called once at the start of every vertical blank.
    fn new_frame(&mut self);

    fn reset(&mut self);
}
