use log::trace;

/// Millisecond accumulators for the two animation categories
///
/// These are the category clocks. In `ClockMode::Shared` they are the only
/// clocks, in `ClockMode::PerEntity` each component has its own accumulator
/// as well and these just record when any component in the category fired.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    pub rigid_ms: f32,
    pub skeletal_ms: f32,
}

impl FrameClock {
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.rigid_ms += elapsed_ms;
        self.skeletal_ms += elapsed_ms;
        trace!(
            "clock advance elapsed_ms={} rigid_ms={} skeletal_ms={}",
            elapsed_ms,
            self.rigid_ms,
            self.skeletal_ms
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Fires if `accumulator` has reached `frame_ms`, zeroing it when it does.
/// Time past the threshold is dropped rather than carried into the next
/// frame.
pub(crate) fn gate(accumulator: &mut f32, frame_ms: f32) -> bool {
    if *accumulator >= frame_ms {
        *accumulator = 0.0;
        true
    } else {
        false
    }
}
