//! Drivers that mirror analog readings onto PWM duty cycles.
//!
//! Both drivers follow the same shape: configure nothing themselves (the
//! handles arrive configured), select an input, arm the first conversion
//! and then consume conversion-complete events forever. All per-event work
//! happens in a synchronous transition function over the handle traits,
//! which is what the unit tests drive directly.

mod free_running;
mod round_robin;

pub use free_running::{FreeRunning, FreeRunningConfig};
pub use round_robin::{RoundRobin, RoundRobinConfig};

use crate::hal::{DynConverter, Input};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// A completed conversion attributed to the input that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub input: Input,
    pub value: u8,
}

/// Signal on which a driver publishes each accepted [`Reading`].
///
/// Latest-wins, like the duty register itself: a reading that is not taken
/// before the next one arrives is overwritten.
pub type ReadingSignal = Signal<CriticalSectionRawMutex, Reading>;

/// Routes `input` to the converter and arms the first conversion.
///
/// Reaches the same selector value no matter how often it runs, as long as
/// no conversion-complete event is consumed in between.
fn prime(converter: &mut dyn DynConverter, input: Input) {
    converter.select(input);
    converter.arm();
}


#[cfg(test)]
mod tests {
    use super::testutil::{MockConverter, Op};
    use super::*;
    use crate::hal::Input;

    #[test]
    fn priming_is_idempotent() {
        let mut converter = MockConverter::new(None);
        prime(&mut converter, Input::A);
        let after_first = converter.selected;
        prime(&mut converter, Input::A);
        assert_eq!(converter.selected, after_first);
        assert_eq!(converter.selected, Some(Input::A));
        assert_eq!(
            converter.ops,
            [
                Op::Select(Input::A),
                Op::Arm,
                Op::Select(Input::A),
                Op::Arm
            ]
        );
    }
}
