//! Handle traits for the hardware touched by the drivers.
//!
//! Each trait stands for one register of the original control surface: the
//! analog multiplexer and conversion trigger behind [`Converter`], the PWM
//! compare register behind [`DutyOutput`]. Drivers only ever see these
//! handles, so a mock can stand in for the silicon.

use crate::util::error;
use alloc::boxed::Box;
use core::future::Future;
use core::pin::Pin;

/// Identifies which analog input is routed to the converter.
///
/// Exactly one input is routed at any time. The round-robin driver
/// alternates strictly between the two values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    #[default]
    A,
    B,
}

impl Input {
    /// The input that is sampled after this one in round-robin order.
    pub const fn other(self) -> Self {
        match self {
            Input::A => Input::B,
            Input::B => Input::A,
        }
    }
}

/// An analog-to-digital converter behind an input multiplexer.
///
/// The converter is configured once before a driver task starts; from then
/// on the driver task is its only writer, which is what makes the lock-free
/// single-writer discipline of the drivers sound.
pub trait Converter {
    /// Routes `input` to the converter.
    fn select(&mut self, input: Input);

    /// The input currently routed to the converter.
    ///
    /// `None` means the multiplexer holds a value outside the known
    /// inputs. The drivers treat that as a no-op and keep sampling.
    fn selected(&self) -> Option<Input>;

    /// Arms a single conversion on the selected input.
    fn arm(&mut self);

    /// Waits for the next conversion-complete event.
    ///
    /// Resolves with the most significant byte of the conversion result.
    /// A completion that fires before this is called must stay pending
    /// until observed; it is coalesced, not lost.
    fn complete(&mut self) -> impl Future<Output = u8>;
}

/// A dynamic dispatch version of [`Converter`].
pub trait DynConverter {
    fn select(&mut self, input: Input);
    fn selected(&self) -> Option<Input>;
    fn arm(&mut self);
    fn complete(&mut self) -> Pin<Box<dyn Future<Output = u8> + '_>>;
}

impl<T: Converter> DynConverter for T {
    fn select(&mut self, input: Input) {
        Converter::select(self, input);
    }

    fn selected(&self) -> Option<Input> {
        Converter::selected(self)
    }

    fn arm(&mut self) {
        Converter::arm(self);
    }

    fn complete(&mut self) -> Pin<Box<dyn Future<Output = u8> + '_>> {
        Box::pin(Converter::complete(self))
    }
}

/// The duty-cycle compare value of one PWM output.
///
/// Written only by a driver task; the timer hardware reads it continuously.
pub trait DutyOutput {
    /// Sets the fraction of each PWM period the output is held high, with
    /// 255 meaning the full period.
    fn set_duty(&mut self, duty: u8);
}

impl<T: embedded_hal::pwm::SetDutyCycle> DutyOutput for T {
    fn set_duty(&mut self, duty: u8) {
        if self.set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX)).is_err() {
            error!("Failed to set duty cycle");
        }
    }
}

/// The frequency of a PWM output whose counter wraps after 256 ticks.
pub const fn pwm_frequency(clock_hz: u32, prescale: u32) -> u32 {
    clock_hz / (prescale * 256)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pwm {
        max: u16,
        compare: u16,
    }

    impl embedded_hal::pwm::ErrorType for Pwm {
        type Error = core::convert::Infallible;
    }

    impl embedded_hal::pwm::SetDutyCycle for Pwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.compare = duty;
            Ok(())
        }
    }

    #[test]
    fn round_robin_order_is_closed_over_two_inputs() {
        assert_eq!(Input::A.other(), Input::B);
        assert_eq!(Input::B.other(), Input::A);
        assert_eq!(Input::A.other().other(), Input::A);
    }

    #[test]
    fn duty_bounds_map_to_pwm_bounds() {
        let mut pwm = Pwm { max: 999, compare: 500 };
        DutyOutput::set_duty(&mut pwm, 0);
        assert_eq!(pwm.compare, 0);
        DutyOutput::set_duty(&mut pwm, 255);
        assert_eq!(pwm.compare, 999);
    }

    #[test]
    fn eight_bit_pwm_passes_duty_through() {
        let mut pwm = Pwm { max: 255, compare: 0 };
        for duty in [0u8, 10, 128, 200, 255] {
            DutyOutput::set_duty(&mut pwm, duty);
            assert_eq!(pwm.compare, u16::from(duty));
        }
    }

    #[test]
    fn pwm_frequency_matches_clock_and_prescale() {
        // 1 MHz device clock without prescaling, as in the original hardware.
        assert_eq!(pwm_frequency(1_000_000, 1), 3906);
        assert_eq!(pwm_frequency(1_000_000, 8), 488);
        // Same inputs always derive the same timing.
        assert_eq!(pwm_frequency(1_000_000, 8), pwm_frequency(1_000_000, 8));
    }
}
