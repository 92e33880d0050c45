//! RP2040 implementations of the hardware handles, on top of `embassy-rp`.
//!
//! The PWM slices count to 255 so an 8-bit sample lands in the compare
//! register unmodified. The ADC converts at 12 bits; [`AdcConverter`]
//! keeps the most significant byte.

use crate::hal::{Converter, Input};
use crate::util::{error, unwrap};
use embassy_rp::Peri;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::pwm::{ChannelAPin, ChannelBPin, Config, Pwm, PwmOutput, Slice};
use fixed::traits::ToFixed;

/// [`Converter`] over the RP2040 ADC with a two-input multiplexer.
///
/// The async ADC driver starts a conversion when its read future is
/// polled, so [`Converter::arm`] has nothing left to trigger here; the
/// conversion-per-event discipline of the drivers is preserved because
/// every `complete` call performs exactly one conversion.
pub struct AdcConverter {
    adc: Adc<'static, Async>,
    input_a: Channel<'static>,
    input_b: Channel<'static>,
    selected: Input,
}

impl AdcConverter {
    pub fn new(
        adc: Adc<'static, Async>,
        input_a: Channel<'static>,
        input_b: Channel<'static>,
    ) -> Self {
        Self {
            adc,
            input_a,
            input_b,
            selected: Input::A,
        }
    }
}

impl Converter for AdcConverter {
    fn select(&mut self, input: Input) {
        self.selected = input;
    }

    fn selected(&self) -> Option<Input> {
        Some(self.selected)
    }

    fn arm(&mut self) {}

    async fn complete(&mut self) -> u8 {
        let input = match self.selected {
            Input::A => &mut self.input_a,
            Input::B => &mut self.input_b,
        };
        loop {
            match self.adc.read(input).await {
                Ok(raw) => break (raw >> 4) as u8,
                Err(_) => error!("ADC conversion failed"),
            }
        }
    }
}

/// Configures a PWM slice for 8-bit duty cycles on both pins.
///
/// The outputs run at the system clock divided by `divider * 256`.
pub fn pwm_outputs<'d, T: Slice>(
    slice: Peri<'d, T>,
    pin_a: Peri<'d, impl ChannelAPin<T>>,
    pin_b: Peri<'d, impl ChannelBPin<T>>,
    divider: u8,
) -> (PwmOutput<'d>, PwmOutput<'d>) {
    let pwm = Pwm::new_output_ab(slice, pin_a, pin_b, eight_bit_config(divider));
    let (output_a, output_b) = pwm.split();
    (unwrap!(output_a), unwrap!(output_b))
}

/// Configures a PWM slice for 8-bit duty cycles on its A pin.
pub fn pwm_output_a<'d, T: Slice>(
    slice: Peri<'d, T>,
    pin_a: Peri<'d, impl ChannelAPin<T>>,
    divider: u8,
) -> PwmOutput<'d> {
    let pwm = Pwm::new_output_a(slice, pin_a, eight_bit_config(divider));
    let (output_a, _) = pwm.split();
    unwrap!(output_a)
}

fn eight_bit_config(divider: u8) -> Config {
    let mut config = Config::default();
    config.top = u16::from(u8::MAX);
    config.divider = divider.to_fixed();
    config
}
