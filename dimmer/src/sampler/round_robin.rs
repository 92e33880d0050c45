use super::{Reading, ReadingSignal, prime};
use crate::hal::{Converter, DutyOutput, DynConverter, Input};
use crate::util::{debug, unwrap, warn};
use alloc::boxed::Box;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

/// Configuration for the [`RoundRobin`] driver.
#[derive(Clone, Copy, Default)]
pub struct RoundRobinConfig {
    /// The input sampled first.
    pub initial: Input,
    /// Pause inserted after each conversion-complete event.
    ///
    /// `None` re-arms back to back, i.e. the converter runs as fast as it
    /// can.
    pub interval: Option<Duration>,
    /// Signal on which each accepted reading is published.
    pub readings: Option<&'static ReadingSignal>,
}

/// Alternates single-shot conversions between two analog inputs and
/// mirrors each result onto the duty output owned by the input that
/// produced it.
///
/// The converter must be configured for single-shot conversions: the
/// driver arms every conversion itself, one per consumed event, so exactly
/// one conversion is ever in flight.
pub struct RoundRobin<C, A, B> {
    converter: C,
    output_a: A,
    output_b: B,
}

impl<C, A, B> RoundRobin<C, A, B>
where
    C: Converter + 'static,
    A: DutyOutput + 'static,
    B: DutyOutput + 'static,
{
    pub const fn new(converter: C, output_a: A, output_b: B) -> Self {
        Self {
            converter,
            output_a,
            output_b,
        }
    }

    /// Arms the first conversion and spawns the driver task.
    ///
    /// The handles move into the task, which is their only writer from
    /// here on.
    pub fn run(self, config: RoundRobinConfig, spawner: Spawner) {
        let converter: Box<dyn DynConverter> = Box::new(self.converter);
        let output_a: Box<dyn DutyOutput> = Box::new(self.output_a);
        let output_b: Box<dyn DutyOutput> = Box::new(self.output_b);
        unwrap!(spawner.spawn(task(converter, output_a, output_b, config)));

        #[embassy_executor::task]
        async fn task(
            mut converter: Box<dyn DynConverter>,
            mut output_a: Box<dyn DutyOutput>,
            mut output_b: Box<dyn DutyOutput>,
            config: RoundRobinConfig,
        ) {
            prime(converter.as_mut(), config.initial);
            loop {
                service(
                    converter.as_mut(),
                    output_a.as_mut(),
                    output_b.as_mut(),
                    &config,
                )
                .await;
                if let Some(interval) = config.interval {
                    Timer::after(interval).await;
                }
            }
        }
    }
}

/// Consumes one conversion-complete event.
async fn service(
    converter: &mut dyn DynConverter,
    output_a: &mut dyn DutyOutput,
    output_b: &mut dyn DutyOutput,
    config: &RoundRobinConfig,
) {
    let value = converter.complete().await;
    step(value, converter, output_a, output_b, config);
}

/// The transition taken on every conversion-complete event.
///
/// Writes the result into the duty output owned by the currently selected
/// input, flips the selector to the other input and arms the next
/// conversion. The arm happens in every branch so the sampling chain
/// cannot stall.
fn step(
    value: u8,
    converter: &mut dyn DynConverter,
    output_a: &mut dyn DutyOutput,
    output_b: &mut dyn DutyOutput,
    config: &RoundRobinConfig,
) {
    match converter.selected() {
        Some(input @ Input::A) => {
            output_a.set_duty(value);
            converter.select(input.other());
            publish(config, input, value);
        }
        Some(input @ Input::B) => {
            output_b.set_duty(value);
            converter.select(input.other());
            publish(config, input, value);
        }
        // Unknown multiplexer value: touch nothing but the trigger. The
        // selector is deliberately not forced back to a known input.
        None => warn!("conversion completed with no known input selected"),
    }
    converter.arm();
}

fn publish(config: &RoundRobinConfig, input: Input, value: u8) {
    debug!("input {}: {}", input, value);
    if let Some(signal) = config.readings {
        signal.signal(Reading { input, value });
    }
}
