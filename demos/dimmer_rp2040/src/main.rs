//! Two potentiometers on GPIO 26/27 dim two LEDs on GPIO 8/9.

#![no_main]
#![no_std]

use core::mem::MaybeUninit;
use dimmer::mcu::rp2040::{AdcConverter, pwm_outputs};
use dimmer::{Reading, RoundRobin, RoundRobinConfig};
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_alloc::LlffHeap as Heap;
use {defmt_rtt as _, panic_probe as _};

#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 8 * 1024;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => InterruptHandler;
});

static READINGS: Signal<CriticalSectionRawMutex, Reading> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    unsafe { HEAP.init(&raw mut HEAP_MEM as usize, HEAP_SIZE) }

    let p = embassy_rp::init(Default::default());

    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let dial_a = Channel::new_pin(p.PIN_26, Pull::None);
    let dial_b = Channel::new_pin(p.PIN_27, Pull::None);
    let converter = AdcConverter::new(adc, dial_a, dial_b);

    // Slice 4 drives GPIO 8/9. With divider 8 the LEDs are PWMed at
    // 125 MHz / (8 * 256) ≈ 61 kHz.
    let (led_a, led_b) = pwm_outputs(p.PWM_SLICE4, p.PIN_8, p.PIN_9, 8);

    RoundRobin::new(converter, led_a, led_b).run(
        RoundRobinConfig {
            readings: Some(&READINGS),
            ..Default::default()
        },
        spawner,
    );

    loop {
        let reading = READINGS.wait().await;
        defmt::info!("dial {}: {}", reading.input, reading.value);
    }
}
