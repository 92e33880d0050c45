//! Microcontroller specific implementations of the [`hal`](crate::hal)
//! handles.

#[cfg(feature = "rp2040")]
pub mod rp2040;

#[cfg(feature = "rp2040")]
pub use rp2040::AdcConverter;
