//! Twilio voice-call provider for callbell.
//!
//! The dialer sends the spoken script inline as TwiML with the call
//! creation request, so no webhook round-trip is needed to place a call.

mod client;
pub mod twiml;

pub use client::{TwilioConfig, TwilioDialer};
