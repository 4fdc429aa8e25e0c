//! Archive session integration tests
//!
//! End-to-end coverage of the archiving protocol: session lifecycle and
//! state-machine legality, file enumeration guarantees, and low-water
//! behavior with concurrent sessions.

mod common;

mod properties;
mod session;
