//! Magang HTTP server library (used by the `magang` binary and integration
//! tests).

pub mod gateway;
