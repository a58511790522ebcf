//! Reference simulated components for the cosim driving engine.
//!
//! These are self-contained implementations of the component interface,
//! mirroring the standard articles used to exercise co-simulation drivers:
//! a typed feedthrough, a bouncing ball, and the Dahlquist test equation.

pub mod components;
