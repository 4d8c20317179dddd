//! Floating particle animation.
//!
//! Particles wander across a pixel surface toward random destinations,
//! render as additive squares and leave fading trails. The
//! [`AnimationController`] owns one surface and its particles, and is
//! driven frame by frame by the host.

mod color;
mod controller;
mod frame;
mod particle;
mod surface;
mod view;

pub use color::{Rgba, hsla};
pub use controller::AnimationController;
pub use frame::{Clock, FrameGate, FrameTicket, ManualClock, SystemClock};
pub use particle::Particle;
pub use surface::{CompositeOp, Surface};
pub use view::SurfaceView;
