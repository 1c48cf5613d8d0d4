//! Trait definitions for the collaborators of the Fabler script engine.
//!
//! The engine never talks to hardware, databases, or the filesystem directly.
//! Everything it needs from the outside world arrives through these traits:
//!
//! - [`Actuator`]: the robot speech/gesture channel and the tablet game channel
//! - [`Personalization`]: chooses the next story for the participant
//! - [`ScriptLoader`] / [`LineSource`]: lazy, finite sequences of script lines

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{Actuator, LineSource, Personalization, ScriptLoader};
