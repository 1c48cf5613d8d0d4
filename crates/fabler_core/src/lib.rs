//! Core data types for the Fabler script engine.
//!
//! This crate provides the vocabulary shared by the engine and its
//! collaborators: response banks, user response categories, the objects
//! loaded onto the tablet, and the command names both actuators understand.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
mod bank;
mod object;
mod response;
mod story;

pub use bank::ResponseBank;
pub use object::{ObjectDescriptor, StorySetup};
pub use response::{ResponseCategory, WaitCondition};
pub use story::StoryDetails;
