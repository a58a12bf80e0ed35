//! Headless driver for the abbey walk
//!
//! Replays a scripted input sequence through [`abbey::SimulationState`] at a
//! fixed frame rate and hands the results to a [`presenter::Presenter`].

pub mod presenter;
pub mod runtime;
pub mod script;

pub use presenter::{JsonPresenter, LogPresenter, Presenter};
pub use runtime::{ReplayRuntime, ReplayStats};
pub use script::{Script, Step};
