//! # Hooked FSM
//!
//! A finite state machine engine configured with per-state transition tables
//! and entry/exit hooks, and driven either one event at a time or by its own
//! hooks.
//!
//! ## Features
//!
//! - 🔗 **Declarative Graph**: `state(id).accept(event, target)`; states are created on first mention
//! - 🪝 **Hook Overrides**: entry hooks per predecessor, exit hooks per triggering event
//! - 👣 **Step Drive**: the caller supplies every event via [`StepDriver::step`]
//! - 🔁 **Auto Drive**: hooks stage the next event; start/pause/resume/stop control
//! - 🧵 **Reentrant**: hooks may call back into the machine; chains run on a trampoline, not the stack
//! - 📊 **PlantUML Export**: state diagram of the configured graph (debug builds only)
//!
//! ## Quick Start
//!
//! ```rust
//! use hooked_fsm::*;
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum State { A, B, C }
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Event { X, Y, Z }
//!
//! # fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let fsm = AutoDriver::new(State::A);
//! let ctl = fsm.controller();
//! let visited = Arc::new(Mutex::new(Vec::new()));
//! let log = Arc::clone(&visited);
//!
//! fsm.state(State::A).accept(Event::X, State::B);
//! fsm.state(State::B)
//!     .accept(Event::Y, State::C)
//!     .on_enter(move || {
//!         let _ = ctl.feed(Event::Y);
//!     });
//! fsm.state(State::C).on_enter_from(State::B, move || {
//!     log.lock().unwrap().push("C");
//! });
//!
//! fsm.start(Event::X)?;
//! assert_eq!(fsm.current_state(), Some(State::C));
//! assert_eq!(*visited.lock().unwrap(), vec!["C"]);
//!
//! assert!(matches!(fsm.feed(Event::Z), Err(Error::RejectedEvent { .. })));
//! fsm.close();
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod action;
mod builder;
mod driver;
mod error;
mod fsm;
mod graph;

#[cfg(all(feature = "plantuml", debug_assertions))]
mod plantuml;

pub use action::Action;
pub use builder::StateConfig;
pub use driver::{AutoDriver, Controller, StepDriver, WeakStepDriver};
pub use error::{Error, Result};
pub use fsm::Control;

pub mod prelude {
    //! Prelude module for convenient imports
    pub use crate::{
        Action, AutoDriver, Control, Controller, Error, Result, StateConfig, StepDriver,
        WeakStepDriver,
    };
}
