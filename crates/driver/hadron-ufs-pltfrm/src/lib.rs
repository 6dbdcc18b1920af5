//! Platform glue for UFS host controllers.
//!
//! Binds a platform device's hardware description (clocks, supplies, reset
//! line, pin control, external connector and tuning hints) to a
//! [`UfsHba`], runs the staged probe that either attaches the adapter or
//! releases everything it took, and forwards power-management callbacks to
//! the controller core.
//!
//! The controller core and the platform bus are collaborators expressed as
//! the [`UfsController`] and [`PlatformDevice`] traits.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod log;

pub mod clock;
pub mod controller;
pub mod error;
pub mod hba;
pub mod hwdesc;
pub mod platform;
pub mod pm;
pub mod probe;
pub mod regulator;
pub mod resource;
pub mod tuning;

pub use controller::{HbaVariant, UfsController};
pub use error::UfsError;
pub use hba::UfsHba;
pub use hwdesc::{HwDescription, PropError, StaticDescription};
pub use platform::{DrvData, PlatformDevice};
pub use pm::DevPmOps;
pub use probe::{ProbeSequence, ProbeStage, UfsPltfrm};
