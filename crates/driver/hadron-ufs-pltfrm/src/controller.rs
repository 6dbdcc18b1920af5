//! The generic UFS host controller core, as seen from the platform glue.
//!
//! The core owns adapter allocation, controller bring-up and every power
//! transition. The glue only parses the description, hands the adapter over
//! and forwards callbacks.
//!
//! The core receives the adapter by reference for every call. After a
//! successful probe the adapter lives in an [`Arc`](alloc::sync::Arc) held
//! by the platform device's driver data; the core may clone that handle if
//! it needs to keep the adapter beyond a call.

use crate::error::UfsError;
use crate::hba::UfsHba;
use crate::resource::{IrqLine, MmioRegion};

/// Vendor-specific variant of the host controller.
///
/// Selected by the platform's match table and passed through probe unchanged.
#[derive(Debug, PartialEq, Eq)]
pub struct HbaVariant {
    /// Variant name, e.g. the compatible string it matched.
    pub name: &'static str,
}

/// Operations the controller core provides.
///
/// Power-transition methods have default implementations returning
/// [`UfsError::Unsupported`], so a core need only override what it
/// supports.
pub trait UfsController: Send + Sync {
    /// Allocates an adapter for the named device.
    fn alloc_host(&self, dev_name: &str) -> Result<UfsHba, UfsError>;

    /// Frees an adapter that was never attached or has been detached.
    fn dealloc_host(&self, hba: UfsHba);

    /// Brings up the controller behind `mmio`, servicing `irq`.
    ///
    /// On error the core must have undone its own work; the glue releases
    /// everything it acquired.
    fn init(&self, hba: &UfsHba, mmio: MmioRegion, irq: IrqLine) -> Result<(), UfsError>;

    /// Tears down a controller initialized by [`init`](Self::init).
    fn remove(&self, hba: &UfsHba);

    /// Quiesces the controller for system power-off.
    fn shutdown(&self, hba: &UfsHba) {
        let _ = hba;
    }

    /// System sleep entry.
    fn system_suspend(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// System sleep exit.
    fn system_resume(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Hibernation image creation: quiesce.
    fn system_freeze(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Hibernation image creation: resume after the image is written.
    fn system_thaw(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Resume from a hibernation image.
    fn system_restore(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Runtime suspend.
    fn runtime_suspend(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Runtime resume.
    fn runtime_resume(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }

    /// Runtime idle notification. `Ok(())` allows a runtime suspend.
    fn runtime_idle(&self, hba: &UfsHba) -> Result<(), UfsError> {
        let _ = hba;
        Err(UfsError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl UfsController for Minimal {
        fn alloc_host(&self, dev_name: &str) -> Result<UfsHba, UfsError> {
            Ok(UfsHba::new(dev_name))
        }
        fn dealloc_host(&self, _hba: UfsHba) {}
        fn init(&self, _hba: &UfsHba, _mmio: MmioRegion, _irq: IrqLine) -> Result<(), UfsError> {
            Ok(())
        }
        fn remove(&self, _hba: &UfsHba) {}
    }

    #[test]
    fn power_transitions_default_to_unsupported() {
        let core = Minimal;
        let hba = core.alloc_host("ufs").unwrap();
        assert_eq!(core.system_suspend(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.system_resume(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.system_freeze(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.system_thaw(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.system_restore(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.runtime_suspend(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.runtime_resume(&hba), Err(UfsError::Unsupported));
        assert_eq!(core.runtime_idle(&hba), Err(UfsError::Unsupported));
        core.shutdown(&hba);
        core.dealloc_host(hba);
    }
}
