//! Power-management callbacks.
//!
//! [`DevPmOps`] is the set of device power callbacks the power-management
//! framework invokes. [`UfsPltfrm`] implements every one of them by looking
//! up the attached adapter and forwarding to the controller core. The shim
//! takes no locks of its own; the core synchronizes against normal I/O.

use crate::controller::UfsController;
use crate::error::UfsError;
use crate::hba::UfsHba;
use crate::platform::PlatformDevice;
use crate::probe::UfsPltfrm;

/// Device power-management callbacks.
///
/// All methods have default implementations that return
/// [`UfsError::Unsupported`], so drivers need only override what they
/// support.
pub trait DevPmOps {
    /// System sleep entry.
    fn suspend<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// System sleep exit.
    fn resume<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Quiesce before a hibernation image is created.
    fn freeze<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Resume after the hibernation image is created.
    fn thaw<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Resume from a hibernation image.
    fn restore<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Runtime suspend.
    fn runtime_suspend<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Runtime resume.
    fn runtime_resume<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }

    /// Runtime idle notification.
    fn runtime_idle<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        let _ = dev;
        Err(UfsError::Unsupported)
    }
}

impl<C: UfsController> UfsPltfrm<C> {
    /// Runs `op` on the adapter attached to `dev`.
    fn with_hba<P>(
        &self,
        dev: &P,
        op: impl FnOnce(&C, &UfsHba) -> Result<(), UfsError>,
    ) -> Result<(), UfsError>
    where
        P: PlatformDevice + ?Sized,
    {
        let hba = dev.drvdata().get().ok_or(UfsError::NoDevice)?;
        op(self.core(), hba.as_ref())
    }
}

impl<C: UfsController> DevPmOps for UfsPltfrm<C> {
    fn suspend<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::system_suspend)
    }

    fn resume<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::system_resume)
    }

    fn freeze<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::system_freeze)
    }

    fn thaw<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::system_thaw)
    }

    fn restore<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::system_restore)
    }

    fn runtime_suspend<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::runtime_suspend)
    }

    fn runtime_resume<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::runtime_resume)
    }

    fn runtime_idle<P: PlatformDevice + ?Sized>(&self, dev: &P) -> Result<(), UfsError> {
        self.with_hba(dev, C::runtime_idle)
    }
}
