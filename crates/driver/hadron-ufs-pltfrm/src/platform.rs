//! The platform device, as seen from the glue.
//!
//! [`PlatformDevice`] is the resource-lookup collaborator: it owns the
//! hardware description, maps registers, resolves interrupt lines and mints
//! reset, pin-control and extcon claims. Every claim it hands out is handed
//! back through the matching `*_put` method when the glue is done with it.

use alloc::sync::Arc;

use spin::RwLock;

use crate::error::UfsError;
use crate::hba::UfsHba;
use crate::hwdesc::HwDescription;
use crate::resource::{ExtconHandle, IrqLine, MmioRegion, PinctrlHandle, ResetControl};

/// Resource lookups offered by the bus a UFS controller sits on.
///
/// Lookups that find nothing return [`UfsError::NoDevice`]; the glue treats
/// that as "not declared" for optional resources.
pub trait PlatformDevice {
    /// The hardware description backing this device.
    type Description: HwDescription + ?Sized;

    /// Returns the device name used in log messages.
    fn name(&self) -> &str;

    /// Returns the hardware description, or `None` for a device that was
    /// not created from one.
    fn description(&self) -> Option<&Self::Description>;

    /// Maps memory resource `index`.
    fn ioremap_resource(&self, index: usize) -> Result<MmioRegion, UfsError>;

    /// Unmaps a region returned by [`ioremap_resource`](Self::ioremap_resource).
    fn iounmap(&self, region: MmioRegion);

    /// Looks up interrupt `index`.
    fn irq(&self, index: usize) -> Result<IrqLine, UfsError>;

    /// Claims the named reset control.
    fn reset_control_get(&self, name: &str) -> Result<ResetControl, UfsError>;

    /// Releases a reset control claim.
    fn reset_control_put(&self, rst: ResetControl);

    /// Claims the pin-control handle and selects its default state.
    fn pinctrl_get(&self) -> Result<PinctrlHandle, UfsError>;

    /// Releases a pin-control claim.
    fn pinctrl_put(&self, pinctrl: PinctrlHandle);

    /// Claims the external connector referenced by phandle `index` of the
    /// `extcon` property.
    fn extcon_get_by_phandle(&self, index: usize) -> Result<ExtconHandle, UfsError>;

    /// Releases an extcon claim.
    fn extcon_put(&self, edev: ExtconHandle);

    /// Makes sure the device has a DMA mask, installing the platform default
    /// if none is set.
    fn ensure_dma_mask(&self) -> Result<(), UfsError> {
        Ok(())
    }

    /// Returns the device's driver-private data slot.
    fn drvdata(&self) -> &DrvData;

    /// Marks the device as runtime-active.
    fn pm_runtime_set_active(&self) {}

    /// Enables runtime power management for the device.
    fn pm_runtime_enable(&self) {}

    /// Disables runtime power management for the device.
    fn pm_runtime_disable(&self) {}
}

/// Driver-private data slot of a platform device.
///
/// Holds the attached adapter. Empty until a probe succeeds and again after
/// the device is detached.
#[derive(Default)]
pub struct DrvData {
    hba: RwLock<Option<Arc<UfsHba>>>,
}

impl DrvData {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hba: RwLock::new(None),
        }
    }

    /// Publishes an adapter, returning any adapter previously stored.
    pub fn publish(&self, hba: Arc<UfsHba>) -> Option<Arc<UfsHba>> {
        self.hba.write().replace(hba)
    }

    /// Returns a handle to the attached adapter.
    #[must_use]
    pub fn get(&self) -> Option<Arc<UfsHba>> {
        self.hba.read().clone()
    }

    /// Removes and returns the attached adapter.
    pub fn take(&self) -> Option<Arc<UfsHba>> {
        self.hba.write().take()
    }

    /// Returns `true` if an adapter is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.hba.read().is_some()
    }
}

impl core::fmt::Debug for DrvData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrvData")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_empty() {
        let data = DrvData::new();
        assert!(!data.is_attached());
        assert!(data.get().is_none());
        assert!(data.take().is_none());
    }

    #[test]
    fn publish_get_take() {
        let data = DrvData::new();
        let hba = Arc::new(UfsHba::new("ufs"));
        assert!(data.publish(Arc::clone(&hba)).is_none());
        assert!(data.is_attached());

        let shared = data.get().unwrap();
        assert!(Arc::ptr_eq(&shared, &hba));
        drop(shared);

        let taken = data.take().unwrap();
        assert!(Arc::ptr_eq(&taken, &hba));
        assert!(!data.is_attached());
    }

    #[test]
    fn publish_replaces() {
        let data = DrvData::new();
        data.publish(Arc::new(UfsHba::new("first")));
        let old = data.publish(Arc::new(UfsHba::new("second"))).unwrap();
        assert_eq!(old.dev_name, "first");
        assert_eq!(data.get().unwrap().dev_name, "second");
    }
}
