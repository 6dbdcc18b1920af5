//! The host adapter record.
//!
//! [`UfsHba`] collects everything probe learned about one controller
//! instance. It is created by the controller core, populated by the probe
//! sequence, and once attached shared between the core and the platform
//! device through [`DrvData`](crate::platform::DrvData).

use alloc::string::String;
use alloc::vec::Vec;

use crate::clock::ClockDescriptor;
use crate::controller::HbaVariant;
use crate::regulator::VregInfo;
use crate::resource::{ExtconHandle, IrqLine, MmioRegion, PinctrlHandle, ResetControl, Slot};
use crate::tuning::HbaTuning;

/// A UFS host adapter.
#[derive(Debug)]
pub struct UfsHba {
    /// Name of the platform device the adapter belongs to.
    pub dev_name: String,
    /// Vendor variant operations, if the matched platform supplied any.
    pub variant: Option<&'static HbaVariant>,
    /// Register window handed to the core.
    pub mmio: Option<MmioRegion>,
    /// Interrupt line handed to the core.
    pub irq: Option<IrqLine>,
    /// Controller clocks in declaration order.
    pub clocks: Vec<ClockDescriptor>,
    /// Supply descriptors indexed by role.
    pub vreg_info: VregInfo,
    /// The `core_reset` line.
    pub core_reset: Slot<ResetControl>,
    /// Pin-control handle.
    pub pinctrl: Slot<PinctrlHandle>,
    /// External connector used for card-detect.
    pub extcon: Slot<ExtconHandle>,
    /// Scalar tuning parameters.
    pub tuning: HbaTuning,
}

impl UfsHba {
    /// Creates an empty adapter for the named device.
    #[must_use]
    pub fn new(dev_name: &str) -> Self {
        Self {
            dev_name: String::from(dev_name),
            variant: None,
            mmio: None,
            irq: None,
            clocks: Vec::new(),
            vreg_info: VregInfo::default(),
            core_reset: Slot::Absent,
            pinctrl: Slot::Absent,
            extcon: Slot::Absent,
            tuning: HbaTuning::default(),
        }
    }

    /// Returns `true` if the adapter holds no platform claims.
    #[must_use]
    pub fn holds_no_claims(&self) -> bool {
        !self.core_reset.is_held() && !self.pinctrl.is_held() && !self.extcon.is_held()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adapter_is_empty() {
        let hba = UfsHba::new("1d84000.ufshc");
        assert_eq!(hba.dev_name, "1d84000.ufshc");
        assert!(hba.variant.is_none());
        assert!(hba.mmio.is_none());
        assert!(hba.clocks.is_empty());
        assert!(hba.vreg_info.is_empty());
        assert!(hba.holds_no_claims());
        assert_eq!(hba.tuning, HbaTuning::default());
    }

    #[test]
    fn claims_are_tracked() {
        let mut hba = UfsHba::new("ufs");
        hba.pinctrl = Slot::Held(PinctrlHandle::new(1));
        assert!(!hba.holds_no_claims());
        hba.pinctrl.take();
        assert!(hba.holds_no_claims());
    }
}
