//! Platform resource handles held by a UFS host adapter.
//!
//! [`MmioRegion`] and [`IrqLine`] are the opaque inputs handed to the
//! controller core. [`ResetControl`], [`PinctrlHandle`] and [`ExtconHandle`]
//! are claims minted by the platform and returned to it on release. Optional
//! claims are stored in a [`Slot`] so that "not present" and "lookup failed"
//! are states of their own rather than a null handle.

use crate::error::UfsError;

/// A mapped memory-mapped I/O region of the host controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioRegion {
    phys_base: u64,
    virt_base: u64,
    size: u64,
}

impl MmioRegion {
    /// Creates a region descriptor.
    ///
    /// # Safety
    ///
    /// The caller must ensure `virt_base` maps `phys_base` for `size` bytes
    /// and that the mapping stays valid until the region is released.
    #[must_use]
    pub const unsafe fn new(phys_base: u64, virt_base: u64, size: u64) -> Self {
        Self {
            phys_base,
            virt_base,
            size,
        }
    }

    /// Returns the physical base address.
    #[must_use]
    pub const fn phys_base(&self) -> u64 {
        self.phys_base
    }

    /// Returns the virtual base address.
    #[must_use]
    pub const fn virt_base(&self) -> u64 {
        self.virt_base
    }

    /// Returns the region size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// The interrupt line of the host controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqLine {
    irq: u32,
}

impl IrqLine {
    /// Creates an IRQ line descriptor.
    #[must_use]
    pub const fn new(irq: u32) -> Self {
        Self { irq }
    }

    /// Returns the interrupt number.
    #[must_use]
    pub const fn irq(&self) -> u32 {
        self.irq
    }
}

macro_rules! platform_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq)]
        pub struct $name {
            id: u32,
        }

        impl $name {
            /// Wraps a platform-assigned handle id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self { id }
            }

            /// Returns the platform-assigned handle id.
            #[must_use]
            pub const fn id(&self) -> u32 {
                self.id
            }
        }
    };
}

platform_handle!(
    /// A claimed reset control line (`core_reset`).
    ResetControl
);
platform_handle!(
    /// A claimed pin-control handle.
    PinctrlHandle
);
platform_handle!(
    /// A claimed external-connector (extcon) device.
    ExtconHandle
);

/// Tagged optional resource.
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<T> {
    /// The resource was resolved and is held.
    Held(T),
    /// The description does not declare the resource.
    Absent,
    /// Resolution failed; the failure was tolerated and recorded.
    Unavailable(UfsError),
}

impl<T> Slot<T> {
    /// Returns a reference to the held resource, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Held(value) => Some(value),
            Self::Absent | Self::Unavailable(_) => None,
        }
    }

    /// Returns `true` if a resource is held.
    #[must_use]
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held(_))
    }

    /// Returns the recorded failure, if resolution failed.
    #[must_use]
    pub fn error(&self) -> Option<UfsError> {
        match self {
            Self::Unavailable(err) => Some(*err),
            Self::Held(_) | Self::Absent => None,
        }
    }

    /// Takes the held resource out, leaving [`Slot::Absent`].
    ///
    /// A recorded failure is kept, since there is nothing to release.
    pub fn take(&mut self) -> Option<T> {
        match core::mem::replace(self, Self::Absent) {
            Self::Held(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmio_region_basics() {
        // SAFETY: test-only, no real hardware.
        let region = unsafe { MmioRegion::new(0x01d8_4000, 0xffff_0000_01d8_4000, 0x3000) };
        assert_eq!(region.phys_base(), 0x01d8_4000);
        assert_eq!(region.virt_base(), 0xffff_0000_01d8_4000);
        assert_eq!(region.size(), 0x3000);
    }

    #[test]
    fn irq_line_number() {
        assert_eq!(IrqLine::new(265).irq(), 265);
    }

    #[test]
    fn handle_ids() {
        assert_eq!(ResetControl::new(3).id(), 3);
        assert_eq!(PinctrlHandle::new(4).id(), 4);
        assert_eq!(ExtconHandle::new(5).id(), 5);
    }

    #[test]
    fn slot_states() {
        let held = Slot::Held(ResetControl::new(1));
        assert!(held.is_held());
        assert_eq!(held.get(), Some(&ResetControl::new(1)));
        assert_eq!(held.error(), None);

        let absent: Slot<ResetControl> = Slot::default();
        assert!(!absent.is_held());
        assert_eq!(absent.get(), None);

        let failed: Slot<ResetControl> = Slot::Unavailable(UfsError::ProbeDeferred);
        assert!(!failed.is_held());
        assert_eq!(failed.error(), Some(UfsError::ProbeDeferred));
    }

    #[test]
    fn slot_take() {
        let mut held = Slot::Held(PinctrlHandle::new(9));
        assert_eq!(held.take(), Some(PinctrlHandle::new(9)));
        assert_eq!(held, Slot::Absent);
        assert_eq!(held.take(), None);

        let mut failed: Slot<PinctrlHandle> = Slot::Unavailable(UfsError::NoDevice);
        assert_eq!(failed.take(), None);
        assert_eq!(failed.error(), Some(UfsError::NoDevice));
    }
}
