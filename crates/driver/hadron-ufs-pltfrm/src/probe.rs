//! Probe sequencing, detach and shutdown.
//!
//! A probe walks a fixed series of stages:
//!
//! `Start → ResourcesMapped → HostAllocated → ClocksParsed → RegulatorsParsed
//! → ResetParsed → PinctrlParsed → ExtconParsed → ScalarsParsed
//! → ControllerInitialized → Attached`
//!
//! Every resource taken along the way is recorded on an [`AcquisitionStack`].
//! A mandatory failure at any stage pops that stack, releasing each resource
//! in reverse order, and leaves the sequence in [`ProbeStage::Aborted`].
//! Optional resources (reset line, pin control) that fail to resolve are
//! recorded as [`Slot::Unavailable`] and the sequence carries on.

use alloc::sync::Arc;
use core::fmt;

use planck_noalloc::vec::ArrayVec;

use crate::clock::parse_clock_info;
use crate::controller::{HbaVariant, UfsController};
use crate::error::UfsError;
use crate::hba::UfsHba;
use crate::platform::PlatformDevice;
use crate::regulator::{RegulatorRole, parse_regulator};
use crate::resource::{IrqLine, MmioRegion, Slot};
use crate::tuning::parse_tuning;
use crate::{kdebug, kerr, kinfo, kwarn};

/// Upper bound on resources one adapter can hold: the register window, the
/// adapter itself, the clock table, four supplies and three claims.
pub const MAX_ACQUISITIONS: usize = 10;

/// Name of the reset line the glue claims.
pub const CORE_RESET: &str = "core_reset";

// ---------------------------------------------------------------------------
// ProbeStage
// ---------------------------------------------------------------------------

/// Progress of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProbeStage {
    /// Nothing acquired yet.
    Start,
    /// Register window mapped and interrupt line found.
    ResourcesMapped,
    /// Adapter allocated by the controller core.
    HostAllocated,
    /// Clock table parsed.
    ClocksParsed,
    /// Supplies parsed.
    RegulatorsParsed,
    /// Reset line resolved or recorded as unavailable.
    ResetParsed,
    /// Pin control resolved or recorded as unavailable.
    PinctrlParsed,
    /// External connector resolved or found absent.
    ExtconParsed,
    /// Scalar tuning parameters parsed.
    ScalarsParsed,
    /// Controller core initialized the hardware.
    ControllerInitialized,
    /// Adapter published as the device's driver data.
    Attached,
    /// A mandatory stage failed and everything was released.
    Aborted,
}

impl ProbeStage {
    /// Returns a short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ResourcesMapped => "resources-mapped",
            Self::HostAllocated => "host-allocated",
            Self::ClocksParsed => "clocks-parsed",
            Self::RegulatorsParsed => "regulators-parsed",
            Self::ResetParsed => "reset-parsed",
            Self::PinctrlParsed => "pinctrl-parsed",
            Self::ExtconParsed => "extcon-parsed",
            Self::ScalarsParsed => "scalars-parsed",
            Self::ControllerInitialized => "controller-initialized",
            Self::Attached => "attached",
            Self::Aborted => "aborted",
        }
    }

    /// Returns `true` for [`Attached`](Self::Attached) and
    /// [`Aborted`](Self::Aborted).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Attached | Self::Aborted)
    }
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Acquisitions
// ---------------------------------------------------------------------------

/// A resource taken during probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// Mapped register window.
    Mmio(MmioRegion),
    /// Adapter allocated by the controller core.
    Host,
    /// Non-empty clock table.
    Clocks,
    /// Supply descriptor for one role.
    Regulator(RegulatorRole),
    /// `core_reset` claim.
    Reset,
    /// Pin-control claim.
    Pinctrl,
    /// Extcon claim.
    Extcon,
}

impl fmt::Display for Acquired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mmio(region) => write!(f, "mmio@{:#x}", region.phys_base()),
            Self::Host => f.write_str("host"),
            Self::Clocks => f.write_str("clocks"),
            Self::Regulator(role) => write!(f, "regulator {}", role.name()),
            Self::Reset => f.write_str(CORE_RESET),
            Self::Pinctrl => f.write_str("pinctrl"),
            Self::Extcon => f.write_str("extcon"),
        }
    }
}

/// Fixed-capacity record of acquired resources, in acquisition order.
pub struct AcquisitionStack {
    entries: ArrayVec<Acquired, MAX_ACQUISITIONS>,
}

impl AcquisitionStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    /// Records an acquisition.
    ///
    /// # Errors
    ///
    /// [`UfsError::NoMemory`] if the stack is full.
    pub fn push(&mut self, entry: Acquired) -> Result<(), UfsError> {
        self.entries
            .try_push(entry)
            .map_err(|_| UfsError::NoMemory)
    }

    /// Removes the most recent acquisition.
    pub fn pop(&mut self) -> Option<Acquired> {
        self.entries.pop()
    }

    /// Returns the recorded acquisitions, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Acquired] {
        self.entries.as_slice()
    }

    /// Returns the number of recorded acquisitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds the acquisition record of an attached adapter from what it
    /// holds.
    fn for_attached(hba: &UfsHba) -> Result<Self, UfsError> {
        let mut stack = Self::new();
        if let Some(region) = hba.mmio {
            stack.push(Acquired::Mmio(region))?;
        }
        stack.push(Acquired::Host)?;
        if !hba.clocks.is_empty() {
            stack.push(Acquired::Clocks)?;
        }
        for vreg in hba.vreg_info.iter() {
            stack.push(Acquired::Regulator(vreg.role))?;
        }
        if hba.core_reset.is_held() {
            stack.push(Acquired::Reset)?;
        }
        if hba.pinctrl.is_held() {
            stack.push(Acquired::Pinctrl)?;
        }
        if hba.extcon.is_held() {
            stack.push(Acquired::Extcon)?;
        }
        Ok(stack)
    }
}

impl Default for AcquisitionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AcquisitionStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Gives one acquired resource back to whoever provided it.
fn release<P, C>(pdev: &P, core: &C, hba: &mut Option<UfsHba>, entry: Acquired)
where
    P: PlatformDevice + ?Sized,
    C: UfsController + ?Sized,
{
    match entry {
        Acquired::Mmio(region) => pdev.iounmap(region),
        Acquired::Host => {
            if let Some(hba) = hba.take() {
                core.dealloc_host(hba);
            }
        }
        Acquired::Clocks => {
            if let Some(hba) = hba.as_mut() {
                hba.clocks.clear();
            }
        }
        Acquired::Regulator(role) => {
            if let Some(hba) = hba.as_mut() {
                hba.vreg_info.take(role);
            }
        }
        Acquired::Reset => {
            if let Some(rst) = hba.as_mut().and_then(|h| h.core_reset.take()) {
                pdev.reset_control_put(rst);
            }
        }
        Acquired::Pinctrl => {
            if let Some(pinctrl) = hba.as_mut().and_then(|h| h.pinctrl.take()) {
                pdev.pinctrl_put(pinctrl);
            }
        }
        Acquired::Extcon => {
            if let Some(edev) = hba.as_mut().and_then(|h| h.extcon.take()) {
                pdev.extcon_put(edev);
            }
        }
    }
    kdebug!("{}: released {}", pdev.name(), entry);
}

/// Pops and releases every entry of `stack`, recording each in `released`.
fn release_all<P, C>(
    pdev: &P,
    core: &C,
    hba: &mut Option<UfsHba>,
    stack: &mut AcquisitionStack,
    released: &mut AcquisitionStack,
) where
    P: PlatformDevice + ?Sized,
    C: UfsController + ?Sized,
{
    while let Some(entry) = stack.pop() {
        release(pdev, core, hba, entry);
        // Same capacity as `stack`, and each entry is popped once.
        let _ = released.push(entry);
    }
}

fn host(hba: &mut Option<UfsHba>) -> Result<&mut UfsHba, UfsError> {
    hba.as_mut().ok_or(UfsError::NoDevice)
}

// ---------------------------------------------------------------------------
// ProbeSequence
// ---------------------------------------------------------------------------

/// One probe attempt for one platform device.
///
/// Runs at most once. After [`run`](Self::run) returns, [`stage`](Self::stage)
/// is terminal and [`released`](Self::released) lists what a failed attempt
/// gave back, most recent first.
pub struct ProbeSequence<'a, P: PlatformDevice + ?Sized, C: UfsController + ?Sized> {
    pdev: &'a P,
    core: &'a C,
    variant: Option<&'static HbaVariant>,
    stage: ProbeStage,
    acquired: AcquisitionStack,
    released: AcquisitionStack,
    hba: Option<UfsHba>,
}

impl<'a, P, C> ProbeSequence<'a, P, C>
where
    P: PlatformDevice + ?Sized,
    C: UfsController + ?Sized,
{
    /// Prepares a probe of `pdev` against `core`.
    #[must_use]
    pub fn new(pdev: &'a P, core: &'a C, variant: Option<&'static HbaVariant>) -> Self {
        Self {
            pdev,
            core,
            variant,
            stage: ProbeStage::Start,
            acquired: AcquisitionStack::new(),
            released: AcquisitionStack::new(),
            hba: None,
        }
    }

    /// Returns the current stage.
    #[must_use]
    pub fn stage(&self) -> ProbeStage {
        self.stage
    }

    /// Returns the resources currently held, oldest first.
    #[must_use]
    pub fn acquired(&self) -> &[Acquired] {
        self.acquired.as_slice()
    }

    /// Returns the resources released by an abort, in release order.
    #[must_use]
    pub fn released(&self) -> &[Acquired] {
        self.released.as_slice()
    }

    /// Runs the probe to a terminal stage.
    ///
    /// On success the adapter is published in the device's driver data,
    /// runtime PM is enabled, and a handle to the adapter is returned.
    ///
    /// # Errors
    ///
    /// - [`UfsError::Busy`] if this sequence already ran or the device
    ///   already has an adapter attached. Nothing is acquired.
    /// - Otherwise the error of the failing mandatory stage, after every
    ///   acquired resource has been released.
    pub fn run(&mut self) -> Result<Arc<UfsHba>, UfsError> {
        if self.stage != ProbeStage::Start || self.pdev.drvdata().is_attached() {
            return Err(UfsError::Busy);
        }
        match self.advance() {
            Ok(hba) => Ok(hba),
            Err(err) => {
                kerr!(
                    "{}: probe failed after {}, err {}",
                    self.pdev.name(),
                    self.stage,
                    err.errno()
                );
                self.unwind();
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> Result<Arc<UfsHba>, UfsError> {
        let (mmio, irq) = self.map_resources()?;
        self.allocate_host(mmio, irq)?;
        self.parse_clocks()?;
        self.parse_regulators()?;
        self.parse_reset()?;
        self.parse_pinctrl()?;
        self.parse_extcon()?;
        self.parse_scalars()?;
        self.init_controller(mmio, irq)?;
        self.attach()
    }

    fn map_resources(&mut self) -> Result<(MmioRegion, IrqLine), UfsError> {
        let mmio = self.pdev.ioremap_resource(0)?;
        self.acquired.push(Acquired::Mmio(mmio))?;

        let irq = self.pdev.irq(0).map_err(|_| {
            kerr!("{}: IRQ resource not available", self.pdev.name());
            UfsError::NoDevice
        })?;

        self.stage = ProbeStage::ResourcesMapped;
        Ok((mmio, irq))
    }

    fn allocate_host(&mut self, mmio: MmioRegion, irq: IrqLine) -> Result<(), UfsError> {
        let mut hba = self.core.alloc_host(self.pdev.name()).map_err(|err| {
            kerr!("{}: allocation failed", self.pdev.name());
            err
        })?;
        hba.variant = self.variant;
        hba.mmio = Some(mmio);
        hba.irq = Some(irq);
        self.hba = Some(hba);
        self.acquired.push(Acquired::Host)?;

        self.stage = ProbeStage::HostAllocated;
        Ok(())
    }

    fn parse_clocks(&mut self) -> Result<(), UfsError> {
        let clocks = parse_clock_info(self.pdev.description()).map_err(|err| {
            kerr!("{}: clock parse failed {}", self.pdev.name(), err.errno());
            err
        })?;
        let hba = host(&mut self.hba)?;
        hba.clocks = clocks;
        if !hba.clocks.is_empty() {
            self.acquired.push(Acquired::Clocks)?;
        }

        self.stage = ProbeStage::ClocksParsed;
        Ok(())
    }

    fn parse_regulators(&mut self) -> Result<(), UfsError> {
        for role in RegulatorRole::ALL {
            let vreg = parse_regulator(self.pdev.description(), role).map_err(|err| {
                kerr!(
                    "{}: regulator init failed {}",
                    self.pdev.name(),
                    err.errno()
                );
                err
            })?;
            if let Some(vreg) = vreg {
                host(&mut self.hba)?.vreg_info.set(vreg);
                self.acquired.push(Acquired::Regulator(role))?;
            }
        }

        self.stage = ProbeStage::RegulatorsParsed;
        Ok(())
    }

    /// Resolution failures are recorded, not returned.
    fn parse_reset(&mut self) -> Result<(), UfsError> {
        let slot = match self.pdev.reset_control_get(CORE_RESET) {
            Ok(rst) => Slot::Held(rst),
            Err(UfsError::NoDevice) => {
                kinfo!("{}: {} not present", self.pdev.name(), CORE_RESET);
                Slot::Absent
            }
            Err(err) => {
                kwarn!(
                    "{}: {} unavailable, err = {}",
                    self.pdev.name(),
                    CORE_RESET,
                    err.errno()
                );
                Slot::Unavailable(err)
            }
        };
        let held = slot.is_held();
        host(&mut self.hba)?.core_reset = slot;
        if held {
            self.acquired.push(Acquired::Reset)?;
        }

        self.stage = ProbeStage::ResetParsed;
        Ok(())
    }

    fn parse_pinctrl(&mut self) -> Result<(), UfsError> {
        let slot = match self.pdev.pinctrl_get() {
            Ok(pinctrl) => Slot::Held(pinctrl),
            Err(UfsError::NoDevice) => Slot::Absent,
            Err(err) => {
                kdebug!(
                    "{}: unable to parse pinctrl data {}",
                    self.pdev.name(),
                    err.errno()
                );
                Slot::Unavailable(err)
            }
        };
        let held = slot.is_held();
        host(&mut self.hba)?.pinctrl = slot;
        if held {
            self.acquired.push(Acquired::Pinctrl)?;
        }

        self.stage = ProbeStage::PinctrlParsed;
        Ok(())
    }

    fn parse_extcon(&mut self) -> Result<(), UfsError> {
        let slot = match self.pdev.extcon_get_by_phandle(0) {
            Ok(edev) => Slot::Held(edev),
            Err(UfsError::NoDevice) => Slot::Absent,
            Err(err) => {
                kerr!(
                    "{}: extcon lookup failed {}",
                    self.pdev.name(),
                    err.errno()
                );
                return Err(err);
            }
        };
        let held = slot.is_held();
        host(&mut self.hba)?.extcon = slot;
        if held {
            self.acquired.push(Acquired::Extcon)?;
        }

        self.stage = ProbeStage::ExtconParsed;
        Ok(())
    }

    fn parse_scalars(&mut self) -> Result<(), UfsError> {
        let tuning = parse_tuning(self.pdev.description());
        host(&mut self.hba)?.tuning = tuning;
        self.pdev.ensure_dma_mask()?;

        self.stage = ProbeStage::ScalarsParsed;
        Ok(())
    }

    fn init_controller(&mut self, mmio: MmioRegion, irq: IrqLine) -> Result<(), UfsError> {
        let hba = host(&mut self.hba)?;
        self.core.init(hba, mmio, irq).map_err(|err| {
            kerr!("{}: initialization failed", self.pdev.name());
            err
        })?;

        self.stage = ProbeStage::ControllerInitialized;
        Ok(())
    }

    fn attach(&mut self) -> Result<Arc<UfsHba>, UfsError> {
        let hba = Arc::new(self.hba.take().ok_or(UfsError::NoDevice)?);
        self.pdev.drvdata().publish(Arc::clone(&hba));

        self.pdev.pm_runtime_set_active();
        self.pdev.pm_runtime_enable();

        self.stage = ProbeStage::Attached;
        kinfo!(
            "{}: attached, {} clocks, {} supplies",
            self.pdev.name(),
            hba.clocks.len(),
            hba.vreg_info.len()
        );
        Ok(hba)
    }

    fn unwind(&mut self) {
        release_all(
            self.pdev,
            self.core,
            &mut self.hba,
            &mut self.acquired,
            &mut self.released,
        );
        self.stage = ProbeStage::Aborted;
    }
}

// ---------------------------------------------------------------------------
// UfsPltfrm
// ---------------------------------------------------------------------------

/// Platform glue for one controller core.
pub struct UfsPltfrm<C> {
    core: C,
    variant: Option<&'static HbaVariant>,
}

impl<C: UfsController> UfsPltfrm<C> {
    /// Creates glue for a generic controller.
    #[must_use]
    pub const fn new(core: C) -> Self {
        Self {
            core,
            variant: None,
        }
    }

    /// Creates glue for a vendor variant.
    #[must_use]
    pub const fn with_variant(core: C, variant: &'static HbaVariant) -> Self {
        Self {
            core,
            variant: Some(variant),
        }
    }

    /// Returns the controller core.
    #[must_use]
    pub fn core(&self) -> &C {
        &self.core
    }

    /// Returns the vendor variant, if any.
    #[must_use]
    pub fn variant(&self) -> Option<&'static HbaVariant> {
        self.variant
    }

    /// Prepares a probe of `pdev` without running it.
    #[must_use]
    pub fn sequence<'a, P>(&'a self, pdev: &'a P) -> ProbeSequence<'a, P, C>
    where
        P: PlatformDevice + ?Sized,
    {
        ProbeSequence::new(pdev, &self.core, self.variant)
    }

    /// Probes and attaches `pdev`.
    ///
    /// # Errors
    ///
    /// See [`ProbeSequence::run`]. `errno()` of the error is the status to
    /// report to the bus.
    pub fn probe<P>(&self, pdev: &P) -> Result<(), UfsError>
    where
        P: PlatformDevice + ?Sized,
    {
        self.sequence(pdev).run().map(|_| ())
    }

    /// Detaches `pdev`: unpublishes the adapter, disables runtime PM, lets
    /// the core tear down, then releases everything the adapter holds in
    /// reverse acquisition order.
    ///
    /// # Errors
    ///
    /// - [`UfsError::NoDevice`] if no adapter is attached. Nothing changes.
    /// - [`UfsError::Busy`] if another handle to the adapter is still alive.
    ///   The adapter stays attached with runtime PM enabled, and `remove`
    ///   can be retried once the handle is dropped.
    pub fn remove<P>(&self, pdev: &P) -> Result<(), UfsError>
    where
        P: PlatformDevice + ?Sized,
    {
        let shared = pdev.drvdata().take().ok_or(UfsError::NoDevice)?;
        let hba = match Arc::try_unwrap(shared) {
            Ok(hba) => hba,
            Err(shared) => {
                kwarn!("{}: adapter still referenced, not detaching", pdev.name());
                pdev.drvdata().publish(shared);
                return Err(UfsError::Busy);
            }
        };

        pdev.pm_runtime_disable();
        self.core.remove(&hba);

        let mut stack = AcquisitionStack::for_attached(&hba)?;
        let mut released = AcquisitionStack::new();
        release_all(pdev, &self.core, &mut Some(hba), &mut stack, &mut released);
        kinfo!("{}: detached", pdev.name());
        Ok(())
    }

    /// Quiesces the attached adapter for power-off. Does nothing if no
    /// adapter is attached.
    pub fn shutdown<P>(&self, pdev: &P)
    where
        P: PlatformDevice + ?Sized,
    {
        match pdev.drvdata().get() {
            Some(hba) => self.core.shutdown(&hba),
            None => kdebug!("{}: shutdown with no adapter", pdev.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regulator::{RegulatorDescriptor, RegulatorFlags};
    use crate::resource::{PinctrlHandle, ResetControl};

    fn region() -> MmioRegion {
        // SAFETY: test-only, never dereferenced.
        unsafe { MmioRegion::new(0x1d8_4000, 0x1d8_4000, 0x3000) }
    }

    #[test]
    fn stage_order_and_terminals() {
        assert!(ProbeStage::Start < ProbeStage::ResourcesMapped);
        assert!(ProbeStage::ExtconParsed < ProbeStage::ScalarsParsed);
        assert!(ProbeStage::ControllerInitialized < ProbeStage::Attached);
        assert!(ProbeStage::Attached.is_terminal());
        assert!(ProbeStage::Aborted.is_terminal());
        assert!(!ProbeStage::ScalarsParsed.is_terminal());
    }

    #[test]
    fn stage_display() {
        use alloc::string::ToString;
        assert_eq!(ProbeStage::Start.to_string(), "start");
        assert_eq!(ProbeStage::Aborted.to_string(), "aborted");
        assert_eq!(
            Acquired::Regulator(RegulatorRole::Vccq2).to_string(),
            "regulator vccq2"
        );
        assert_eq!(Acquired::Mmio(region()).to_string(), "mmio@0x1d84000");
        assert_eq!(Acquired::Reset.to_string(), "core_reset");
    }

    #[test]
    fn stack_is_lifo() {
        let mut stack = AcquisitionStack::new();
        assert!(stack.is_empty());
        stack.push(Acquired::Host).unwrap();
        stack.push(Acquired::Clocks).unwrap();
        stack.push(Acquired::Extcon).unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(Acquired::Extcon));
        assert_eq!(stack.pop(), Some(Acquired::Clocks));
        assert_eq!(stack.pop(), Some(Acquired::Host));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn stack_overflow_is_no_memory() {
        let mut stack = AcquisitionStack::new();
        for _ in 0..MAX_ACQUISITIONS {
            stack.push(Acquired::Clocks).unwrap();
        }
        assert_eq!(stack.push(Acquired::Host), Err(UfsError::NoMemory));
        assert_eq!(stack.len(), MAX_ACQUISITIONS);
    }

    #[test]
    fn attached_adapter_record_follows_acquisition_order() {
        let mut hba = UfsHba::new("ufs");
        hba.mmio = Some(region());
        hba.clocks.push(crate::clock::ClockDescriptor {
            name: "ref_clk".into(),
            min_freq: 1,
            max_freq: 2,
        });
        for role in [RegulatorRole::Vccq, RegulatorRole::Vcc] {
            hba.vreg_info.set(RegulatorDescriptor {
                role,
                voltage: None,
                min_ua: 0,
                max_ua: 0,
                flags: RegulatorFlags::FIXED,
            });
        }
        hba.core_reset = Slot::Held(ResetControl::new(1));
        hba.pinctrl = Slot::Unavailable(UfsError::ProbeDeferred);
        hba.extcon = Slot::Absent;

        let stack = AcquisitionStack::for_attached(&hba).unwrap();
        assert_eq!(
            stack.as_slice(),
            &[
                Acquired::Mmio(region()),
                Acquired::Host,
                Acquired::Clocks,
                Acquired::Regulator(RegulatorRole::Vcc),
                Acquired::Regulator(RegulatorRole::Vccq),
                Acquired::Reset,
            ]
        );

        hba.pinctrl = Slot::Held(PinctrlHandle::new(2));
        let stack = AcquisitionStack::for_attached(&hba).unwrap();
        assert_eq!(stack.as_slice().last(), Some(&Acquired::Pinctrl));
    }
}
