//! Dry-run platform bus and controller core.
//!
//! Neither touches hardware. The platform answers lookups from the board
//! file and keeps a trace of every claim and release so the tool can show
//! what a probe took and gave back.

use std::cell::{Cell, RefCell};

use hadron_ufs_pltfrm::resource::{
    ExtconHandle, IrqLine, MmioRegion, PinctrlHandle, ResetControl,
};
use hadron_ufs_pltfrm::{
    DrvData, PlatformDevice, StaticDescription, UfsController, UfsError, UfsHba,
};

use crate::board::{Availability, BoardFile};

/// Platform device backed by a board file.
pub struct DryRunPlatform {
    name: String,
    desc: Option<StaticDescription>,
    mmio: Option<[u64; 2]>,
    irq: Option<u32>,
    reset: Availability,
    pinctrl: Availability,
    extcon: Availability,
    drvdata: DrvData,
    trace: RefCell<Vec<String>>,
    outstanding: Cell<usize>,
    next_id: Cell<u32>,
    runtime_pm: Cell<bool>,
}

impl DryRunPlatform {
    /// Creates a platform device for `board`.
    pub fn new(board: &BoardFile) -> Self {
        Self {
            name: board.name.clone(),
            desc: board.description(),
            mmio: board.resources.mmio,
            irq: board.resources.irq,
            reset: board.resources.reset,
            pinctrl: board.resources.pinctrl,
            extcon: board.resources.extcon,
            drvdata: DrvData::new(),
            trace: RefCell::new(Vec::new()),
            outstanding: Cell::new(0),
            next_id: Cell::new(1),
            runtime_pm: Cell::new(false),
        }
    }

    /// Returns the claim and release trace.
    pub fn trace(&self) -> Vec<String> {
        self.trace.borrow().clone()
    }

    /// Returns the number of claims not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Returns `true` if runtime PM is enabled.
    pub fn runtime_pm_enabled(&self) -> bool {
        self.runtime_pm.get()
    }

    fn record(&self, event: String) {
        self.trace.borrow_mut().push(event);
    }

    fn claim<T>(&self, what: &str, answer: Availability, make: fn(u32) -> T) -> Result<T, UfsError> {
        match answer {
            Availability::Present => {
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                self.outstanding.set(self.outstanding.get() + 1);
                self.record(format!("get {what} #{id}"));
                Ok(make(id))
            }
            Availability::Absent => Err(UfsError::NoDevice),
            Availability::Fail(err) => Err(err),
        }
    }

    fn put(&self, what: &str, id: u32) {
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
        self.record(format!("put {what} #{id}"));
    }
}

impl PlatformDevice for DryRunPlatform {
    type Description = StaticDescription;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&StaticDescription> {
        self.desc.as_ref()
    }

    fn ioremap_resource(&self, index: usize) -> Result<MmioRegion, UfsError> {
        let [base, size] = match (index, self.mmio) {
            (0, Some(window)) => window,
            _ => return Err(UfsError::InvalidArgument),
        };
        self.outstanding.set(self.outstanding.get() + 1);
        self.record(format!("map mmio {base:#x}+{size:#x}"));
        // SAFETY: identity "mapping"; the dry run never dereferences it.
        Ok(unsafe { MmioRegion::new(base, base, size) })
    }

    fn iounmap(&self, region: MmioRegion) {
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
        self.record(format!("unmap mmio {:#x}", region.phys_base()));
    }

    fn irq(&self, index: usize) -> Result<IrqLine, UfsError> {
        match (index, self.irq) {
            (0, Some(irq)) => Ok(IrqLine::new(irq)),
            _ => Err(UfsError::Other(6)),
        }
    }

    fn reset_control_get(&self, name: &str) -> Result<ResetControl, UfsError> {
        self.claim(name, self.reset, ResetControl::new)
    }

    fn reset_control_put(&self, rst: ResetControl) {
        self.put("reset", rst.id());
    }

    fn pinctrl_get(&self) -> Result<PinctrlHandle, UfsError> {
        self.claim("pinctrl", self.pinctrl, PinctrlHandle::new)
    }

    fn pinctrl_put(&self, pinctrl: PinctrlHandle) {
        self.put("pinctrl", pinctrl.id());
    }

    fn extcon_get_by_phandle(&self, _index: usize) -> Result<ExtconHandle, UfsError> {
        self.claim("extcon", self.extcon, ExtconHandle::new)
    }

    fn extcon_put(&self, edev: ExtconHandle) {
        self.put("extcon", edev.id());
    }

    fn drvdata(&self) -> &DrvData {
        &self.drvdata
    }

    fn pm_runtime_enable(&self) {
        self.runtime_pm.set(true);
    }

    fn pm_runtime_disable(&self) {
        self.runtime_pm.set(false);
    }
}

/// Controller core that accepts every adapter, optionally failing init.
pub struct DryRunCore {
    fail_init: Option<UfsError>,
}

impl DryRunCore {
    /// Creates a core whose `init` returns `fail_init` if set.
    pub fn new(fail_init: Option<UfsError>) -> Self {
        Self { fail_init }
    }
}

impl UfsController for DryRunCore {
    fn alloc_host(&self, dev_name: &str) -> Result<UfsHba, UfsError> {
        Ok(UfsHba::new(dev_name))
    }

    fn dealloc_host(&self, _hba: UfsHba) {}

    fn init(&self, _hba: &UfsHba, _mmio: MmioRegion, _irq: IrqLine) -> Result<(), UfsError> {
        self.fail_init.map_or(Ok(()), Err)
    }

    fn remove(&self, _hba: &UfsHba) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use hadron_ufs_pltfrm::UfsPltfrm;

    fn board(text: &str) -> BoardFile {
        toml::from_str(text).unwrap()
    }

    const GOOD: &str = r#"
        name = "ufs"
        [resources]
        mmio = [0x1d84000, 0x3000]
        irq = 265
        reset = "present"
        [properties]
        vcc-supply = { phandle = 1 }
        vcc-max-microamp = 800000
    "#;

    #[test]
    fn probe_and_remove_balance_claims() {
        let pdev = DryRunPlatform::new(&board(GOOD));
        let glue = UfsPltfrm::new(DryRunCore::new(None));

        glue.probe(&pdev).unwrap();
        assert_eq!(pdev.outstanding(), 2);
        assert!(pdev.runtime_pm_enabled());

        glue.remove(&pdev).unwrap();
        assert_eq!(pdev.outstanding(), 0);
        assert_eq!(
            pdev.trace(),
            [
                "map mmio 0x1d84000+0x3000",
                "get core_reset #1",
                "put reset #1",
                "unmap mmio 0x1d84000",
            ]
        );
    }

    #[test]
    fn init_failure_is_rolled_back() {
        let pdev = DryRunPlatform::new(&board(GOOD));
        let glue = UfsPltfrm::new(DryRunCore::new(Some(UfsError::Io)));

        assert_eq!(glue.probe(&pdev), Err(UfsError::Io));
        assert_eq!(pdev.outstanding(), 0);
        assert!(!pdev.runtime_pm_enabled());
    }

    #[test]
    fn missing_mmio_is_invalid() {
        let pdev = DryRunPlatform::new(&board("name = \"ufs\""));
        let glue = UfsPltfrm::new(DryRunCore::new(None));
        assert_eq!(glue.probe(&pdev), Err(UfsError::InvalidArgument));
        assert!(pdev.trace().is_empty());
    }
}
