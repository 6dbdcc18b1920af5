//! Regulator (power supply) parsing.
//!
//! A UFS host has up to four supplies, each identified by a fixed
//! [`RegulatorRole`]. A role whose `<role>-supply` phandle is missing is
//! assumed always-on and produces no descriptor. Once a supply exists its
//! `<role>-max-microamp` is mandatory, unless the supply is marked
//! `<role>-fixed-regulator`, in which case nothing else is read.

use alloc::format;

use bitflags::bitflags;

use crate::error::UfsError;
use crate::hwdesc::HwDescription;
use crate::{kerr, kinfo, kwarn};

/// Load in microamps requested from a supply in low-power mode when the
/// description does not specify `<role>-min-microamp`.
pub const UFS_VREG_LPM_LOAD_UA: u32 = 1000;

/// An inclusive voltage range in microvolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageRange {
    /// Minimum voltage in microvolts.
    pub min_uv: u32,
    /// Maximum voltage in microvolts.
    pub max_uv: u32,
}

impl VoltageRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min_uv: u32, max_uv: u32) -> Self {
        Self { min_uv, max_uv }
    }
}

/// Default VCC range (2.7 V - 3.6 V).
pub const VCC_DEFAULT: VoltageRange = VoltageRange::new(2_700_000, 3_600_000);
/// VCC range when the supply is wired for 1.8 V operation.
pub const VCC_1P8: VoltageRange = VoltageRange::new(1_700_000, 1_950_000);
/// Default VCCQ range (1.14 V - 1.26 V).
pub const VCCQ_DEFAULT: VoltageRange = VoltageRange::new(1_140_000, 1_260_000);
/// Default VCCQ2 range (1.7 V - 1.95 V).
pub const VCCQ2_DEFAULT: VoltageRange = VoltageRange::new(1_700_000, 1_950_000);

bitflags! {
    /// Per-supply properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RegulatorFlags: u8 {
        /// Fixed supply; voltage and load are not managed.
        const FIXED = 1 << 0;
        /// VCC runs in the alternate 1.8 V mode.
        const SUPPLY_1P8 = 1 << 1;
        /// The device supports low-voltage VCC operation.
        const LOW_VOLTAGE_SUP = 1 << 2;
    }
}

/// The four supplies a UFS host may declare, in parse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegulatorRole {
    /// Host controller core supply.
    VddHba,
    /// Flash array supply.
    Vcc,
    /// Device controller supply (1.2 V rail).
    Vccq,
    /// Device controller supply (1.8 V rail).
    Vccq2,
}

/// Static per-role parameters.
struct RoleInfo {
    name: &'static str,
    /// Range used when the description does not override it.
    default_range: Option<VoltageRange>,
    /// Two-cell property that may override the default range.
    voltage_level: Option<&'static str>,
}

static ROLE_TABLE: [RoleInfo; 4] = [
    RoleInfo {
        name: "vdd-hba",
        default_range: None,
        voltage_level: None,
    },
    RoleInfo {
        name: "vcc",
        default_range: Some(VCC_DEFAULT),
        voltage_level: Some("vcc-voltage-level"),
    },
    RoleInfo {
        name: "vccq",
        default_range: Some(VCCQ_DEFAULT),
        voltage_level: None,
    },
    RoleInfo {
        name: "vccq2",
        default_range: Some(VCCQ2_DEFAULT),
        voltage_level: Some("vccq2-voltage-level"),
    },
];

impl RegulatorRole {
    /// All roles, in the order they are parsed.
    pub const ALL: [Self; 4] = [Self::VddHba, Self::Vcc, Self::Vccq, Self::Vccq2];

    fn info(self) -> &'static RoleInfo {
        &ROLE_TABLE[self as usize]
    }

    /// Returns the role name used as the property prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Returns the voltage range used when the description gives none.
    ///
    /// `vdd-hba` has no default: its voltage is not managed by this driver.
    #[must_use]
    pub fn default_range(self) -> Option<VoltageRange> {
        self.info().default_range
    }

    /// Resolves the voltage range and mode flags for this role.
    ///
    /// VCC tries, in order: the 1.8 V mode flag, `vcc-voltage-level`, the
    /// default range. VCCQ2 tries `vccq2-voltage-level`, then the default.
    /// A malformed voltage-level property falls back to the default.
    fn resolve_voltage<D>(self, desc: &D) -> (Option<VoltageRange>, RegulatorFlags)
    where
        D: HwDescription + ?Sized,
    {
        let mut flags = RegulatorFlags::empty();

        if self == Self::Vcc && desc.read_bool("vcc-supply-1p8") {
            return (Some(VCC_1P8), RegulatorFlags::SUPPLY_1P8);
        }

        let range = match (self.info().voltage_level, self.default_range()) {
            (Some(prop), Some(default)) => Some(read_voltage_level(desc, prop, default)),
            (_, default) => default,
        };

        if self == Self::Vcc && desc.read_bool("vcc-low-voltage-sup") {
            flags |= RegulatorFlags::LOW_VOLTAGE_SUP;
        }

        (range, flags)
    }
}

/// Reads a two-cell `<min> <max>` voltage property, falling back to
/// `default` when it is absent or not exactly two cells.
fn read_voltage_level<D>(desc: &D, prop: &str, default: VoltageRange) -> VoltageRange
where
    D: HwDescription + ?Sized,
{
    let node = desc.node_name();
    match desc.property_len(prop) {
        None => {
            kwarn!("{}: no {} property.", node, prop);
            default
        }
        Some(len) if len == 2 * core::mem::size_of::<u32>() => {
            let mut cells = [0u32; 2];
            if desc.read_u32_array(prop, &mut cells).is_ok() {
                VoltageRange::new(cells[0], cells[1])
            } else {
                kwarn!("{}: invalid format {} property.", node, prop);
                default
            }
        }
        Some(_) => {
            kwarn!("{}: invalid format {} property.", node, prop);
            default
        }
    }
}

/// A parsed supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegulatorDescriptor {
    /// Which supply this is.
    pub role: RegulatorRole,
    /// Voltage range; `None` for fixed supplies and `vdd-hba`.
    pub voltage: Option<VoltageRange>,
    /// Load in low-power mode, in microamps.
    pub min_ua: u32,
    /// Maximum load, in microamps.
    pub max_ua: u32,
    /// Mode flags.
    pub flags: RegulatorFlags,
}

impl RegulatorDescriptor {
    /// Returns the supply name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.role.name()
    }

    /// Returns `true` for a fixed supply.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.flags.contains(RegulatorFlags::FIXED)
    }

    /// Returns `true` if the device supports low-voltage VCC.
    #[must_use]
    pub const fn low_voltage_sup(&self) -> bool {
        self.flags.contains(RegulatorFlags::LOW_VOLTAGE_SUP)
    }
}

/// The adapter's supplies, one optional descriptor per role.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VregInfo {
    vregs: [Option<RegulatorDescriptor>; 4],
}

impl VregInfo {
    /// Returns the descriptor for `role`, if the supply is managed.
    #[must_use]
    pub fn get(&self, role: RegulatorRole) -> Option<&RegulatorDescriptor> {
        self.vregs[role as usize].as_ref()
    }

    /// Stores the descriptor for its role, returning any previous one.
    pub fn set(&mut self, vreg: RegulatorDescriptor) -> Option<RegulatorDescriptor> {
        let role = vreg.role;
        self.vregs[role as usize].replace(vreg)
    }

    /// Removes and returns the descriptor for `role`.
    pub fn take(&mut self, role: RegulatorRole) -> Option<RegulatorDescriptor> {
        self.vregs[role as usize].take()
    }

    /// Iterates over managed supplies in role order.
    pub fn iter(&self) -> impl Iterator<Item = &RegulatorDescriptor> {
        self.vregs.iter().flatten()
    }

    /// Returns the number of managed supplies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if every supply is always-on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses the supply for one role.
///
/// Returns `Ok(None)` when the supply is not declared (always-on) or when
/// there is no description at all.
///
/// # Errors
///
/// Returns the converted property error if the supply is declared, not
/// fixed, and `<role>-max-microamp` cannot be read.
pub fn parse_regulator<D>(
    desc: Option<&D>,
    role: RegulatorRole,
) -> Result<Option<RegulatorDescriptor>, UfsError>
where
    D: HwDescription + ?Sized,
{
    let name = role.name();
    let Some(desc) = desc else {
        kerr!("{}: non DT initialization", name);
        return Ok(None);
    };
    let node = desc.node_name();

    let supply = format!("{name}-supply");
    if !desc.has_phandle(&supply, 0) {
        kinfo!(
            "{}: unable to find {} regulator, assuming enabled",
            node,
            supply
        );
        return Ok(None);
    }

    if desc.read_bool(&format!("{name}-fixed-regulator")) {
        return Ok(Some(RegulatorDescriptor {
            role,
            voltage: None,
            min_ua: 0,
            max_ua: 0,
            flags: RegulatorFlags::FIXED,
        }));
    }

    let max_prop = format!("{name}-max-microamp");
    let max_ua = desc.read_u32(&max_prop).map_err(|err| {
        let err = UfsError::from(err);
        kerr!("{}: unable to find {} err {}", node, max_prop, err.errno());
        err
    })?;

    let min_ua = desc
        .read_u32(&format!("{name}-min-microamp"))
        .unwrap_or(UFS_VREG_LPM_LOAD_UA);

    let (voltage, flags) = role.resolve_voltage(desc);

    Ok(Some(RegulatorDescriptor {
        role,
        voltage,
        min_ua,
        max_ua,
        flags,
    }))
}
