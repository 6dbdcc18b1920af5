//! Board description files.
//!
//! A board file names the device, lists the platform resources the dry-run
//! bus should offer, and carries the device-tree properties of the
//! controller node:
//!
//! ```toml
//! name = "1d84000.ufshc"
//!
//! [resources]
//! mmio = [0x1d84000, 0x3000]
//! irq = 265
//! reset = "present"
//! extcon = "error:-517"
//!
//! [properties]
//! clock-names = ["core_clk", "ref_clk"]
//! freq-table-hz = [100000000, 200000000, 19200000, 19200000]
//! vcc-supply = { phandle = 0x10 }
//! vcc-max-microamp = 600000
//! force-g4 = true
//! ```
//!
//! Omitting `[properties]` models a device that was not created from a
//! device tree.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use hadron_ufs_pltfrm::{StaticDescription, UfsError};
use serde::Deserialize;

/// A parsed board file.
#[derive(Debug, Deserialize)]
pub struct BoardFile {
    /// Platform device name.
    pub name: String,
    /// Resources offered by the dry-run bus.
    #[serde(default)]
    pub resources: Resources,
    /// Controller node properties.
    pub properties: Option<BTreeMap<String, PropValue>>,
}

/// Platform resources of the board.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Register window as `[base, size]`.
    pub mmio: Option<[u64; 2]>,
    /// Interrupt number.
    pub irq: Option<u32>,
    /// `core_reset` line.
    pub reset: Availability,
    /// Pin-control handle.
    pub pinctrl: Availability,
    /// External connector.
    pub extcon: Availability,
}

/// How the dry-run bus answers a lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Availability {
    /// The lookup succeeds.
    Present,
    /// The lookup reports "no such device".
    #[default]
    Absent,
    /// The lookup fails with this error.
    Fail(UfsError),
}

impl TryFrom<String> for Availability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        match value.as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => {
                let code = other
                    .strip_prefix("error:")
                    .ok_or_else(|| format!("expected present, absent or error:<errno>, got `{other}`"))?;
                let errno: i32 = code
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid errno `{code}`"))?;
                UfsError::from_errno(errno)
                    .map(Self::Fail)
                    .ok_or_else(|| String::from("errno must be nonzero"))
            }
        }
    }
}

/// A property value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Boolean property; `false` leaves it out.
    Flag(bool),
    /// Single cell.
    Cell(u32),
    /// Cell array.
    Cells(Vec<u32>),
    /// Single string.
    String(String),
    /// String list.
    Strings(Vec<String>),
    /// Reference to another node.
    Phandle {
        /// Target phandle value.
        phandle: u32,
    },
}

impl BoardFile {
    /// Loads and validates a board file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let board: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("board name must not be empty");
        }
        if let Some([_, 0]) = self.resources.mmio {
            bail!("{}: mmio size must be nonzero", self.name);
        }
        Ok(())
    }

    /// Builds the hardware description, or `None` if the board has no
    /// `[properties]` table.
    pub fn description(&self) -> Option<StaticDescription> {
        let props = self.properties.as_ref()?;
        let desc = props
            .iter()
            .fold(StaticDescription::new(&self.name), |desc, (name, value)| match value {
                PropValue::Flag(true) => desc.with_flag(name),
                PropValue::Flag(false) => desc,
                PropValue::Cell(v) => desc.with_u32(name, *v),
                PropValue::Cells(v) => desc.with_u32_array(name, v),
                PropValue::String(s) => desc.with_strings(name, &[s.as_str()]),
                PropValue::Strings(v) => {
                    let list: Vec<&str> = v.iter().map(String::as_str).collect();
                    desc.with_strings(name, &list)
                }
                PropValue::Phandle { phandle } => desc.with_phandle(name, *phandle),
            });
        Some(desc)
    }
}
