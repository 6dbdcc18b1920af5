//! Scalar tuning parameters.
//!
//! None of these can fail a probe: an absent or out-of-range value is
//! replaced by its default.

use crate::hwdesc::HwDescription;
use crate::{kdebug, kwarn};

/// Gear limit meaning "no limit".
pub const GEAR_UNLIMITED: i32 = -1;
/// Power-management level meaning "not specified; use the core's default".
pub const PM_LEVEL_UNSET: i32 = -1;
/// Lanes per direction when `lanes-per-direction` is absent.
pub const DEFAULT_LANES_PER_DIRECTION: u32 = 2;
/// Highest lane count a UFS link supports per direction.
pub const MAX_LANES_PER_DIRECTION: u32 = 2;

/// Reads a `u32` property as a signed value, using `fallback` when the
/// property is absent or does not fit.
fn read_i32_or<D>(desc: &D, name: &str, fallback: i32) -> i32
where
    D: HwDescription + ?Sized,
{
    desc.read_u32(name)
        .ok()
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// Gear limits
// ---------------------------------------------------------------------------

/// Upper bounds on the negotiated gears, [`GEAR_UNLIMITED`] when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearLimits {
    /// High-speed gear, transmit.
    pub tx_hs: i32,
    /// High-speed gear, receive.
    pub rx_hs: i32,
    /// PWM (power-save) gear, transmit.
    pub tx_pwm: i32,
    /// PWM (power-save) gear, receive.
    pub rx_pwm: i32,
}

impl Default for GearLimits {
    fn default() -> Self {
        Self {
            tx_hs: GEAR_UNLIMITED,
            rx_hs: GEAR_UNLIMITED,
            tx_pwm: GEAR_UNLIMITED,
            rx_pwm: GEAR_UNLIMITED,
        }
    }
}

/// Parses `limit-{tx,rx}-{hs,pwm}-gear`. Each limit is independent.
pub fn parse_gear_limits<D>(desc: &D) -> GearLimits
where
    D: HwDescription + ?Sized,
{
    GearLimits {
        tx_hs: read_i32_or(desc, "limit-tx-hs-gear", GEAR_UNLIMITED),
        rx_hs: read_i32_or(desc, "limit-rx-hs-gear", GEAR_UNLIMITED),
        tx_pwm: read_i32_or(desc, "limit-tx-pwm-gear", GEAR_UNLIMITED),
        rx_pwm: read_i32_or(desc, "limit-rx-pwm-gear", GEAR_UNLIMITED),
    }
}

// ---------------------------------------------------------------------------
// Power-management level hints
// ---------------------------------------------------------------------------

/// Preferred runtime and system suspend levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerLevelHints {
    /// Runtime PM level (`rpm-level`).
    pub rpm: i32,
    /// System PM level (`spm-level`).
    pub spm: i32,
}

impl Default for PowerLevelHints {
    fn default() -> Self {
        Self {
            rpm: PM_LEVEL_UNSET,
            spm: PM_LEVEL_UNSET,
        }
    }
}

/// Parses `rpm-level` and `spm-level`.
pub fn parse_pm_levels<D>(desc: &D) -> PowerLevelHints
where
    D: HwDescription + ?Sized,
{
    PowerLevelHints {
        rpm: read_i32_or(desc, "rpm-level", PM_LEVEL_UNSET),
        spm: read_i32_or(desc, "spm-level", PM_LEVEL_UNSET),
    }
}

// ---------------------------------------------------------------------------
// Device reference clock
// ---------------------------------------------------------------------------

/// Reference clock frequency supplied to the UFS device.
///
/// The discriminants are the encodings used by `dev-ref-clk-freq` and by
/// the device's `bRefClkFreq` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RefClkFreq {
    /// 19.2 MHz.
    Freq19_2Mhz = 0,
    /// 26 MHz.
    Freq26Mhz = 1,
    /// 38.4 MHz.
    Freq38_4Mhz = 2,
    /// 52 MHz.
    Freq52Mhz = 3,
}

impl RefClkFreq {
    /// Frequency used when the description gives none or an invalid one.
    pub const DEFAULT: Self = Self::Freq26Mhz;

    /// Decodes a `dev-ref-clk-freq` value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Freq19_2Mhz),
            1 => Some(Self::Freq26Mhz),
            2 => Some(Self::Freq38_4Mhz),
            3 => Some(Self::Freq52Mhz),
            _ => None,
        }
    }

    /// Returns the encoded value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Returns the frequency in Hz.
    #[must_use]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Freq19_2Mhz => 19_200_000,
            Self::Freq26Mhz => 26_000_000,
            Self::Freq38_4Mhz => 38_400_000,
            Self::Freq52Mhz => 52_000_000,
        }
    }
}

impl Default for RefClkFreq {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parses `dev-ref-clk-freq`.
pub fn parse_dev_ref_clk_freq<D>(desc: &D) -> RefClkFreq
where
    D: HwDescription + ?Sized,
{
    match desc.read_u32("dev-ref-clk-freq") {
        Ok(raw) => RefClkFreq::from_raw(raw).unwrap_or_else(|| {
            kwarn!(
                "{}: dev-ref-clk-freq {} out of range, using {} Hz",
                desc.node_name(),
                raw,
                RefClkFreq::DEFAULT.hz()
            );
            RefClkFreq::DEFAULT
        }),
        Err(_) => RefClkFreq::DEFAULT,
    }
}

// ---------------------------------------------------------------------------
// Single-value settings
// ---------------------------------------------------------------------------

/// Parses `scsi-cmd-timeout`; 0 means "use the core's built-in timeout".
pub fn parse_cmd_timeout<D>(desc: &D) -> u32
where
    D: HwDescription + ?Sized,
{
    desc.read_u32("scsi-cmd-timeout").unwrap_or(0)
}

/// Parses the `force-g4` flag.
pub fn parse_force_g4_flag<D>(desc: &D) -> bool
where
    D: HwDescription + ?Sized,
{
    desc.read_bool("force-g4")
}

/// Parses `lanes-per-direction`, accepting `1..=MAX_LANES_PER_DIRECTION`.
pub fn parse_lanes_per_direction<D>(desc: &D) -> u32
where
    D: HwDescription + ?Sized,
{
    match desc.read_u32("lanes-per-direction") {
        Ok(lanes) if (1..=MAX_LANES_PER_DIRECTION).contains(&lanes) => lanes,
        Ok(lanes) => {
            kwarn!(
                "{}: lanes-per-direction {} unsupported, using {}",
                desc.node_name(),
                lanes,
                DEFAULT_LANES_PER_DIRECTION
            );
            DEFAULT_LANES_PER_DIRECTION
        }
        Err(err) => {
            kdebug!(
                "{}: failed to read lanes-per-direction, err={}",
                desc.node_name(),
                err
            );
            DEFAULT_LANES_PER_DIRECTION
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// All scalar tuning parameters of one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HbaTuning {
    /// Device reference clock.
    pub dev_ref_clk_freq: RefClkFreq,
    /// Preferred suspend levels.
    pub pm_levels: PowerLevelHints,
    /// Gear limits.
    pub gear_limits: GearLimits,
    /// SCSI command timeout in seconds, 0 for the core default.
    pub scsi_cmd_timeout: u32,
    /// Force HS-G4 even when the device advertises less.
    pub force_g4: bool,
    /// Active lanes per direction.
    pub lanes_per_direction: u32,
}

impl Default for HbaTuning {
    fn default() -> Self {
        Self {
            dev_ref_clk_freq: RefClkFreq::DEFAULT,
            pm_levels: PowerLevelHints::default(),
            gear_limits: GearLimits::default(),
            scsi_cmd_timeout: 0,
            force_g4: false,
            lanes_per_direction: DEFAULT_LANES_PER_DIRECTION,
        }
    }
}

/// Parses every scalar. Without a description all defaults apply.
pub fn parse_tuning<D>(desc: Option<&D>) -> HbaTuning
where
    D: HwDescription + ?Sized,
{
    let Some(desc) = desc else {
        return HbaTuning::default();
    };
    HbaTuning {
        dev_ref_clk_freq: parse_dev_ref_clk_freq(desc),
        pm_levels: parse_pm_levels(desc),
        gear_limits: parse_gear_limits(desc),
        scsi_cmd_timeout: parse_cmd_timeout(desc),
        force_g4: parse_force_g4_flag(desc),
        lanes_per_direction: parse_lanes_per_direction(desc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwdesc::StaticDescription;

    fn empty() -> StaticDescription {
        StaticDescription::new("ufshc")
    }

    #[test]
    fn gear_limits_default_to_unlimited() {
        let limits = parse_gear_limits(&empty());
        assert_eq!(limits, GearLimits::default());
        assert_eq!(limits.tx_hs, -1);
    }

    #[test]
    fn gear_limits_are_independent() {
        let desc = empty()
            .with_u32("limit-rx-hs-gear", 3)
            .with_u32("limit-tx-pwm-gear", 1);
        let limits = parse_gear_limits(&desc);
        assert_eq!(limits.tx_hs, GEAR_UNLIMITED);
        assert_eq!(limits.rx_hs, 3);
        assert_eq!(limits.tx_pwm, 1);
        assert_eq!(limits.rx_pwm, GEAR_UNLIMITED);
    }

    #[test]
    fn pm_levels() {
        assert_eq!(parse_pm_levels(&empty()), PowerLevelHints::default());
        let desc = empty().with_u32("rpm-level", 3).with_u32("spm-level", 5);
        assert_eq!(
            parse_pm_levels(&desc),
            PowerLevelHints { rpm: 3, spm: 5 }
        );
    }

    #[test]
    fn oversized_level_is_unset() {
        let desc = empty().with_u32("rpm-level", u32::MAX);
        assert_eq!(parse_pm_levels(&desc).rpm, PM_LEVEL_UNSET);
    }

    #[test]
    fn ref_clk_valid_values() {
        let desc = empty().with_u32("dev-ref-clk-freq", 0);
        assert_eq!(parse_dev_ref_clk_freq(&desc), RefClkFreq::Freq19_2Mhz);
        let desc = empty().with_u32("dev-ref-clk-freq", 3);
        assert_eq!(parse_dev_ref_clk_freq(&desc), RefClkFreq::Freq52Mhz);
    }

    #[test]
    fn ref_clk_out_of_range_or_missing_is_26mhz() {
        let desc = empty().with_u32("dev-ref-clk-freq", 999);
        assert_eq!(parse_dev_ref_clk_freq(&desc), RefClkFreq::Freq26Mhz);
        let desc = empty().with_u32("dev-ref-clk-freq", 4);
        assert_eq!(parse_dev_ref_clk_freq(&desc), RefClkFreq::Freq26Mhz);
        assert_eq!(parse_dev_ref_clk_freq(&empty()), RefClkFreq::DEFAULT);
        assert_eq!(RefClkFreq::DEFAULT.hz(), 26_000_000);
    }

    #[test]
    fn ref_clk_encoding() {
        for raw in 0..4 {
            assert_eq!(RefClkFreq::from_raw(raw).map(RefClkFreq::raw), Some(raw));
        }
        assert_eq!(RefClkFreq::from_raw(4), None);
    }

    #[test]
    fn cmd_timeout_and_force_g4() {
        assert_eq!(parse_cmd_timeout(&empty()), 0);
        assert!(!parse_force_g4_flag(&empty()));
        let desc = empty().with_u32("scsi-cmd-timeout", 30).with_flag("force-g4");
        assert_eq!(parse_cmd_timeout(&desc), 30);
        assert!(parse_force_g4_flag(&desc));
    }

    #[test]
    fn lanes_per_direction() {
        assert_eq!(parse_lanes_per_direction(&empty()), 2);
        let desc = empty().with_u32("lanes-per-direction", 1);
        assert_eq!(parse_lanes_per_direction(&desc), 1);
        let desc = empty().with_u32("lanes-per-direction", 0);
        assert_eq!(parse_lanes_per_direction(&desc), DEFAULT_LANES_PER_DIRECTION);
        let desc = empty().with_u32("lanes-per-direction", 4);
        assert_eq!(parse_lanes_per_direction(&desc), DEFAULT_LANES_PER_DIRECTION);
    }

    #[test]
    fn tuning_without_description_is_default() {
        assert_eq!(
            parse_tuning::<StaticDescription>(None),
            HbaTuning::default()
        );
    }

    #[test]
    fn tuning_aggregates_every_parser() {
        let desc = empty()
            .with_u32("dev-ref-clk-freq", 2)
            .with_u32("limit-tx-hs-gear", 4)
            .with_u32("scsi-cmd-timeout", 60)
            .with_u32("lanes-per-direction", 1)
            .with_flag("force-g4");
        let tuning = parse_tuning(Some(&desc));
        assert_eq!(tuning.dev_ref_clk_freq, RefClkFreq::Freq38_4Mhz);
        assert_eq!(tuning.gear_limits.tx_hs, 4);
        assert_eq!(tuning.gear_limits.rx_hs, GEAR_UNLIMITED);
        assert_eq!(tuning.scsi_cmd_timeout, 60);
        assert_eq!(tuning.lanes_per_direction, 1);
        assert!(tuning.force_g4);
        assert_eq!(tuning.pm_levels, PowerLevelHints::default());
    }
}
