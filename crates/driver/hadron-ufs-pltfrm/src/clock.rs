//! Clock table parsing.
//!
//! Clocks are declared as a `clock-names` string list plus a parallel
//! `freq-table-hz` array holding one `(min, max)` pair per name. A device
//! that declares no clock table has its clocks managed elsewhere; that is
//! reported as an empty table, not an error.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::UfsError;
use crate::hwdesc::{HwDescription, PropError};
use crate::{kdebug, kerr, kinfo};

const CLOCK_NAMES: &str = "clock-names";
const FREQ_TABLE_HZ: &str = "freq-table-hz";

/// One controller clock and its allowed frequency range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDescriptor {
    /// Clock name as declared in `clock-names`.
    pub name: String,
    /// Minimum frequency in Hz.
    pub min_freq: u32,
    /// Maximum frequency in Hz.
    pub max_freq: u32,
}

/// Parses the clock table.
///
/// Returns the clocks in declaration order. A missing description, a missing
/// or empty `clock-names`, or a missing `freq-table-hz` all yield an empty
/// table.
///
/// # Errors
///
/// - [`UfsError::InvalidArgument`] if `freq-table-hz` does not hold exactly
///   two cells per clock name.
/// - The converted [`PropError`] if `clock-names` is malformed or an entry
///   cannot be read.
///
/// On error no descriptor is returned.
pub fn parse_clock_info<D>(desc: Option<&D>) -> Result<Vec<ClockDescriptor>, UfsError>
where
    D: HwDescription + ?Sized,
{
    let Some(desc) = desc else {
        return Ok(Vec::new());
    };
    let node = desc.node_name();

    let count = match desc.count_strings(CLOCK_NAMES) {
        Ok(0) | Err(PropError::NotFound) => {
            kinfo!("{}: unable to find clocks, assuming enabled", node);
            return Ok(Vec::new());
        }
        Ok(count) => count,
        Err(err) => {
            let err = UfsError::from(err);
            kerr!("{}: count clock strings failed, err {}", node, err.errno());
            return Err(err);
        }
    };

    let Some(len) = desc.property_len(FREQ_TABLE_HZ) else {
        kinfo!("{}: {} property not specified", node, FREQ_TABLE_HZ);
        return Ok(Vec::new());
    };
    if len == 0 {
        return Ok(Vec::new());
    }

    let cells = len / core::mem::size_of::<u32>();
    if cells != 2 * count {
        kerr!("{}: {} len mismatch", node, FREQ_TABLE_HZ);
        return Err(UfsError::InvalidArgument);
    }

    let mut freqs = vec![0u32; cells];
    desc.read_u32_array(FREQ_TABLE_HZ, &mut freqs)
        .map_err(|err| {
            let err = UfsError::from(err);
            kerr!("{}: error reading array {}", FREQ_TABLE_HZ, err.errno());
            err
        })?;

    let mut clocks = Vec::with_capacity(count);
    for (index, pair) in freqs.chunks_exact(2).enumerate() {
        let name = desc.read_string_index(CLOCK_NAMES, index)?;
        let clock = ClockDescriptor {
            name: String::from(name),
            min_freq: pair[0],
            max_freq: pair[1],
        };
        kdebug!(
            "{}: min {} max {} name {}",
            FREQ_TABLE_HZ,
            clock.min_freq,
            clock.max_freq,
            clock.name
        );
        clocks.push(clock);
    }

    Ok(clocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwdesc::StaticDescription;

    fn clocks(names: &[&str], freqs: &[u32]) -> StaticDescription {
        StaticDescription::new("ufshc")
            .with_strings(CLOCK_NAMES, names)
            .with_u32_array(FREQ_TABLE_HZ, freqs)
    }

    #[test]
    fn parses_in_declaration_order() {
        let desc = clocks(
            &["core_clk", "bus_aggr_clk", "ref_clk"],
            &[50_000_000, 200_000_000, 0, 0, 19_200_000, 19_200_000],
        );
        let parsed = parse_clock_info(Some(&desc)).unwrap();
        let names: Vec<&str> = parsed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, &["core_clk", "bus_aggr_clk", "ref_clk"]);
        assert_eq!(parsed[0].min_freq, 50_000_000);
        assert_eq!(parsed[0].max_freq, 200_000_000);
        assert_eq!(parsed[2].min_freq, 19_200_000);
    }

    #[test]
    fn length_mismatch_is_invalid() {
        let desc = clocks(&["core_clk", "ref_clk"], &[1, 2, 3]);
        assert_eq!(
            parse_clock_info(Some(&desc)),
            Err(UfsError::InvalidArgument)
        );

        let desc = clocks(&["core_clk"], &[1, 2, 3, 4]);
        assert_eq!(
            parse_clock_info(Some(&desc)),
            Err(UfsError::InvalidArgument)
        );
    }

    #[test]
    fn missing_names_means_externally_managed() {
        let desc = StaticDescription::new("ufshc").with_u32_array(FREQ_TABLE_HZ, &[1, 2]);
        assert_eq!(parse_clock_info(Some(&desc)), Ok(Vec::new()));
    }

    #[test]
    fn empty_names_means_externally_managed() {
        let desc = StaticDescription::new("ufshc").with_flag(CLOCK_NAMES);
        assert_eq!(parse_clock_info(Some(&desc)), Ok(Vec::new()));
    }

    #[test]
    fn missing_freq_table_means_externally_managed() {
        let desc = StaticDescription::new("ufshc").with_strings(CLOCK_NAMES, &["ref_clk"]);
        assert_eq!(parse_clock_info(Some(&desc)), Ok(Vec::new()));
    }

    #[test]
    fn empty_freq_table_means_externally_managed() {
        let desc = StaticDescription::new("ufshc")
            .with_strings(CLOCK_NAMES, &["ref_clk"])
            .with_flag(FREQ_TABLE_HZ);
        assert_eq!(parse_clock_info(Some(&desc)), Ok(Vec::new()));
    }

    #[test]
    fn malformed_names_are_fatal() {
        let desc = StaticDescription::new("ufshc")
            .with_raw(CLOCK_NAMES, b"ref_clk")
            .with_u32_array(FREQ_TABLE_HZ, &[1, 2]);
        assert_eq!(
            parse_clock_info(Some(&desc)),
            Err(UfsError::IllegalSequence)
        );
    }

    #[test]
    fn no_description_means_no_clocks() {
        assert_eq!(
            parse_clock_info::<StaticDescription>(None),
            Ok(Vec::new())
        );
    }
}
