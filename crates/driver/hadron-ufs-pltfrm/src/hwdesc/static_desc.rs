//! In-memory hardware description.

use alloc::string::String;
use alloc::vec::Vec;

use super::{HwDescription, PropError};

/// A property stored as its raw big-endian encoding, as it would appear in a
/// flattened device tree.
struct RawProperty {
    name: String,
    data: Vec<u8>,
}

/// A hardware description built in memory.
///
/// Values are stored in device-tree wire encoding (big-endian cells,
/// NUL-separated string lists) so the accessors behave exactly like the
/// device-tree ones, including for malformed data added with
/// [`with_raw`](Self::with_raw).
///
/// ```ignore
/// let desc = StaticDescription::new("ufshc@1d84000")
///     .with_strings("clock-names", &["ref_clk"])
///     .with_u32_array("freq-table-hz", &[100_000, 200_000])
///     .with_phandle("vcc-supply", 0x10)
///     .with_u32("vcc-max-microamp", 500_000);
/// ```
pub struct StaticDescription {
    name: String,
    props: Vec<RawProperty>,
    /// Phandle values that resolve to a node.
    phandles: Vec<u32>,
}

impl StaticDescription {
    /// Creates an empty description for a node called `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            props: Vec::new(),
            phandles: Vec::new(),
        }
    }

    /// Adds a raw property, replacing any existing property of the same name.
    #[must_use]
    pub fn with_raw(mut self, name: &str, data: &[u8]) -> Self {
        self.props.retain(|p| p.name != name);
        self.props.push(RawProperty {
            name: String::from(name),
            data: data.to_vec(),
        });
        self
    }

    /// Adds a boolean (empty) property.
    #[must_use]
    pub fn with_flag(self, name: &str) -> Self {
        self.with_raw(name, &[])
    }

    /// Adds a single-cell property.
    #[must_use]
    pub fn with_u32(self, name: &str, value: u32) -> Self {
        self.with_u32_array(name, &[value])
    }

    /// Adds a multi-cell property.
    #[must_use]
    pub fn with_u32_array(self, name: &str, values: &[u32]) -> Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.with_raw(name, &data)
    }

    /// Adds a NUL-separated string-list property.
    #[must_use]
    pub fn with_strings(self, name: &str, values: &[&str]) -> Self {
        let mut data = Vec::new();
        for value in values {
            data.extend_from_slice(value.as_bytes());
            data.push(0);
        }
        self.with_raw(name, &data)
    }

    /// Adds a phandle reference and registers `target` as a resolvable node.
    #[must_use]
    pub fn with_phandle(mut self, name: &str, target: u32) -> Self {
        if !self.phandles.contains(&target) {
            self.phandles.push(target);
        }
        self.with_u32(name, target)
    }

    /// Removes a property. Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.props.len();
        self.props.retain(|p| p.name != name);
        self.props.len() != before
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns `true` if the description has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    fn raw(&self, name: &str) -> Option<&[u8]> {
        self.props
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Splits a string-list value, validating NUL termination and UTF-8.
    fn string_list(&self, name: &str) -> Result<Vec<&str>, PropError> {
        let data = self.raw(name).ok_or(PropError::NotFound)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        if data.last() != Some(&0) {
            return Err(PropError::InvalidFormat);
        }
        data[..data.len() - 1]
            .split(|&b| b == 0)
            .map(|s| core::str::from_utf8(s).map_err(|_| PropError::InvalidFormat))
            .collect()
    }
}

/// Reads the big-endian cell at `index`.
fn cell_at(data: &[u8], index: usize) -> Option<u32> {
    let start = index.checked_mul(4)?;
    let bytes: [u8; 4] = data.get(start..start + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

impl HwDescription for StaticDescription {
    fn node_name(&self) -> &str {
        &self.name
    }

    fn property_len(&self, name: &str) -> Option<usize> {
        self.raw(name).map(<[u8]>::len)
    }

    fn read_u32_array(&self, name: &str, out: &mut [u32]) -> Result<(), PropError> {
        let data = self.raw(name).ok_or(PropError::NotFound)?;
        if data.is_empty() {
            return Err(PropError::NoData);
        }
        if data.len() < out.len() * 4 {
            return Err(PropError::Overflow);
        }
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = cell_at(data, i).ok_or(PropError::Overflow)?;
        }
        Ok(())
    }

    fn count_strings(&self, name: &str) -> Result<usize, PropError> {
        self.string_list(name).map(|list| list.len())
    }

    fn read_string_index(&self, name: &str, index: usize) -> Result<&str, PropError> {
        self.string_list(name)?
            .get(index)
            .copied()
            .ok_or(PropError::NoData)
    }

    fn has_phandle(&self, name: &str, index: usize) -> bool {
        self.raw(name)
            .and_then(|data| cell_at(data, index))
            .is_some_and(|ph| ph != 0 && self.phandles.contains(&ph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc() -> StaticDescription {
        StaticDescription::new("ufshc@1d84000")
            .with_strings("clock-names", &["core_clk", "ref_clk"])
            .with_u32_array("freq-table-hz", &[1, 2, 3, 4])
            .with_u32("lanes-per-direction", 1)
            .with_flag("force-g4")
            .with_phandle("vcc-supply", 0x42)
    }

    #[test]
    fn node_name() {
        assert_eq!(desc().node_name(), "ufshc@1d84000");
    }

    #[test]
    fn read_u32() {
        assert_eq!(desc().read_u32("lanes-per-direction"), Ok(1));
        assert_eq!(desc().read_u32("missing"), Err(PropError::NotFound));
    }

    #[test]
    fn read_u32_on_flag_is_no_data() {
        assert_eq!(desc().read_u32("force-g4"), Err(PropError::NoData));
    }

    #[test]
    fn read_u32_array_exact_and_short() {
        let d = desc();
        let mut out = [0u32; 4];
        d.read_u32_array("freq-table-hz", &mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);

        let mut too_many = [0u32; 5];
        assert_eq!(
            d.read_u32_array("freq-table-hz", &mut too_many),
            Err(PropError::Overflow)
        );
    }

    #[test]
    fn property_len_in_bytes() {
        let d = desc();
        assert_eq!(d.property_len("freq-table-hz"), Some(16));
        assert_eq!(d.property_len("force-g4"), Some(0));
        assert_eq!(d.property_len("nope"), None);
    }

    #[test]
    fn string_list_accessors() {
        let d = desc();
        assert_eq!(d.count_strings("clock-names"), Ok(2));
        assert_eq!(d.read_string_index("clock-names", 1), Ok("ref_clk"));
        assert_eq!(
            d.read_string_index("clock-names", 2),
            Err(PropError::NoData)
        );
        assert_eq!(d.count_strings("missing"), Err(PropError::NotFound));
    }

    #[test]
    fn unterminated_string_list_is_malformed() {
        let d = StaticDescription::new("n").with_raw("clock-names", b"core_clk");
        assert_eq!(d.count_strings("clock-names"), Err(PropError::InvalidFormat));
    }

    #[test]
    fn empty_string_list_counts_zero() {
        let d = StaticDescription::new("n").with_flag("clock-names");
        assert_eq!(d.count_strings("clock-names"), Ok(0));
    }

    #[test]
    fn phandles_resolve_only_to_registered_targets() {
        let d = desc().with_u32("vccq-supply", 0x99);
        assert!(d.has_phandle("vcc-supply", 0));
        assert!(!d.has_phandle("vcc-supply", 1));
        assert!(!d.has_phandle("vccq-supply", 0));
        assert!(!d.has_phandle("vccq2-supply", 0));
    }

    #[test]
    fn with_raw_replaces_and_remove_deletes() {
        let mut d = desc().with_u32("lanes-per-direction", 2);
        assert_eq!(d.read_u32("lanes-per-direction"), Ok(2));
        assert!(d.remove("lanes-per-direction"));
        assert!(!d.remove("lanes-per-direction"));
        assert!(!d.read_bool("lanes-per-direction"));
        assert!(d.read_bool("force-g4"));
    }
}
