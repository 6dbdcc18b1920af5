//! Hardware-description access.
//!
//! The parsers never touch a device tree directly. They go through
//! [`HwDescription`], a small set of typed accessors keyed by property name
//! whose error semantics follow the device-tree property helpers:
//!
//! | Condition | Result |
//! |---|---|
//! | property absent | [`PropError::NotFound`] |
//! | property present, empty | [`PropError::NoData`] |
//! | property shorter than requested | [`PropError::Overflow`] |
//! | string list not NUL-separated UTF-8 | [`PropError::InvalidFormat`] |
//!
//! Any backing format (flattened device tree, ACPI `_DSD`, static board
//! tables) can implement the trait. [`StaticDescription`] is the in-memory
//! backing used by board files, host tools and tests.

mod static_desc;

pub use static_desc::StaticDescription;

use core::fmt;

use crate::error::UfsError;

/// Errors from property accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropError {
    /// The property does not exist.
    NotFound,
    /// The property exists but carries no value.
    NoData,
    /// The property value is shorter than requested.
    Overflow,
    /// The property value is not in the expected format.
    InvalidFormat,
}

impl fmt::Display for PropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("property not found"),
            Self::NoData => f.write_str("property has no value"),
            Self::Overflow => f.write_str("property value too short"),
            Self::InvalidFormat => f.write_str("property value malformed"),
        }
    }
}

impl From<PropError> for UfsError {
    fn from(err: PropError) -> Self {
        match err {
            PropError::NotFound => UfsError::InvalidArgument,
            PropError::NoData => UfsError::NoData,
            PropError::Overflow => UfsError::Overflow,
            PropError::InvalidFormat => UfsError::IllegalSequence,
        }
    }
}

/// Read-only, typed view of one device's hardware description.
pub trait HwDescription {
    /// Returns the name of the described node, for diagnostics.
    fn node_name(&self) -> &str;

    /// Returns the raw length in bytes of a property, or `None` if absent.
    fn property_len(&self, name: &str) -> Option<usize>;

    /// Reads `out.len()` consecutive `u32` cells from a property.
    ///
    /// # Errors
    ///
    /// See the module-level table.
    fn read_u32_array(&self, name: &str, out: &mut [u32]) -> Result<(), PropError>;

    /// Counts the strings in a NUL-separated string-list property.
    ///
    /// # Errors
    ///
    /// [`PropError::NotFound`] if absent, [`PropError::InvalidFormat`] if the
    /// value is not a well-formed string list.
    fn count_strings(&self, name: &str) -> Result<usize, PropError>;

    /// Returns the `index`-th string of a string-list property.
    ///
    /// # Errors
    ///
    /// [`PropError::NoData`] if `index` is past the end of the list.
    fn read_string_index(&self, name: &str, index: usize) -> Result<&str, PropError>;

    /// Returns `true` if the `index`-th phandle in `name` resolves to a node.
    fn has_phandle(&self, name: &str, index: usize) -> bool;

    /// Reads a single `u32` cell.
    ///
    /// # Errors
    ///
    /// See the module-level table.
    fn read_u32(&self, name: &str) -> Result<u32, PropError> {
        let mut cell = [0u32; 1];
        self.read_u32_array(name, &mut cell)?;
        Ok(cell[0])
    }

    /// Returns `true` if a boolean (presence-only) property is set.
    fn read_bool(&self, name: &str) -> bool {
        self.property_len(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_error_maps_onto_errno_classes() {
        assert_eq!(UfsError::from(PropError::NotFound), UfsError::InvalidArgument);
        assert_eq!(UfsError::from(PropError::NoData), UfsError::NoData);
        assert_eq!(UfsError::from(PropError::Overflow), UfsError::Overflow);
        assert_eq!(
            UfsError::from(PropError::InvalidFormat),
            UfsError::IllegalSequence
        );
    }

    #[test]
    fn prop_error_display() {
        assert_eq!(format!("{}", PropError::NotFound), "property not found");
        assert_eq!(format!("{}", PropError::Overflow), "property value too short");
    }
}
