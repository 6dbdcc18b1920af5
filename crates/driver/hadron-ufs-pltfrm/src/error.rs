//! Error types for the UFS platform glue.

use core::fmt;

/// Errors surfaced by probing and by the controller-core collaborator.
///
/// Each variant corresponds to one errno class; [`UfsError::errno`] yields the
/// negative status code reported to the caller of attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UfsError {
    /// Malformed or missing mandatory property (`EINVAL`).
    InvalidArgument,
    /// Required device or resource not present (`ENODEV`).
    NoDevice,
    /// Allocation failed (`ENOMEM`).
    NoMemory,
    /// Property present but without a value (`ENODATA`).
    NoData,
    /// Property shorter than the requested element count (`EOVERFLOW`).
    Overflow,
    /// Property is not a well-formed string list (`EILSEQ`).
    IllegalSequence,
    /// A resource provider is not ready yet (`EPROBE_DEFER`).
    ProbeDeferred,
    /// Resource already claimed (`EBUSY`).
    Busy,
    /// Hardware I/O error (`EIO`).
    Io,
    /// Operation not supported (`EOPNOTSUPP`).
    Unsupported,
    /// Any other status reported by a collaborator, as a positive errno.
    Other(i32),
}

const EIO: i32 = 5;
const ENOMEM: i32 = 12;
const EBUSY: i32 = 16;
const ENODEV: i32 = 19;
const EINVAL: i32 = 22;
const ENODATA: i32 = 61;
const EOVERFLOW: i32 = 75;
const EILSEQ: i32 = 84;
const EOPNOTSUPP: i32 = 95;
const EPROBE_DEFER: i32 = 517;

impl UfsError {
    /// Returns the negative status code for this error.
    #[must_use]
    pub const fn errno(self) -> i32 {
        -match self {
            Self::InvalidArgument => EINVAL,
            Self::NoDevice => ENODEV,
            Self::NoMemory => ENOMEM,
            Self::NoData => ENODATA,
            Self::Overflow => EOVERFLOW,
            Self::IllegalSequence => EILSEQ,
            Self::ProbeDeferred => EPROBE_DEFER,
            Self::Busy => EBUSY,
            Self::Io => EIO,
            Self::Unsupported => EOPNOTSUPP,
            Self::Other(code) => code,
        }
    }

    /// Maps a status code (either sign) back onto an error.
    ///
    /// Returns `None` for zero, which means success.
    #[must_use]
    pub const fn from_errno(code: i32) -> Option<Self> {
        let code = code.wrapping_abs();
        Some(match code {
            0 => return None,
            EINVAL => Self::InvalidArgument,
            ENODEV => Self::NoDevice,
            ENOMEM => Self::NoMemory,
            ENODATA => Self::NoData,
            EOVERFLOW => Self::Overflow,
            EILSEQ => Self::IllegalSequence,
            EPROBE_DEFER => Self::ProbeDeferred,
            EBUSY => Self::Busy,
            EIO => Self::Io,
            EOPNOTSUPP => Self::Unsupported,
            other => Self::Other(other),
        })
    }
}

impl fmt::Display for UfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::NoDevice => f.write_str("no such device"),
            Self::NoMemory => f.write_str("out of memory"),
            Self::NoData => f.write_str("no data available"),
            Self::Overflow => f.write_str("value too large"),
            Self::IllegalSequence => f.write_str("illegal byte sequence"),
            Self::ProbeDeferred => f.write_str("probe deferred"),
            Self::Busy => f.write_str("resource busy"),
            Self::Io => f.write_str("I/O error"),
            Self::Unsupported => f.write_str("operation not supported"),
            Self::Other(code) => write!(f, "error {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_all_variants() {
        assert_eq!(format!("{}", UfsError::InvalidArgument), "invalid argument");
        assert_eq!(format!("{}", UfsError::NoDevice), "no such device");
        assert_eq!(format!("{}", UfsError::NoMemory), "out of memory");
        assert_eq!(format!("{}", UfsError::NoData), "no data available");
        assert_eq!(format!("{}", UfsError::Overflow), "value too large");
        assert_eq!(
            format!("{}", UfsError::IllegalSequence),
            "illegal byte sequence"
        );
        assert_eq!(format!("{}", UfsError::ProbeDeferred), "probe deferred");
        assert_eq!(format!("{}", UfsError::Busy), "resource busy");
        assert_eq!(format!("{}", UfsError::Io), "I/O error");
        assert_eq!(
            format!("{}", UfsError::Unsupported),
            "operation not supported"
        );
        assert_eq!(format!("{}", UfsError::Other(110)), "error 110");
    }

    #[test]
    fn errno_is_negative() {
        assert_eq!(UfsError::InvalidArgument.errno(), -22);
        assert_eq!(UfsError::NoDevice.errno(), -19);
        assert_eq!(UfsError::ProbeDeferred.errno(), -517);
        assert_eq!(UfsError::Other(110).errno(), -110);
    }

    #[test]
    fn from_errno_accepts_either_sign() {
        assert_eq!(UfsError::from_errno(-22), Some(UfsError::InvalidArgument));
        assert_eq!(UfsError::from_errno(22), Some(UfsError::InvalidArgument));
        assert_eq!(UfsError::from_errno(-110), Some(UfsError::Other(110)));
        assert_eq!(UfsError::from_errno(0), None);
    }

    #[test]
    fn errno_round_trip_for_known_codes() {
        for err in [
            UfsError::InvalidArgument,
            UfsError::NoDevice,
            UfsError::NoMemory,
            UfsError::NoData,
            UfsError::Overflow,
            UfsError::IllegalSequence,
            UfsError::ProbeDeferred,
            UfsError::Busy,
            UfsError::Io,
            UfsError::Unsupported,
        ] {
            assert_eq!(UfsError::from_errno(err.errno()), Some(err));
        }
    }
}
