use std::fmt;

/// HRESULT-style 32-bit status code. Negative values are failures.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Status(pub i32);

const fn hresult(bits: u32) -> Status {
    Status(bits as i32)
}

/// `HRESULT_FROM_WIN32(code)`.
const fn from_win32(code: u32) -> Status {
    hresult(0x8007_0000 | (code & 0xFFFF))
}

impl Status {
    pub const OK: Status = Status(0);
    pub const E_FAIL: Status = hresult(0x8000_4005);
    pub const E_UNEXPECTED: Status = hresult(0x8000_FFFF);
    pub const E_INVALIDARG: Status = hresult(0x8007_0057);
    pub const E_OUTOFMEMORY: Status = hresult(0x8007_000E);
    pub const FILE_NOT_FOUND: Status = from_win32(2);
    pub const ASSERTION_FAILURE: Status = from_win32(665);
    pub const BAD_IMAGE: Status = hresult(0x8898_2F60);
    pub const DEVICE_LOST: Status = hresult(0x887A_0005);
    pub const UNSUPPORTED: Status = hresult(0x887A_0004);

    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Process exit code for this status. Failures never map to zero, even
    /// where the host truncates exit codes to 8 bits.
    pub fn exit_code(self) -> i32 {
        if !self.is_failure() {
            return self.0;
        }
        if cfg!(unix) && self.0 & 0xFF == 0 {
            return 1;
        }
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({self})")
    }
}

/// Errors that carry their own status code.
pub trait HasStatus {
    fn status(&self) -> Status;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_codes_are_wrapped() {
        assert_eq!(Status::ASSERTION_FAILURE.0 as u32, 0x8007_0299);
        assert_eq!(Status::FILE_NOT_FOUND.0 as u32, 0x8007_0002);
        assert!(Status::ASSERTION_FAILURE.is_failure());
        assert!(!Status::OK.is_failure());
    }

    #[test]
    fn failures_never_exit_with_zero() {
        assert_eq!(Status::OK.exit_code(), 0);
        for status in [Status::E_FAIL, Status::E_UNEXPECTED, Status(0x8000_0000u32 as i32)] {
            assert_ne!(status.exit_code(), 0, "{status}");
            if cfg!(unix) {
                assert_ne!(status.exit_code() & 0xFF, 0, "{status}");
            }
        }
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Status::E_UNEXPECTED.to_string(), "0x8000FFFF");
    }
}
