//! # Validation Result Codes
//!
//! A validation result is a single `u32` with four packed fields:
//!
//! ```text
//!  31  30 29         22 21      16 15                 0
//! +------+-------------+----------+--------------------+
//! | sev  |  facility   |  flags   |        code        |
//! +------+-------------+----------+--------------------+
//! ```
//!
//! Severity occupies the most significant bits, so it can be read without
//! decoding anything else. Both severity values `0b10` and `0b11` read as
//! [`Severity::Failure`].

use serde::{Deserialize, Serialize};
use std::fmt;

const SEVERITY_SHIFT: u32 = 30;
const FACILITY_SHIFT: u32 = 22;
const FLAGS_SHIFT: u32 = 16;
const FLAGS_MASK: u8 = 0x3F;

/// How a result affects the entity. Ordered: `Success < Neutral < Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Accept.
    Success = 0,
    /// Retry later.
    Neutral = 1,
    /// Reject permanently.
    Failure = 2,
}

impl Severity {
    const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Severity::Success,
            1 => Severity::Neutral,
            _ => Severity::Failure,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Neutral => "Neutral",
            Severity::Failure => "Failure",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subsystem that owns a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityCode(pub u8);

impl FacilityCode {
    pub const NONE: Self = Self(0x00);
    pub const CORE: Self = Self(0x43);
    pub const LOCK_HASH: Self = Self(0x48);
    pub const LOCK_SECRET: Self = Self(0x52);
    pub const TRANSFER: Self = Self(0x54);
    pub const CONSUMER: Self = Self(0xFE);
    pub const CHAIN: Self = Self(0xFF);

    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x00 => Some("None"),
            0x43 => Some("Core"),
            0x48 => Some("LockHash"),
            0x52 => Some("LockSecret"),
            0x54 => Some("Transfer"),
            0xFE => Some("Consumer"),
            0xFF => Some("Chain"),
            _ => None,
        }
    }

    /// Metric label for this facility.
    pub fn label(self) -> &'static str {
        self.name().unwrap_or("Other")
    }
}

/// Result flag bits. Only the low six bits are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultFlags(pub u8);

impl ResultFlags {
    pub const NONE: Self = Self(0x00);
    /// Expected failure; logged at trace level.
    pub const VERBOSE: Self = Self(0x01);

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Packed validation outcome.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult(u32);

/// Free-function form of [`ValidationResult::make`].
pub const fn make_validation_result(
    severity: Severity,
    facility: FacilityCode,
    code: u16,
    flags: ResultFlags,
) -> ValidationResult {
    ValidationResult::make(severity, facility, code, flags)
}

impl ValidationResult {
    pub const fn make(
        severity: Severity,
        facility: FacilityCode,
        code: u16,
        flags: ResultFlags,
    ) -> Self {
        Self(
            (severity as u32) << SEVERITY_SHIFT
                | (facility.0 as u32) << FACILITY_SHIFT
                | ((flags.0 & FLAGS_MASK) as u32) << FLAGS_SHIFT
                | code as u32,
        )
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn severity(self) -> Severity {
        Severity::from_bits(self.0 >> SEVERITY_SHIFT)
    }

    pub const fn facility(self) -> FacilityCode {
        FacilityCode((self.0 >> FACILITY_SHIFT) as u8)
    }

    pub const fn flags(self) -> ResultFlags {
        ResultFlags(((self.0 >> FLAGS_SHIFT) as u8) & FLAGS_MASK)
    }

    pub const fn code(self) -> u16 {
        self.0 as u16
    }

    /// True when every bit of `flag` is set.
    pub const fn is_set(self, flag: ResultFlags) -> bool {
        self.flags().0 & flag.0 == flag.0
    }

    pub const fn is_success(self) -> bool {
        matches!(self.severity(), Severity::Success)
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self.severity(), Severity::Neutral)
    }

    pub const fn is_failure(self) -> bool {
        matches!(self.severity(), Severity::Failure)
    }

    /// Picks the more severe result; ties keep `self`.
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    pub fn log_level(self) -> tracing::Level {
        if self.is_set(ResultFlags::VERBOSE) {
            tracing::Level::TRACE
        } else {
            tracing::Level::WARN
        }
    }

    /// Symbolic name if this is a known result.
    pub fn name(self) -> Option<&'static str> {
        KNOWN_RESULTS
            .iter()
            .find(|(result, _)| *result == self)
            .map(|(_, name)| *name)
    }
}

macro_rules! define_validation_results {
    ($(
        $(#[$meta:meta])*
        $constant:ident = ($severity:ident, $facility:ident, $code:expr, $flags:ident) => $name:literal;
    )*) => {
        impl ValidationResult {
            $(
                $(#[$meta])*
                pub const $constant: Self = Self::make(
                    Severity::$severity,
                    FacilityCode::$facility,
                    $code,
                    ResultFlags::$flags,
                );
            )*
        }

        const KNOWN_RESULTS: &[(ValidationResult, &str)] = &[
            $((ValidationResult::$constant, $name),)*
        ];
    };
}

define_validation_results! {
    SUCCESS = (Success, NONE, 0, NONE) => "Success";
    NEUTRAL = (Neutral, NONE, 0, NONE) => "Neutral";
    FAILURE = (Failure, NONE, 0, NONE) => "Failure";

    // =========================================================================
    // CORE
    // =========================================================================

    /// Deadline is before the block time.
    FAILURE_CORE_PAST_DEADLINE = (Failure, CORE, 1, NONE) => "Failure_Core_Past_Deadline";
    /// Deadline is beyond the maximum transaction lifetime.
    FAILURE_CORE_FUTURE_DEADLINE = (Failure, CORE, 2, NONE) => "Failure_Core_Future_Deadline";
    /// Sender cannot cover a transfer or reservation.
    FAILURE_CORE_INSUFFICIENT_BALANCE = (Failure, CORE, 3, NONE) => "Failure_Core_Insufficient_Balance";
    FAILURE_CORE_INVALID_VERSION = (Failure, CORE, 4, NONE) => "Failure_Core_Invalid_Version";
    FAILURE_CORE_UNSUPPORTED_ENTITY_TYPE = (Failure, CORE, 5, NONE) => "Failure_Core_Unsupported_Entity_Type";
    FAILURE_CORE_WRONG_NETWORK = (Failure, CORE, 7, NONE) => "Failure_Core_Wrong_Network";
    FAILURE_CORE_SIGNATURE_NOT_VERIFIABLE = (Failure, CORE, 8, NONE) => "Failure_Core_Signature_Not_Verifiable";

    // =========================================================================
    // TRANSFER
    // =========================================================================

    FAILURE_TRANSFER_MESSAGE_TOO_LARGE = (Failure, TRANSFER, 1, NONE) => "Failure_Transfer_Message_Too_Large";
    /// Mosaic ids must be strictly ascending.
    FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS = (Failure, TRANSFER, 2, NONE) => "Failure_Transfer_Out_Of_Order_Mosaics";
    FAILURE_TRANSFER_TOO_MANY_MOSAICS = (Failure, TRANSFER, 3, NONE) => "Failure_Transfer_Too_Many_Mosaics";

    // =========================================================================
    // LOCKS
    // =========================================================================

    FAILURE_LOCKHASH_INVALID_MOSAIC_ID = (Failure, LOCK_HASH, 1, NONE) => "Failure_LockHash_Invalid_Mosaic_Id";
    FAILURE_LOCKHASH_INVALID_MOSAIC_AMOUNT = (Failure, LOCK_HASH, 2, NONE) => "Failure_LockHash_Invalid_Mosaic_Amount";
    FAILURE_LOCKHASH_HASH_ALREADY_EXISTS = (Failure, LOCK_HASH, 3, VERBOSE) => "Failure_LockHash_Hash_Already_Exists";
    FAILURE_LOCKHASH_INVALID_DURATION = (Failure, LOCK_HASH, 4, NONE) => "Failure_LockHash_Invalid_Duration";
    FAILURE_LOCKSECRET_INVALID_HASH_ALGORITHM = (Failure, LOCK_SECRET, 1, NONE) => "Failure_LockSecret_Invalid_Hash_Algorithm";
    FAILURE_LOCKSECRET_HASH_ALREADY_EXISTS = (Failure, LOCK_SECRET, 2, VERBOSE) => "Failure_LockSecret_Hash_Already_Exists";
    FAILURE_LOCKSECRET_INVALID_DURATION = (Failure, LOCK_SECRET, 4, NONE) => "Failure_LockSecret_Invalid_Duration";
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "ValidationResult(0x{:08X})", self.0),
        }
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [0x{:08X}]", self, self.0)
    }
}
