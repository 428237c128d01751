// ABOUTME: Unit normalization for nvidia-smi values
// ABOUTME: Memory sizes to bytes, percentages and temperatures to integers

use core::fmt;

/// Temperature sentinel meaning "not available"
pub const NOT_AVAILABLE: &str = "N/A";

/// Binary memory units understood by [`parse_mem_bytes`]
pub const MEMORY_UNITS: [(&str, u64); 4] = [
    ("KiB", 1 << 10),
    ("MiB", 1 << 20),
    ("GiB", 1 << 30),
    ("TiB", 1 << 40),
];

/// Reason a value string could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// Expected `<integer> <unit>`
    MissingUnit,
    /// Unit not in [`MEMORY_UNITS`]
    UnknownUnit(String),
    /// Expected trailing suffix was not there
    MissingSuffix(&'static str),
    /// Numeric part does not parse
    InvalidNumber(String),
    /// Byte count does not fit in 64 bits
    Overflow,
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::MissingUnit => write!(f, "expected '<integer> <unit>'"),
            UnitError::UnknownUnit(unit) => write!(f, "unknown memory unit '{unit}'"),
            UnitError::MissingSuffix(suffix) => write!(f, "expected trailing {suffix}"),
            UnitError::InvalidNumber(num) => write!(f, "invalid integer '{num}'"),
            UnitError::Overflow => write!(f, "byte count overflows u64"),
        }
    }
}

impl std::error::Error for UnitError {}

/// Convert `"<n> <unit>"` (e.g. `"512 MiB"`) to a byte count
pub fn parse_mem_bytes(text: &str) -> Result<u64, UnitError> {
    let (size, unit) = text.trim().split_once(' ').ok_or(UnitError::MissingUnit)?;
    let size: u64 = size
        .parse()
        .map_err(|_| UnitError::InvalidNumber(size.to_string()))?;

    let unit = unit.trim();
    let multiplier = MEMORY_UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, bytes)| *bytes)
        .ok_or_else(|| UnitError::UnknownUnit(unit.to_string()))?;

    size.checked_mul(multiplier).ok_or(UnitError::Overflow)
}

/// Convert `"<digits>%"` (optionally `"<digits> %"`) to an integer percentage
pub fn parse_percent(text: &str) -> Result<u32, UnitError> {
    let digits = text
        .strip_suffix('%')
        .ok_or(UnitError::MissingSuffix("'%'"))?
        .trim();
    digits
        .parse()
        .map_err(|_| UnitError::InvalidNumber(digits.to_string()))
}

/// Convert `"<digits>C"` to degrees, or `None` for the `"N/A"` sentinel
///
/// The unit is a single trailing ASCII letter; whitespace before it is allowed,
/// matching the `"45 C"` spelling current drivers emit.
pub fn parse_temp(text: &str) -> Result<Option<i32>, UnitError> {
    if text == NOT_AVAILABLE {
        return Ok(None);
    }

    let digits = match text.chars().last() {
        Some(unit) if unit.is_ascii_alphabetic() => text[..text.len() - 1].trim(),
        _ => return Err(UnitError::MissingSuffix("temperature unit")),
    };
    digits
        .parse()
        .map(Some)
        .map_err(|_| UnitError::InvalidNumber(digits.to_string()))
}

/// Exact-match boolean for mode fields: only `"Enabled"` is true
pub fn parse_enabled(text: &str) -> bool {
    text == "Enabled"
}
