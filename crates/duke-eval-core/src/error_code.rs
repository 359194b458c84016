//! Spreadsheet error codes
//!
//! These are the only externally observable "wire format" of the engine:
//! downstream consumers match on the code, never on a message.

use std::fmt;

/// A nominal spreadsheet error value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// #NULL! - Empty intersection of two ranges
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
}

impl ErrorCode {
    /// All codes, in BIFF code order
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::Null,
        ErrorCode::Div0,
        ErrorCode::Value,
        ErrorCode::Ref,
        ErrorCode::Name,
        ErrorCode::Num,
        ErrorCode::Na,
    ];

    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::Div0 => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::Na => "#N/A",
        }
    }

    /// Parse an error string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NULL!" => Some(ErrorCode::Null),
            "#DIV/0!" => Some(ErrorCode::Div0),
            "#VALUE!" => Some(ErrorCode::Value),
            "#REF!" => Some(ErrorCode::Ref),
            "#NAME?" => Some(ErrorCode::Name),
            "#NUM!" => Some(ErrorCode::Num),
            "#N/A" => Some(ErrorCode::Na),
            _ => None,
        }
    }

    /// Get the numeric error code (BIFF format)
    pub fn code(&self) -> u8 {
        match self {
            ErrorCode::Null => 0x00,
            ErrorCode::Div0 => 0x07,
            ErrorCode::Value => 0x0F,
            ErrorCode::Ref => 0x17,
            ErrorCode::Name => 0x1D,
            ErrorCode::Num => 0x24,
            ErrorCode::Na => 0x2A,
        }
    }

    /// Look up an error by its numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorCode::Null.code(), 0x00);
        assert_eq!(ErrorCode::Div0.code(), 0x07);
        assert_eq!(ErrorCode::Value.code(), 0x0F);
        assert_eq!(ErrorCode::Ref.code(), 0x17);
        assert_eq!(ErrorCode::Name.code(), 0x1D);
        assert_eq!(ErrorCode::Num.code(), 0x24);
        assert_eq!(ErrorCode::Na.code(), 0x2A);
    }

    #[test]
    fn test_from_code() {
        for e in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_code(e.code()), Some(e));
        }
        assert_eq!(ErrorCode::from_code(0x01), None);
    }

    #[test]
    fn test_text_form() {
        assert_eq!(ErrorCode::from_str("#n/a"), Some(ErrorCode::Na));
        assert_eq!(ErrorCode::from_str("#DIV/0!"), Some(ErrorCode::Div0));
        assert_eq!(ErrorCode::from_str("#SPILL!"), None);
        assert_eq!(ErrorCode::Name.to_string(), "#NAME?");
    }
}
