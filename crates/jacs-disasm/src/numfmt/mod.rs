//! Numeric format tags.
//!
//! A tag packs a 2-bit size selector (width `8 << size`), a 2-bit kind and,
//! above the low nibble, a fractional shift: `tag = size | kind << 2 | shift << 4`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interpretation of the stored bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumKind {
    Unsigned,
    Signed,
    Float,
    /// Fixed-point style value, displayed with its fractional shift.
    Fixed,
}

impl NumKind {
    const ALL: [NumKind; 4] = [NumKind::Unsigned, NumKind::Signed, NumKind::Float, NumKind::Fixed];

    pub fn letter(self) -> char {
        match self {
            NumKind::Unsigned => 'u',
            NumKind::Signed => 'i',
            NumKind::Float => 'f',
            NumKind::Fixed => 'x',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.letter() == c)
    }

    fn bits(self) -> u32 {
        self as u32
    }
}

/// Width in bits selected by the low two bits of a format.
pub fn bit_size(fmt: u32) -> u32 {
    8 << (fmt & 0b11)
}

/// Decoded numeric format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumFmt {
    kind: NumKind,
    size: u8,
    shift: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumFmtError {
    #[error("size selector {0} out of range")]
    BadSize(u8),
    #[error("shift {shift} does not fit in {width} bits")]
    BadShift { shift: u32, width: u32 },
    #[error("invalid numeric format `{0}`")]
    BadMnemonic(String),
}

impl NumFmt {
    pub const U8: NumFmt = NumFmt::plain(NumKind::Unsigned, 0);
    pub const U16: NumFmt = NumFmt::plain(NumKind::Unsigned, 1);
    pub const U32: NumFmt = NumFmt::plain(NumKind::Unsigned, 2);
    pub const U64: NumFmt = NumFmt::plain(NumKind::Unsigned, 3);
    pub const I8: NumFmt = NumFmt::plain(NumKind::Signed, 0);
    pub const I16: NumFmt = NumFmt::plain(NumKind::Signed, 1);
    pub const I32: NumFmt = NumFmt::plain(NumKind::Signed, 2);
    pub const I64: NumFmt = NumFmt::plain(NumKind::Signed, 3);
    pub const F32: NumFmt = NumFmt::plain(NumKind::Float, 2);
    pub const F64: NumFmt = NumFmt::plain(NumKind::Float, 3);

    const fn plain(kind: NumKind, size: u8) -> Self {
        Self { kind, size, shift: 0 }
    }

    /// Builds a format, checking that the shift leaves at least one integer bit.
    pub fn new(kind: NumKind, size: u8, shift: u32) -> Result<Self, NumFmtError> {
        if size > 3 {
            return Err(NumFmtError::BadSize(size));
        }
        let width = bit_size(u32::from(size));
        if shift >= width {
            return Err(NumFmtError::BadShift { shift, width });
        }
        Ok(Self { kind, size, shift })
    }

    /// Decodes any tag value; no validation is performed.
    pub fn from_tag(tag: u32) -> Self {
        let fmt = tag & 0xf;
        Self {
            kind: NumKind::ALL[(fmt >> 2) as usize],
            size: (fmt & 0b11) as u8,
            shift: tag >> 4,
        }
    }

    pub fn tag(&self) -> u32 {
        u32::from(self.size) | self.kind.bits() << 2 | self.shift << 4
    }

    pub fn kind(&self) -> NumKind {
        self.kind
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Nominal storage width in bits.
    pub fn bit_size(&self) -> u32 {
        bit_size(u32::from(self.size))
    }

    /// Width shown in the mnemonic: storage width minus the fractional shift.
    pub fn display_width(&self) -> i64 {
        i64::from(self.bit_size()) - i64::from(self.shift)
    }
}

impl fmt::Display for NumFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift != 0 {
            write!(f, "{}{}.{}", self.kind.letter(), self.display_width(), self.shift)
        } else {
            write!(f, "{}{}", self.kind.letter(), self.bit_size())
        }
    }
}

impl FromStr for NumFmt {
    type Err = NumFmtError;

    /// Parses a mnemonic such as `u8`, `f32` or `x12.4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || NumFmtError::BadMnemonic(s.to_string());
        let mut chars = s.chars();
        let kind = chars.next().and_then(NumKind::from_letter).ok_or_else(bad)?;
        let rest = chars.as_str();
        let (width, shift) = match rest.split_once('.') {
            Some((w, sh)) => (w, sh.parse::<u32>().map_err(|_| bad())?),
            None => (rest, 0),
        };
        let width = width.parse::<u32>().map_err(|_| bad())? + shift;
        let size = match width {
            8 => 0,
            16 => 1,
            32 => 2,
            64 => 3,
            _ => return Err(bad()),
        };
        NumFmt::new(kind, size, shift)
    }
}

/// Renders a decimal tag as its mnemonic; anything else is returned unchanged.
pub fn numfmt_mnemonic(text: &str) -> String {
    if !crate::utils::is_number(text) {
        return text.to_string();
    }
    match text.parse::<u32>() {
        Ok(tag) => NumFmt::from_tag(tag).to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics() {
        assert_eq!(NumFmt::U8.to_string(), "u8");
        assert_eq!(NumFmt::I16.to_string(), "i16");
        assert_eq!(NumFmt::F32.to_string(), "f32");
        assert_eq!(NumFmt::F64.to_string(), "f64");
        let fixed = NumFmt::new(NumKind::Fixed, 1, 4).unwrap();
        assert_eq!(fixed.to_string(), "x12.4");
        assert_eq!(fixed.tag(), 0b1101 | 4 << 4);
    }

    #[test]
    fn test_tag_fields() {
        for kind in NumKind::ALL {
            for size in 0..4u8 {
                let width = 8u32 << size;
                for shift in [0, 1, width - 1] {
                    let f = NumFmt::new(kind, size, shift).unwrap();
                    let decoded = NumFmt::from_tag(f.tag());
                    assert_eq!(decoded, f);
                    assert_eq!(decoded.bit_size(), width);
                    assert_eq!(decoded.to_string(), f.to_string());
                    assert_eq!(f.to_string().parse::<NumFmt>().unwrap(), f);
                }
            }
        }
    }

    #[test]
    fn test_invalid_formats() {
        assert_eq!(NumFmt::new(NumKind::Signed, 4, 0), Err(NumFmtError::BadSize(4)));
        assert!(matches!(
            NumFmt::new(NumKind::Fixed, 0, 8),
            Err(NumFmtError::BadShift { shift: 8, width: 8 })
        ));
        assert!("q8".parse::<NumFmt>().is_err());
        assert!("u12".parse::<NumFmt>().is_err());
        assert!("x".parse::<NumFmt>().is_err());
    }

    #[test]
    fn test_numfmt_mnemonic_text() {
        assert_eq!(numfmt_mnemonic("10"), "f32");
        assert_eq!(numfmt_mnemonic("0"), "u8");
        assert_eq!(numfmt_mnemonic("_l3"), "_l3");
        assert_eq!(numfmt_mnemonic("-4"), "-4");
        assert_eq!(numfmt_mnemonic("99999999999999"), "99999999999999");
    }
}
