//! Value representation codes.
//!
//! | Class       | Codes                                            |
//! |-------------|--------------------------------------------------|
//! | text        | AE AS CS DA DS DT IS LO PN SH TM UC UI           |
//! | long text   | LT ST UR UT                                      |
//! | numeric     | FD FL SL SS SV UL US UV                          |
//! | bytes       | OB OD OF OL OV OW UN                             |
//! | composite   | AT SQ                                            |

use core::fmt;

/// Two-letter value representation code of a data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // the variants are the standard two-letter codes
pub enum Vr {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FD,
    FL,
    IS,
    LO,
    LT,
    OB,
    OD,
    OF,
    OL,
    OV,
    OW,
    PN,
    SH,
    SL,
    SQ,
    SS,
    ST,
    SV,
    TM,
    UC,
    UI,
    UL,
    UN,
    UR,
    US,
    UT,
    UV,
}

impl Vr {
    /// Parse the two ASCII bytes of an explicit VR header.
    #[must_use]
    pub fn from_bytes(code: [u8; 2]) -> Option<Self> {
        let vr = match &code {
            b"AE" => Self::AE,
            b"AS" => Self::AS,
            b"AT" => Self::AT,
            b"CS" => Self::CS,
            b"DA" => Self::DA,
            b"DS" => Self::DS,
            b"DT" => Self::DT,
            b"FD" => Self::FD,
            b"FL" => Self::FL,
            b"IS" => Self::IS,
            b"LO" => Self::LO,
            b"LT" => Self::LT,
            b"OB" => Self::OB,
            b"OD" => Self::OD,
            b"OF" => Self::OF,
            b"OL" => Self::OL,
            b"OV" => Self::OV,
            b"OW" => Self::OW,
            b"PN" => Self::PN,
            b"SH" => Self::SH,
            b"SL" => Self::SL,
            b"SQ" => Self::SQ,
            b"SS" => Self::SS,
            b"ST" => Self::ST,
            b"SV" => Self::SV,
            b"TM" => Self::TM,
            b"UC" => Self::UC,
            b"UI" => Self::UI,
            b"UL" => Self::UL,
            b"UN" => Self::UN,
            b"UR" => Self::UR,
            b"US" => Self::US,
            b"UT" => Self::UT,
            b"UV" => Self::UV,
            _ => return None,
        };
        Some(vr)
    }

    /// The two-letter code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AE => "AE",
            Self::AS => "AS",
            Self::AT => "AT",
            Self::CS => "CS",
            Self::DA => "DA",
            Self::DS => "DS",
            Self::DT => "DT",
            Self::FD => "FD",
            Self::FL => "FL",
            Self::IS => "IS",
            Self::LO => "LO",
            Self::LT => "LT",
            Self::OB => "OB",
            Self::OD => "OD",
            Self::OF => "OF",
            Self::OL => "OL",
            Self::OV => "OV",
            Self::OW => "OW",
            Self::PN => "PN",
            Self::SH => "SH",
            Self::SL => "SL",
            Self::SQ => "SQ",
            Self::SS => "SS",
            Self::ST => "ST",
            Self::SV => "SV",
            Self::TM => "TM",
            Self::UC => "UC",
            Self::UI => "UI",
            Self::UL => "UL",
            Self::UN => "UN",
            Self::UR => "UR",
            Self::US => "US",
            Self::UT => "UT",
            Self::UV => "UV",
        }
    }

    /// Explicit VR encodings of these codes carry 2 reserved bytes and a 32-bit length.
    #[must_use]
    pub const fn has_long_header(self) -> bool {
        matches!(
            self,
            Self::OB
                | Self::OD
                | Self::OF
                | Self::OL
                | Self::OV
                | Self::OW
                | Self::SQ
                | Self::UC
                | Self::UN
                | Self::UR
                | Self::UT
                | Self::SV
                | Self::UV
        )
    }

    /// "Long binary" categories whose oversized byte values get summarized
    /// instead of stored.
    #[must_use]
    pub const fn is_binary_capable(self) -> bool {
        matches!(self, Self::OB | Self::OW | Self::UN)
    }

    /// Single-valued free text; backslash is an ordinary character here.
    #[must_use]
    pub const fn is_long_text(self) -> bool {
        matches!(self, Self::LT | Self::ST | Self::UR | Self::UT)
    }

    /// Raw byte payloads.
    #[must_use]
    pub const fn is_bytes(self) -> bool {
        matches!(
            self,
            Self::OB | Self::OD | Self::OF | Self::OL | Self::OV | Self::OW | Self::UN
        )
    }

    /// Width in bytes of one binary number, for numeric codes.
    #[must_use]
    pub const fn numeric_width(self) -> Option<usize> {
        match self {
            Self::SS | Self::US => Some(2),
            Self::SL | Self::UL | Self::FL => Some(4),
            Self::SV | Self::UV | Self::FD => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for Vr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!(Vr::from_bytes(*b"OB"), Some(Vr::OB));
        assert_eq!(Vr::from_bytes(*b"PN"), Some(Vr::PN));
        assert_eq!(Vr::from_bytes(*b"UV"), Some(Vr::UV));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(Vr::from_bytes(*b"ZZ"), None);
        assert_eq!(Vr::from_bytes([0, 0]), None);
    }

    #[test]
    fn code_roundtrips_through_str() {
        for code in [b"AE", b"AT", b"FD", b"SQ", b"UN", b"UT"] {
            let vr = Vr::from_bytes(*code).unwrap_or(Vr::UN);
            assert_eq!(vr.as_str().as_bytes(), code);
        }
    }

    #[test]
    fn binary_capable_is_ob_ow_un() {
        assert!(Vr::OB.is_binary_capable());
        assert!(Vr::OW.is_binary_capable());
        assert!(Vr::UN.is_binary_capable());
        assert!(!Vr::OF.is_binary_capable());
        assert!(!Vr::LO.is_binary_capable());
    }

    #[test]
    fn long_header_codes() {
        assert!(Vr::SQ.has_long_header());
        assert!(Vr::UT.has_long_header());
        assert!(!Vr::US.has_long_header());
        assert!(!Vr::LO.has_long_header());
    }

    #[test]
    fn numeric_widths() {
        assert_eq!(Vr::US.numeric_width(), Some(2));
        assert_eq!(Vr::FL.numeric_width(), Some(4));
        assert_eq!(Vr::FD.numeric_width(), Some(8));
        assert_eq!(Vr::CS.numeric_width(), None);
    }
}
