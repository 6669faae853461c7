use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Direction {
    Low => "low",
    Normal => "normal",
    High => "high",
});

// Variant order is the escalation order; `Ord` relies on it.
str_enum!(Severity {
    None => "none",
    Mild => "mild",
    Moderate => "moderate",
    Critical => "critical",
});

str_enum!(UnitConfidence {
    Exact => "exact",
    Converted => "converted",
    Assumed => "assumed",
    Unresolved => "unresolved",
});

str_enum!(RiskDomain {
    Cardiovascular => "cardiovascular",
    Metabolic => "metabolic",
    Kidney => "kidney",
    Liver => "liver",
    Thyroid => "thyroid",
    BoneMineral => "bone_mineral",
    Blood => "blood",
    Nutritional => "nutritional",
    Electrolytes => "electrolytes",
    Inflammation => "inflammation",
    Reproductive => "reproductive",
    Infectious => "infectious",
});

str_enum!(
    /// Share of abnormal findings within one risk domain, bucketed.
    /// Variant order is the escalation order.
    RiskLevel {
        Normal => "normal",
        Low => "low",
        Moderate => "moderate",
        High => "high",
    }
);

str_enum!(
    /// Flag printed next to a value by the reporting lab (H, L, HH, …).
    AbnormalFlag {
        Normal => "normal",
        Low => "low",
        High => "high",
        CriticalLow => "critical_low",
        CriticalHigh => "critical_high",
        Abnormal => "abnormal",
    }
);

impl UnitConfidence {
    /// `Unresolved` values are carried forward but must not be trusted.
    pub fn is_trustworthy(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl AbnormalFlag {
    /// Parse a flag token as printed on a report. Case-insensitive for words,
    /// exact for the single-letter forms so that a stray "l" is not a flag.
    pub fn from_report_token(token: &str) -> Option<Self> {
        match token {
            "H" | "↑" => return Some(Self::High),
            "L" | "↓" => return Some(Self::Low),
            "HH" => return Some(Self::CriticalHigh),
            "LL" => return Some(Self::CriticalLow),
            "N" => return Some(Self::Normal),
            "*" | "A" => return Some(Self::Abnormal),
            _ => {}
        }
        match token.to_lowercase().as_str() {
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "critical high" | "panic high" => Some(Self::CriticalHigh),
            "critical low" | "panic low" => Some(Self::CriticalLow),
            "abnormal" | "critical" | "panic" => Some(Self::Abnormal),
            _ => None,
        }
    }

    /// Direction implied by the printed flag; `None` for a bare "abnormal" mark.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Normal => Some(Direction::Normal),
            Self::Low | Self::CriticalLow => Some(Direction::Low),
            Self::High | Self::CriticalHigh => Some(Direction::High),
            Self::Abnormal => None,
        }
    }
}
