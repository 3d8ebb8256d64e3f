use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string forms double as the serde representation, so wire values
/// and display labels stay in one place.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
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

// Severity labels are part of the model's wire contract (Spanish).
str_enum!(Severity {
    Low => "Baja",
    Medium => "Media",
    High => "Alta",
    VitalEmergency => "Emergencia Vital",
});

str_enum!(Role {
    Patient => "patient",
    Assistant => "assistant",
});

impl Severity {
    /// Severities that, combined with a referral, flag a possible emergency.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::VitalEmergency)
    }
}

impl Default for Severity {
    // Missing `gravedad` on the wire defaults to the lowest urgency.
    fn default() -> Self {
        Severity::Low
    }
}
