//! Emulated hardware models.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EngineError;

/// A Game Boy hardware revision the engine can emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum HardwareModel {
    #[default]
    DmgB,
    Sgb,
    SgbNoSfc,
    SgbPal,
    SgbPalNoSfc,
    Mgb,
    Sgb2,
    Sgb2NoSfc,
    Cgb0,
    CgbA,
    CgbB,
    CgbC,
    CgbD,
    CgbE,
    AgbA,
    GbpA,
}

impl HardwareModel {
    /// Every model, in display order.
    pub const ALL: [HardwareModel; 16] = [
        HardwareModel::DmgB,
        HardwareModel::Sgb,
        HardwareModel::SgbNoSfc,
        HardwareModel::SgbPal,
        HardwareModel::SgbPalNoSfc,
        HardwareModel::Mgb,
        HardwareModel::Sgb2,
        HardwareModel::Sgb2NoSfc,
        HardwareModel::Cgb0,
        HardwareModel::CgbA,
        HardwareModel::CgbB,
        HardwareModel::CgbC,
        HardwareModel::CgbD,
        HardwareModel::CgbE,
        HardwareModel::AgbA,
        HardwareModel::GbpA,
    ];

    /// Short names accepted in addition to [`as_str`](Self::as_str).
    const ALIASES: [(&'static str, HardwareModel); 6] = [
        ("dmg", HardwareModel::DmgB),
        ("cgb", HardwareModel::CgbE),
        ("agb", HardwareModel::AgbA),
        ("gbp", HardwareModel::GbpA),
        ("sgb-ntsc", HardwareModel::Sgb),
        ("sgb-ntsc-no-sfc", HardwareModel::SgbNoSfc),
    ];

    /// Canonical command-line name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareModel::DmgB => "dmg-b",
            HardwareModel::Sgb => "sgb",
            HardwareModel::SgbNoSfc => "sgb-no-sfc",
            HardwareModel::SgbPal => "sgb-pal",
            HardwareModel::SgbPalNoSfc => "sgb-pal-no-sfc",
            HardwareModel::Mgb => "mgb",
            HardwareModel::Sgb2 => "sgb2",
            HardwareModel::Sgb2NoSfc => "sgb2-no-sfc",
            HardwareModel::Cgb0 => "cgb-0",
            HardwareModel::CgbA => "cgb-a",
            HardwareModel::CgbB => "cgb-b",
            HardwareModel::CgbC => "cgb-c",
            HardwareModel::CgbD => "cgb-d",
            HardwareModel::CgbE => "cgb-e",
            HardwareModel::AgbA => "agb-a",
            HardwareModel::GbpA => "gbp-a",
        }
    }

    /// Human-readable hardware name.
    pub fn display_name(&self) -> &'static str {
        match self {
            HardwareModel::DmgB => "Game Boy",
            HardwareModel::Sgb => "Super Game Boy (NTSC)",
            HardwareModel::SgbNoSfc => "Super Game Boy (NTSC) (No SFC)",
            HardwareModel::SgbPal => "Super Game Boy (PAL)",
            HardwareModel::SgbPalNoSfc => "Super Game Boy (PAL) (No SFC)",
            HardwareModel::Mgb => "Game Boy Pocket/Light",
            HardwareModel::Sgb2 => "Super Game Boy 2",
            HardwareModel::Sgb2NoSfc => "Super Game Boy 2 (No SFC)",
            HardwareModel::Cgb0 => "Game Boy Color (CPU CGB 0)",
            HardwareModel::CgbA => "Game Boy Color (CPU CGB A)",
            HardwareModel::CgbB => "Game Boy Color (CPU CGB B)",
            HardwareModel::CgbC => "Game Boy Color (CPU CGB C)",
            HardwareModel::CgbD => "Game Boy Color (CPU CGB D)",
            HardwareModel::CgbE => "Game Boy Color",
            HardwareModel::AgbA => "Game Boy Advance",
            HardwareModel::GbpA => "Game Boy Player",
        }
    }

    /// True for Game Boy Color and later hardware.
    pub fn is_color(&self) -> bool {
        matches!(
            self,
            HardwareModel::Cgb0
                | HardwareModel::CgbA
                | HardwareModel::CgbB
                | HardwareModel::CgbC
                | HardwareModel::CgbD
                | HardwareModel::CgbE
                | HardwareModel::AgbA
                | HardwareModel::GbpA
        )
    }
}

impl FromStr for HardwareModel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HardwareModel::ALL
            .iter()
            .map(|&model| (model.as_str(), model))
            .chain(HardwareModel::ALIASES)
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, model)| model)
            .ok_or_else(|| EngineError::UnknownModel { name: s.to_string() })
    }
}

impl fmt::Display for HardwareModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HardwareModel> for &'static str {
    fn from(model: HardwareModel) -> Self {
        model.as_str()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for model in HardwareModel::ALL {
            assert_eq!(model.as_str().parse::<HardwareModel>().unwrap(), model);
        }
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!("CGB-E".parse::<HardwareModel>().unwrap(), HardwareModel::CgbE);
        assert_eq!("Sgb2-No-Sfc".parse::<HardwareModel>().unwrap(), HardwareModel::Sgb2NoSfc);
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!("dmg".parse::<HardwareModel>().unwrap(), HardwareModel::DmgB);
        assert_eq!("CGB".parse::<HardwareModel>().unwrap(), HardwareModel::CgbE);
        assert_eq!("agb".parse::<HardwareModel>().unwrap(), HardwareModel::AgbA);
        assert_eq!("gbp".parse::<HardwareModel>().unwrap(), HardwareModel::GbpA);
        assert_eq!("sgb-ntsc".parse::<HardwareModel>().unwrap(), HardwareModel::Sgb);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let err = "nes".parse::<HardwareModel>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownModel { ref name } if name == "nes"));
        assert_eq!(err.to_string(), "unknown model 'nes'");
    }

    #[test]
    fn default_is_original_game_boy() {
        assert_eq!(HardwareModel::default(), HardwareModel::DmgB);
        assert_eq!(HardwareModel::default().display_name(), "Game Boy");
        assert!(!HardwareModel::DmgB.is_color());
        assert!(HardwareModel::CgbE.is_color());
    }
}
