//! Solute species definitions.

/// Dissolved species tracked by the desalination property packages.
///
/// Which subset is in play depends on the chemistry basis: the ion basis
/// tracks individual ions, the salt basis tracks apparent salts, and the
/// TDS basis lumps everything into one pseudo-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solute {
    /// Sodium (Na⁺)
    Na,
    /// Calcium (Ca²⁺)
    Ca,
    /// Magnesium (Mg²⁺)
    Mg,
    /// Sulfate (SO₄²⁻)
    SO4,
    /// Chloride (Cl⁻)
    Cl,
    /// Sodium chloride (apparent salt)
    NaCl,
    /// Calcium sulfate (apparent salt)
    CaSO4,
    /// Magnesium sulfate (apparent salt)
    MgSO4,
    /// Magnesium chloride (apparent salt)
    MgCl2,
    /// Total dissolved solids (lumped pseudo-component)
    Tds,
}

impl Solute {
    pub fn key(&self) -> &'static str {
        match self {
            Solute::Na => "Na",
            Solute::Ca => "Ca",
            Solute::Mg => "Mg",
            Solute::SO4 => "SO4",
            Solute::Cl => "Cl",
            Solute::NaCl => "NaCl",
            Solute::CaSO4 => "CaSO4",
            Solute::MgSO4 => "MgSO4",
            Solute::MgCl2 => "MgCl2",
            Solute::Tds => "TDS",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Solute::Na => "Sodium",
            Solute::Ca => "Calcium",
            Solute::Mg => "Magnesium",
            Solute::SO4 => "Sulfate",
            Solute::Cl => "Chloride",
            Solute::NaCl => "Sodium Chloride",
            Solute::CaSO4 => "Calcium Sulfate",
            Solute::MgSO4 => "Magnesium Sulfate",
            Solute::MgCl2 => "Magnesium Chloride",
            Solute::Tds => "Total Dissolved Solids",
        }
    }

    /// Divalent ions and their salts scale harder than monovalents in NF.
    pub fn is_divalent(&self) -> bool {
        matches!(
            self,
            Solute::Ca | Solute::Mg | Solute::SO4 | Solute::CaSO4 | Solute::MgSO4 | Solute::MgCl2
        )
    }
}

impl std::str::FromStr for Solute {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NA" | "SODIUM" => Ok(Solute::Na),
            "CA" | "CALCIUM" => Ok(Solute::Ca),
            "MG" | "MAGNESIUM" => Ok(Solute::Mg),
            "SO4" | "SULFATE" => Ok(Solute::SO4),
            "CL" | "CHLORIDE" => Ok(Solute::Cl),
            "NACL" => Ok(Solute::NaCl),
            "CASO4" => Ok(Solute::CaSO4),
            "MGSO4" => Ok(Solute::MgSO4),
            "MGCL2" => Ok(Solute::MgCl2),
            "TDS" => Ok(Solute::Tds),
            _ => Err("unknown solute"),
        }
    }
}
