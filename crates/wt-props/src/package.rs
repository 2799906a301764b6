//! Chemistry bases and property packages.

use crate::error::PropError;
use crate::scaling::ScalingFactors;
use crate::solute::Solute;
use crate::stream::Stream;
use wt_core::units::{k, kgps, pa, MassRate};
use wt_core::units::constants::P_ATM_PA;

/// Chemistry basis a flowsheet is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Individual ions (Na, Ca, Mg, SO4, Cl).
    Ion,
    /// Apparent salts (NaCl, CaSO4, MgSO4, MgCl2).
    Salt,
    /// One lumped total-dissolved-solids pseudo-component.
    Tds,
}

impl Basis {
    pub fn key(&self) -> &'static str {
        match self {
            Basis::Ion => "ion",
            Basis::Salt => "salt",
            Basis::Tds => "TDS",
        }
    }
}

impl std::str::FromStr for Basis {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ion" => Ok(Basis::Ion),
            "salt" => Ok(Basis::Salt),
            "tds" => Ok(Basis::Tds),
            _ => Err(PropError::InvalidArg {
                what: "unrecognized chemistry basis token",
            }),
        }
    }
}

/// Default seawater feed: roughly 3.5 wt% dissolved solids in 1 kg/s of
/// total flow, at ambient temperature and pressure. The per-species
/// breakdown follows the chemistry basis.
const FEED_TOTAL_KGPS: f64 = 1.0;
const FEED_TEMPERATURE_K: f64 = 298.15;

const ION_FRACTIONS: [(Solute, f64); 5] = [
    (Solute::Na, 11_122e-6),
    (Solute::Ca, 382e-6),
    (Solute::Mg, 1_394e-6),
    (Solute::SO4, 2_136e-6),
    (Solute::Cl, 20_317e-6),
];

const SALT_FRACTIONS: [(Solute, f64); 4] = [
    (Solute::NaCl, 28_270e-6),
    (Solute::CaSO4, 1_298e-6),
    (Solute::MgSO4, 1_529e-6),
    (Solute::MgCl2, 4_251e-6),
];

const TDS_FRACTIONS: [(Solute, f64); 1] = [(Solute::Tds, 35_000e-6)];

/// A resolved property package: the solute set, default feed state, and
/// default scaling for one chemistry basis.
#[derive(Debug, Clone)]
pub struct PropertyPackage {
    basis: Basis,
    solutes: Vec<Solute>,
}

impl PropertyPackage {
    pub fn new(basis: Basis) -> Self {
        let solutes = Self::mass_fractions(basis)
            .iter()
            .map(|(s, _)| *s)
            .collect();
        Self { basis, solutes }
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Tracked solutes, in canonical package order.
    pub fn solutes(&self) -> &[Solute] {
        &self.solutes
    }

    fn mass_fractions(basis: Basis) -> &'static [(Solute, f64)] {
        match basis {
            Basis::Ion => &ION_FRACTIONS,
            Basis::Salt => &SALT_FRACTIONS,
            Basis::Tds => &TDS_FRACTIONS,
        }
    }

    /// Default seawater feed stream for this basis.
    pub fn default_feed(&self) -> Stream {
        let fractions = Self::mass_fractions(self.basis);
        let solute_total: f64 = fractions.iter().map(|(_, x)| x).sum();
        let solutes: Vec<(Solute, MassRate)> = fractions
            .iter()
            .map(|(s, x)| (*s, kgps(x * FEED_TOTAL_KGPS)))
            .collect();
        Stream::new(
            k(FEED_TEMPERATURE_K),
            pa(P_ATM_PA),
            kgps((1.0 - solute_total) * FEED_TOTAL_KGPS),
            solutes,
        )
        .expect("default feed composition is valid")
    }

    /// Default scaling factors for streams built on this basis.
    pub fn default_scaling(&self) -> ScalingFactors {
        let feed = self.default_feed();
        let max_solute = feed
            .solutes()
            .map(|(_, f)| f.value)
            .fold(0.0_f64, f64::max);
        ScalingFactors {
            water: 1.0 / feed.water.value,
            solute: if max_solute > 0.0 { 1.0 / max_solute } else { 1.0 },
            pressure: 1.0e-5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_tokens_parse() {
        assert_eq!("ion".parse::<Basis>().unwrap(), Basis::Ion);
        assert_eq!("salt".parse::<Basis>().unwrap(), Basis::Salt);
        assert_eq!("TDS".parse::<Basis>().unwrap(), Basis::Tds);
    }

    #[test]
    fn unknown_basis_token_is_invalid_arg() {
        let err = "brackish".parse::<Basis>().unwrap_err();
        assert!(matches!(err, PropError::InvalidArg { .. }));
    }

    #[test]
    fn ion_feed_adds_up_to_one_kg_per_s() {
        let pkg = PropertyPackage::new(Basis::Ion);
        let feed = pkg.default_feed();
        assert!((feed.total_flow().value - 1.0).abs() < 1e-12);
        assert_eq!(pkg.solutes().len(), 5);
    }

    #[test]
    fn salt_and_tds_feeds_have_comparable_solids() {
        let salt = PropertyPackage::new(Basis::Salt).default_feed();
        let tds = PropertyPackage::new(Basis::Tds).default_feed();
        let salt_solids: f64 = salt.solutes().map(|(_, f)| f.value).sum();
        let tds_solids: f64 = tds.solutes().map(|(_, f)| f.value).sum();
        assert!((salt_solids - tds_solids).abs() / tds_solids < 0.05);
    }

    #[test]
    fn default_scaling_normalizes_feed() {
        let pkg = PropertyPackage::new(Basis::Ion);
        let sf = pkg.default_scaling();
        let feed = pkg.default_feed();
        assert!((feed.water.value * sf.water - 1.0).abs() < 1e-12);
    }
}
