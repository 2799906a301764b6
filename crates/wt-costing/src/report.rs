//! Structured cost report.

use core::fmt;

use serde::Serialize;
use wt_components::UnitCosting;
use wt_flowsheet::{BlockTag, Flowsheet};

use crate::financials::FinancialParams;
use crate::model::SystemCosting;

/// How a report line renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineFormat {
    /// `<label> = <value>`
    Plain,
    /// `<label> = $<value>/m3` with a fixed decimal count.
    DollarsPerCubicMeter { decimals: usize },
}

/// One labeled metric in the cost report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub label: &'static str,
    pub value: f64,
    pub format: LineFormat,
}

/// Ordered cost report, decoupled from presentation: callers render, log,
/// or assert against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub entries: Vec<ReportEntry>,
}

impl CostReport {
    pub fn entry(&self, label: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry.format {
                LineFormat::Plain => writeln!(f, "{} = {}", entry.label, entry.value)?,
                LineFormat::DollarsPerCubicMeter { decimals } => writeln!(
                    f,
                    "{} = ${:.*}/m3",
                    entry.label, decimals, entry.value
                )?,
            }
        }
        Ok(())
    }
}

/// Cost block of a unit slot, with absence contributing zero by design.
fn unit_costing(fs: &Flowsheet, tag: BlockTag) -> UnitCosting {
    let costing = match tag {
        BlockTag::Nf => fs.nf.as_ref().and_then(|u| u.costing),
        BlockTag::Ro => fs.ro.as_ref().and_then(|u| u.costing),
        BlockTag::Ro2 => fs.ro2.as_ref().and_then(|u| u.costing),
        BlockTag::PumpRo => fs.pump_ro.as_ref().and_then(|u| u.costing),
        BlockTag::PumpRo2 => fs.pump_ro2.as_ref().and_then(|u| u.costing),
        BlockTag::SofteningMixer => fs.softening_mixer.as_ref().and_then(|u| u.costing),
        BlockTag::HypochloriteMixer => fs.hypochlorite_mixer.as_ref().and_then(|u| u.costing),
        _ => None,
    };
    costing.unwrap_or(UnitCosting::ZERO)
}

/// Build the fixed-layout cost report.
///
/// Every cost component is normalized to $/m3 of product water; capital
/// items are annualized with the capital recovery factor first. The fixed
/// line set always renders in full: slots without a unit contribute zero
/// instead of breaking the layout.
pub fn build_cost_report(
    fs: &Flowsheet,
    system: &SystemCosting,
    params: &FinancialParams,
) -> CostReport {
    let crf = params.factor_capital_annualization;
    let awp = system.annual_water_production_m3;

    let nf = unit_costing(fs, BlockTag::Nf);
    let ro = unit_costing(fs, BlockTag::Ro);
    let ro2 = unit_costing(fs, BlockTag::Ro2);
    let pump_ro = unit_costing(fs, BlockTag::PumpRo);
    let pump_ro2 = unit_costing(fs, BlockTag::PumpRo2);
    let softening = unit_costing(fs, BlockTag::SofteningMixer);
    let hypochlorite = unit_costing(fs, BlockTag::HypochloriteMixer);

    let plain = |label: &'static str, value: f64| ReportEntry {
        label,
        value,
        format: LineFormat::Plain,
    };
    let currency = |label: &'static str, value: f64, decimals: usize| ReportEntry {
        label,
        value,
        format: LineFormat::DollarsPerCubicMeter { decimals },
    };

    let mut entries = vec![
        plain("LCOW", system.lcow),
        plain(
            "Total CAPEX",
            system.investment_cost_total * crf / awp,
        ),
        plain("Direct CAPEX", system.capital_cost_total * crf / awp),
        plain(
            "Indirect CAPEX",
            (system.investment_cost_total - system.capital_cost_total) * crf / awp,
        ),
        plain("Total OPEX", system.operating_cost_total / awp),
        plain(
            "Maintenance/Labor/Chemical Costs",
            system.operating_cost_mlc / awp,
        ),
        plain(
            "Total Electricity Cost",
            (pump_ro.operating_cost + pump_ro2.operating_cost) / awp,
        ),
        plain(
            "Stage 1 HP Pump Electricity Cost",
            pump_ro.operating_cost / awp,
        ),
        plain(
            "Stage 2 HP Pump Electricity Cost",
            pump_ro2.operating_cost / awp,
        ),
        plain(
            "Total Membrane Replacement Cost",
            (nf.operating_cost + ro.operating_cost + ro2.operating_cost) / awp,
        ),
        plain("NF Membrane Replacement Cost", nf.operating_cost / awp),
        plain(
            "Stage 1 RO Membrane Replacement Cost",
            ro.operating_cost / awp,
        ),
        plain(
            "Stage 2 RO Membrane Replacement Cost",
            ro2.operating_cost / awp,
        ),
        currency("LCOW", system.lcow, 5),
    ];

    if fs.pump_ro.is_some() {
        entries.push(currency(
            "RO Pump 1 specific Opex",
            pump_ro.operating_cost / awp,
            3,
        ));
    }
    if fs.pump_ro2.is_some() {
        entries.push(currency(
            "RO Pump 2 specific Opex",
            pump_ro2.operating_cost / awp,
            3,
        ));
    }
    if fs.softening_mixer.is_some() {
        entries.push(currency(
            "Lime Softening specific CAPEX",
            softening.capital_cost * crf / awp,
            5,
        ));
        entries.push(currency(
            "Lime Softening specific OPEX",
            softening.operating_cost / awp,
            5,
        ));
    }
    if fs.hypochlorite_mixer.is_some() {
        entries.push(currency(
            "Chlorination specific CAPEX",
            hypochlorite.capital_cost * crf / awp,
            5,
        ));
        entries.push(currency(
            "Chlorination specific OPEX",
            hypochlorite.operating_cost / awp,
            5,
        ));
    }

    CostReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> SystemCosting {
        SystemCosting {
            capital_cost_total: 1.0e6,
            investment_cost_total: 2.0e6,
            operating_cost_mlc: 6.0e4,
            operating_cost_total: 1.5e5,
            annual_water_production_m3: 1.0e6,
            lcow: 0.35,
        }
    }

    #[test]
    fn fixed_line_set_renders_for_an_empty_flowsheet() {
        let fs = Flowsheet::new();
        let report = build_cost_report(&fs, &system(), &FinancialParams::default());
        // 13 plain metrics plus the formatted LCOW line, nothing conditional.
        assert_eq!(report.entries.len(), 14);
        assert_eq!(report.entry("NF Membrane Replacement Cost").unwrap().value, 0.0);
        assert_eq!(
            report.entry("Stage 2 HP Pump Electricity Cost").unwrap().value,
            0.0
        );
    }

    #[test]
    fn lcow_line_uses_five_decimals() {
        let fs = Flowsheet::new();
        let report = build_cost_report(&fs, &system(), &FinancialParams::default());
        let rendered = report.to_string();
        assert!(rendered.contains("LCOW = $0.35000/m3"));
        assert!(rendered.contains("LCOW = 0.35"));
    }

    #[test]
    fn capex_lines_are_annualized() {
        let fs = Flowsheet::new();
        let params = FinancialParams::default();
        let report = build_cost_report(&fs, &system(), &params);
        let total_capex = report.entry("Total CAPEX").unwrap().value;
        assert!((total_capex - 2.0e6 * 0.1 / 1.0e6).abs() < 1e-12);
        let indirect = report.entry("Indirect CAPEX").unwrap().value;
        assert!((indirect - 1.0e6 * 0.1 / 1.0e6).abs() < 1e-12);
    }
}
