//! The costing dispatcher.

use wt_components::{NfModel, PumpClass, RoModel};
use wt_flowsheet::Flowsheet;

use crate::error::{CostingError, CostingResult};
use crate::model::{CostModel, MixerClass, SystemCosting};

/// Cost every present unit on the flowsheet, then aggregate once.
///
/// Walks the reserved slots in a fixed order; each present unit's cost
/// block is computed by the supplied cost model and attached to the unit.
/// The idealized-separator membrane variants have no cost model: requesting
/// them fails immediately and the aggregator is never reached.
pub fn cost_flowsheet(
    fs: &mut Flowsheet,
    model: &dyn CostModel,
) -> CostingResult<SystemCosting> {
    // Nanofiltration
    if let Some(nf) = fs.nf.as_mut() {
        match nf.model() {
            NfModel::ZeroOrder => nf.costing = Some(model.cost_nanofiltration(nf)?),
            NfModel::Separator => {
                return Err(CostingError::NotImplemented {
                    what: "costing for the separator nanofiltration model",
                })
            }
        }
    }
    // Reverse osmosis
    if let Some(ro) = fs.ro.as_mut() {
        match ro.model() {
            RoModel::Simplified0D => ro.costing = Some(model.cost_reverse_osmosis(ro)?),
            RoModel::Separator => {
                return Err(CostingError::NotImplemented {
                    what: "costing for the separator reverse-osmosis model",
                })
            }
        }
    }
    // Stage 1 pump
    if let Some(pump) = fs.pump_ro.as_mut() {
        pump.costing = Some(model.cost_pump(pump, PumpClass::HighPressure)?);
    }
    // Stage 2 pump
    if let Some(pump) = fs.pump_ro2.as_mut() {
        pump.costing = Some(model.cost_pump(pump, PumpClass::HighPressure)?);
    }
    // Stage 2 RO
    if let Some(ro2) = fs.ro2.as_mut() {
        match ro2.model() {
            RoModel::Simplified0D => ro2.costing = Some(model.cost_reverse_osmosis(ro2)?),
            RoModel::Separator => {
                return Err(CostingError::NotImplemented {
                    what: "costing for the separator reverse-osmosis model",
                })
            }
        }
    }
    // Pretreatment
    if let Some(mx) = fs.softening_mixer.as_mut() {
        mx.costing = Some(model.cost_mixer(mx, MixerClass::LimeSoftening)?);
    }
    // Post-treatment
    if let Some(mx) = fs.hypochlorite_mixer.as_mut() {
        mx.costing = Some(model.cost_mixer(mx, MixerClass::HypochloriteMixer)?);
    }

    model.system_costing(fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::StandardCostModel;
    use wt_components::{Feed, Nanofiltration, UnitBlock};
    use wt_flowsheet::{BlockTag, PortRef, PortTag};
    use wt_props::{Basis, PropertyPackage};

    fn solved_nf_flowsheet(model: NfModel) -> Flowsheet {
        let pkg = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        fs.feed = Some(Feed::new("feed", &pkg));
        fs.nf = Some(Nanofiltration::new("NF", &pkg, model));
        fs.feed.as_mut().unwrap().initialize().unwrap();
        let feed_out = fs.feed.as_ref().unwrap().outlet().unwrap().clone();
        fs.nf.as_mut().unwrap().set_inlet(feed_out);
        fs.nf.as_mut().unwrap().evaluate().unwrap();
        fs.product_port = Some(PortRef::new(BlockTag::Nf, PortTag::Permeate));
        fs
    }

    #[test]
    fn zero_order_nf_is_costed_and_aggregated() {
        let mut fs = solved_nf_flowsheet(NfModel::ZeroOrder);
        let model = StandardCostModel::default();
        let sys = cost_flowsheet(&mut fs, &model).unwrap();
        assert!(fs.nf.as_ref().unwrap().costing.is_some());
        assert!(sys.capital_cost_total > 0.0);
        assert!(sys.lcow > 0.0);
    }

    #[test]
    fn separator_nf_is_rejected_before_aggregation() {
        let mut fs = solved_nf_flowsheet(NfModel::Separator);
        let model = StandardCostModel::default();
        let err = cost_flowsheet(&mut fs, &model).unwrap_err();
        assert!(matches!(err, CostingError::NotImplemented { .. }));
        // The dispatcher bailed out before touching any unit's cost block.
        assert!(fs.nf.as_ref().unwrap().costing.is_none());
    }

    #[test]
    fn empty_flowsheet_has_nothing_to_cost_but_needs_a_product() {
        let mut fs = Flowsheet::new();
        let model = StandardCostModel::default();
        let err = cost_flowsheet(&mut fs, &model).unwrap_err();
        assert!(matches!(err, CostingError::InvalidArg { .. }));
    }
}
