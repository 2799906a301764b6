//! The flowsheet container.

use wt_components::{
    Feed, Mixer, Nanofiltration, Pump, ReverseOsmosis, Splitter, UnitBlock,
};
use wt_core::ArcId;
use wt_props::Stream;

use crate::arcs::Arc;
use crate::error::{FlowsheetError, FlowsheetResult};
use crate::ports::{port_kind, BlockTag, PortKind, PortRef, PortTag};
use crate::validate;

/// Container for one treatment train.
///
/// Every optional unit lives in a reserved slot; `None` means the unit is
/// not part of this train. Arcs are declared with [`Flowsheet::connect`]
/// and must be expanded before the solver will touch the flowsheet.
#[derive(Debug, Default)]
pub struct Flowsheet {
    pub feed: Option<Feed>,
    pub splitter: Option<Splitter>,
    pub nf: Option<Nanofiltration>,
    pub mixer: Option<Mixer>,
    pub pump_ro: Option<Pump>,
    pub ro: Option<ReverseOsmosis>,
    pub pump_ro2: Option<Pump>,
    pub ro2: Option<ReverseOsmosis>,
    pub permeate_mixer: Option<Mixer>,
    pub softening_mixer: Option<Mixer>,
    pub hypochlorite_mixer: Option<Mixer>,

    arcs: Vec<Arc>,
    expanded: bool,

    /// Port whose stream counts as product water for costing.
    pub product_port: Option<PortRef>,
}

impl Flowsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a directed arc. Order of declaration is preserved.
    pub fn connect(
        &mut self,
        name: impl Into<String>,
        source: PortRef,
        destination: PortRef,
    ) -> ArcId {
        let id = ArcId::from_index(self.arcs.len() as u32);
        self.arcs.push(Arc {
            id,
            name: name.into(),
            source,
            destination,
        });
        self.expanded = false;
        id
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id.index() as usize)
    }

    /// Validate all declared arcs and freeze them for propagation.
    pub fn expand_arcs(&mut self) -> FlowsheetResult<()> {
        validate::validate_arcs(self)?;
        self.expanded = true;
        Ok(())
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn has_block(&self, tag: BlockTag) -> bool {
        self.block(tag).is_some()
    }

    /// View a block through the common unit trait.
    pub fn block(&self, tag: BlockTag) -> Option<&dyn UnitBlock> {
        match tag {
            BlockTag::Feed => self.feed.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::Splitter => self.splitter.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::Nf => self.nf.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::Mixer => self.mixer.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::PumpRo => self.pump_ro.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::Ro => self.ro.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::PumpRo2 => self.pump_ro2.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::Ro2 => self.ro2.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::PermeateMixer => self.permeate_mixer.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::SofteningMixer => self.softening_mixer.as_ref().map(|b| b as &dyn UnitBlock),
            BlockTag::HypochloriteMixer => {
                self.hypochlorite_mixer.as_ref().map(|b| b as &dyn UnitBlock)
            }
        }
    }

    pub fn block_mut(&mut self, tag: BlockTag) -> Option<&mut dyn UnitBlock> {
        match tag {
            BlockTag::Feed => self.feed.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::Splitter => self.splitter.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::Nf => self.nf.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::Mixer => self.mixer.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::PumpRo => self.pump_ro.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::Ro => self.ro.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::PumpRo2 => self.pump_ro2.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::Ro2 => self.ro2.as_mut().map(|b| b as &mut dyn UnitBlock),
            BlockTag::PermeateMixer => {
                self.permeate_mixer.as_mut().map(|b| b as &mut dyn UnitBlock)
            }
            BlockTag::SofteningMixer => {
                self.softening_mixer.as_mut().map(|b| b as &mut dyn UnitBlock)
            }
            BlockTag::HypochloriteMixer => self
                .hypochlorite_mixer
                .as_mut()
                .map(|b| b as &mut dyn UnitBlock),
        }
    }

    /// Blocks present on the flowsheet, in canonical order.
    pub fn present_blocks(&self) -> Vec<BlockTag> {
        BlockTag::ALL
            .into_iter()
            .filter(|t| self.has_block(*t))
            .collect()
    }

    /// Remaining free specification variables across all present blocks.
    pub fn degrees_of_freedom(&self) -> u32 {
        BlockTag::ALL
            .into_iter()
            .filter_map(|t| self.block(t))
            .map(|b| b.degrees_of_freedom())
            .sum()
    }

    /// Read the computed stream at a port, `Ok(None)` if not yet computed.
    pub fn port_stream(&self, port: PortRef) -> FlowsheetResult<Option<&Stream>> {
        if port_kind(port.block, port.port).is_none() {
            return self.no_such_port(port);
        }
        let b = port.block;
        let p = port.port;
        let stream = match b {
            BlockTag::Feed => {
                let feed = self.feed.as_ref().ok_or(self.absent(b))?;
                feed.outlet()
            }
            BlockTag::Splitter => {
                let sp = self.splitter.as_ref().ok_or(self.absent(b))?;
                match p {
                    PortTag::Inlet => sp.inlet(),
                    _ => sp.outlet_stream(p.key()),
                }
            }
            BlockTag::Nf => {
                let nf = self.nf.as_ref().ok_or(self.absent(b))?;
                match p {
                    PortTag::Inlet => nf.inlet(),
                    PortTag::Permeate => nf.permeate(),
                    _ => nf.retentate(),
                }
            }
            BlockTag::Ro | BlockTag::Ro2 => {
                let ro = match b {
                    BlockTag::Ro => self.ro.as_ref(),
                    _ => self.ro2.as_ref(),
                }
                .ok_or(self.absent(b))?;
                match p {
                    PortTag::Inlet => ro.inlet(),
                    PortTag::Permeate => ro.permeate(),
                    _ => ro.retentate(),
                }
            }
            BlockTag::PumpRo | BlockTag::PumpRo2 => {
                let pump = match b {
                    BlockTag::PumpRo => self.pump_ro.as_ref(),
                    _ => self.pump_ro2.as_ref(),
                }
                .ok_or(self.absent(b))?;
                match p {
                    PortTag::Inlet => pump.inlet(),
                    _ => pump.outlet(),
                }
            }
            BlockTag::Mixer
            | BlockTag::PermeateMixer
            | BlockTag::SofteningMixer
            | BlockTag::HypochloriteMixer => {
                let mx = self.mixer_ref(b).ok_or(self.absent(b))?;
                match p {
                    PortTag::Outlet => mx.outlet(),
                    _ => mx.inlet(p.key()),
                }
            }
        };
        Ok(stream)
    }

    /// Read the computed stream at a port, failing if it is not computed.
    pub fn require_port_stream(&self, port: PortRef) -> FlowsheetResult<&Stream> {
        self.port_stream(port)?.ok_or(FlowsheetError::StateMissing {
            block: port.block.key(),
            port: port.port.key(),
        })
    }

    /// Write a stream into an inlet port.
    pub fn set_port_stream(&mut self, port: PortRef, stream: Stream) -> FlowsheetResult<()> {
        match port_kind(port.block, port.port) {
            None => {
                return Err(FlowsheetError::NoSuchPort {
                    block: port.block.key(),
                    port: port.port.key(),
                })
            }
            Some(PortKind::Outlet) => {
                return Err(FlowsheetError::PortDirection {
                    arc: port.to_string(),
                })
            }
            Some(PortKind::Inlet) => {}
        }
        let b = port.block;
        let p = port.port;
        match b {
            BlockTag::Splitter => {
                let sp = self.splitter.as_mut().ok_or(FlowsheetError::BlockAbsent {
                    block: b.key(),
                })?;
                sp.set_inlet(stream);
            }
            BlockTag::Nf => {
                let nf = self.nf.as_mut().ok_or(FlowsheetError::BlockAbsent {
                    block: b.key(),
                })?;
                nf.set_inlet(stream);
            }
            BlockTag::Ro | BlockTag::Ro2 => {
                let ro = match b {
                    BlockTag::Ro => self.ro.as_mut(),
                    _ => self.ro2.as_mut(),
                }
                .ok_or(FlowsheetError::BlockAbsent { block: b.key() })?;
                ro.set_inlet(stream);
            }
            BlockTag::PumpRo | BlockTag::PumpRo2 => {
                let pump = match b {
                    BlockTag::PumpRo => self.pump_ro.as_mut(),
                    _ => self.pump_ro2.as_mut(),
                }
                .ok_or(FlowsheetError::BlockAbsent { block: b.key() })?;
                pump.set_inlet(stream);
            }
            BlockTag::Mixer
            | BlockTag::PermeateMixer
            | BlockTag::SofteningMixer
            | BlockTag::HypochloriteMixer => {
                let key = p.key();
                let mx = self.mixer_mut(b).ok_or(FlowsheetError::BlockAbsent {
                    block: b.key(),
                })?;
                mx.set_inlet(key, stream)?;
            }
            BlockTag::Feed => unreachable!("feed has no inlet port"),
        }
        Ok(())
    }

    fn mixer_ref(&self, tag: BlockTag) -> Option<&Mixer> {
        match tag {
            BlockTag::Mixer => self.mixer.as_ref(),
            BlockTag::PermeateMixer => self.permeate_mixer.as_ref(),
            BlockTag::SofteningMixer => self.softening_mixer.as_ref(),
            BlockTag::HypochloriteMixer => self.hypochlorite_mixer.as_ref(),
            _ => None,
        }
    }

    fn mixer_mut(&mut self, tag: BlockTag) -> Option<&mut Mixer> {
        match tag {
            BlockTag::Mixer => self.mixer.as_mut(),
            BlockTag::PermeateMixer => self.permeate_mixer.as_mut(),
            BlockTag::SofteningMixer => self.softening_mixer.as_mut(),
            BlockTag::HypochloriteMixer => self.hypochlorite_mixer.as_mut(),
            _ => None,
        }
    }

    fn absent(&self, block: BlockTag) -> FlowsheetError {
        FlowsheetError::BlockAbsent { block: block.key() }
    }

    fn no_such_port(&self, port: PortRef) -> FlowsheetResult<Option<&Stream>> {
        Err(FlowsheetError::NoSuchPort {
            block: port.block.key(),
            port: port.port.key(),
        })
    }
}
