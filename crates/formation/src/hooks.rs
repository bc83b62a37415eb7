use tracing::{debug, info};

use crate::config::{FormationConfig, RetreatConfig};
use crate::layout::{resolve_all, PositionRecord, ResolvedFormation, ScreenPoint};

/// Supplies the initial placement for a party member. `None` tells the host
/// to fall back to its own default placement for that index.
pub trait AnchorProvider {
    fn anchor_for(&self, index: usize) -> Option<ScreenPoint>;
}

/// Supplies a replacement for the host's retreat motion, applied to every
/// party member alike.
pub trait RetreatOverrideProvider {
    fn retreat_override(&self) -> Option<RetreatMotion>;
}

/// Host battle-start event. Implementors run their resolution pass here, and
/// the host fires it before asking any [`AnchorProvider`] for a placement.
pub trait BattleStartHook {
    fn on_battle_start(&mut self);
}

impl<T: AnchorProvider + ?Sized> AnchorProvider for &mut T {
    fn anchor_for(&self, index: usize) -> Option<ScreenPoint> {
        (**self).anchor_for(index)
    }
}

impl<T: RetreatOverrideProvider + ?Sized> RetreatOverrideProvider for &mut T {
    fn retreat_override(&self) -> Option<RetreatMotion> {
        (**self).retreat_override()
    }
}

impl<T: BattleStartHook + ?Sized> BattleStartHook for &mut T {
    fn on_battle_start(&mut self) {
        (**self).on_battle_start();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetreatMotion {
    pub dx: i32,
    pub dy: i32,
    pub duration_frames: u32,
}

impl RetreatMotion {
    pub fn target_from(&self, home: ScreenPoint) -> ScreenPoint {
        home.offset_by(self.dx, self.dy)
    }
}

#[derive(Debug, Clone)]
pub struct PartyFormation {
    records: Vec<PositionRecord>,
    retreat: RetreatConfig,
    resolved: Option<ResolvedFormation>,
}

impl PartyFormation {
    pub fn new(config: FormationConfig) -> Self {
        Self {
            records: config.positions,
            retreat: config.retreat,
            resolved: None,
        }
    }

    /// Runs a fresh resolution pass. Must be called at battle start, before
    /// the host asks for any anchor.
    pub fn begin_battle(&mut self) -> &ResolvedFormation {
        let resolved = resolve_all(&self.records);
        info!(
            records = resolved.len(),
            broken_cycles = resolved.broken_cycles().len(),
            "formation_battle_start"
        );
        self.resolved.insert(resolved)
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn resolved(&self) -> Option<&ResolvedFormation> {
        self.resolved.as_ref()
    }
}

impl BattleStartHook for PartyFormation {
    fn on_battle_start(&mut self) {
        self.begin_battle();
    }
}

impl AnchorProvider for PartyFormation {
    fn anchor_for(&self, index: usize) -> Option<ScreenPoint> {
        let Some(resolved) = self.resolved.as_ref() else {
            debug!(index, "formation_anchor_requested_before_battle_start");
            return None;
        };
        resolved.point(index)
    }
}

impl RetreatOverrideProvider for PartyFormation {
    fn retreat_override(&self) -> Option<RetreatMotion> {
        self.retreat.enabled.then_some(RetreatMotion {
            dx: self.retreat.dx,
            dy: self.retreat.dy,
            duration_frames: self.retreat.duration_frames,
        })
    }
}
