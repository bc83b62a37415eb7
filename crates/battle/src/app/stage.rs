use formation::config::{
    DEFAULT_RETREAT_DURATION_FRAMES, DEFAULT_RETREAT_DX, DEFAULT_RETREAT_DY,
};
use formation::{
    AnchorProvider, BattleStartHook, RetreatMotion, RetreatOverrideProvider, ScreenPoint,
};
use serde::Serialize;
use tracing::debug;

const DEFAULT_HOME_X: i32 = 600;
const DEFAULT_HOME_Y: i32 = 280;
const DEFAULT_HOME_STEP_X: i32 = 32;
const DEFAULT_HOME_STEP_Y: i32 = 48;
const DEFAULT_RETREAT: RetreatMotion = RetreatMotion {
    dx: DEFAULT_RETREAT_DX,
    dy: DEFAULT_RETREAT_DY,
    duration_frames: DEFAULT_RETREAT_DURATION_FRAMES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PlacementSource {
    Formation,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ActorPlacement {
    pub(crate) index: usize,
    pub(crate) home: ScreenPoint,
    pub(crate) source: PlacementSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct RetreatPlan {
    pub(crate) index: usize,
    pub(crate) from: ScreenPoint,
    pub(crate) to: ScreenPoint,
    pub(crate) duration_frames: u32,
    pub(crate) source: PlacementSource,
}

/// Minimal host battle stage: fires the battle-start hook, places party
/// members and plans their retreat, asking the composed provider first and
/// falling back to the stock layout.
pub(crate) struct BattleStage<P> {
    provider: P,
    actors: Vec<ActorPlacement>,
}

impl<P> BattleStage<P>
where
    P: BattleStartHook + AnchorProvider + RetreatOverrideProvider,
{
    pub(crate) fn new(provider: P) -> Self {
        Self {
            provider,
            actors: Vec::new(),
        }
    }

    pub(crate) fn start(&mut self, party_size: usize) -> &[ActorPlacement] {
        self.provider.on_battle_start();
        self.place_party(party_size);
        &self.actors
    }

    fn place_party(&mut self, party_size: usize) {
        self.actors.clear();
        for index in 0..party_size {
            let placement = match self.provider.anchor_for(index) {
                Some(home) => ActorPlacement {
                    index,
                    home,
                    source: PlacementSource::Formation,
                },
                None => ActorPlacement {
                    index,
                    home: default_home(index),
                    source: PlacementSource::Default,
                },
            };
            debug!(
                index,
                x = placement.home.x,
                y = placement.home.y,
                source = ?placement.source,
                "actor_placed"
            );
            self.actors.push(placement);
        }
    }

    pub(crate) fn retreat_all(&self) -> Vec<RetreatPlan> {
        let (motion, source) = match self.provider.retreat_override() {
            Some(motion) => (motion, PlacementSource::Formation),
            None => (DEFAULT_RETREAT, PlacementSource::Default),
        };
        self.actors
            .iter()
            .map(|actor| RetreatPlan {
                index: actor.index,
                from: actor.home,
                to: motion.target_from(actor.home),
                duration_frames: motion.duration_frames,
                source,
            })
            .collect()
    }
}

pub(crate) fn default_home(index: usize) -> ScreenPoint {
    let step = i32::try_from(index).unwrap_or(i32::MAX);
    ScreenPoint::new(
        DEFAULT_HOME_X.saturating_add(DEFAULT_HOME_STEP_X.saturating_mul(step)),
        DEFAULT_HOME_Y.saturating_add(DEFAULT_HOME_STEP_Y.saturating_mul(step)),
    )
}
