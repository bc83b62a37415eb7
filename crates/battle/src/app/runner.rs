use std::path::Path;
use std::process::ExitCode;

use formation::{write_config_file, ConfigSource, FormationConfig, PartyFormation};
use serde::Serialize;
use tracing::{error, info};

use super::bootstrap::{usage_text, AppCommand, AppWiring};
use super::stage::{ActorPlacement, BattleStage, RetreatPlan};

const DEFAULT_PARTY_SIZE: usize = 4;

#[derive(Debug, Serialize)]
struct BattleReport {
    placements: Vec<ActorPlacement>,
    retreat: Vec<RetreatPlan>,
    broken_cycles: Vec<usize>,
}

impl BattleReport {
    fn render_human_readable(&self) -> String {
        let mut output = format!(
            "actors={} broken_cycles={:?}",
            self.placements.len(),
            self.broken_cycles
        );
        for (placement, retreat) in self.placements.iter().zip(&self.retreat) {
            output.push('\n');
            output.push_str(&format!(
                "actor={} home=({}, {}) anchor={:?} retreat_to=({}, {}) frames={} motion={:?}",
                placement.index,
                placement.home.x,
                placement.home.y,
                placement.source,
                retreat.to.x,
                retreat.to.y,
                retreat.duration_frames,
                retreat.source
            ));
        }
        output
    }
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let result = match app.command {
        AppCommand::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        AppCommand::WriteDefault { path } => write_default(&path),
        AppCommand::Battle {
            source,
            party_size,
            json,
        } => run_battle(&source, party_size, json),
    };

    if let Err(message) = result {
        error!(error = %message, "battle_failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn write_default(path: &Path) -> Result<(), String> {
    write_config_file(path, &FormationConfig::sample()).map_err(|error| error.to_string())?;
    info!(path = %path.display(), "default_config_written");
    Ok(())
}

fn run_battle(source: &ConfigSource, party_size: Option<usize>, json: bool) -> Result<(), String> {
    let config = source.load().map_err(|error| error.to_string())?;
    let report = simulate_battle(config, party_size);
    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|error| format!("encode report json: {error}"))?;
        println!("{text}");
    } else {
        println!("{}", report.render_human_readable());
    }
    Ok(())
}

fn simulate_battle(config: FormationConfig, party_size: Option<usize>) -> BattleReport {
    let mut formation = PartyFormation::new(config);
    let party_size = party_size.unwrap_or(match formation.records().len() {
        0 => DEFAULT_PARTY_SIZE,
        len => len,
    });

    let mut stage = BattleStage::new(&mut formation);
    let placements = stage.start(party_size).to_vec();
    let retreat = stage.retreat_all();
    let broken_cycles = formation
        .resolved()
        .map(|resolved| resolved.broken_cycles().to_vec())
        .unwrap_or_default();
    BattleReport {
        placements,
        retreat,
        broken_cycles,
    }
}
