use crate::cli::{
    args::{StrategyAction, StrategyRunArgs},
    commands::{parse_interval, playback, render_frame, terminal_width},
    config::{read_bits, write_bits},
    global::GlobalArgs,
};
use bitlab::workspace::{Player, Strategy};
use bitlab::{Config, MetricsCalculator, open_presets, open_strategies};
use std::fs;
use std::time::Duration;

pub fn handle(
    action: StrategyAction,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut strategies = open_strategies(&config.data_dir())?;

    match action {
        StrategyAction::List { json } => {
            let entries = strategies.entries();
            if json {
                let output: Vec<_> = entries
                    .iter()
                    .map(|(s, source)| {
                        serde_json::json!({
                            "name": s.name,
                            "source": source,
                            "steps": s.total_steps(),
                            "metric": s.scoring.metric,
                            "goal": s.scoring.goal,
                            "description": s.description,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for (s, source) in entries {
                    println!("  {:<20} {:<8} {}", s.name, source.as_str(), s.description);
                }
            }
        }
        StrategyAction::Show { name } => {
            let strategy = strategies.get(&name)?;
            print!("{}", toml::to_string_pretty(strategy)?);
        }
        StrategyAction::Save { file } => {
            let strategy: Strategy = toml::from_str(&fs::read_to_string(&file)?)?;
            strategy
                .validate()
                .map_err(|e| format!("Strategy '{}' is invalid: {}", strategy.name, e))?;
            let name = strategy.name.clone();
            let replaced = strategies.save(strategy)?;
            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Saved" };
                eprintln!("{} strategy '{}'", verb, name);
            }
        }
        StrategyAction::Delete { name } => {
            strategies.delete(&name)?;
            if !global.quiet {
                eprintln!("Deleted strategy '{}'", name);
            }
        }
        StrategyAction::Run(args) => {
            let strategy = strategies.get(&args.name)?.clone();
            run(strategy, args, global, config)?;
        }
    }
    Ok(())
}

fn run(
    strategy: Strategy,
    args: StrategyRunArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = match &args.preset {
        Some(name) => open_presets(&config.data_dir())?.get(name)?.generate()?,
        None => read_bits(args.file.as_deref(), global)?,
    };
    let calculator = MetricsCalculator::from_config(config)?;

    if args.play {
        let interval = match &args.interval {
            Some(s) => parse_interval(s)?,
            None => Duration::from_millis(config.playback.interval_ms.max(1)),
        };
        let mut player = Player::new(strategy, bits, calculator)?;
        playback(&mut player, interval, global.color(), global.quiet)?;
        if let Some(output) = &args.output {
            write_bits(player.current_bits(), Some(output), global, None)?;
        }
        return Ok(());
    }

    let result = strategy.run(&bits, &calculator)?;
    let final_bits = result.bits().unwrap_or(&bits);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if let Some(output) = &args.output {
            write_bits(final_bits, Some(output), global, None)?;
        }
        return Ok(());
    }

    // Frames go to stderr so stdout carries only the bits
    if !global.quiet {
        let width = terminal_width();
        eprintln!(
            "Strategy: {} ({} {})",
            result.strategy, strategy.scoring.goal, strategy.scoring.metric
        );
        eprintln!("   0  {:<24} {:>10.4}", "start", result.initial_score);
        for frame in &result.frames {
            eprintln!("{}", render_frame(frame, width, global.color()));
        }
        eprintln!(
            "Kept {} of {} steps, score {:.4} -> {:.4}",
            result.accepted,
            result.frames.len(),
            result.initial_score,
            result.final_score
        );
    }
    write_bits(final_bits, args.output.as_deref(), global, None)
}
