use crate::cli::{args::PartitionArgs, config::read_bits, global::GlobalArgs};
use bitlab::workspace::PartitionSet;
use bitlab::{Config, LoadedFile};

/// Parse `NAME=START..END`.
fn parse_range(text: &str) -> Result<(String, usize, usize), Box<dyn std::error::Error>> {
    let (name, range) = text
        .split_once('=')
        .ok_or_else(|| format!("Invalid range '{}', expected NAME=START..END", text))?;
    let (start, end) = range
        .split_once("..")
        .ok_or_else(|| format!("Invalid range '{}', expected NAME=START..END", text))?;
    Ok((name.trim().to_string(), start.trim().parse()?, end.trim().parse()?))
}

pub fn handle(
    args: PartitionArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.split.is_none() && args.ranges.is_empty() {
        return Err("Give --split N or at least one --range NAME=START..END".into());
    }

    let bits = read_bits(args.file.as_deref(), global)?;
    let len = bits.len();
    let mut file = LoadedFile::from_bits("input", bits, config.history.limit);

    if let Some(n) = args.split {
        *file.partitions_mut() = PartitionSet::split_even(len, n)?;
    }
    for range in &args.ranges {
        let (name, start, end) = parse_range(range)?;
        file.add_partition(name, start, end)?;
    }

    let partitions = file.partitions().list().to_vec();
    let mut rows = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let stats = file.partition_stats(&partition.name)?;
        rows.push((partition, stats));
    }

    if args.json {
        let output: Vec<_> = rows
            .iter()
            .map(|(p, s)| serde_json::json!({ "partition": p, "stats": s }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6} {:>8}",
        "name", "start", "end", "balance", "entropy", "trans", "run", "lz"
    );
    for (p, s) in &rows {
        println!(
            "{:<12} {:>8} {:>8} {:>8.4} {:>8.4} {:>8} {:>6} {:>8.4}",
            p.name,
            p.start,
            p.end,
            s.balance,
            s.entropy,
            s.transitions,
            s.longest_run,
            s.lz_complexity
        );
    }
    Ok(())
}
