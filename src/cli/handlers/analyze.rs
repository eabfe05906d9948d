use crate::cli::{args::AnalyzeArgs, config::read_bits, global::GlobalArgs};
use bitlab::{Config, Metric, MetricsCalculator, MetricsReport};

pub fn handle(
    args: AnalyzeArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(block_size) = args.block_size {
        config.analysis.block_size = block_size;
    }
    if let Some(max_lag) = args.max_lag {
        config.analysis.max_lag = max_lag;
    }
    let calculator = MetricsCalculator::from_config(&config)?;

    let bits = read_bits(args.file.as_deref(), global)?;

    if let Some(name) = &args.metric {
        let metric: Metric = name.parse()?;
        let value = metric.evaluate(&bits, &calculator)?;
        if args.json {
            let output = serde_json::json!({ "metric": metric.as_str(), "value": value });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", value);
        }
        return Ok(());
    }

    let report = calculator.report(&bits)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &MetricsReport) {
    println!(
        "Length:          {} bits ({} ones, {} zeros)",
        report.length, report.ones, report.zeros
    );
    println!("Balance:         {:.4}", report.balance);
    println!("Entropy:         {:.4} bits/bit", report.entropy);
    println!(
        "Block entropy:   {:.4} bits per {}-bit block",
        report.block_entropy, report.block_size
    );
    println!("Transitions:     {}", report.transitions);
    println!(
        "Runs:            {} (longest 0-run {}, longest 1-run {}, mean {:.2})",
        report.runs.count,
        report.runs.longest_zero,
        report.runs.longest_one,
        report.runs.mean_length
    );

    let lags: Vec<String> = report
        .autocorrelation
        .iter()
        .take(8)
        .enumerate()
        .map(|(i, r)| format!("{}:{:+.3}", i + 1, r))
        .collect();
    let more = if report.autocorrelation.len() > 8 { " ..." } else { "" };
    println!("Autocorrelation: {}{}", lags.join(" "), more);

    println!(
        "Chi-square:      {:.4} (monobit), {:.4} ({}-bit blocks)",
        report.chi_square, report.chi_square_blocks, report.block_size
    );
    match (&report.runs_test, report.runs_test_passed) {
        (Some(test), Some(passed)) => println!(
            "Runs test:       z = {:+.4}, p = {:.4} ({})",
            test.z,
            test.p_value,
            if passed { "pass" } else { "fail" }
        ),
        _ => println!("Runs test:       undefined"),
    }
    println!(
        "LZ complexity:   {} (normalized {:.4})",
        report.lz_complexity, report.normalized_lz_complexity
    );
    println!(
        "Ideality:        {:.1}/100 (entropy {:.3}, balance {:.3}, runs {:.3}, autocorrelation {:.3})",
        report.ideality.score,
        report.ideality.entropy,
        report.ideality.balance,
        report.ideality.runs,
        report.ideality.autocorrelation
    );
    if let Some(estimate) = &report.compression {
        println!(
            "gzip:            {} -> {} bytes (ratio {:.3})",
            estimate.original_bytes, estimate.compressed_bytes, estimate.ratio
        );
    }
}
