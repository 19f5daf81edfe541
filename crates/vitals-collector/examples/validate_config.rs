use std::env;
use std::path::PathBuf;
use vitals_collector::config::VitalsConfig;
use vitals_collector::metrics::StreamKind;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crates/vitals-collector/vitals.toml")
    };

    println!("Validating config file: {}", config_path.display());

    let config = VitalsConfig::from_file(&config_path)?;

    println!("\n✓ Successfully parsed configuration!");
    println!("\nSession: {}", config.session.name);

    println!("\nStreams:");
    for kind in StreamKind::ALL {
        let state = if config.streams.is_enabled(kind) {
            "enabled"
        } else {
            "disabled"
        };
        println!("  {}: {}", kind, state);
    }

    let thresholds = config.thresholds();
    println!("\nThresholds (good / needs improvement):");
    println!("  LCP:  {} / {}ms", thresholds.lcp.good, thresholds.lcp.needs_improvement);
    println!("  FID:  {} / {}ms", thresholds.fid.good, thresholds.fid.needs_improvement);
    println!("  CLS:  {} / {}", thresholds.cls.good, thresholds.cls.needs_improvement);
    println!("  TTFB: {} / {}ms", thresholds.ttfb.good, thresholds.ttfb.needs_improvement);

    println!("\n✓ All validations passed!");

    Ok(())
}
