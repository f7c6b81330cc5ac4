use anyhow::Result;
use clap::Parser;
use pairset::{assembler, cli::Cli, runtimes::RuntimeTable};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Validate cutoff (a ratio against the solo runtime, must be positive)
    if !args.cutoff.is_finite() || args.cutoff <= 0.0 {
        anyhow::bail!(
            "Invalid value for --cutoff: {} (must be a positive ratio)",
            args.cutoff
        );
    }

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let runtimes = RuntimeTable::from_results_root(&args.results_root)?;

    let config = assembler::AssemblerConfig {
        cutoff: args.cutoff,
        configs: args.configs,
        matrix_file: args.matrix_file,
        output_file: args.output,
        include_self_pairs: !args.skip_self_pairs,
    };

    let combined = assembler::assemble(&args.results_root, &runtimes, &config)?;

    let (rows, columns) = combined.shape();
    println!("({rows}, {columns})");

    let output_path = args.results_root.join(&config.output_file);
    combined.write_csv(&output_path)?;
    println!("Wrote {}", output_path.display());

    Ok(())
}
