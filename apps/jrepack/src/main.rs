use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use jrepack_build::{Config, Stage};
use jrepack_core::ModuleListWriter;
use log::{debug, info};
use std::io::{self, BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "jrepack")]
#[command(about = "Package Java applications with minimized runtimes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a stage and everything it depends on
    Build(BuildArgs),
    /// Filter jdeps output from stdin into a comma-separated module list
    Modules,
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Stage to build
    #[arg(long, value_enum, default_value_t = Stage::PackageAll)]
    stage: Stage,

    /// Run only this stage, reusing earlier outputs on disk
    #[arg(long)]
    only: bool,

    /// Print the stage order without running anything
    #[arg(long)]
    dry_run: bool,

    /// Print the build report as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    config: Config,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Build(args) => {
            let stages =
                if args.only { vec![args.stage] } else { jrepack_build::plan(args.stage) };
            if args.dry_run {
                jrepack_build::print_plan(&mut stdout, &stages)?;
                return Ok(());
            }

            info!("Running {} stages for {}", stages.len(), args.stage);
            let report = jrepack_build::run_build(args.config, args.stage, args.only)?;
            let elapsed_ms = start.elapsed().as_millis();

            if args.json {
                jrepack_build::print_report_json(&mut stdout, &report)?;
            } else {
                jrepack_build::print_report(&mut stdout, &report)?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms ({} stages).",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    report.stages.len().to_string().cyan()
                )?;
                stdout.flush()?;
            }
            Ok(())
        }
        Commands::Modules => {
            let mut writer = ModuleListWriter::new(stdout);
            io::copy(&mut io::stdin().lock(), &mut writer).context("Failed to read stdin")?;
            debug!("Collected {} modules", writer.module_count());
            writer.flush()?;
            Ok(())
        }
    }
}
