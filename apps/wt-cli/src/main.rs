use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use wt_app::{run_train, AppResult, TrainConfig};

#[derive(Parser)]
#[command(name = "wt-cli")]
#[command(about = "watertrain CLI - desalination treatment-train configuration and costing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a train config file and resolve its variant tokens
    Validate {
        /// Path to the train YAML file
        config_path: PathBuf,
    },
    /// Build and solve a network without costing it
    #[command(subcommand)]
    Run(RunCommands),
    /// Build, solve, and cost the train a config describes
    Cost {
        /// Path to the train YAML file
        config_path: PathBuf,
    },
}

#[derive(Subcommand)]
enum RunCommands {
    /// NF pretreatment with an optional feed bypass
    Pretreatment {
        /// Disable the feed bypass around the membrane
        #[arg(long)]
        no_bypass: bool,
        /// Nanofiltration variant token: ZO or Sep
        #[arg(long, default_value = "ZO")]
        nf_model: String,
        /// Chemistry basis token: ion, salt, or TDS
        #[arg(long, default_value = "ion")]
        basis: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run(run_cmd) => match run_cmd {
            RunCommands::Pretreatment {
                no_bypass,
                nf_model,
                basis,
            } => cmd_run_pretreatment(!no_bypass, &nf_model, &basis),
        },
        Commands::Cost { config_path } => cmd_cost(&config_path),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating train config: {}", config_path.display());
    let config = TrainConfig::load(config_path)?;
    let resolved = config.resolve()?;
    println!("✓ Config is valid");
    println!("  Train: {}", resolved.name);
    println!(
        "  Pretreatment: NF {} on {} basis, bypass {}",
        resolved.nf_model.key(),
        resolved.basis.key(),
        if resolved.has_bypass { "on" } else { "off" }
    );
    match &resolved.desalination {
        Some(d) => println!(
            "  Desalination: RO {} ({} stage{})",
            d.ro_model.key(),
            if d.two_stage { 2 } else { 1 },
            if d.two_stage { "s" } else { "" }
        ),
        None => println!("  Desalination: none"),
    }
    Ok(())
}

fn cmd_run_pretreatment(has_bypass: bool, nf_token: &str, basis_token: &str) -> AppResult<()> {
    // Token parsing happens before any construction; an unrecognized
    // variant fails right here.
    let nf_model = nf_token.parse()?;
    let basis = basis_token.parse()?;

    println!("Running NF pretreatment (bypass: {})", has_bypass);
    let (model, ports, report) = wt_app::solve_pretreatment(has_bypass, nf_model, basis)?;

    println!("✓ Solved in {} passes (residual {:.3e})", report.passes, report.residual);
    println!("  Blocks: {}", model.flowsheet.present_blocks().len());
    println!("  Arcs:   {}", model.flowsheet.arcs().len());
    println!("  Product port: {}", ports.product);
    println!("  Waste port:   {}", ports.waste);

    let product = model.flowsheet.require_port_stream(ports.product)?;
    let waste = model.flowsheet.require_port_stream(ports.waste)?;
    println!(
        "  Product flow: {:.4} kg/s, waste flow: {:.4} kg/s",
        product.total_flow().value,
        waste.total_flow().value
    );
    Ok(())
}

fn cmd_cost(config_path: &Path) -> AppResult<()> {
    let config = TrainConfig::load(config_path)?;
    println!("Costing train: {}", config.name);

    let run = run_train(&config)?;
    println!(
        "✓ Solved in {} passes, {} blocks costed",
        run.solve.passes,
        run.model.flowsheet.present_blocks().len()
    );
    println!();
    print!("{}", run.report);
    Ok(())
}
