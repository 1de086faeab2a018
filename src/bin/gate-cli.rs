use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use address_gate::config::load_config;
use address_gate::gate::GateChain;

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Inspect address gate configurations offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and show what each gate accepted
    Check {
        config: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show whether an address would pass the configured chain
    Probe { config: PathBuf, address: String },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config, json } => {
            let config = load_config(&config)?;
            let chain = GateChain::from_config(&config.gates);

            if json {
                let gates: Vec<_> = chain
                    .links()
                    .iter()
                    .map(|link| {
                        json!({
                            "name": link.gate.name(),
                            "mode": link.mode.as_str(),
                            "addresses": link.gate.list().entries(),
                            "deny_status": link.gate.denial().status().map(|s| s.as_u16()),
                            "diagnostics": link
                                .gate
                                .diagnostics()
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let report = json!({
                    "bind_address": config.listener.bind_address,
                    "gates": gates,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("listener: {}", config.listener.bind_address);
                for link in chain.links() {
                    let gate = &link.gate;
                    println!(
                        "{} ({}): {} address(es), denies with {:?}",
                        gate.name(),
                        link.mode,
                        gate.list().len(),
                        gate.denial()
                    );
                    for entry in gate.list().entries() {
                        println!("    {}", entry);
                    }
                    for diagnostic in gate.diagnostics() {
                        println!("    warning: {}", diagnostic);
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Probe { config, address } => {
            let config = load_config(&config)?;
            let chain = GateChain::from_config(&config.gates);

            match chain.refusing_link(Some(address.as_str())) {
                Some(link) => {
                    println!("denied by {} ({})", link.gate.name(), link.mode);
                    Ok(ExitCode::FAILURE)
                }
                None => {
                    println!("forwarded");
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
    }
}
