//! Superficie de línea de comandos del binario `sulfolib`.
//!
//! Tres subcomandos: `enumerate` produce la biblioteca desde las dos
//! listas de reactivos, `reconcile` cruza un mapa de dispensado con una
//! tabla de productos ya escrita, y `run` encadena ambos en un solo
//! proceso sobre las colecciones en memoria.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sulfolib",
    about = "Sulfonamide library enumeration and plate reconciliation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Enumerate the sulfonyl chloride x amine library
    Enumerate(EnumerateArgs),

    /// Merge a dispense map with an enumerated products table
    Reconcile(ReconcileArgs),

    /// Enumerate and reconcile in one process
    Run(RunArgs),
}

#[derive(Args)]
pub struct EnumerateArgs {
    /// Sulfonyl chloride list (CSV with a SMILES column)
    #[arg(long, value_name = "CSV")]
    pub sulfonyl_chlorides: PathBuf,

    /// Amine list (CSV with a SMILES column)
    #[arg(long, value_name = "CSV")]
    pub amines: PathBuf,

    /// Basename for output files [env: SULFOLIB_OUT_BASENAME, default: library]
    #[arg(long, value_name = "BASE")]
    pub out_basename: Option<String>,

    /// Also write <base>_final_products.sdf
    #[arg(long)]
    pub emit_sdf: bool,

    /// Fail when a reagent row lacks an explicit ID
    #[arg(long)]
    pub strict_ids: bool,
}

#[derive(Args)]
pub struct ReconcileArgs {
    /// Destination plate layout extracted from the robot protocol
    #[arg(long, value_name = "CSV")]
    pub dest_map: PathBuf,

    /// Final products table from a previous enumeration
    #[arg(long, value_name = "CSV")]
    pub products: PathBuf,

    /// Authoritative plate map output
    #[arg(long, value_name = "CSV", default_value = "authoritative_plate_map_96.csv")]
    pub out: PathBuf,

    /// QC report output
    #[arg(long, value_name = "TXT", default_value = "qc_report.txt")]
    pub qc: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub enumerate: EnumerateArgs,

    /// Destination plate layout extracted from the robot protocol
    #[arg(long, value_name = "CSV")]
    pub dest_map: PathBuf,

    /// Authoritative plate map output
    #[arg(long, value_name = "CSV", default_value = "authoritative_plate_map_96.csv")]
    pub out: PathBuf,

    /// QC report output
    #[arg(long, value_name = "TXT", default_value = "qc_report.txt")]
    pub qc: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}
