//! Punto de entrada del binario `sulfolib`.
//!
//! Carga `.env`, inicializa el logger hacia stderr y despacha el
//! subcomando. Solo aquí los errores se convierten en códigos de
//! salida: 0 éxito, 1 control de calidad fallido, 2 error de
//! configuración o de uso.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use sulfo_adapters::PipelineError;
use sulfo_core::CoreEngineError;

mod cli;
mod config;
mod pipeline;

fn main() -> ExitCode {
    // Cargar variables de entorno desde .env si existe, antes de que
    // CONFIG se evalúe.
    let _ = dotenvy::dotenv();
    let args = cli::parse();
    init_tracing();

    let result = match args.command {
        cli::Command::Enumerate(args) => pipeline::enumerate_library(&args),
        cli::Command::Reconcile(args) => pipeline::reconcile_from_files(&args),
        cli::Command::Run(args) => pipeline::run_campaign(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            exit_code_for(&e)
        }
    }
}

/// Un control de calidad inválido es 1; todo lo demás es un problema
/// de configuración o de uso, 2.
fn exit_code_for(error: &PipelineError) -> ExitCode {
    match error {
        PipelineError::Engine(CoreEngineError::CheckFailed(_)) => ExitCode::from(1),
        _ => ExitCode::from(2),
    }
}

/// El logger escribe a stderr; stdout queda para las líneas de
/// resultado de los subcomandos.
fn init_tracing() {
    let filter = EnvFilter::builder().parse_lossy(&config::CONFIG.log_filter);
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();
}
