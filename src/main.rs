use em_matrix_runner::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    em_matrix_runner::init_tracing();

    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
