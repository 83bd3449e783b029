// src/main.rs

use run_commands::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("run-commands error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let outcome = run(args).await?;
    Ok(outcome.success)
}
