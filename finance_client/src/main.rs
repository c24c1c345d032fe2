use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match finance_client::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}
