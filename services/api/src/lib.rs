mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use brand_audit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
