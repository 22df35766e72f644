use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    viability_cli::main_entry().await
}
