#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = attempt_report::run().await {
        eprintln!("attempt-report fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
