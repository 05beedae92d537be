#[tokio::main]
async fn main() {
    if let Err(e) = chainstate_dump::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
