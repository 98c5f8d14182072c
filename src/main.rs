#[tokio::main]
async fn main() {
    if let Err(e) = testit_client::run().await {
        eprintln!("testit fatal: {e:#}");
        std::process::exit(1);
    }
}
