#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_cards_cli::run().await
}
