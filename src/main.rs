#[tokio::main]
async fn main() -> anyhow::Result<()> {
    goodwe_bridge::app().await
}
