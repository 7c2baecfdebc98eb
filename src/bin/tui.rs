use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    classease::tui::run().await
}
