fn main() -> anyhow::Result<()> {
    govgraph::run()?;
    Ok(())
}
