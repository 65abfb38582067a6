fn main() -> anyhow::Result<()> {
    heart_risk::cli::main()
}
