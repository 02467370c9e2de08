fn main() -> anyhow::Result<()> {
    tristore_cli::run()
}
