fn main() -> anyhow::Result<()> {
    themesync_cli::cli::run()
}
