//! dfolib command-line binary

fn main() -> anyhow::Result<()> {
    dfolib::cli::run_cli()
}
