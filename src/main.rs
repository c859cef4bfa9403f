use neurolens::cli;

fn main() -> anyhow::Result<()> {
    cli::run(std::env::args().collect())
}
