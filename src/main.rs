use brrtdispatch::cli::run_cli;
use brrtdispatch::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let _logging = init_logging()?;
    run_cli()
}
