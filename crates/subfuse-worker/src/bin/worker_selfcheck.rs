use anyhow::Context;

use subfuse_worker::{run_self_checks, WorkerConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env().context("loading configuration")?;
    println!(
        "worker-selfcheck: starting with work_dir={}",
        config.work_dir.display()
    );

    run_self_checks(&config).context("self checks")?;

    println!("worker-selfcheck: ok");
    Ok(())
}
