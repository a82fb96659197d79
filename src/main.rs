// Solves the baseline growth model, reports the steady state and writes the
// policy figure data next to the working directory.

use std::fs;

use env_logger::Env;
use vfirs::{solve, LogObserver, PolicyPlot, SolverConfig};

const PLOT_PATH: &str = "vfirs_policy.json";

fn main() -> vfirs::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = SolverConfig::default();
    let solution = solve(&config, &mut LogObserver)?;

    println!("The steady-state value of capital is {}", solution.kstar());
    println!(
        "VFI in Rust executed in {} milliseconds",
        solution.summary.elapsed.as_millis()
    );

    let plot = PolicyPlot::from_solution(&solution);
    fs::write(PLOT_PATH, plot.to_json()?)?;
    log::info!("policy plot data written to {}", PLOT_PATH);

    Ok(())
}
