use std::env;
use std::fs::File;
use std::process;

use log::info;

use purify_core::{RefinementLoop, RunningStats};
use purify_gen::{generate, rng_from_seed, shuffle, Histogram, RunConfig};

const BAR_WIDTH: usize = 50;

fn eprint_usage_and_exit() -> ! {
    let program_name = env::args().next().unwrap_or_else(|| "purify".to_string());
    eprintln!("usage: {} [config_path]", program_name);
    process::exit(1);
}

fn load_config() -> Result<RunConfig, String> {
    let mut args = env::args();
    args.next(); // program name

    match args.next() {
        Some(path) => {
            let reader = match File::open(&path) {
                Ok(reader) => Ok(reader),
                Err(e) => Err(format!("could not open {}: {}", path, e)),
            }?;
            RunConfig::from_yaml_reader(reader).map_err(|e| e.to_string())
        }
        None => Ok(RunConfig::default()),
    }
}

fn describe(stats: &RunningStats) -> String {
    match (stats.mean(), stats.sigma()) {
        (Ok(mean), Ok(sigma)) => format!("mean {:.4}, sigma {:.4}", mean, sigma),
        _ => "no data".to_string(),
    }
}

fn run(config: RunConfig) -> Result<(), String> {
    let mut rng = rng_from_seed(config.generator.seed);
    let data = shuffle(generate(&config.generator, &mut rng), &mut rng);
    info!("generated {} samples", data.len());

    let axis = match Histogram::spanning(&data, config.histogram_bins) {
        Some(hist) => hist,
        None => return Err("generator produced no data".to_string()),
    };
    println!("input ({} values)", data.len());
    print!("{}", axis.render(BAR_WIDTH));

    let rounds = RefinementLoop::new(config.refinement, data).map_err(|e| e.to_string())?;
    let mut last = None;
    for report in rounds {
        let report = report.map_err(|e| e.to_string())?;
        println!(
            "round {}: kept {} of {}, {}",
            report.round,
            report.accepted.len(),
            report.input_len(),
            describe(&report.snapshot)
        );
        print!("{}", axis.with_range_of(&report.accepted).render(BAR_WIDTH));
        last = Some(report);
    }

    if let Some(report) = last {
        println!(
            "survivors: {}; {}",
            report.accepted.len(),
            describe(&report.snapshot)
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprint_usage_and_exit();
        }
    };
    println!("{:?}", config);

    if let Err(e) = run(config) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
