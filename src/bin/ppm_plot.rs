use log::debug;
use mq2_ppm::mq2::adc_from_ppm;
use mq2_ppm::plot::parse_cli;
use mq2_ppm::{min_and_max, Result, TimePpm};
use std::path::Path;

fn main() {
    let (csvin, svgout, verbosity) = parse_cli();
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(&csvin, &svgout) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(csvin: &Path, svgout: &Path) -> Result<()> {
    println!(
        "read data from {} and plot to {}",
        csvin.display(),
        svgout.display()
    );
    let tp = TimePpm::from_csv(csvin)?;
    println!("{}", tp.head(5));
    println!("{}", tp.tail(5));
    println!("{:?}", tp.shape());
    if let Some((low, high)) = min_and_max(&tp.ppm_log) {
        debug!(
            "ppm_log range {}..{} reads as MQ-2 ADC {:.0}..{:.0}",
            low,
            high,
            adc_from_ppm(low),
            adc_from_ppm(high)
        );
    }
    tp.plot(svgout)?;
    println!("plot saved to {}", svgout.display());
    Ok(())
}
