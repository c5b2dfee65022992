use super::{DEFAULT_CSV, VERSION};
use clap::{App, Arg};
use std::path::{Path, PathBuf};

/// Takes the CLI arguments that control the reshaping and plotting of the ppm log.
/// Returns the input csv, the output svg and the verbosity level.
pub fn parse_cli() -> (PathBuf, PathBuf, u64) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the csv file with interleaved ppm and timestamp rows")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .default_value(DEFAULT_CSV);
    let arg_svgout = Arg::with_name("output_svgfile")
        .help("name of the output svg file, defaults to the csv name with svg extension")
        .short("o")
        .long("svgfile")
        .takes_value(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print more log information, repeat for debug output")
        .short("v")
        .long("verbose")
        .multiple(true)
        .takes_value(false);
    let cli_args = App::new("ppm_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to reshape and plot the MQ-2 ppm log")
        .arg(arg_csvin)
        .arg(arg_svgout)
        .arg(arg_verbose)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or(DEFAULT_CSV));
    let svgout = match cli_args.value_of("output_svgfile") {
        Some(p) => PathBuf::from(p),
        None => svg_path_for(&csvin),
    };
    let verbosity = cli_args.occurrences_of("verbose");
    (csvin, svgout, verbosity)
}

/// the csv path with its extension replaced by svg
pub fn svg_path_for(csvin: &Path) -> PathBuf {
    csvin.with_extension("svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_path_for() {
        assert_eq!(svg_path_for(Path::new("ppm.csv")), PathBuf::from("ppm.svg"));
        assert_eq!(
            svg_path_for(Path::new("logs/run1")),
            PathBuf::from("logs/run1.svg")
        );
    }
}
