use clap::Parser;
use heatpump_thermal::output::FileOutput;
use heatpump_thermal::read_forcing_file::{forcing_data_from_csv, DEFAULT_FORECAST_HORIZON};
use heatpump_thermal::run_project;
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct ThermalArgs {
    #[arg(help = "Path to the heat pump asset description in .json format")]
    input_file: String,
    #[arg(
        long,
        short,
        help = "Path to forcing file (weather and heat powers per period) in .csv format"
    )]
    forcing_file: String,
    #[arg(
        long,
        default_value_t = false,
        help = "Whether temperatures in the forcing file are in degrees Celsius"
    )]
    celsius: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Whether the forcing file holds one row per hour, to be resampled onto the period length"
    )]
    hourly: bool,
    #[arg(
        long,
        default_value_t = DEFAULT_FORECAST_HORIZON,
        help = "Number of predicted samples passed to each calculation"
    )]
    horizon: usize,
    #[arg(long, default_value_t = tracing::Level::INFO, help = "Maximum level to log at")]
    log_level: tracing::Level,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = ThermalArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(args.log_level);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting tracing subscriber failed");

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_stem = PathBuf::from(input_file_stem);
    let input_file_name = input_file_stem
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("results");

    let output_path = PathBuf::from(format!("{}__results", input_file_stem.display()));
    fs::create_dir_all(&output_path)?;
    let file_output = FileOutput::new(output_path, format!("{input_file_name}__{{}}.csv"));

    let forcing = forcing_data_from_csv(
        BufReader::new(File::open(Path::new(&args.forcing_file))?),
        args.celsius,
    )?;
    info!("Read {} periods of forcing", forcing.len());

    run_project(
        BufReader::new(File::open(Path::new(input_file))?),
        &forcing,
        &file_output,
        args.horizon,
        args.hourly,
    )?;

    Ok(())
}
