extern crate crewcal as lib;

use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use itertools::Itertools;
use lib::calendar::{MonthIndex, MonthMatrix};
use lib::highlight::annotate;
use lib::range::{self, ParsePolicy};
use lib::render::MonthPane;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "crewcal",
    about = "Month grids and day range strings for crew calendars."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "print a month grid with highlighted days")]
    Grid {
        #[structopt(short = "y", long = "year", help = "year, defaults to the current one")]
        year: Option<i32>,

        #[structopt(
            short = "m",
            long = "month",
            help = "month from 1 to 12, defaults to the current one"
        )]
        month: Option<i32>,

        #[structopt(
            short = "d",
            long = "days",
            default_value = "",
            help = "days to highlight, e.g. \"1-4, 12-17, 20\""
        )]
        days: String,
    },

    #[structopt(about = "collapse day numbers into a range string")]
    Serialize {
        #[structopt(required = true, help = "day numbers")]
        days: Vec<u32>,
    },

    #[structopt(about = "expand a range string into day numbers")]
    Parse {
        #[structopt(help = "range string, e.g. \"1-4, 12-17, 20\"")]
        range: String,

        #[structopt(long = "strict", help = "fail on malformed tokens")]
        strict: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("crewcal ran into a fatal error!");
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    match args.cmd {
        Command::Grid { year, month, days } => {
            let current = MonthIndex::default();
            let year = year.unwrap_or_else(|| current.year());
            let index = match month {
                Some(month) => MonthIndex::from_number(year, month)?,
                None => MonthIndex::new(current.month(), year),
            };

            let highlighted =
                range::parse_with_limit(&days, config.parse.policy, index.num_days()?)?;
            let matrix = MonthMatrix::build(index)?;
            let annotated = annotate(&matrix, &highlighted);

            print!(
                "{}",
                MonthPane::new(&annotated, &config.theme).today(Local::now().date_naive())
            );
        }
        Command::Serialize { days } => {
            println!("{}", range::serialize(days));
        }
        Command::Parse {
            range: input,
            strict,
        } => {
            let policy = if strict {
                ParsePolicy::Strict
            } else {
                config.parse.policy
            };
            let days = range::parse_with(&input, policy)?;
            println!("{}", days.iter().join(" "));
        }
    }

    Ok(())
}
