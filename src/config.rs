//! Command line parsing and mode selection

use crate::tle::STARLINK_TLE_URL;
use crate::visualization::config::DEFAULT_BASEMAP;
use anyhow::bail;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::time::Duration;

/// Upper bound on tracks drawn at once; more than this is unreadable on the map
pub const MAX_TRACKS: u32 = 500;

#[derive(Parser, Debug)]
#[command(name = "starlink-track")]
#[command(about = "Plot Starlink satellite positions and predicted ground tracks on a world map")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Option<ModeArg>,

    /// TLE source: http(s) URL, file:// URL or local path
    #[arg(long, global = true, default_value = STARLINK_TLE_URL)]
    pub source: String,

    /// Seed for the satellite selection (random when omitted)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print a JSON report instead of opening a window
    #[arg(long, global = true)]
    pub headless: bool,

    /// Start predicted tracks at the top of the current hour
    #[arg(long, global = true)]
    pub align_hour: bool,

    /// Equirectangular world image drawn under the map, relative to the asset folder
    #[arg(long, global = true, default_value = DEFAULT_BASEMAP)]
    pub basemap: String,

    /// Draw the graticule on a plain background, without a world image
    #[arg(long, global = true)]
    pub no_basemap: bool,

    /// Catalog download timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ModeArg {
    /// Plot the current position of every satellite
    Positions,
    /// Re-plot current positions once per second
    Animate {
        /// Number of one-second updates
        #[arg(long, default_value_t = 10)]
        seconds: u32,
    },
    /// Plot predicted tracks of randomly chosen satellites
    Tracks {
        /// Number of satellites
        #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_TRACKS as i64))]
        count: u32,
        /// Trajectory window length in minutes
        #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: u32,
    },
}

/// Validated run mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Positions,
    Animate { seconds: u32 },
    Tracks { count: u32, minutes: u32 },
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Positions => Mode::Positions,
            ModeArg::Animate { seconds } => Mode::Animate { seconds },
            ModeArg::Tracks { count, minutes } => Mode::Tracks { count, minutes },
        }
    }
}

/// Everything the driver needs besides the mode
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub source: String,
    pub seed: Option<u64>,
    pub headless: bool,
    pub align_hour: bool,
    pub basemap: Option<String>,
    pub timeout: Duration,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            source: self.source.clone(),
            seed: self.seed,
            headless: self.headless,
            align_hour: self.align_hour,
            basemap: (!self.no_basemap).then(|| self.basemap.clone()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn read_number<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> anyhow::Result<u32> {
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for an answer");
        }
        match line.trim().parse::<u32>() {
            Ok(n) => return Ok(n),
            Err(_) => writeln!(output, "Please enter a whole number.")?,
        }
    }
}

/// Ask for a mode on a terminal, re-prompting until every answer is valid
///
/// `max_tracks` caps the satellite count, usually the smaller of
/// [`MAX_TRACKS`] and the catalog size.
pub fn prompt_mode<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    max_tracks: u32,
) -> anyhow::Result<Mode> {
    let choice = loop {
        let choice = read_number(
            input,
            output,
            "Enter 1 to plot Starlink locations \nEnter 2 to plot them with time \nEnter 3 to plot a random track(s)\nAnswer: ",
        )?;
        if (1..=3).contains(&choice) {
            break choice;
        }
        writeln!(output, "Please choose 1, 2 or 3.")?;
    };

    match choice {
        1 => Ok(Mode::Positions),
        2 => {
            let seconds = read_number(input, output, "For how long? (seconds): ")?;
            Ok(Mode::Animate { seconds })
        }
        _ => {
            let count = loop {
                let n = read_number(input, output, "For how many satellites? ")?;
                if n == 0 || n > max_tracks {
                    writeln!(output, "That many won't look too great.. try again! ")?;
                } else {
                    break n;
                }
            };
            let minutes = loop {
                let m = read_number(
                    input,
                    output,
                    "How many minutes would you like to predict(s) the track for? ",
                )?;
                if m == 0 {
                    writeln!(output, "A track needs at least one minute.")?;
                } else {
                    break m;
                }
            };
            Ok(Mode::Tracks { count, minutes })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(answers: &str) -> (anyhow::Result<Mode>, String) {
        prompt_capped(answers, MAX_TRACKS)
    }

    fn prompt_capped(answers: &str, max_tracks: u32) -> (anyhow::Result<Mode>, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let mode = prompt_mode(&mut input, &mut output, max_tracks);
        (mode, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["starlink-track"]).unwrap();
        assert!(cli.mode.is_none());
        assert_eq!(cli.source, STARLINK_TLE_URL);
        assert!(!cli.headless);
        assert_eq!(cli.run_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_tracks_mode() {
        let cli = Cli::try_parse_from([
            "starlink-track",
            "tracks",
            "-n",
            "3",
            "--minutes",
            "90",
            "--seed",
            "42",
            "--headless",
        ])
        .unwrap();
        assert_eq!(
            cli.mode.clone().map(Mode::from),
            Some(Mode::Tracks {
                count: 3,
                minutes: 90
            })
        );
        assert_eq!(cli.seed, Some(42));
        assert!(cli.headless);

        let defaults = Cli::try_parse_from(["starlink-track", "tracks"]).unwrap();
        assert_eq!(
            defaults.mode.map(Mode::from),
            Some(Mode::Tracks {
                count: 1,
                minutes: 60
            })
        );
    }

    #[test]
    fn test_cli_basemap_options() {
        let defaults = Cli::try_parse_from(["starlink-track", "positions"]).unwrap();
        assert_eq!(
            defaults.run_config().basemap.as_deref(),
            Some(DEFAULT_BASEMAP)
        );

        let custom =
            Cli::try_parse_from(["starlink-track", "positions", "--basemap", "maps/earth.jpg"])
                .unwrap();
        assert_eq!(custom.run_config().basemap.as_deref(), Some("maps/earth.jpg"));

        let plain = Cli::try_parse_from(["starlink-track", "--no-basemap", "tracks"]).unwrap();
        assert_eq!(plain.run_config().basemap, None);
    }

    #[test]
    fn test_cli_rejects_out_of_range_counts() {
        assert!(Cli::try_parse_from(["starlink-track", "tracks", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["starlink-track", "tracks", "-n", "501"]).is_err());
        assert!(Cli::try_parse_from(["starlink-track", "tracks", "--minutes", "0"]).is_err());
    }

    #[test]
    fn test_cli_animate_and_source() {
        let cli = Cli::try_parse_from([
            "starlink-track",
            "--source",
            "data/starlink.tle",
            "animate",
            "--seconds",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.source, "data/starlink.tle");
        assert_eq!(cli.mode.map(Mode::from), Some(Mode::Animate { seconds: 5 }));
    }

    #[test]
    fn test_prompt_positions() {
        let (mode, out) = prompt("1\n");
        assert_eq!(mode.unwrap(), Mode::Positions);
        assert!(out.contains("Enter 1 to plot Starlink locations"));
    }

    #[test]
    fn test_prompt_animation() {
        let (mode, _) = prompt("2\n15\n");
        assert_eq!(mode.unwrap(), Mode::Animate { seconds: 15 });
    }

    #[test]
    fn test_prompt_loops_until_count_is_valid() {
        let (mode, out) = prompt("3\n0\n900\nlots\n4\n45\n");
        assert_eq!(
            mode.unwrap(),
            Mode::Tracks {
                count: 4,
                minutes: 45
            }
        );
        assert_eq!(out.matches("That many won't look too great").count(), 2);
        assert!(out.contains("Please enter a whole number."));
    }

    #[test]
    fn test_prompt_count_capped_by_catalog() {
        let (mode, out) = prompt_capped("3\n8\n3\n10\n", 3);
        assert_eq!(
            mode.unwrap(),
            Mode::Tracks {
                count: 3,
                minutes: 10
            }
        );
        assert_eq!(out.matches("That many won't look too great").count(), 1);
    }

    #[test]
    fn test_prompt_rejects_unknown_choice_then_accepts() {
        let (mode, out) = prompt("7\n1\n");
        assert_eq!(mode.unwrap(), Mode::Positions);
        assert!(out.contains("Please choose 1, 2 or 3."));
    }

    #[test]
    fn test_prompt_fails_on_closed_input() {
        let (mode, _) = prompt("3\n");
        assert!(mode.is_err());
    }
}
