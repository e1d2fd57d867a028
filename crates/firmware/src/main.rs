//! Pushbutton Radio - desktop simulator entry point.
//!
//! Boots the radio against simulated hardware and turns keyboard lines into
//! button presses:
//!
//! | Line    | Effect                     |
//! |---------|----------------------------|
//! | `c`     | click (next station)       |
//! | `l`     | long click (previous)      |
//! | `d`     | double click (show current)|
//! | `v <n>` | set volume to n percent    |
//! | `s`     | stop playback              |
//! | `q`     | quit                       |
//!
//! ```bash
//! RUST_LOG=debug cargo run -p firmware --features emulator -- radio.json \
//!     --unreachable http://stream.srg-ssr.ch/m/rsc_de/mp3_128 --frames 2000
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use firmware::boot::{boot, BootResources, BufferPlan};
use firmware::config::RadioConfig;
use firmware::sim::{ScriptedPin, SimLink, SimSessionFactory, StdDelay};
use platform::{SystemClock, VolumePercent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Main loop period.
const LOOP_PERIOD: Duration = Duration::from_millis(5);

/// Memory the simulated board offers the audio pipeline.
const SIM_AVAILABLE_MEMORY: usize = 64 * 1024;

/// Association polls before the simulated access point accepts us.
const SIM_ASSOCIATION_POLLS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Click,
    LongClick,
    DoubleClick,
    Volume(u8),
    Stop,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "c" => Self::Click,
            "l" => Self::LongClick,
            "d" => Self::DoubleClick,
            "v" => Self::Volume(words.next()?.parse().ok()?),
            "s" => Self::Stop,
            "q" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Command line: `[config.json] [--unreachable URI]... [--frames N]`.
#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    unreachable: Vec<String>,
    frames: Option<u32>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--unreachable" => {
                    parsed
                        .unreachable
                        .push(args.next().context("--unreachable needs a URI")?);
                }
                "--frames" => {
                    let n = args.next().context("--frames needs a count")?;
                    parsed.frames = Some(n.parse().with_context(|| format!("bad frame count {n}"))?);
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                path => parsed.config = Some(path.to_owned()),
            }
        }
        Ok(parsed)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,playback=debug,firmware=debug")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => {
            RadioConfig::load(path).with_context(|| format!("loading configuration {path}"))?
        }
        None => RadioConfig::default(),
    };

    let mut factory = SimSessionFactory::preallocate(BufferPlan::DEFAULT)?;
    for uri in &args.unreachable {
        factory = factory.with_unreachable(uri);
    }
    if let Some(frames) = args.frames {
        factory = factory.with_frames_per_stream(frames);
    }

    let (pin, script) = ScriptedPin::new();
    let mut link = SimLink::new(SIM_ASSOCIATION_POLLS);
    let mut delay = StdDelay;
    let (mut app, _info) = boot(
        &config,
        BootResources {
            pin,
            factory,
            clock: SystemClock,
            link: &mut link,
            delay: &mut delay,
            available_memory: SIM_AVAILABLE_MEMORY,
        },
    )
    .context("boot failed")?;

    let (tx, mut rx) = mpsc::channel::<Command>(8);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match Command::parse(&line) {
                Some(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => tracing::warn!(%line, "unknown command (c, l, d, v <n>, s, q)"),
            }
        }
    });

    tracing::info!("ready: c = click, l = long click, d = double click, v <n>, s = stop, q = quit");
    let mut interval = tokio::time::interval(LOOP_PERIOD);
    loop {
        interval.tick().await;

        while let Ok(command) = rx.try_recv() {
            match command {
                Command::Click => script.click(),
                Command::LongClick => script.long_click(),
                Command::DoubleClick => script.double_click(),
                Command::Volume(percent) => {
                    app.supervisor_mut().set_volume(VolumePercent::new(percent));
                    tracing::info!(percent, "volume set");
                }
                Command::Stop => {
                    app.supervisor_mut().stop();
                    tracing::info!("playback stopped; click to resume");
                }
                Command::Quit => {
                    app.supervisor_mut().stop();
                    tracing::info!("bye");
                    return Ok(());
                }
            }
        }

        let iteration = app.run_iteration();
        if let Some(gesture) = iteration.gesture {
            tracing::debug!(?gesture, state = ?app.supervisor().state(), "gesture handled");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("c"), Some(Command::Click));
        assert_eq!(Command::parse("  l "), Some(Command::LongClick));
        assert_eq!(Command::parse("v 40"), Some(Command::Volume(40)));
        assert_eq!(Command::parse("v"), None);
        assert_eq!(Command::parse("x"), None);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse(
            ["radio.json", "--unreachable", "http://a", "--frames", "10"]
                .into_iter()
                .map(String::from),
        )
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("radio.json"));
        assert_eq!(args.unreachable, vec!["http://a".to_owned()]);
        assert_eq!(args.frames, Some(10));
        assert!(Args::parse(["--bogus".to_owned()].into_iter()).is_err());
    }
}
