//! domain_scene: interactive entry point.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, LevelFilter};

use domain_scene::app::{run, AppConfig, SourceKind};
use domain_scene::{SceneConfig, SceneError};
use technique_field::ALL_TECHNIQUES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    /// Keyboard-selected synthetic poses
    Sim,
    /// JSON-lines detections on standard input
    Stdin,
    /// LeapMotion controller (needs the `leap` feature)
    Leap,
}

#[derive(Parser, Debug)]
#[command(name = "domain_scene", version, about = "Hand-gesture driven particle scene")]
struct Cli {
    /// JSON file overriding scene and threshold defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where hand landmarks come from
    #[arg(short, long, value_enum, default_value_t = SourceArg::Sim)]
    source: SourceArg,

    /// Spawn a detector process and read JSON lines from its stdout
    #[arg(long, value_name = "CMD", num_args = 1.., allow_hyphen_values = true, conflicts_with = "source")]
    detector: Vec<String>,

    /// Override the particle count
    #[arg(short, long)]
    particles: Option<usize>,

    /// Print the gesture guide and exit
    #[arg(long)]
    guide: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (_, 0)    => LevelFilter::Warn,
            (_, 1)    => LevelFilter::Info,
            (_, 2)    => LevelFilter::Debug,
            _         => LevelFilter::Trace,
        }
    }

    fn app_config(&self) -> Result<AppConfig, SceneError> {
        let mut scene = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None       => SceneConfig::default(),
        };
        if let Some(n) = self.particles {
            scene.particle_count = n;
        }
        let source = if !self.detector.is_empty() {
            SourceKind::Detector(self.detector.clone())
        } else {
            match self.source {
                SourceArg::Sim   => SourceKind::Sim,
                SourceArg::Stdin => SourceKind::Stdin,
                SourceArg::Leap  => SourceKind::Leap,
            }
        };
        Ok(AppConfig { scene, source })
    }
}

fn print_guide() {
    println!();
    println!("  Gesture guide");
    println!("  ─────────────");
    for t in ALL_TECHNIQUES {
        let d = t.descriptor();
        println!("  {:<48} {:<28} {}", d.name, t.gesture_hint(), d.accent_hex());
    }
    println!();
}

fn main() {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet || cli.verbose > 0 {
        logger.filter_level(cli.log_level());
    }
    logger.init();

    if cli.guide {
        print_guide();
        return;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Domain Scene · Hand-Gesture Particle Techniques       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Leap support: enabled");
    #[cfg(not(feature = "leap"))]
    println!("  Leap support: disabled  (use --features leap for hardware)");
    println!("  Opening preview window…");
    println!();

    let result = cli.app_config().and_then(run);
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
