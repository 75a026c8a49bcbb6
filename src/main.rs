//! Marga - wavefront planner command line
//!
//! Loads an ASCII occupancy map, builds the configuration space, plans from
//! start to goal and prints the waypoints, carrot and first drive command.
//!
//! Usage:
//!   marga maps/two_rooms.txt --start 0.325,0.325 --goal 1.625,0.325
//!   marga maps/two_rooms.txt --start 0.325,0.325 --goal 1.625,0.325 --obstacle 0.975,0.525 --local

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;

use marga::io::load_ascii_map;
use marga::{DriveController, MargaConfig, Pose2D, Result, WavefrontPlanner, WorldPoint};

/// Wavefront navigation planner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ASCII map file ('.' free, '#' occupied, '?' unknown)
    map: PathBuf,

    /// Start position "x,y" in meters
    #[arg(long, value_parser = parse_point)]
    start: WorldPoint,

    /// Goal position "x,y" in meters
    #[arg(long, value_parser = parse_point)]
    goal: WorldPoint,

    /// Start heading in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    heading: f32,

    /// Goal heading in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    goal_heading: f32,

    /// Configuration file (defaults to marga.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map resolution in meters per cell
    #[arg(long, default_value_t = 0.05)]
    scale: f32,

    /// World position "x,y" of the map's lower-left corner
    #[arg(long, value_parser = parse_point, default_value = "0,0", allow_hyphen_values = true)]
    origin: WorldPoint,

    /// Dynamic obstacle "x,y" (repeatable)
    #[arg(long = "obstacle", value_parser = parse_point, allow_hyphen_values = true)]
    obstacles: Vec<WorldPoint>,

    /// Configuration-space cache file
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Also run a local plan around the start
    #[arg(long)]
    local: bool,
}

fn parse_point(s: &str) -> std::result::Result<WorldPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {:?}", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
    Ok(WorldPoint::new(x, y))
}

fn load_config(path: Option<&Path>) -> Result<MargaConfig> {
    match path {
        Some(p) => {
            info!("Loading configuration from {:?}", p);
            MargaConfig::load(p)
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            MargaConfig::load(Path::new("marga.toml"))
        }
        None => {
            info!("Using default configuration");
            Ok(MargaConfig::default())
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let grid = load_ascii_map(&args.map, args.scale, args.origin)?;
    let mut planner = WavefrontPlanner::new(config.planner.clone(), grid)?;

    match &args.cache {
        Some(path) => {
            planner.build_cspace_cached(path)?;
        }
        None => {
            planner.build_cspace();
        }
    }

    if !args.obstacles.is_empty() {
        let applied = planner.set_obstacles(&args.obstacles);
        info!("Applied {} dynamic obstacles", applied);
    }

    if let Err(e) = planner.plan_global(args.start, args.goal) {
        error!("Global planning failed: {}", e);
        return Ok(false);
    }
    info!("Global path: {} cells", planner.global_path().len());

    if args.local {
        match planner.plan_local(args.start, config.local.half_width) {
            Ok(_) => info!("Local path: {} cells", planner.local_path().len()),
            Err(e) => {
                error!("Local planning failed: {}", e);
                return Ok(false);
            }
        }
    }

    let count = planner.update_waypoints(args.start);
    println!("waypoints: {}", count);
    for (i, wp) in planner.waypoints().iter().enumerate() {
        println!("  {:>3}: ({:.3}, {:.3})", i, wp.x, wp.y);
    }

    match planner.get_carrot(args.start, config.drive.lookahead, config.drive.distance_weight) {
        Some(c) => println!("carrot: ({:.3}, {:.3}) cost {:.3}", c.point.x, c.point.y, c.cost),
        None => warn!("No carrot available"),
    }

    let mut drive = DriveController::new(config.drive.clone());
    let pose = Pose2D::new(args.start.x, args.start.y, args.heading);
    let goal = Pose2D::new(args.goal.x, args.goal.y, args.goal_heading);
    // One control period with no velocity history
    let (cmd, status) = drive.compute(&planner, pose, goal, 0.1);
    println!(
        "command: linear {:.3} m/s, angular {:.3} rad/s ({:?})",
        cmd.linear, cmd.angular, status
    );

    Ok(true)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "marga=info"
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    let args = Args::parse();
    info!("Marga v{}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
