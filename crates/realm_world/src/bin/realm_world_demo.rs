use std::path::PathBuf;

use futures::executor::block_on;
use realm_world::{
    space_distance, ClaimPhase, InteractOutcome, MockClaimPort, RealmConfig, RealmSession,
    SeededRng, WorldPos,
};

const FRAME_DT_S: f64 = 1.0 / 60.0;
const MAX_FRAMES: usize = 60 * 60;
const DEMO_USER_KEY: &str = "demo-user-key";

#[derive(Debug, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    fail_message: Option<String>,
    json: bool,
}

fn print_usage() {
    println!("Usage: realm_world_demo [--config PATH] [--seed N] [--fail MESSAGE] [--json]");
    println!("  --config PATH    load settings from a TOML file instead of realm.toml/env");
    println!("  --seed N         override the world seed");
    println!("  --fail MESSAGE   make the first claim fail with a provider error message");
    println!("  --json           print the event journal as JSON lines");
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--seed" => {
                let raw = iter.next().ok_or("--seed requires a value")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed: {raw}"))?;
                options.seed = Some(seed);
            }
            "--fail" => {
                let message = iter.next().ok_or("--fail requires a message")?;
                options.fail_message = Some(message.clone());
            }
            "--json" => options.json = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(|s| s.as_str()), Some("--help") | Some("-h")) {
        print_usage();
        return;
    }
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    let loaded = match &options.config_path {
        Some(path) => RealmConfig::from_config_file(path),
        None => RealmConfig::from_default_sources(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config: {err}");
            std::process::exit(1);
        }
    };
    if let Some(seed) = options.seed {
        config.world.seed = seed;
    }
    let seed = config.world.seed;

    // Seeded rewards keep demo runs reproducible.
    let mut session = RealmSession::with_rng(config, SeededRng::new(seed ^ 0x5eed));
    if let Err(err) = session
        .connect_guest()
        .and_then(|_| session.onboard(DEMO_USER_KEY))
    {
        eprintln!("wallet setup failed: {err}");
        std::process::exit(1);
    }

    let origin = session.actor().position;
    let Some((chest_id, chest_pos)) = session
        .chests()
        .map(|chest| (chest.id.clone(), chest.position()))
        .min_by(|(_, a), (_, b)| {
            space_distance(origin, *a).total_cmp(&space_distance(origin, *b))
        })
    else {
        eprintln!("world has no chests");
        std::process::exit(1);
    };

    session.set_move_target(WorldPos::new(chest_pos.x, origin.y, chest_pos.z));
    let mut frames = 0;
    while session.actor().is_moving && frames < MAX_FRAMES {
        session.step(FRAME_DT_S);
        frames += 1;
    }

    let reward_amount = match session.interact(&chest_id) {
        Ok(InteractOutcome::Opened { reward_amount }) => reward_amount,
        Ok(InteractOutcome::AlreadyOpen) => {
            eprintln!("chest {chest_id} was already open");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("interaction failed: {err}");
            std::process::exit(1);
        }
    };

    let port = MockClaimPort::new();
    if let Some(message) = &options.fail_message {
        port.fail_next(message.clone());
    }
    let mut attempts = 1;
    if let Err(err) = block_on(session.claim(&chest_id, &port)) {
        println!("first_claim_error: {} ({:?})", err.user_message(), err.kind());
        if let Err(err) = session.retry(&chest_id) {
            eprintln!("retry failed: {err}");
            std::process::exit(1);
        }
        attempts += 1;
        if let Err(err) = block_on(session.claim(&chest_id, &port)) {
            eprintln!("claim failed again: {err}");
            std::process::exit(1);
        }
    }
    session.dismiss();

    let phase = session
        .claim_attempt(&chest_id)
        .map(|attempt| attempt.phase)
        .unwrap_or(ClaimPhase::Idle);

    println!("seed: {seed}");
    println!("frames: {frames}");
    println!("chest: {chest_id}");
    println!("reward: {reward_amount}");
    println!("claim: {}", phase.label());
    println!("attempts: {attempts}");
    println!("balance: {}", session.balance());
    for line in session.activity().lines() {
        println!("log: {}", line.message);
    }

    if options.json {
        for event in session.journal() {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(err) => eprintln!("failed to encode event {}: {err}", event.id),
            }
        }
    }
}
