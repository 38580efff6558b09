//! Thin CLI shell over the updater backend. Replaceable presentation layer:
//! everything of substance lives in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use autopatch::{
    build_http_client, event_channel, GithubReleases, PipelineEvent, SystemGameHost,
    UpdateOrchestrator, UpdaterConfig, UpdaterError, UpdaterResult,
};

const USAGE: &str = "\
autopatch - automatic game patch installer

USAGE:
  autopatch --game-dir <PATH> [--config <PATH>] [--reinstall | --remove]

OPTIONS:
  --game-dir <PATH>   Game installation directory (required)
  --config <PATH>     Settings file (default: <os config dir>/autopatch/config.json)
  --reinstall         Remove installed modules first, then install fresh
  --remove            Remove installed modules and exit
  --help              Show this message
";

struct CliArgs {
    game_dir: PathBuf,
    config_path: Option<PathBuf>,
    reinstall: bool,
    remove: bool,
}

fn parse_args() -> UpdaterResult<Option<CliArgs>> {
    let mut game_dir = None;
    let mut config_path = None;
    let mut reinstall = false;
    let mut remove = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--game-dir" => {
                game_dir = args.next().map(PathBuf::from);
            }
            "--config" => {
                config_path = args.next().map(PathBuf::from);
            }
            "--reinstall" => reinstall = true,
            "--remove" => remove = true,
            "--help" | "-h" => {
                print!("{USAGE}");
                return Ok(None);
            }
            other => {
                return Err(UpdaterError::Other(format!("unknown argument: {other}")));
            }
        }
    }

    let Some(game_dir) = game_dir else {
        return Err(UpdaterError::Other(
            "--game-dir is required; see --help".to_string(),
        ));
    };

    Ok(Some(CliArgs {
        game_dir,
        config_path,
        reinstall,
        remove,
    }))
}

async fn run() -> UpdaterResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let config_path = args
        .config_path
        .unwrap_or_else(UpdaterConfig::default_path);
    let config = UpdaterConfig::load_or_default(&config_path);

    let client = build_http_client()?;
    let source = GithubReleases::new(client.clone(), config.releases_api_base.clone());
    let host = SystemGameHost::new(
        args.game_dir.clone(),
        config.game_executable.clone(),
        config.launch_command.clone(),
    );

    let (events, mut rx) = event_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                PipelineEvent::TaskStarted {
                    index,
                    total,
                    label,
                } => tracing::info!("[{}/{}] {}", index + 1, total, label),
                PipelineEvent::Progress(percent) => tracing::debug!("{percent}%"),
                PipelineEvent::TaskFinished { .. } => {}
                PipelineEvent::Finished => tracing::info!("Pipeline finished"),
                PipelineEvent::Aborted { message } => tracing::error!("Aborted: {message}"),
            }
        }
    });

    let orchestrator =
        UpdateOrchestrator::new(config, args.game_dir, source, host, client, events);

    let result = if args.remove {
        orchestrator.remove_installation().map(|_| ())
    } else {
        orchestrator.run_update(args.reinstall).await.map(|report| {
            tracing::info!(
                "Run complete: {} installed, {} skipped",
                report.installed.len(),
                report.skipped.len()
            );
        })
    };

    drop(orchestrator);
    let _ = printer.await;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,autopatch=debug")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
