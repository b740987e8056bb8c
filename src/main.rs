use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::error;
use xubit_receiver::cli::Cli;
use xubit_receiver::handler::SaveHandler;
use xubit_receiver::logging::{init_logging_with_config, LogConfig};
use xubit_receiver::runtime_config::{RuntimeConfig, ServiceConfig};
use xubit_receiver::server;
use xubit_receiver::storage::ResultStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging_with_config(&LogConfig::from_env())?;

    let runtime = RuntimeConfig::from_env()?;
    let config = ServiceConfig::new(&cli, &runtime);
    may::config().set_stack_size(config.stack_size);

    let handler = SaveHandler::new(ResultStore::new(&config.results_dir));
    let handle = server::start(&config, handler)
        .inspect_err(|e| error!(error = %e, bind = %config.bind_addr, "Listener failed to start"))
        .with_context(|| format!("failed to start listener on {}", config.bind_addr))?;

    handle
        .join()
        .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
}
