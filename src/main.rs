// SPDX-License-Identifier: MPL-2.0
use tracing_subscriber::EnvFilter;
use wayfarer::app::{self, paths, Flags};

const DEFAULT_LOG_FILTER: &str = "wayfarer=info";

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();

    let lang = args.opt_value_from_str("--lang").unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring --lang");
        None
    });
    let config_dir: Option<String> = args.opt_value_from_str("--config-dir").unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring --config-dir");
        None
    });
    let backend = args.opt_value_from_str("--backend").unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring --backend");
        None
    });

    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unexpected arguments");
    }

    paths::init_cli_overrides(config_dir);

    app::run(Flags { lang, backend })
}
