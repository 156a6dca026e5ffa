//! `canary watch`: poll the selected device until interrupted.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use canary_config::Config;
use canary_core::Poller;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::read::{plain, reading_row, selected_accessory};

pub async fn handle(args: WatchArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    if args.interval == 0 {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let accessory = selected_accessory(cfg, global)?;
    let format = config::output_format(global, cfg);

    let poller = Poller::spawn(Arc::clone(accessory.resolver()), Duration::from_secs(args.interval));
    let mut rx = poller.subscribe();
    let mut seen = 0_u64;

    info!(serial = accessory.resolver().serial(), interval = args.interval, "watching");

    loop {
        let changed = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => changed,
        };
        if changed.is_err() {
            break;
        }
        let Some(snapshot) = rx.borrow_and_update().clone() else {
            continue;
        };

        let out = output::render_list(format, &snapshot.readings, reading_row, plain)?;
        if !global.quiet {
            eprintln!("-- {} --", snapshot.fetched_at.to_rfc3339());
        }
        output::print_output(&out, global.quiet);

        seen += 1;
        if args.count.is_some_and(|n| seen >= n) {
            break;
        }
    }

    poller.shutdown().await;
    Ok(())
}
