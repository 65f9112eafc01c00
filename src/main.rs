use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use panel_common::{LogLevel, init_logging};
use rover_panel::{
    Command, Layout, Link, Overrides, RobotController, RoverConfig, SerialTransport, app,
    spawn_link,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rover", about = "Serial control panel for the rover")]
struct Cli {
    /// Serial device the rover is attached to
    #[arg(long, env = "ROVER_PORT")]
    port: Option<String>,

    /// Line speed in baud
    #[arg(long)]
    baud: Option<u32>,

    /// Read timeout for a reply line, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Delay before checking for a reply, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Panel variant to show
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// Font file with CJK glyphs for the bilingual captions
    #[arg(long)]
    font: Option<PathBuf>,

    /// Path to a TOML file with a [rover] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Send one command, print the panel and exit without a window
    #[arg(long, value_name = "COMMAND")]
    send: Option<Command>,

    /// Logging verbosity level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            baud: self.baud,
            timeout_ms: self.timeout_ms,
            settle_ms: self.settle_ms,
            layout: self.layout,
            font: self.font.clone(),
        }
    }
}

async fn send_once(mut link: Link, cmd: Command) -> anyhow::Result<()> {
    if !link.press(cmd) {
        anyhow::bail!("serial worker did not accept {cmd:?}");
    }
    let panel = link
        .next_panel()
        .await
        .context("serial worker stopped before answering")?;
    println!("{}", panel.status());
    if let Some(mood) = panel.mood_text() {
        println!("{mood}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    let cfg = RoverConfig::resolve(cli.config.as_deref(), cli.overrides())?;
    info!(port = %cfg.port, baud = cfg.baud, layout = ?cfg.layout, "starting");

    let transport = SerialTransport::open(&cfg.port, cfg.baud, cfg.timeout())
        .with_context(|| format!("is the rover plugged in at {}?", cfg.port))?;
    let controller = RobotController::new(transport, cfg.layout).with_settle(cfg.settle());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let link = spawn_link(runtime.handle(), controller);

    let result = match cli.send {
        Some(cmd) => runtime.block_on(send_once(link, cmd)),
        None => app::run(link, cfg.layout, cfg.font.as_deref()),
    };
    runtime.shutdown_timeout(Duration::from_secs(2));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["rover"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Info));
        assert!(cli.send.is_none());
        assert!(cli.layout.is_none());
    }

    #[test]
    fn send_takes_wire_text() {
        let cli = Cli::try_parse_from(["rover", "--send", "Get Distance", "--layout", "plain"])
            .unwrap();
        assert_eq!(cli.send, Some(Command::GetDistance));
        assert_eq!(cli.layout, Some(Layout::Plain));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["rover", "--send", "Dance"]).is_err());
    }
}
