//! Channel logs for the AURA|AIDEN bifurcated mesh
//!
//! Events emitted with one of the four channel targets land in that
//! channel's append-only file under `logs/`, one `[TAG][timestamp] message`
//! line each, in addition to whatever the fmt layers do with them.

use std::io::Write;
use std::path::PathBuf;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Debug, Clone, Copy)]
pub struct Channel {
    pub target: &'static str,
    pub tag: &'static str,
    pub file: &'static str,
}

pub const CHANNELS: [Channel; 4] = [
    Channel {
        target: "aura",
        tag: "AURA",
        file: "aura.log",
    },
    Channel {
        target: "aiden",
        tag: "AIDEN",
        file: "aiden.log",
    },
    Channel {
        target: "platform",
        tag: "PLATFORM",
        file: "platform.log",
    },
    Channel {
        target: "ccce",
        tag: "CCCE",
        file: "ccce.log",
    },
];

/// Routes channel-targeted events into per-channel log files.
pub struct ChannelLayer {
    logs_dir: PathBuf,
}

impl ChannelLayer {
    pub fn new(logs_dir: PathBuf) -> Self {
        Self { logs_dir }
    }
}

impl<S: Subscriber> Layer<S> for ChannelLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        let Some(channel) = CHANNELS.iter().find(|c| c.target == target) else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else {
            return;
        };

        let line = format!(
            "[{}][{}] {}\n",
            channel.tag,
            chrono::Utc::now().to_rfc3339(),
            message
        );
        let path = self.logs_dir.join(channel.file);
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}
