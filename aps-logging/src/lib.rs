use std::{
    env,
    io::{self, Write},
    path::Path,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/aps-handler.log";

// --- Writer that duplicates output to two sinks ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a>,
    B: MakeWriter<'a>,
{
    type Writer = Tee<A::Writer, B::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

/// Logging settings resolved from the handler's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub format: LogFormat,
    pub file_path: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Console,
            format: LogFormat::Json,
            file_path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl LogSettings {
    /// Read `APS_LOG_LEVEL`, `APS_LOG_OUTPUT`, `APS_LOG_FORMAT` and
    /// `APS_LOG_FILE`. Unrecognised values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let output = match lookup("APS_LOG_OUTPUT").as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            Some("off") | Some("none") => LogOutput::Off,
            _ => defaults.output,
        };
        // Handlers usually run where logs are shipped as JSON lines.
        let format = match lookup("APS_LOG_FORMAT").as_deref() {
            Some("human") | Some("pretty") => LogFormat::Human,
            _ => defaults.format,
        };

        Self {
            level: lookup("APS_LOG_LEVEL").unwrap_or(defaults.level),
            output,
            format,
            file_path: lookup("APS_LOG_FILE").unwrap_or(defaults.file_path),
        }
    }
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// The returned guard must be held for as long as file output should keep
/// flushing.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = registry().with(env_filter);
    let is_json = settings.format == LogFormat::Json;

    let log_path = Path::new(&settings.file_path);
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("/tmp"));
    let log_filename = log_path
        .file_name()
        .unwrap_or_else(|| "aps-handler.log".as_ref());

    let mut guard: Option<WorkerGuard> = None;

    match settings.output {
        LogOutput::Both => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            let tee_writer = MakeTee {
                make_a: io::stderr,
                make_b: non_blocking,
            };
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init().ok();
            } else {
                subscriber.with(fmt_layer.pretty()).try_init().ok();
            }
        }
        LogOutput::Console => {
            // stdout belongs to the progress event protocol.
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init().ok();
            } else {
                subscriber.with(fmt_layer.pretty()).try_init().ok();
            }
        }
        LogOutput::File => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init().ok();
            } else {
                subscriber.with(fmt_layer.pretty()).try_init().ok();
            }
        }
        LogOutput::Off => {
            subscriber.try_init().ok();
        }
    }

    guard
}
