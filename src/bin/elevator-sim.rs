use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elevator_sim::cli::{self, Command, FormatArg, RunArgs};
use elevator_sim::config;
use elevator_sim::dispatch::Dispatcher;
use elevator_sim::error::Result;
use elevator_sim::fleet::Fleet;
use elevator_sim::output::{self, Formatter, HumanFormatter, JsonFormatter};
use elevator_sim::simulation::{Simulation, TickReport};
use elevator_sim::source::{RandomRequestGenerator, RequestIds, RequestSource, RequestSubmitter};

const KEY_POLL: Duration = Duration::from_millis(100);

/// Set while the terminal is in raw mode; output then needs `\r\n`.
static RAW_MODE: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elevator_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(|| LogWriter))
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = cli::parse_args()?;
    match cli.command {
        Command::ShowConfig(args) => {
            let config = config::build_config(&args)?;
            print!("{}", output::describe_config(&config));
            Ok(())
        }
        Command::Run(args) => run_simulation(args).await,
    }
}

async fn run_simulation(args: RunArgs) -> Result<()> {
    let config = config::build_config(&args.config)?;
    let range = config.floor_range()?;
    let manual = args
        .requests
        .iter()
        .map(|entry| cli::parse_request_entry(entry))
        .collect::<Result<Vec<_>>>()?;

    let (tx, rx) = mpsc::unbounded_channel();
    let ids = RequestIds::default();
    let submitter = RequestSubmitter::new(tx, ids.clone(), range);
    for (source, destination) in manual {
        submitter.submit(source, destination)?;
    }

    let mut simulation = Simulation::new(
        Fleet::new(config.elevators_quantity, range),
        Dispatcher::new(),
        rx,
        Duration::from_millis(config.loop_interval_milliseconds),
    )?;
    let generator = if config.random_request_service.enabled {
        Some(RandomRequestGenerator::new(
            range,
            config.random_request_service.interval_milliseconds,
            config.seed,
            ids,
        )?)
    } else {
        None
    };

    let formatter = formatter_for(args.format);
    let print_report = |report: &TickReport| {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(terminal_text(&formatter.write(report)).as_bytes());
        let _ = stdout.flush();
    };

    if let Some(ticks) = args.ticks {
        let mut generator = generator;
        simulation.run_ticks(ticks, generator.as_mut(), print_report);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let source_task = generator.map(|generator| {
        let source = RequestSource::new(generator, submitter.clone());
        tokio::spawn(source.run(shutdown_rx.clone()))
    });

    let raw = RawTerminal::enable();
    let quit = raw.as_ref().map(|_| spawn_key_listener());
    tokio::spawn(async move {
        let key = async {
            if let Some(rx) = quit {
                if rx.await.is_ok() {
                    return;
                }
            }
            std::future::pending::<()>().await
        };
        tokio::select! {
            _ = key => info!("quit requested"),
            _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        }
        let _ = shutdown_tx.send(true);
    });

    if raw.is_some() {
        info!("press 'q' to stop");
    } else {
        info!("press Ctrl+C to stop");
    }
    simulation.run(shutdown_rx, print_report).await;
    drop(raw);

    if let Some(task) = source_task {
        if let Err(err) = task.await {
            warn!("request source task failed: {}", err);
        }
    }
    Ok(())
}

/// Raw-mode guard for the controlling terminal. Only taken when stdin is a
/// terminal; restores cooked mode on drop.
struct RawTerminal;

impl RawTerminal {
    fn enable() -> Option<Self> {
        if !io::stdin().is_tty() {
            return None;
        }
        match terminal::enable_raw_mode() {
            Ok(()) => {
                RAW_MODE.store(true, Ordering::Relaxed);
                Some(RawTerminal)
            }
            Err(err) => {
                warn!("could not enable raw terminal mode: {}", err);
                None
            }
        }
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        RAW_MODE.store(false, Ordering::Relaxed);
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("could not restore terminal mode: {}", err);
        }
    }
}

/// Polls terminal key events on a plain thread and fires once `q` is
/// pressed. Raw mode swallows SIGINT, so Ctrl+C is treated as a quit too.
/// The thread exits when the receiver goes away.
fn spawn_key_listener() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(KEY_POLL) {
                Ok(false) => {}
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_quit_key(&key) => {
                        let _ = tx.send(());
                        return;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!("failed to read terminal event: {}", err);
                        return;
                    }
                },
                Err(err) => {
                    warn!("failed to poll terminal events: {}", err);
                    return;
                }
            }
        }
    });
    rx
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn terminal_text(text: &str) -> Cow<'_, str> {
    if RAW_MODE.load(Ordering::Relaxed) {
        Cow::Owned(text.replace('\n', "\r\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Stderr sink for tracing that follows the terminal's line discipline.
struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        io::stderr().write_all(terminal_text(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

fn formatter_for(format: FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
