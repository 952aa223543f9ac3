use crate::command::{Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal, Write};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

type Backend = CrosstermBackend<Box<dyn Write + Send>>;

/// Stream the terminal UI is drawn on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    /// Draw on stderr, leaving stdout free for piping a result.
    Stderr,
}

impl OutputTarget {
    fn writer(self) -> Box<dyn Write + Send> {
        match self {
            OutputTarget::Stdout => Box::new(io::stdout()),
            OutputTarget::Stderr => Box::new(io::stderr()),
        }
    }

    fn is_terminal(self) -> bool {
        match self {
            OutputTarget::Stdout => io::stdout().is_terminal(),
            OutputTarget::Stderr => io::stderr().is_terminal(),
        }
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// The output target is redirected; there is nothing to draw on.
    #[error("{0:?} is not attached to a terminal")]
    NotATerminal(OutputTarget),
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     title: Some("Pick a fruit".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Maximum redraws per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Draw on the alternate screen (default: true).
    pub alt_screen: bool,
    /// Report clicks and pointer motion (default: true). Select lists need
    /// motion events for hover highlighting.
    pub mouse_capture: bool,
    /// Report terminal focus gained/lost (default: false).
    pub focus_reporting: bool,
    pub title: Option<String>,
    /// Restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
    /// Stop on a Ctrl+C signal (default: true).
    pub handle_signals: bool,
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: true,
            focus_reporting: false,
            title: None,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::default(),
        }
    }
}

/// Terminal modes switched on for a program. Dropping the session switches
/// them off again, so early returns and errors leave a usable shell.
struct TerminalSession {
    alt_screen: bool,
    output: OutputTarget,
    active: bool,
}

impl TerminalSession {
    fn enter(options: &ProgramOptions) -> Result<(Self, Terminal<Backend>), ProgramError> {
        if !options.output.is_terminal() {
            return Err(ProgramError::NotATerminal(options.output));
        }
        if options.catch_panics {
            install_panic_hook(options.alt_screen, options.output);
        }

        enable_raw_mode()?;
        // From here on a failure must undo raw mode; the guard takes care of it.
        let session = Self {
            alt_screen: options.alt_screen,
            output: options.output,
            active: true,
        };

        let mut writer = options.output.writer();
        if options.alt_screen {
            execute!(writer, EnterAlternateScreen)?;
        }
        if options.mouse_capture {
            execute!(writer, EnableMouseCapture)?;
        }
        if options.focus_reporting {
            execute!(writer, EnableFocusChange)?;
        }
        if let Some(title) = &options.title {
            execute!(writer, SetTitle(title))?;
        }
        execute!(writer, cursor::Hide)?;

        let terminal = Terminal::new(CrosstermBackend::new(writer))?;
        Ok((session, terminal))
    }

    /// Switch the terminal back, reporting a failure to leave raw mode.
    fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore(self.alt_screen, self.output)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn install_panic_hook(alt_screen: bool, output: OutputTarget) {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore(alt_screen, output);
            previous(info);
        }));
    });
}

fn restore(alt_screen: bool, output: OutputTarget) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut writer = output.writer();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, DisableFocusChange).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

/// The program runtime. Owns the terminal, the message channel and the
/// active subscriptions, and drives the [`Model`] until it quits.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let app = Program::<FormApp>::new(())?.run().await?;
///     println!("{:?}", app.fruit.value());
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<Backend>,
    session: TerminalSession,
    inbox: mpsc::UnboundedReceiver<M::Message>,
    outbox: mpsc::UnboundedSender<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quit: bool,
}

impl<M: Model> Program<M> {
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Set up the terminal and initialize the model.
    ///
    /// Must be called from within a tokio runtime: the model's initial
    /// subscriptions are started here.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (session, terminal) = TerminalSession::enter(&options)?;
        let (outbox, inbox) = mpsc::unbounded_channel();
        let (model, init) = M::init(flags);

        let mut program = Self {
            model,
            terminal,
            session,
            inbox,
            subscriptions: SubscriptionManager::new(outbox.clone()),
            outbox,
            options,
            dirty: true,
            quit: false,
        };
        tracing::debug!(fps = program.options.fps, "program initialized");

        program.perform(init);
        program.subscriptions.reconcile(program.model.subscriptions());
        Ok(program)
    }

    /// Run until the model quits. Returns the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let outcome = self.event_loop().await;

        tracing::debug!("shutting down");
        self.subscriptions.shutdown();
        // Let the aborted listeners drop; the last one stops the terminal reader.
        tokio::task::yield_now().await;
        self.session.leave()?;

        outcome.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.draw()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let signals = self.options.handle_signals;

        while !self.quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if signals => {
                    tracing::debug!("received ctrl+c signal");
                    break;
                }

                Some(msg) = self.inbox.recv() => self.settle(msg),

                _ = frames.tick(), if self.dirty => {
                    self.draw()?;
                }
            }
        }
        Ok(())
    }

    /// Apply `first` and everything queued behind it, then bring the
    /// subscriptions in line with the resulting model once.
    fn settle(&mut self, first: M::Message) {
        let mut next = Some(first);
        while let Some(msg) = next.take() {
            let cmd = self.model.update(msg);
            self.perform(cmd);
            if self.quit {
                break;
            }
            next = self.inbox.try_recv().ok();
        }
        self.subscriptions.reconcile(self.model.subscriptions());
        self.dirty = true;
    }

    fn perform(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                // The receiver lives in `self`, so this cannot fail.
                let _ = self.outbox.send(msg);
            }
            CommandInner::Quit => {
                tracing::debug!("quit requested");
                self.quit = true;
            }
            CommandInner::Batch(cmds) => cmds.into_iter().for_each(|c| self.perform(c)),
        }
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        let model = &self.model;
        self.terminal.draw(|frame| model.view(frame))?;
        self.dirty = false;
        Ok(())
    }
}
