// Terminal monitor - Drives the polling controller from stdin and redraws on every change
use crate::application::map_renderer::MarkerRenderer;
use crate::application::polling_controller::{DashboardState, PollingController};
use crate::presentation::commands::{parse_command, Command, HELP};
use crate::presentation::terminal::render;
use chrono::Utc;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Monitor {
    controller: PollingController,
    renderer: MarkerRenderer,
    clear_screen: bool,
}

impl Monitor {
    pub fn new(controller: PollingController, renderer: MarkerRenderer, clear_screen: bool) -> Self {
        Self {
            controller,
            renderer,
            clear_screen,
        }
    }

    /// Run until `q`, or until `shutdown` resolves. Closing the input stream
    /// leaves the dashboard polling. Returns the last published state.
    pub async fn run<R, W, S>(mut self, input: R, output: &mut W, shutdown: S) -> anyhow::Result<DashboardState>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        S: Future<Output = ()>,
    {
        let mut updates = self.controller.subscribe();
        let mut lines = input.lines();
        let mut input_open = true;
        let mut synced_version = 0;
        tokio::pin!(shutdown);

        self.controller.mount();

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = updates.borrow_and_update().clone();
                    self.draw(&state, output)?;

                    if state.snapshot_version != synced_version {
                        if let Some(snapshot) = &state.snapshot {
                            match self.renderer.sync(&snapshot.geographic_hotspots).await {
                                Ok(_) => synced_version = state.snapshot_version,
                                Err(e) => tracing::error!(error = %e, "Map update failed"),
                            }
                        }
                    }
                }
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if self.handle(&line, output)? == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            tracing::debug!("Input closed, continuing without commands");
                            input_open = false;
                        }
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        self.controller.shutdown();
        Ok(self.controller.state())
    }

    fn draw<W: Write>(&self, state: &DashboardState, output: &mut W) -> std::io::Result<()> {
        if self.clear_screen {
            write!(output, "{}", CLEAR_SCREEN)?;
        }
        write!(output, "{}", render(state, Utc::now()))?;
        output.flush()
    }

    fn handle<W: Write>(&mut self, line: &str, output: &mut W) -> std::io::Result<Flow> {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(output, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::ToggleRealtime => {
                self.controller.toggle_realtime();
            }
            Command::Refresh => {
                self.controller.refresh_now();
            }
            Command::SetInterval(secs) => {
                if let Err(e) = self.controller.set_interval(secs) {
                    writeln!(output, "{}", e)?;
                }
            }
            Command::SetFilter { key, value } => {
                if let Err(e) = self.controller.set_filter(&key, &value) {
                    writeln!(output, "{}", e)?;
                }
            }
            Command::ClearFilter(key) => {
                if let Err(e) = self.controller.clear_filter(&key) {
                    writeln!(output, "{}", e)?;
                }
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
