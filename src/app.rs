//! App: terminal init, main loop, simulation ticks, mouse and key handling.

use crate::Args;
use crate::highscores;
use crate::input::{Action, PointerTracker, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, BoardLayout, Flash, View};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use swaptui::{PointerInput, SimEvent, Simulation};

/// Longest simulated step per frame, so a stall doesn't skip whole fall steps.
const MAX_TICK_SECS: f32 = 0.1;
/// How long move feedback stays in the sidebar.
const STATUS_MS: u64 = 1500;

pub struct App {
    args: Args,
    theme: Theme,
    sim: Simulation,
    paused: bool,
    pointer: PointerTracker,
    /// Board placement from the last frame; None until the first draw.
    layout: Option<BoardLayout>,
    flashes: Vec<Flash>,
    status: Option<(String, Instant)>,
    best_path: PathBuf,
    saved_best: u32,
    last_frame: Instant,
}

impl App {
    pub fn new(args: Args, theme: Theme) -> Result<Self> {
        let best_path = highscores::best_score_path();
        let stored = highscores::load_best_score(&best_path);
        let starting_best = if args.fresh_best { 0 } else { stored };
        let sim = Simulation::new(args.sim_config())
            .context("invalid board settings")?
            .with_best_score(starting_best);
        Ok(Self {
            args,
            theme,
            sim,
            paused: false,
            pointer: PointerTracker::new(),
            layout: None,
            flashes: Vec::new(),
            status: None,
            best_path,
            saved_best: stored,
            last_frame: Instant::now(),
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        let best = self.sim.best_score();
        self.sim = Simulation::new(self.args.sim_config())?.with_best_score(best);
        self.paused = false;
        self.pointer.reset();
        self.flashes.clear();
        self.status = None;
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        let saved = self.save_best();
        result.and(saved)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.args.frame_rate.max(1.0));
        self.last_frame = Instant::now();
        loop {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame);
            self.last_frame = now;

            if !self.paused {
                self.step(dt.as_secs_f32().min(MAX_TICK_SECS))?;
            }
            if self
                .status
                .as_ref()
                .is_some_and(|(_, at)| at.elapsed() >= Duration::from_millis(STATUS_MS))
            {
                self.status = None;
            }

            let delta_ms = if self.paused {
                0
            } else {
                dt.as_millis().min(u128::from(u32::MAX)) as u32
            };
            let mut layout = None;
            terminal.draw(|f| {
                let mut view = View {
                    theme: &self.theme,
                    paused: self.paused,
                    status: self.status.as_ref().map(|(s, _)| s.as_str()),
                    flashes: &mut self.flashes,
                    delta_ms,
                };
                layout = Some(ui::draw(f, &self.sim, &mut view));
            })?;
            self.layout = layout;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            match key_to_action(key) {
                                Action::Quit => return Ok(()),
                                Action::Pause => {
                                    self.paused = !self.paused;
                                    self.pointer.reset();
                                }
                                Action::Restart => self.reset_game()?,
                                Action::None => {}
                            }
                        }
                        Event::Mouse(mouse) => self.pointer.on_mouse(mouse),
                        Event::Resize(..) | Event::FocusLost => self.pointer.reset(),
                        _ => {}
                    }
                }
            }
        }
    }

    /// One simulation tick with the pointer state gathered since the last frame.
    fn step(&mut self, dt: f32) -> Result<()> {
        let sample = self.pointer.take();
        let position = match (sample.cell, self.layout) {
            (Some((column, row)), Some(layout)) => layout.to_grid(column, row),
            _ => None,
        };
        let input = PointerInput {
            position,
            pressed: sample.pressed,
            held: sample.held,
        };
        for event in self.sim.tick(dt, &input) {
            self.on_sim_event(event)?;
        }
        Ok(())
    }

    fn on_sim_event(&mut self, event: SimEvent) -> Result<()> {
        match event {
            SimEvent::TilesRemoved { tiles, combo_after } => {
                if !self.args.no_animation {
                    self.flashes.push(Flash::new(tiles));
                }
                if combo_after > 1 {
                    self.set_status(format!("Combo x{combo_after}!"));
                }
                if self.sim.best_score() > self.saved_best {
                    self.save_best()?;
                }
            }
            SimEvent::GoodMove => self.set_status("Nice swap!".to_string()),
            SimEvent::BadMove => self.set_status("No match".to_string()),
            SimEvent::FallStep | SimEvent::RowSpawned { .. } => {}
        }
        Ok(())
    }

    fn set_status(&mut self, text: String) {
        self.status = Some((text, Instant::now()));
    }

    fn save_best(&mut self) -> Result<()> {
        let best = self.sim.best_score();
        if best <= self.saved_best {
            return Ok(());
        }
        highscores::save_best_score(&self.best_path, best)?;
        self.saved_best = best;
        Ok(())
    }
}
