//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - CompanionClient for orchestration
//! - DisplayState for rendering
//!
//! Key presses are mapped to an [`Action`] synchronously (local form and
//! buffer edits happen here), then the action is performed against the
//! embedded companion and the resulting messages update the display.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use rand::seq::SliceRandom;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};

use companion_core::questionnaire::MOOD_MAX;
use companion_core::{
    CompanionConfig, CompanionMessage, GamePhase, GeminiBackend, LlmBackend, MoodRatings, View,
};

use crate::companion_client::CompanionClient;
use crate::display::{DisplayRole, DisplayState};
use crate::forms::{MoodForm, Who5Form};
use crate::theme::{
    message_style, notice_style, selected_style, status_style, COMPANION_TEAL, DIM_GRAY,
    ERROR_RED, SUCCESS_GREEN, USER_GREEN, WARNING_AMBER,
};
use crate::widgets::text_block::{StyledLine, TextBlock, TextBlockState};

/// Chat input box height (lines, including border)
const INPUT_HEIGHT: u16 = 3;

/// Lines moved per PgUp/PgDn
const PAGE_LINES: usize = 10;

/// Fallback goodbyes if the companion did not send one
const QUICK_GOODBYES: &[&str] = &[
    "Take care!",
    "Be gentle with yourself today.",
    "See you soon!",
    "One breath at a time.",
];

/// Something the user asked the companion to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the app
    Quit,
    /// Switch views
    OpenView(View),
    /// Send a chat message
    SendMessage(String),
    /// Submit the WHO-5 form
    SubmitWho5([u8; 5]),
    /// Save the mood form
    SaveMood(MoodRatings),
    /// Guess the current riddle
    Guess(String),
    /// Next riddle
    NextQuestion,
    /// Restart the game
    PlayAgain,
    /// Reload the history listing
    ReloadHistory,
}

/// Main application state
pub struct App<B: LlmBackend = GeminiBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Set while an action is in flight
    busy: bool,

    // === Companion Integration ===
    /// Client for the embedded companion
    client: CompanionClient<B>,
    /// Display state derived from companion messages
    display: DisplayState,

    // === Input State ===
    /// Chat input buffer
    input_buffer: String,
    /// Game guess buffer
    guess_buffer: String,
    /// WHO-5 form
    who5_form: Who5Form,
    /// Mood form
    mood_form: MoodForm,

    // === Scroll State ===
    chat_scroll: TextBlockState,
    history_scroll: TextBlockState,

    /// Last frame time (for notice expiry)
    last_frame: Instant,
}

impl App<GeminiBackend> {
    /// Create the app talking to Gemini
    pub fn new(config: CompanionConfig) -> Self {
        Self::with_client(CompanionClient::new(config))
    }
}

impl<B: LlmBackend + 'static> App<B> {
    /// Create the app around an existing client
    pub fn with_client(client: CompanionClient<B>) -> Self {
        Self {
            running: true,
            busy: false,
            client,
            display: DisplayState::new(),
            input_buffer: String::new(),
            guess_buffer: String::new(),
            who5_form: Who5Form::new(),
            mood_form: MoodForm::new(),
            chat_scroll: TextBlockState::default(),
            history_scroll: TextBlockState::default(),
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~10 FPS is plenty for notices and status
        let frame_duration = Duration::from_millis(100);
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;
        self.startup().await;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if let Some(action) = self.handle_key(key) {
                                self.busy = true;
                                self.render(terminal)?;
                                self.perform(action).await;
                                self.busy = false;
                            }
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                _ = tokio::time::sleep(frame_duration) => {}
            }

            self.process_companion_messages();
            self.update();
            self.render(terminal)?;

            if self.display.quit {
                self.running = false;
            }
        }

        Ok(())
    }

    /// Start the companion and connect this surface
    pub async fn startup(&mut self) {
        if let Err(e) = self.client.start().await {
            tracing::warn!("Companion start error: {}", e);
        }
        if let Err(e) = self.client.connect().await {
            tracing::warn!("Companion connect error: {}", e);
        }
        self.process_companion_messages();
    }

    /// Display state (for rendering and tests)
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply all pending companion messages
    pub fn process_companion_messages(&mut self) {
        for msg in self.client.recv_all() {
            match &msg {
                CompanionMessage::Message { .. } => self.chat_scroll.reset(),
                CompanionMessage::History { .. } => self.history_scroll.reset(),
                _ => {}
            }
            self.display.apply_message(msg);
        }
    }

    /// Map a key press to an action, applying local edits on the way
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let view = self.display.view;

        match key.code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Quit);
            }
            KeyCode::F(n @ 1..=6) => {
                return View::ALL
                    .get(usize::from(n) - 1)
                    .copied()
                    .map(Action::OpenView);
            }
            KeyCode::Tab => return Some(Action::OpenView(view.next())),
            KeyCode::BackTab => return Some(Action::OpenView(view.previous())),
            _ => {}
        }

        match view {
            View::Chat => self.handle_chat_key(key),
            View::Who5 => self.handle_who5_key(key),
            View::Mood => self.handle_mood_key(key),
            View::Helplines => None,
            View::History => self.handle_history_key(key),
            View::Game => self.handle_game_key(key),
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            // Blank input still goes through so the companion can warn about it
            KeyCode::Enter => Some(Action::SendMessage(std::mem::take(
                &mut self.input_buffer,
            ))),
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                None
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                None
            }
            KeyCode::PageUp => {
                self.chat_scroll.scroll_away(PAGE_LINES);
                None
            }
            KeyCode::PageDown => {
                self.chat_scroll.scroll_toward(PAGE_LINES);
                None
            }
            KeyCode::End => {
                self.chat_scroll.reset();
                None
            }
            _ => None,
        }
    }

    fn handle_who5_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = &mut self.who5_form;
        match key.code {
            KeyCode::Up => form.select_previous(),
            KeyCode::Down => form.select_next(),
            KeyCode::Left => form.decrement(),
            KeyCode::Right => form.increment(),
            KeyCode::Char(c) => {
                if form.set_digit(c) {
                    form.select_next();
                }
            }
            KeyCode::Enter => return Some(Action::SubmitWho5(form.answers())),
            _ => {}
        }
        None
    }

    fn handle_mood_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = &mut self.mood_form;
        match key.code {
            KeyCode::Up => form.select_previous(),
            KeyCode::Down => form.select_next(),
            KeyCode::Left => form.decrement(),
            KeyCode::Right => form.increment(),
            KeyCode::Char(c) => {
                if form.set_digit(c) {
                    form.select_next();
                }
            }
            KeyCode::Enter => return Some(Action::SaveMood(form.ratings())),
            _ => {}
        }
        None
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') => return Some(Action::ReloadHistory),
            KeyCode::PageDown => self.history_scroll.scroll_away(PAGE_LINES),
            KeyCode::PageUp => self.history_scroll.scroll_toward(PAGE_LINES),
            KeyCode::Down => self.history_scroll.scroll_away(1),
            KeyCode::Up => self.history_scroll.scroll_toward(1),
            _ => {}
        }
        None
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> Option<Action> {
        let answered = matches!(
            self.display.game.as_ref().map(|g| &g.phase),
            Some(GamePhase::Result { .. })
        );

        if answered {
            return match key.code {
                KeyCode::Char('n') => Some(Action::NextQuestion),
                KeyCode::Char('p') => Some(Action::PlayAgain),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter => Some(Action::Guess(std::mem::take(&mut self.guess_buffer))),
            KeyCode::Char(c) => {
                self.guess_buffer.push(c);
                None
            }
            KeyCode::Backspace => {
                self.guess_buffer.pop();
                None
            }
            _ => None,
        }
    }

    /// Perform an action against the companion
    pub async fn perform(&mut self, action: Action) {
        let result = match action {
            Action::Quit => {
                let result = self.client.request_quit().await;
                self.running = false;
                result
            }
            Action::OpenView(view) => self.client.open_view(view).await,
            Action::SendMessage(content) => self.client.send_message(content).await,
            Action::SubmitWho5(answers) => self.client.submit_who5(answers).await,
            Action::SaveMood(ratings) => self.client.save_mood(ratings).await,
            Action::Guess(guess) => self.client.guess(guess).await,
            Action::NextQuestion => self.client.next_question().await,
            Action::PlayAgain => self.client.play_again().await,
            Action::ReloadHistory => self.client.request_history().await,
        };

        if let Err(e) = result {
            tracing::warn!("Companion error: {}", e);
        }
        self.process_companion_messages();
    }

    /// Update timers
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.display.update(delta);
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let [tabs, body, notice, status] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_tabs(frame, tabs);

        match self.display.view {
            View::Chat => self.draw_chat(frame, body),
            View::Who5 => self.draw_who5(frame, body),
            View::Mood => self.draw_mood(frame, body),
            View::Helplines => self.draw_helplines(frame, body),
            View::History => self.draw_history(frame, body),
            View::Game => self.draw_game(frame, body),
        }

        self.draw_notice(frame, notice);
        self.draw_status(frame, status);
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles = View::ALL
            .iter()
            .map(|v| format!("F{} {}", v.index() + 1, v.title()));
        let tabs = Tabs::new(titles)
            .select(self.display.view.index())
            .style(Style::default().fg(DIM_GRAY))
            .highlight_style(selected_style())
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(tabs, area);
    }

    /// Reserve space above `area` for the helplines alert, if any
    fn split_for_alert(&self, frame: &mut Frame, area: Rect) -> Rect {
        if !self.display.helplines_alert || self.display.helplines.is_empty() {
            return area;
        }

        let lines: Vec<Line> = self
            .display
            .helplines
            .iter()
            .map(|h| Line::from(format!("{}: {} ({})", h.name, h.number, h.note)))
            .collect();
        // one row per helpline plus borders
        let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
        let [alert, rest] =
            Layout::vertical([Constraint::Length(height), Constraint::Min(1)]).areas(area);

        let panel = Paragraph::new(lines).style(Style::default().fg(ERROR_RED)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Please reach out - helplines"),
        );
        frame.render_widget(panel, alert);
        rest
    }

    fn draw_chat(&mut self, frame: &mut Frame, area: Rect) {
        let area = self.split_for_alert(frame, area);
        let [transcript, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)]).areas(area);

        let mut lines: Vec<StyledLine> = Vec::new();
        for msg in &self.display.messages {
            let style = message_style(msg.role, &msg.content_type);
            for (i, text) in msg.content.lines().enumerate() {
                let text = if i == 0 {
                    format!("{}{}", msg.role.prefix(), text)
                } else {
                    text.to_string()
                };
                lines.push((text, style));
            }
            lines.push((String::new(), Style::default()));
        }

        frame.render_stateful_widget(
            TextBlock::new(&lines).follow_tail(),
            transcript,
            &mut self.chat_scroll,
        );

        let prompt = Paragraph::new(format!("{}{}_", DisplayRole::User.prefix(), self.input_buffer))
            .style(Style::default().fg(USER_GREEN))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(prompt, input);
    }

    fn draw_who5(&self, frame: &mut Frame, area: Rect) {
        let area = self.split_for_alert(frame, area);

        let mut lines = vec![
            Line::from("Rate each statement from 0 (at no time) to 5 (all of the time)."),
            Line::from(""),
        ];
        for (i, (question, value)) in self.who5_form.rows().enumerate() {
            let style = if i == self.who5_form.selected() {
                selected_style()
            } else {
                Style::default()
            };
            lines.push(Line::styled(format!("[{value}] {}. {question}", i + 1), style));
        }
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "Up/Down select  Left/Right or 0-5 set  Enter submit",
            Style::default().fg(DIM_GRAY),
        ));

        if let Some(result) = &self.display.who5 {
            let color = if result.score.is_low() {
                WARNING_AMBER
            } else {
                SUCCESS_GREEN
            };
            lines.push(Line::from(""));
            lines.push(Line::styled(
                result.score.summary(),
                Style::default().fg(color),
            ));
            if !result.saved {
                lines.push(Line::styled(
                    "This entry could not be saved.",
                    Style::default().fg(WARNING_AMBER),
                ));
            }
        }

        let form = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("WHO-5 Wellbeing"));
        frame.render_widget(form, area);
    }

    fn draw_mood(&self, frame: &mut Frame, area: Rect) {
        let [form_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);

        let mut lines = vec![Line::from("How are you today? (1-5)"), Line::from("")];
        for (i, (name, value)) in self.mood_form.rows().enumerate() {
            let style = if i == self.mood_form.selected() {
                selected_style()
            } else {
                Style::default()
            };
            let bar = "#".repeat(usize::from(value));
            lines.push(Line::styled(format!("{name:<10} {value} {bar}"), style));
        }
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "Up/Down select  Left/Right or 1-5 set  Enter save",
            Style::default().fg(DIM_GRAY),
        ));

        let form = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Mood Tracker"));
        frame.render_widget(form, form_area);

        match &self.display.mood {
            Some(mood) => {
                let data: Vec<(&str, u64)> = mood
                    .ratings
                    .iter()
                    .map(|(name, value)| (name, u64::from(value)))
                    .collect();
                let chart = BarChart::default()
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("Saved {}", mood.timestamp)),
                    )
                    .data(data.as_slice())
                    .max(u64::from(MOOD_MAX))
                    .bar_width(9)
                    .bar_gap(2)
                    .bar_style(Style::default().fg(COMPANION_TEAL));
                frame.render_widget(chart, chart_area);
            }
            None => {
                let hint = Paragraph::new("Save a mood entry to see it charted here.")
                    .style(Style::default().fg(DIM_GRAY))
                    .block(Block::default().borders(Borders::ALL).title("Today"));
                frame.render_widget(hint, chart_area);
            }
        }
    }

    fn draw_helplines(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::styled(
            "If you are in danger, call local emergency services right away.",
            Style::default().fg(ERROR_RED),
        )];
        lines.push(Line::from(""));
        for helpline in &self.display.helplines {
            lines.push(Line::from(vec![
                Span::styled(helpline.name.clone(), selected_style()),
                Span::raw(format!("  {}", helpline.number)),
            ]));
            lines.push(Line::styled(
                format!("  {}", helpline.note),
                Style::default().fg(DIM_GRAY),
            ));
        }
        if !self.display.tips.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::styled("Quick tips", selected_style()));
            for tip in &self.display.tips {
                lines.push(Line::from(format!("- {tip}")));
            }
        }

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Helplines & Tips"));
        frame.render_widget(panel, area);
    }

    fn draw_history(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("History (newest first)  r reload  PgUp/PgDn scroll");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<StyledLine> = if self.display.history.is_empty() {
            let text = if self.display.history_loaded {
                "No entries yet. Try the WHO-5 or Mood Tracker."
            } else {
                "Loading..."
            };
            vec![(text.to_string(), Style::default().fg(DIM_GRAY))]
        } else {
            self.display
                .history
                .iter()
                .map(|entry| (entry.summary(), Style::default()))
                .collect()
        };

        frame.render_stateful_widget(TextBlock::new(&lines), inner, &mut self.history_scroll);
    }

    fn draw_game(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Guess the Word");

        let Some(game) = &self.display.game else {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        };

        let mut lines = vec![
            Line::styled(
                format!("Question {} of {}", game.question_number, game.total),
                Style::default().fg(DIM_GRAY),
            ),
            Line::from(""),
            Line::from(game.prompt.clone()),
            Line::from(""),
        ];

        match &game.phase {
            GamePhase::Awaiting => {
                lines.push(Line::styled(
                    format!("Your guess: {}_", self.guess_buffer),
                    Style::default().fg(USER_GREEN),
                ));
                lines.push(Line::from(""));
                lines.push(Line::styled("Enter submit", Style::default().fg(DIM_GRAY)));
            }
            GamePhase::Result { correct, answer } => {
                if *correct {
                    lines.push(Line::styled(
                        "Correct! ✅",
                        Style::default().fg(SUCCESS_GREEN),
                    ));
                } else {
                    lines.push(Line::styled(
                        format!("Wrong! The correct answer is: {answer}"),
                        Style::default().fg(WARNING_AMBER),
                    ));
                }
                lines.push(Line::from(""));
                let hint = if game.can_play_again {
                    "That was the last question. p play again"
                } else {
                    "n next question"
                };
                lines.push(Line::styled(hint, Style::default().fg(DIM_GRAY)));
            }
        }

        let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
        frame.render_widget(panel, area);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect) {
        if let Some(notice) = self.display.latest_notice() {
            let line = Paragraph::new(format!(" {}", notice.text())).style(notice_style(notice.level));
            frame.render_widget(line, area);
        }
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let state = if self.busy && !self.display.quit {
            "Working..."
        } else {
            self.display.state.description()
        };

        let assistant = match &self.display.session {
            Some(s) if s.assistant_available => format!("{} online", s.model),
            Some(_) => "assistant offline (fallback replies)".to_string(),
            None => String::new(),
        };

        let status = format!(" {state} | {assistant} | Tab/F1-F6 views | Esc to quit");
        frame.render_widget(
            Paragraph::new(status).style(status_style(self.display.state)),
            area,
        );
    }

    /// Goodbye message for display after the TUI closes
    pub fn goodbye(&self) -> String {
        self.display.goodbye.clone().unwrap_or_else(|| {
            QUICK_GOODBYES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("Take care!")
                .to_string()
        })
    }
}
