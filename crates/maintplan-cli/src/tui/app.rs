//! TUI application state and the submission state machine.

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use maintplan_core::plan::OrganizedPlan;
use maintplan_core::structuring::StructuringError;

/// Shown when the user submits empty input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please paste the maintenance plan text.";

/// Shown for every structuring failure, whatever the cause.
pub const STRUCTURING_FAILED_MESSAGE: &str = "Failed to organize the plan. The AI model might be busy or the input format is unexpected. Please try again.";

/// Notes the input pane starts with when no file is given.
pub const SAMPLE_NOTES: &str = "*Manutenção Programada*
Data: 17/01
Horário: 8h
Serviços: Troca de forros do salão principal e sala B, retiradas das buchas e fechamento dos buracos e limpeza de filtros de ar condicionado.

*Planejamento*
Escada:
Andaime: 🟢
Aluguel do andaime: 🟢
Responsável aluguel andaime: Eduardo

*DC-85*
* Preparação: Jonatas
* Data de envio limite para o TM : 12/01
* Responsável da segurança: Jonatas

*Voluntários*
Ricardo, Jonatas, Jessica, Danilson, Larissa

*Documentos necessários para todos os voluntários*
* DC-82 (ter seu exemplar pessoal e seguir as orientações dele).

*Equipamentos de proteção individual (EPIs) obrigatórios*
1 Calçado de segurança com certificado de aprovação (CA), de acordo com a atividade;
2 Capacete;
3 Óculos de proteção;
4 Camiseta (sem lemas ou propagandas);
5 Calça comprida (jeans);
6 Colete refletivo ou camisa de alta visibilidade;
7 Protetor auricular
8 Luvas tricotada ou vaqueta";

/// What the result pane is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Loading,
    Success(OrganizedPlan),
    Failure(String),
}

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Result,
}

/// Outcome of [`App::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The caller must start exactly one structuring call for this text.
    Dispatched(String),
    /// Input was empty; the validation error is now showing.
    Rejected,
    /// A call is already in flight; nothing happened.
    Ignored,
}

/// Application state for the TUI.
pub struct App {
    pub input: String,
    pub state: ShellState,
    pub focus: Focus,
    /// Vertical scroll offset of the result pane.
    pub scroll: u16,
    /// When the plan currently shown was produced.
    pub organized_at: Option<DateTime<Local>>,
    pub tick_rate: Duration,
    pub should_quit: bool,
}

impl App {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            state: ShellState::Idle,
            focus: Focus::Input,
            scroll: 0,
            organized_at: None,
            tick_rate: Duration::from_millis(100),
            should_quit: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == ShellState::Loading
    }

    pub fn plan(&self) -> Option<&OrganizedPlan> {
        match &self.state {
            ShellState::Success(plan) => Some(plan),
            _ => None,
        }
    }

    // -- Submission --

    /// Request organization of the current input.
    pub fn submit(&mut self) -> Submission {
        if self.is_loading() {
            return Submission::Ignored;
        }
        if self.input.trim().is_empty() {
            self.state = ShellState::Failure(EMPTY_INPUT_MESSAGE.to_string());
            self.organized_at = None;
            return Submission::Rejected;
        }

        info!(input_len = self.input.len(), "organizing plan");
        self.state = ShellState::Loading;
        self.organized_at = None;
        self.scroll = 0;
        Submission::Dispatched(self.input.clone())
    }

    /// Record the result of the in-flight structuring call.
    pub fn complete(&mut self, result: Result<OrganizedPlan, StructuringError>) {
        if !self.is_loading() {
            warn!("structuring result arrived with no call in flight; dropping it");
            return;
        }
        match result {
            Ok(plan) => {
                self.state = ShellState::Success(plan);
                self.organized_at = Some(Local::now());
            }
            Err(e) => {
                warn!(kind = %e.kind(), "structuring failed");
                self.state = ShellState::Failure(STRUCTURING_FAILED_MESSAGE.to_string());
            }
        }
    }

    // -- Editing --

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Insert pasted text, normalizing line endings.
    pub fn insert_str(&mut self, text: &str) {
        self.input.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    // -- Navigation --

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Result,
            Focus::Result => Focus::Input,
        };
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    // -- Keys --

    /// Apply a key press. Returns the submission outcome when the key
    /// asked to organize.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<Submission> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => return Some(self.submit()),
            KeyCode::F(5) => return Some(self.submit()),
            KeyCode::Char('l') if ctrl => self.clear_input(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            _ => match self.focus {
                Focus::Input => self.on_input_key(key),
                Focus::Result => self.on_result_key(key),
            },
        }
        None
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c)
            }
            KeyCode::Enter => self.insert_char('\n'),
            KeyCode::Backspace => self.backspace(),
            _ => {}
        }
    }

    fn on_result_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use maintplan_core::structuring::{FailureKind, PlanStructurer};
    use maintplan_test_utils::{SAMPLE_PLAN_JSON, StubResponse, StubStructurer, sample_plan};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drive one submission through a stub the way the event loop does.
    async fn submit_with(app: &mut App, stub: &StubStructurer) -> Submission {
        let submission = app.submit();
        if let Submission::Dispatched(text) = &submission {
            let result = stub.structure(text).await;
            app.complete(result);
        }
        submission
    }

    #[test]
    fn starts_idle_with_given_input() {
        let app = App::new(SAMPLE_NOTES);
        assert_eq!(app.state, ShellState::Idle);
        assert_eq!(app.input, SAMPLE_NOTES);
        assert_eq!(app.focus, Focus::Input);
    }

    #[tokio::test]
    async fn empty_input_never_dispatches() {
        let stub = StubStructurer::with_body(SAMPLE_PLAN_JSON);
        for input in ["", "   ", "\n\t \n"] {
            let mut app = App::new(input);
            assert_eq!(submit_with(&mut app, &stub).await, Submission::Rejected);
            assert_eq!(app.state, ShellState::Failure(EMPTY_INPUT_MESSAGE.to_string()));
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn non_empty_input_dispatches_once_with_verbatim_text() {
        let stub = StubStructurer::with_body(SAMPLE_PLAN_JSON);
        let mut app = App::new(SAMPLE_NOTES);

        let submission = submit_with(&mut app, &stub).await;

        assert_eq!(submission, Submission::Dispatched(SAMPLE_NOTES.to_string()));
        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt.matches(SAMPLE_NOTES).count(), 1);
    }

    #[tokio::test]
    async fn success_stores_plan() {
        let stub = StubStructurer::with_body(SAMPLE_PLAN_JSON);
        let mut app = App::new(SAMPLE_NOTES);

        submit_with(&mut app, &stub).await;

        assert_eq!(app.plan(), Some(&sample_plan()));
        assert!(app.organized_at.is_some());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn failures_show_fixed_message() {
        for response in [
            StubResponse::Empty,
            StubResponse::Body("not json at all".to_string()),
            StubResponse::TransportFailure,
        ] {
            let stub = StubStructurer::new(response);
            let mut app = App::new(SAMPLE_NOTES);
            submit_with(&mut app, &stub).await;
            assert_eq!(
                app.state,
                ShellState::Failure(STRUCTURING_FAILED_MESSAGE.to_string())
            );
            assert_eq!(app.plan(), None);
        }
    }

    #[test]
    fn submit_clears_previous_plan_and_error() {
        let mut app = App::new(SAMPLE_NOTES);
        app.state = ShellState::Success(sample_plan());
        app.organized_at = Some(Local::now());
        app.scroll = 7;

        assert!(matches!(app.submit(), Submission::Dispatched(_)));
        assert_eq!(app.state, ShellState::Loading);
        assert_eq!(app.organized_at, None);
        assert_eq!(app.scroll, 0);

        app.complete(Err(StructuringError::new(FailureKind::Transport)));
        assert!(matches!(app.submit(), Submission::Dispatched(_)));
        assert_eq!(app.state, ShellState::Loading);
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let mut app = App::new(SAMPLE_NOTES);
        assert!(matches!(app.submit(), Submission::Dispatched(_)));

        assert_eq!(app.submit(), Submission::Ignored);
        assert_eq!(app.on_key(ctrl('s')), Some(Submission::Ignored));
        assert_eq!(app.on_key(key(KeyCode::F(5))), Some(Submission::Ignored));
        assert_eq!(app.state, ShellState::Loading);

        app.complete(Ok(sample_plan()));
        assert!(matches!(app.submit(), Submission::Dispatched(_)));
    }

    #[test]
    fn emptied_input_while_loading_is_still_ignored() {
        let mut app = App::new(SAMPLE_NOTES);
        app.submit();
        app.clear_input();
        assert_eq!(app.submit(), Submission::Ignored);
        assert_eq!(app.state, ShellState::Loading);
    }

    #[test]
    fn late_result_without_call_is_dropped() {
        let mut app = App::new(SAMPLE_NOTES);
        app.complete(Ok(sample_plan()));
        assert_eq!(app.state, ShellState::Idle);
    }

    #[test]
    fn typing_edits_input() {
        let mut app = App::new("");
        app.on_key(key(KeyCode::Char('O')));
        app.on_key(key(KeyCode::Char('k')));
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('x')));
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "Ok\n");

        app.on_key(ctrl('l'));
        assert_eq!(app.input, "");
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut app = App::new("");
        app.insert_str("Data: 17/01\r\nHorário: 8h\rfim");
        assert_eq!(app.input, "Data: 17/01\nHorário: 8h\nfim");
    }

    #[test]
    fn result_pane_keys_scroll_instead_of_typing() {
        let mut app = App::new("abc");
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Result);

        app.on_key(key(KeyCode::Char('j')));
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.scroll, 2);
        app.on_key(key(KeyCode::Char('k')));
        assert_eq!(app.scroll, 1);
        app.on_key(key(KeyCode::Up));
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.scroll, 0);
        assert_eq!(app.input, "abc");

        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn q_types_in_input_pane() {
        let mut app = App::new("");
        app.on_key(key(KeyCode::Char('q')));
        assert_eq!(app.input, "q");
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new("");
        app.on_key(ctrl('c'));
        assert!(app.should_quit);

        let mut app = App::new("");
        app.on_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
