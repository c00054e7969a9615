use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{FieldService, FieldSubmitter, SubmitError, bounded};
use crate::model::{DraftEditor, FieldCollection, FieldDraft, FieldResponse};

use super::action::{Action, AppMessage};
use super::error::AppError;
use super::screens::{
    EndUserFormState, FieldBuilderState, HelpState, draw_end_user_form, draw_field_builder,
    draw_help,
};
use super::widgets::{Notice, StatusBarContext, draw_status_bar};

/// How often expired notices are swept while idle.
const TICK: Duration = Duration::from_millis(250);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Author the field definition.
    FieldBuilder,
    /// Fill in the saved fields.
    EndUserForm,
    /// Show keybinding help.
    Help,
}

impl Screen {
    /// Human-readable label for titles and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::FieldBuilder => "Field Builder",
            Self::EndUserForm => "End User Form",
            Self::Help => "Help",
        }
    }
}

/// Top-level application state.
///
/// Network work runs in spawned tasks that report back through an internal
/// channel; everything else happens on the event loop.
pub struct App<S> {
    screen: Screen,
    editor: DraftEditor,
    builder: FieldBuilderState,
    end_user: EndUserFormState,
    help: HelpState,
    collection: FieldCollection,
    service: Arc<S>,
    submitter: FieldSubmitter<S>,
    timeout: Duration,
    fetch_generation: u64,
    submit_pending: bool,
    notice: Option<Notice>,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
    should_quit: bool,
}

impl<S: FieldService> App<S> {
    /// Creates an `App` on the [`Screen::FieldBuilder`] screen.
    ///
    /// `editor` should already carry its observers; `timeout` bounds every
    /// backend call.
    pub fn new(editor: DraftEditor, service: Arc<S>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            screen: Screen::FieldBuilder,
            editor,
            builder: FieldBuilderState::new(),
            end_user: EndUserFormState::new(),
            help: HelpState::new(),
            collection: FieldCollection::default(),
            submitter: FieldSubmitter::new(Arc::clone(&service), timeout),
            service,
            timeout,
            fetch_generation: 0,
            submit_pending: false,
            notice: None,
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Main event loop: draw, then wait for a key, a task result or a tick.
    ///
    /// Fetches the saved fields once before the first key is read.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        self.start_fetch();
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(message) = self.rx.recv() => self.handle_message(message),
                _ = tick.tick() => self.expire_notice(Instant::now()),
            }
        }
        Ok(())
    }

    /// Renders both panels side by side, or help over the whole area.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        if self.screen == Screen::Help {
            draw_help(&self.help, frame, main_area);
        } else {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .areas(main_area);
            draw_field_builder(
                &self.builder,
                &self.editor,
                self.screen == Screen::FieldBuilder,
                self.is_saving(),
                frame,
                left,
            );
            draw_end_user_form(
                &self.end_user,
                &self.collection,
                self.screen == Screen::EndUserForm,
                frame,
                right,
            );
        }

        let ctx = StatusBarContext {
            panel: self.screen.label(),
            notice: self.notice.clone(),
            saving: self.is_saving(),
            loading: self.collection.is_loading(),
        };
        draw_status_bar(&ctx, frame, status_area);
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('d') if self.screen == Screen::FieldBuilder => self.clear_draft(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::F(1) if self.screen != Screen::Help => {
                self.help.set_origin(self.screen);
                self.help.reset();
                self.screen = Screen::Help;
                return;
            }
            KeyCode::F(2) => {
                match self.screen {
                    Screen::FieldBuilder => self.screen = Screen::EndUserForm,
                    Screen::EndUserForm => self.screen = Screen::FieldBuilder,
                    Screen::Help => {}
                }
                return;
            }
            _ => {}
        }

        let action = match self.screen {
            Screen::FieldBuilder => {
                let saving = self.is_saving();
                self.builder.handle_key(key, &mut self.editor, saving)
            }
            Screen::EndUserForm => self.end_user.handle_key(key, self.collection.fields()),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => self.screen = screen,
            Action::SubmitField(draft) => self.start_submit(draft),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Applies the result of a finished background task.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::FieldsLoaded { generation, .. } if generation != self.fetch_generation => {
                debug!(generation, latest = self.fetch_generation, "stale fetch ignored");
            }
            AppMessage::FieldsLoaded {
                result: Ok(fields), ..
            } => {
                self.collection.replace(fields);
                self.end_user.sync(self.collection.fields());
            }
            AppMessage::FieldsLoaded { result: Err(e), .. } => {
                warn!(error = %e, "could not load fields");
                self.collection.fail_loading();
                self.notify(Notice::failure(
                    format!("Could not load fields: {e}"),
                    Instant::now(),
                ));
            }
            AppMessage::SubmitFinished(result) => {
                self.submit_pending = false;
                self.finish_submit(result);
            }
        }
    }

    fn finish_submit(&mut self, result: Result<FieldResponse, SubmitError>) {
        match result {
            Ok(created) => {
                let added = self.editor.absorb_submitted(&created);
                debug!(added, "catalog extended with saved choices");
                self.notify(Notice::success(
                    format!("Saved \"{}\" (id {})", created.field.label, created.id),
                    Instant::now(),
                ));
                self.start_fetch();
            }
            Err(SubmitError::Invalid(violations)) => self.builder.show_violations(violations),
            Err(SubmitError::InFlight) => debug!("submit ignored, another is outstanding"),
            Err(SubmitError::Api(e)) => {
                self.notify(Notice::failure(format!("Save failed: {e}"), Instant::now()));
            }
        }
    }

    /// Spawns a fetch of the saved fields.
    ///
    /// Only the most recent fetch may update the collection.
    fn start_fetch(&mut self) {
        self.fetch_generation += 1;
        self.collection.begin_loading();
        let generation = self.fetch_generation;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            let result = bounded(timeout, service.fetch_fields()).await;
            let _ = tx.send(AppMessage::FieldsLoaded { generation, result });
        });
    }

    /// Spawns a submit of `draft` unless one is already outstanding.
    fn start_submit(&mut self, draft: FieldDraft) {
        if self.is_saving() {
            return;
        }
        info!(label = %draft.label, "save requested");
        self.submit_pending = true;
        let submitter = self.submitter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = submitter.submit(&draft).await;
            let _ = tx.send(AppMessage::SubmitFinished(result));
        });
    }

    fn clear_draft(&mut self) {
        self.editor.clear();
        self.builder.reset();
        info!("draft cleared");
        self.notify(Notice::success("Draft cleared", Instant::now()));
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Drops the current notice once it has expired.
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// Returns `true` while a submit is outstanding.
    pub fn is_saving(&self) -> bool {
        self.submit_pending || self.submitter.is_saving()
    }

    /// Returns the active screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` once the user has asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the draft editor.
    pub fn editor(&self) -> &DraftEditor {
        &self.editor
    }

    /// Returns the saved fields from the latest fetch.
    pub fn collection(&self) -> &FieldCollection {
        &self.collection
    }

    /// Returns the notice shown in the status bar, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}
