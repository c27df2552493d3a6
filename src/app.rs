use chrono::Utc;
use color_eyre::Result;
use ratatui::{
    crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::{JugaadError, ValidationErrors};
use crate::event::{AppEvent, Event, EventHandler};
use crate::modules::chat::{ChatReply, ChatService, ChatSession, QuestContext};
use crate::modules::marketplace::{parse_amount, Marketplace};
use crate::modules::notification::NotificationKind;
use crate::modules::quest::QuestForm;
use crate::modules::user::User;
use crate::util::database::Database;
use crate::{log_error, log_info};

const TOAST_TTL: Duration = Duration::from_secs(3);
const OTP_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Post,
    Find,
    Dashboard,
    Leaderboard,
}

impl Tab {
    pub fn all() -> [Tab; 4] {
        [Tab::Post, Tab::Find, Tab::Dashboard, Tab::Leaderboard]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Post => "Post Quest",
            Tab::Find => "Find Quests",
            Tab::Dashboard => "Dashboard",
            Tab::Leaderboard => "Leaderboard",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::all()[(self.index() + 1) % 4]
    }

    fn prev(self) -> Self {
        Self::all()[(self.index() + 3) % 4]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Name,
    Email,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
    pub field: LoginField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostField {
    #[default]
    Title,
    Description,
    Deadline,
    Reward,
    Urgency,
    Location,
}

impl PostField {
    pub fn all() -> [PostField; 6] {
        [
            PostField::Title,
            PostField::Description,
            PostField::Deadline,
            PostField::Reward,
            PostField::Urgency,
            PostField::Location,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            PostField::Title => "Task Name",
            PostField::Description => "Details",
            PostField::Deadline => "Deadline (YYYY-MM-DD HH:MM)",
            PostField::Reward => "Bounty (₹)",
            PostField::Urgency => "Urgency",
            PostField::Location => "Location (optional)",
        }
    }

    /// Key used by form validation for this field.
    pub fn error_key(&self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Description => "description",
            PostField::Deadline => "deadline",
            PostField::Reward => "reward",
            PostField::Urgency => "urgency",
            PostField::Location => "location",
        }
    }

    fn position(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::all()[(self.position() + 1) % 6]
    }

    fn prev(self) -> Self {
        Self::all()[(self.position() + 5) % 6]
    }
}

#[derive(Debug, Default)]
pub struct PostFormState {
    pub form: QuestForm,
    pub field: PostField,
    pub editing: bool,
    pub errors: ValidationErrors,
}

impl PostFormState {
    pub fn value(&self, field: PostField) -> &str {
        match field {
            PostField::Title => &self.form.title,
            PostField::Description => &self.form.description,
            PostField::Deadline => &self.form.deadline,
            PostField::Reward => &self.form.reward,
            PostField::Urgency => self.form.urgency.as_str(),
            PostField::Location => &self.form.location,
        }
    }

    fn input_mut(&mut self) -> Option<&mut String> {
        match self.field {
            PostField::Title => Some(&mut self.form.title),
            PostField::Description => Some(&mut self.form.description),
            PostField::Deadline => Some(&mut self.form.deadline),
            PostField::Reward => Some(&mut self.form.reward),
            PostField::Urgency => None,
            PostField::Location => Some(&mut self.form.location),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAction {
    Deposit,
    Withdraw,
}

impl WalletAction {
    fn toggle(self) -> Self {
        match self {
            WalletAction::Deposit => WalletAction::Withdraw,
            WalletAction::Withdraw => WalletAction::Deposit,
        }
    }
}

#[derive(Debug)]
pub enum Overlay {
    Wallet { action: WalletAction, amount: String },
    Notifications,
    Verify { code: String },
    Chat { chat: ChatSession, input: String },
}

#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
    shown_at: Instant,
}

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    pub config: AppConfig,
    pub database: Database,
    pub chat_service: ChatService,
    /// `None` until someone logs in.
    pub marketplace: Option<Marketplace>,
    pub login: LoginForm,
    pub tab: Tab,
    pub overlay: Option<Overlay>,
    pub post: PostFormState,
    pub find_selected: usize,
    pub toast: Option<Toast>,
    /// Event handler.
    pub events: EventHandler,
}

impl App {
    /// Opens storage and resumes the last logged-in user, if any.
    pub fn new(config: AppConfig) -> Result<Self> {
        let database = Database::new(&config.db_path)?;
        let marketplace = Marketplace::restore(database.clone(), config.starting_balance, Utc::now())?;
        let chat_service = ChatService::new(&config.chat);

        let mut app = Self {
            running: true,
            database,
            chat_service,
            marketplace,
            login: LoginForm::default(),
            tab: Tab::Post,
            overlay: None,
            post: PostFormState::default(),
            find_selected: 0,
            toast: None,
            events: EventHandler::new(),
            config,
        };

        // The chat panel reopens if it was open when the app last closed
        let chat_was_open = app
            .marketplace
            .as_ref()
            .is_some_and(|m| m.session().is_chat_open());
        if chat_was_open {
            app.open_chat();
        }

        Ok(app)
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                needs_redraw = false;
            }

            match self.events.next().await? {
                Event::Tick => needs_redraw = self.tick(),
                Event::Crossterm(event) => match event {
                    CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        self.handle_key_events(key_event);
                        needs_redraw = true;
                    }
                    CrosstermEvent::Resize(_, _) => needs_redraw = true,
                    _ => {}
                },
                Event::App(app_event) => {
                    match app_event {
                        AppEvent::Quit => self.quit(),
                        AppEvent::ChatReply(reply) => self.receive_chat_reply(reply),
                    }
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Expires toasts. Returns whether anything on screen changed.
    pub fn tick(&mut self) -> bool {
        let toast_expired = self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL);
        if toast_expired {
            self.toast = None;
        }

        // The countdown ticks every second while a quest is held
        let engaged = self
            .marketplace
            .as_ref()
            .is_some_and(|m| m.session().is_engaged());

        toast_expired || engaged
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.marketplace.is_none() {
            self.handle_login_key(key_event);
        } else if let Some(overlay) = self.overlay.take() {
            self.handle_overlay_key(overlay, key_event);
        } else if self.tab == Tab::Post && self.post.editing {
            self.handle_post_edit_key(key_event);
        } else {
            self.handle_main_key(key_event);
        }
    }

    fn handle_login_key(&mut self, key_event: KeyEvent) {
        let input = match self.login.field {
            LoginField::Name => &mut self.login.name,
            LoginField::Email => &mut self.login.email,
        };

        match key_event.code {
            KeyCode::Esc => self.events.send(AppEvent::Quit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.field = match self.login.field {
                    LoginField::Name => LoginField::Email,
                    LoginField::Email => LoginField::Name,
                };
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => input.push(ch),
            KeyCode::Enter => self.submit_login(),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let name = self.login.name.trim();
        let email = self.login.email.trim();
        let user = if name.is_empty() && email.is_empty() {
            User::guest()
        } else {
            User::login(name, email)
        };

        match Marketplace::login(self.database.clone(), user, self.config.starting_balance, Utc::now()) {
            Ok(marketplace) => {
                let greeting = format!("Welcome, {}!", marketplace.user().name);
                self.marketplace = Some(marketplace);
                self.login = LoginForm::default();
                self.show_toast(greeting, NotificationKind::Success);
            }
            Err(e) => {
                log_error!("Login failed: {}", e);
                self.show_toast(format!("Login failed: {}", e), NotificationKind::Warning);
            }
        }
    }

    fn handle_main_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => self.events.send(AppEvent::Quit),
            KeyCode::Char(ch @ '1'..='4') => {
                self.tab = Tab::all()[(ch as usize) - ('1' as usize)];
            }
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char('w') => {
                self.overlay = Some(Overlay::Wallet {
                    action: WalletAction::Deposit,
                    amount: String::new(),
                });
            }
            KeyCode::Char('n') => self.overlay = Some(Overlay::Notifications),
            KeyCode::Char('v') => {
                if self.is_engaged() {
                    self.overlay = Some(Overlay::Verify { code: String::new() });
                } else {
                    self.show_toast("No active quest to verify", NotificationKind::Warning);
                }
            }
            KeyCode::Char('c') => self.open_chat(),
            KeyCode::Char('x') => self.dismiss_active_quest(),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('r') => self.reload_quests(),
            _ => match self.tab {
                Tab::Post => {
                    if matches!(key_event.code, KeyCode::Enter | KeyCode::Char('e')) {
                        self.post.editing = true;
                    }
                }
                Tab::Find => self.handle_find_key(key_event),
                Tab::Dashboard | Tab::Leaderboard => {}
            },
        }
    }

    fn handle_find_key(&mut self, key_event: KeyEvent) {
        let open = self.marketplace.as_ref().map_or(0, |m| m.list_open().len());
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.find_selected = self.find_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.find_selected + 1 < open {
                    self.find_selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char('a') => self.accept_selected(),
            _ => {}
        }
    }

    fn handle_post_edit_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.post.editing = false,
            KeyCode::Tab | KeyCode::Down => self.post.field = self.post.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.post.field = self.post.field.prev(),
            KeyCode::Enter => self.submit_post(),
            KeyCode::Left if self.post.field == PostField::Urgency => {
                self.post.form.urgency = self.post.form.urgency.prev();
            }
            KeyCode::Right | KeyCode::Char(' ') if self.post.field == PostField::Urgency => {
                self.post.form.urgency = self.post.form.urgency.next();
            }
            KeyCode::Backspace => {
                if let Some(input) = self.post.input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(input) = self.post.input_mut() {
                    input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, mut overlay: Overlay, key_event: KeyEvent) {
        if key_event.code == KeyCode::Esc {
            if matches!(overlay, Overlay::Chat { .. }) {
                if let Some(marketplace) = self.marketplace.as_mut() {
                    marketplace.set_chat_open(false);
                }
            }
            return;
        }

        let keep_open = match &mut overlay {
            Overlay::Wallet { action, amount } => match key_event.code {
                KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                    *action = action.toggle();
                    true
                }
                KeyCode::Char(ch) if ch.is_ascii_digit() => {
                    amount.push(ch);
                    true
                }
                KeyCode::Backspace => {
                    amount.pop();
                    true
                }
                KeyCode::Enter => !self.submit_wallet(*action, amount),
                _ => true,
            },
            Overlay::Notifications => {
                if key_event.code == KeyCode::Char('x') {
                    if let Some(marketplace) = self.marketplace.as_mut() {
                        marketplace.clear_notifications();
                    }
                }
                true
            }
            Overlay::Verify { code } => match key_event.code {
                KeyCode::Char(ch) if ch.is_ascii_digit() => {
                    if code.len() < OTP_LENGTH {
                        code.push(ch);
                    }
                    true
                }
                KeyCode::Backspace => {
                    code.pop();
                    true
                }
                KeyCode::Enter => {
                    let submitted = std::mem::take(code);
                    !self.submit_code(&submitted)
                }
                _ => true,
            },
            Overlay::Chat { chat, input } => {
                match key_event.code {
                    KeyCode::Char(ch) => input.push(ch),
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Enter => self.send_chat(chat, input),
                    _ => {}
                }
                true
            }
        };

        if keep_open {
            self.overlay = Some(overlay);
        }
    }

    fn submit_post(&mut self) {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return;
        };

        match marketplace.post_quest(&self.post.form, Utc::now()) {
            Ok(quest) => {
                self.post = PostFormState::default();
                self.clamp_find_selection();
                self.show_toast(
                    format!("Quest posted! ₹{} held in escrow", quest.reward),
                    NotificationKind::Success,
                );
            }
            Err(JugaadError::Validation(errors)) => {
                self.post.errors = errors;
                self.show_toast("Please fix the highlighted fields", NotificationKind::Warning);
            }
            Err(e) => {
                self.post.errors = ValidationErrors::new();
                self.show_toast(e.to_string(), NotificationKind::Warning);
            }
        }
    }

    /// Keeps the Find cursor on a row that still exists after the board shrinks.
    fn clamp_find_selection(&mut self) {
        let open = self.marketplace.as_ref().map_or(0, |m| m.list_open().len());
        self.find_selected = clamp_selection(self.find_selected, open);
    }

    fn accept_selected(&mut self) {
        self.clamp_find_selection();
        let Some(marketplace) = self.marketplace.as_mut() else {
            return;
        };
        let Some(quest_id) = marketplace
            .list_open()
            .get(self.find_selected)
            .map(|q| q.id.clone())
        else {
            self.show_toast("No open quests to accept", NotificationKind::Info);
            return;
        };

        match marketplace.accept_quest(&quest_id, Utc::now()) {
            Ok(quest) => self.show_toast(
                format!("Quest accepted: {}. Chat with the Task Master for the OTP", quest.title),
                NotificationKind::Success,
            ),
            Err(e) => self.show_toast(e.to_string(), NotificationKind::Warning),
        }
    }

    /// Returns true when the overlay should close.
    fn submit_code(&mut self, code: &str) -> bool {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return true;
        };

        match marketplace.complete_quest(code, Utc::now()) {
            Ok(quest) => {
                self.clamp_find_selection();
                self.show_toast(
                    format!("Quest verified! ₹{} credited, +{} XP", quest.reward, quest.xp),
                    NotificationKind::Success,
                );
                true
            }
            Err(e @ JugaadError::OtpMismatch) => {
                self.show_toast(e.to_string(), NotificationKind::Warning);
                false
            }
            Err(e) => {
                self.clamp_find_selection();
                self.show_toast(e.to_string(), NotificationKind::Warning);
                true
            }
        }
    }

    /// Returns true when the overlay should close.
    fn submit_wallet(&mut self, action: WalletAction, amount: &str) -> bool {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return true;
        };

        let now = Utc::now();
        let result = parse_amount(amount).and_then(|amount| match action {
            WalletAction::Deposit => marketplace.deposit(amount, now),
            WalletAction::Withdraw => marketplace.withdraw(amount, now),
        });

        match result {
            Ok(txn) => {
                self.show_toast(
                    format!("{} {}", txn.description, txn.signed_display()),
                    NotificationKind::Success,
                );
                true
            }
            Err(e) => {
                self.show_toast(e.to_string(), NotificationKind::Warning);
                false
            }
        }
    }

    fn open_chat(&mut self) {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return;
        };
        let Some(engaged) = marketplace.session().snapshot() else {
            self.show_toast("Accept a quest to chat with its Task Master", NotificationKind::Warning);
            return;
        };

        let context = QuestContext::from_engaged(engaged);
        marketplace.set_chat_open(true);
        let chat = ChatSession::open(context, self.chat_service.is_remote_available(), Utc::now());
        self.overlay = Some(Overlay::Chat { chat, input: String::new() });
    }

    fn send_chat(&self, chat: &mut ChatSession, input: &mut String) {
        let Some(request) = chat.submit(input, Utc::now()) else {
            return;
        };
        input.clear();

        let service = self.chat_service.clone();
        let sender = self.events.sender();
        tokio::spawn(async move {
            let reply = service.reply(request).await;
            let _ = sender.send(Event::App(AppEvent::ChatReply(reply)));
        });
    }

    fn receive_chat_reply(&mut self, reply: ChatReply) {
        // Replies for a chat that was closed in the meantime are dropped
        if let Some(Overlay::Chat { chat, .. }) = self.overlay.as_mut() {
            chat.receive(reply, Utc::now());
        }
    }

    fn dismiss_active_quest(&mut self) {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return;
        };
        if marketplace.session().is_engaged() && !marketplace.dismiss_active_quest() {
            self.show_toast(
                "Finish the quest and verify its OTP to release it",
                NotificationKind::Warning,
            );
        }
    }

    fn reload_quests(&mut self) {
        let Some(marketplace) = self.marketplace.as_mut() else {
            return;
        };
        if let Err(e) = marketplace.reload_quests(Utc::now()) {
            log_error!("Failed to reload quests: {}", e);
            self.show_toast("Could not refresh the quest board", NotificationKind::Warning);
            return;
        }
        self.find_selected = 0;
    }

    fn logout(&mut self) {
        let Some(marketplace) = self.marketplace.take() else {
            return;
        };
        if let Err(e) = marketplace.logout() {
            log_error!("Failed to clear current user: {}", e);
        }

        self.overlay = None;
        self.tab = Tab::Post;
        self.post = PostFormState::default();
        self.find_selected = 0;
        log_info!("Returned to login screen");
        self.show_toast("Logged out", NotificationKind::Info);
    }

    pub fn is_engaged(&self) -> bool {
        self.marketplace
            .as_ref()
            .is_some_and(|m| m.session().is_engaged())
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        });
    }
}

/// Last valid row for a list of `len` rows; zero when the list is empty.
pub fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}
