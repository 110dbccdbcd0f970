pub mod conversation_state;
pub mod dispatcher;
pub mod phrasing;
pub mod prompt;

use std::io::Write;
use std::process::ExitCode;

use color_print::cformat;
use conversation_state::{ConversationLog, Message, Role};
use crossterm::cursor::MoveToColumn;
use crossterm::terminal::{Clear, ClearType};
use crossterm::ExecutableCommand;
use dispatcher::{DispatchAction, Fallback};
use eyre::Result;
use phrasing::{Phrasebook, RandomPicker, ReplyCategory};
use prompt::generate_prompt;
use tracing::error;

use crate::chat_api_client::{ChatApi, Fetched};
use crate::error::ApiError;
use crate::wit_client::NluClient;

const WELCOME_TEXT: &str = "
Hi, I'm BadgerChat. Ask me about chatrooms and their posts.

Things to try
• What chatrooms are there?
• Give me the latest 4 messages from wisc.
• What can you do?

/help         Show the help dialogue
/quit         Quit the application
";

const HELP_TEXT: &str = "
BadgerChat CLI

/help         Show this help dialogue
/quit         Quit the application

Ask in plain English; for example \"show me 3 posts from memes\".
";

/// Drives one conversation session: owns the log, the busy flag, and the
/// clients, and runs the REPL in interactive mode.
pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    log: ConversationLog,
    busy: bool,
    rendered: usize,
    phrasebook: Phrasebook,
    nlu: Box<dyn NluClient>,
    chat_api: Box<dyn ChatApi>,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        nlu: Box<dyn NluClient>,
        chat_api: Box<dyn ChatApi>,
    ) -> Self {
        Self {
            output,
            input,
            interactive,
            log: ConversationLog::new(),
            busy: false,
            rendered: 0,
            phrasebook: Phrasebook::new(Box::new(RandomPicker)),
            nlu,
            chat_api,
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        if self.interactive {
            self.print_welcome()?;
        }

        self.on_mount();
        self.render_new()?;

        // Handle non-interactive mode (single query)
        if let Some(input) = self.input.take() {
            self.on_user_submit(&input).await?;
            self.render_new()?;
            return Ok(ExitCode::SUCCESS);
        }

        if self.interactive {
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    /// Appends the session greeting. Calling this again appends another one.
    pub fn on_mount(&mut self) {
        self.log.append(Message::assistant(phrasing::GREETING));
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", WELCOME_TEXT)?;
        Ok(())
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            let prompt_text = generate_prompt(None);
            let readline = rl.readline(&prompt_text);

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    if line.trim() == "/quit" {
                        break;
                    }

                    if let Err(e) = self.handle_input(&line).await {
                        writeln!(self.output, "Error: {}", e)?;
                    }
                }
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<()> {
        match input.trim() {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            _ => {
                self.on_user_submit(input).await?;
                self.render_new()?;
            }
        }

        Ok(())
    }

    /// One full user turn: classify, dispatch, append the replies.
    ///
    /// No-op on blank input or while a turn is already in flight. The busy
    /// flag is released on every exit path.
    pub async fn on_user_submit(&mut self, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || self.busy {
            return Ok(());
        }

        self.busy = true;
        self.log.append(Message::user(trimmed));
        let outcome = self.take_turn(trimmed).await;
        self.busy = false;
        outcome
    }

    async fn take_turn(&mut self, input: &str) -> Result<()> {
        if self.interactive {
            self.show_busy_indicator()?;
        }

        let replies = match self.run_turn(input).await {
            Ok(replies) => replies,
            Err(e) => {
                error!("Turn failed: {}", e);
                vec![Message::assistant(phrasing::TURN_FAILED)]
            }
        };

        if self.interactive {
            self.clear_busy_indicator()?;
        }

        for reply in replies {
            self.log.append(reply);
        }

        Ok(())
    }

    async fn run_turn(&mut self, input: &str) -> Result<Vec<Message>, ApiError> {
        let classification = self.nlu.classify(input).await?;
        let action = dispatcher::route(&classification);
        self.execute(action).await
    }

    async fn execute(&mut self, action: DispatchAction) -> Result<Vec<Message>, ApiError> {
        match action {
            DispatchAction::Help => Ok(vec![Message::assistant(
                self.phrasebook.pick(ReplyCategory::Help),
            )]),
            DispatchAction::Fallback(Fallback::Unrecognized) => Ok(vec![Message::assistant(
                self.phrasebook.pick(ReplyCategory::Unknown),
            )]),
            DispatchAction::Fallback(Fallback::Unfamiliar) => {
                Ok(vec![Message::assistant(phrasing::UNFAMILIAR_INTENT)])
            }
            DispatchAction::ListChatrooms => match self.chat_api.list_chatrooms().await? {
                Fetched::Empty => Ok(vec![Message::assistant(phrasing::NO_CHATROOMS)]),
                Fetched::Rows(rooms) => {
                    let lead_in = self.phrasebook.pick(ReplyCategory::ChatroomList);
                    Ok(vec![Message::assistant(format!(
                        "{}{}",
                        lead_in,
                        rooms.join(", ")
                    ))])
                }
            },
            DispatchAction::ListMessages {
                chat_room,
                num_posts,
            } => match self.chat_api.list_messages(&chat_room, num_posts).await? {
                Fetched::Empty => Ok(vec![Message::assistant(phrasing::NO_MESSAGES)]),
                Fetched::Rows(posts) => {
                    // One wording for every post in this turn.
                    let template = self.phrasebook.post_template();
                    Ok(posts
                        .iter()
                        .map(|post| Message::assistant(template.render(post)))
                        .collect())
                }
            },
        }
    }

    fn render_new(&mut self) -> Result<()> {
        let lines: Vec<String> = self.log.snapshot()[self.rendered..]
            .iter()
            .map(|message| match message.role {
                Role::User => cformat!("<cyan>You:</cyan> {}", message.content),
                Role::Assistant => cformat!("<green>Badger:</green> {}", message.content),
            })
            .collect();

        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        self.rendered = self.log.len();

        Ok(())
    }

    fn show_busy_indicator(&mut self) -> Result<()> {
        write!(self.output, "thinking...")?;
        self.output.flush()?;
        Ok(())
    }

    fn clear_busy_indicator(&mut self) -> Result<()> {
        self.output.execute(MoveToColumn(0))?;
        self.output.execute(Clear(ClearType::CurrentLine))?;
        Ok(())
    }
}
