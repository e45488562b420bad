//! System prompt composition and the conversation log it heads.
//!
//! The prompt is a pure function of the configuration and the materials on
//! disk. Fragments always appear in the same order: identity, speech rules,
//! teaching style, mode behavior, educator instructions (if any) and the
//! teaching context.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::context;
use crate::mode::{Mode, TeachingStyle};

/// Name the assistant introduces itself with.
pub const ASSISTANT_NAME: &str = "Spark";

const SPEECH_RULES: &str = "\
RULES:
- Keep responses SHORT (2-4 sentences) since this is voice conversation
- Be accurate: only use information from the provided course materials
- If you don't know or the materials don't cover it, say so honestly
- Never fabricate information about the course
- Speak naturally, as if talking to a student in office hours
- NO filler phrases (\"Sure!\", \"Of course!\", \"I'd be happy to help!\")
- Get straight to the answer
- CRITICAL: Your output is spoken aloud via text-to-speech. NEVER use:
  - Markdown formatting (no **, *, #, `, -, or bullet symbols)
  - Filenames or file extensions (say \"the syllabus\" not \"syllabus.txt\")
  - Special characters, code blocks, or lists with symbols
  - Write everything as plain conversational sentences";

fn identity(course_name: &str) -> String {
    format!(
        "IDENTITY:\n\
         You are {ASSISTANT_NAME}, an AI Teaching Companion for \"{course_name}\".\n\
         You help students learn by answering their spoken questions using course materials."
    )
}

const fn style_fragment(style: TeachingStyle) -> &'static str {
    match style {
        TeachingStyle::Supportive => {
            "TEACHING STYLE: Supportive
- Be warm, encouraging, and patient
- Acknowledge the student's effort before correcting
- Suggest next steps or additional resources
- Use phrases like \"Great question!\", \"You're on the right track\""
        }
        TeachingStyle::Socratic => {
            "TEACHING STYLE: Socratic
- Guide students with questions rather than direct answers
- Help them discover the answer themselves
- Give hints, not solutions
- Use phrases like \"What do you think would happen if...?\", \"Can you think of why...?\""
        }
        TeachingStyle::Concise => {
            "TEACHING STYLE: Concise
- Give brief, direct answers (1-2 sentences)
- No filler or pleasantries
- Get straight to the point
- Only elaborate if the student asks for more detail"
        }
    }
}

const fn mode_fragment(mode: Mode) -> &'static str {
    match mode {
        Mode::Faq => {
            "MODE: Course FAQ
You answer logistical questions about the course: syllabus, schedule,
policies, grading, deadlines, office hours, etc.
Be factual. If the information comes from a specific document, mention it naturally (e.g. \"according to the syllabus\") but never say the filename."
        }
        Mode::Assignment => {
            "MODE: Assignment Help
You help students with homework and assignments.
IMPORTANT: Never give direct answers. Instead:
- Give hints and guide their thinking
- Ask clarifying questions about their approach
- Point them to relevant sections of the assignment description
- Encourage them to attempt a solution first"
        }
        Mode::Lecture => {
            "MODE: Lecture Q&A
You act as a 24/7 office hours assistant.
- Explain concepts from the lecture notes clearly
- Use analogies and examples to make ideas accessible
- Connect ideas across different lectures when relevant
- If a concept isn't in the notes, say so and offer general guidance"
        }
    }
}

/// Composes the system prompt, reading the materials for the active mode.
#[must_use]
pub fn compose(config: &Config) -> String {
    let teaching_context = context::teaching_context(&config.materials_dir, config.mode);
    compose_with_context(config, &teaching_context)
}

/// Composes the system prompt around an already built teaching context.
#[must_use]
pub fn compose_with_context(config: &Config, teaching_context: &str) -> String {
    let mut fragments = vec![
        identity(&config.course_name),
        SPEECH_RULES.to_string(),
        style_fragment(config.teaching_style).to_string(),
        mode_fragment(config.mode).to_string(),
    ];

    let instructions = config.custom_instructions.trim();
    if !instructions.is_empty() {
        fragments.push(format!("EDUCATOR INSTRUCTIONS:\n{instructions}"));
    }

    fragments.push(teaching_context.to_string());
    fragments.join("\n\n")
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The student.
    User,
    /// The model.
    Assistant,
}

/// One entry of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message with the given role.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered chat history whose first entry is the system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    /// Starts a conversation headed by `system_prompt`.
    #[must_use]
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::System, system_prompt)],
        }
    }

    /// All messages, system prompt first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The current system prompt, if the log is headed by one.
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|message| message.role == Role::System)
            .map(|message| message.content.as_str())
    }

    /// Appends a student message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::User, content));
    }

    /// Appends a model response.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Assistant, content));
    }

    /// Replaces the system prompt, leaving the rest of the history alone.
    ///
    /// Returns `false` (and changes nothing) when the first message is not a
    /// system message.
    pub fn refresh_system_prompt(&mut self, system_prompt: impl Into<String>) -> bool {
        match self.messages.first_mut() {
            Some(first) if first.role == Role::System => {
                first.content = system_prompt.into();
                info!(messages = self.messages.len(), "System prompt updated");
                true
            }
            _ => false,
        }
    }

    /// Drops the history and starts over with `system_prompt`.
    pub fn reset(&mut self, system_prompt: impl Into<String>) {
        self.messages.clear();
        self.messages.push(ChatMessage::new(Role::System, system_prompt));
    }
}
