//! The state machine bridging the guide session and the interactive terminal UI.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! searches, pages and edits. [`AppState`] wraps the [`GuideSession`] together with the view
//! state around it: search results, the selected section, the open editor, prompts and the
//! status line. Remote calls are queued as a [`PendingAction`] so the event loop can draw a
//! loading message before the blocking request runs, and only one can be pending at a time.

use std::path::PathBuf;

use edtui::{EditorState, Lines};

use crate::client::{GuideService, PlaceSummary};
use crate::clipboard::Clipboard;
use crate::error::GuideError;
use crate::narration::{NarrationState, Narrator};
use crate::session::{GuideSession, GuideStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Location input and the list of places found.
    Search,
    /// The current page of the loaded guide.
    Guide,
    /// Vim-like editor for one section's content.
    Detail,
    /// Single-line input owned by a [`Prompt`].
    Prompt,
    /// Captures vim-style command input after ':' is pressed.
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which half of the search screen receives keys.
pub enum SearchFocus {
    /// The location input line.
    Input,
    /// The list of places found.
    Results,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a prompt's answer is used for.
pub enum PromptKind {
    /// New title for the section at this page index.
    EditTitle(usize),
    /// Optional instruction for regenerating the section at this page index.
    Instruction(usize),
    /// Yes/no before deleting the section at this page index.
    ConfirmDelete(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Single-line question shown in the bottom bar.
pub struct Prompt {
    /// What the answer is for.
    pub kind: PromptKind,
    /// Answer typed so far.
    pub input: String,
}

impl Prompt {
    #[must_use]
    /// Question text shown before the input.
    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::EditTitle(_) => "Section title",
            PromptKind::Instruction(_) => "How do you want to change this section? (optional)",
            PromptKind::ConfirmDelete(_) => "Delete this section? (y/n)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A remote call waiting for the next turn of the event loop.
pub enum PendingAction {
    /// Search places near a location.
    Search(String),
    /// Load the guide of a place.
    OpenPlace(String),
    /// Rewrite one section of the current page.
    Regenerate {
        /// Section index on the current page.
        index: usize,
        /// Optional wish for the rewrite; blank means none.
        instruction: String,
    },
    /// Send the edited guide to the service.
    Save,
}

impl PendingAction {
    #[must_use]
    /// Status line shown while the call runs.
    pub fn loading_message(&self) -> String {
        match self {
            Self::Search(location) => format!("Searching places near {location}…"),
            Self::OpenPlace(name) => format!("Loading guide for {name}…"),
            Self::Regenerate { .. } => "Regenerating section…".to_string(),
            Self::Save => "Saving guide…".to_string(),
        }
    }
}

/// Bridges the guide session and the interactive UI, maintaining view state.
pub struct AppState {
    /// The loaded guide and its pages.
    pub session: GuideSession,
    service: Box<dyn GuideService>,
    narrator: Narrator,
    clipboard: Box<dyn Clipboard>,
    /// Directory receiving exported guides.
    pub export_dir: PathBuf,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Location typed on the search screen.
    pub search_input: String,
    /// Half of the search screen receiving keys.
    pub search_focus: SearchFocus,
    /// Places returned by the last search.
    pub places: Vec<PlaceSummary>,
    /// Highlighted entry in `places`.
    pub selected_place: usize,
    /// Selected section, as an index into the current page.
    pub selected_section: usize,
    /// Editor buffer content when detail view is active.
    pub editor_state: Option<EditorState>,
    /// Open prompt, if any.
    pub prompt: Option<Prompt>,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Remote call to run once the loading message has been drawn.
    pub pending: Option<PendingAction>,
}

impl AppState {
    #[must_use]
    /// Starts on the search screen with nothing loaded.
    pub fn new(
        session: GuideSession,
        service: Box<dyn GuideService>,
        narrator: Narrator,
        clipboard: Box<dyn Clipboard>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            service,
            narrator,
            clipboard,
            export_dir,
            current_view: View::Search,
            search_input: String::new(),
            search_focus: SearchFocus::Input,
            places: Vec::new(),
            selected_place: 0,
            selected_section: 0,
            editor_state: None,
            prompt: None,
            command_buffer: String::new(),
            message: None,
            pending: None,
        }
    }

    #[must_use]
    /// Whether the guide is being read aloud.
    pub fn is_speaking(&self) -> bool {
        self.narrator.is_speaking()
    }

    fn report(&mut self, err: &GuideError) {
        if err.is_network() {
            tracing::warn!(error = %err, "Remote call failed");
        }
        self.message = Some(err.user_message());
    }

    /// Queues `action` unless another remote call is already waiting.
    pub fn queue(&mut self, action: PendingAction) {
        if self.pending.is_some() {
            return;
        }
        self.message = Some(action.loading_message());
        self.pending = Some(action);
    }

    /// Runs the queued remote call, if any.
    pub fn run_pending(&mut self) {
        if let Some(action) = self.pending.take() {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: PendingAction) {
        match action {
            PendingAction::Search(location) => self.search(&location),
            PendingAction::OpenPlace(name) => self.open_place(&name),
            PendingAction::Regenerate { index, instruction } => {
                match self.session.regenerate_section(
                    self.service.as_ref(),
                    index,
                    Some(instruction.as_str()),
                ) {
                    Ok(()) => self.message = Some("Section regenerated".to_string()),
                    Err(e) => self.report(&e),
                }
            }
            PendingAction::Save => match self.session.save(self.service.as_ref()) {
                Ok(()) => self.message = Some("Guide saved successfully!".to_string()),
                Err(e) => self.report(&e),
            },
        }
    }

    // --- Search ---

    /// Validates the typed location and queues a search for it.
    pub fn submit_search(&mut self) {
        let location = self.search_input.trim();
        if location.is_empty() {
            self.report(&GuideError::EmptyInput);
            return;
        }
        let location = location.to_string();
        self.queue(PendingAction::Search(location));
    }

    fn search(&mut self, location: &str) {
        self.places.clear();
        self.selected_place = 0;
        match self.service.search_places(location) {
            Ok(results) => {
                self.places = results.places;
                if self.places.is_empty() {
                    self.message =
                        Some("No famous places found. Try a different search.".to_string());
                } else {
                    self.message = None;
                    self.search_focus = SearchFocus::Results;
                }
            }
            Err(e) => self.report(&e),
        }
    }

    /// Moves the place highlight down, stopping at the last entry.
    pub fn select_next_place(&mut self) {
        if self.selected_place + 1 < self.places.len() {
            self.selected_place += 1;
        }
    }

    /// Moves the place highlight up, stopping at the first entry.
    pub fn select_prev_place(&mut self) {
        self.selected_place = self.selected_place.saturating_sub(1);
    }

    /// Queues loading the guide of the highlighted place.
    pub fn open_selected_place(&mut self) {
        if let Some(place) = self.places.get(self.selected_place) {
            let name = place.name.clone();
            self.queue(PendingAction::OpenPlace(name));
        }
    }

    fn open_place(&mut self, name: &str) {
        self.narrator.stop();
        self.selected_section = 0;
        self.current_view = View::Guide;
        match self.session.load(self.service.as_ref(), name) {
            Ok(()) if self.session.page_count() == 0 => {
                self.message = Some("This guide has no sections to show.".to_string());
            }
            Ok(()) => self.message = None,
            Err(e) => self.report(&e),
        }
    }

    /// Leaves the guide for the search screen, stopping narration.
    pub fn close_guide(&mut self) {
        self.narrator.stop();
        self.editor_state = None;
        self.prompt = None;
        self.current_view = View::Search;
        self.search_focus = SearchFocus::Results;
    }

    // --- Pages ---

    fn page_len(&self) -> usize {
        self.session.buffer().len()
    }

    /// Selects the next section on the page.
    pub fn select_next_section(&mut self) {
        if self.selected_section + 1 < self.page_len() {
            self.selected_section += 1;
        }
    }

    /// Selects the previous section on the page.
    pub fn select_prev_section(&mut self) {
        self.selected_section = self.selected_section.saturating_sub(1);
    }

    /// Shows the next page and selects its first section.
    pub fn next_page(&mut self) {
        if self.session.next_page() {
            self.selected_section = 0;
        }
    }

    /// Shows the previous page and selects its first section.
    pub fn prev_page(&mut self) {
        if self.session.prev_page() {
            self.selected_section = 0;
        }
    }

    #[must_use]
    /// "Page x of y", or nothing when the guide has no pages.
    pub fn page_indicator(&self) -> Option<String> {
        (self.session.page_count() > 0).then(|| {
            format!(
                "Page {} of {}",
                self.session.current_page_index() + 1,
                self.session.page_count()
            )
        })
    }

    // --- Section editing ---

    /// Loads the selected section's draft content into the editor buffer.
    pub fn enter_detail_view(&mut self) {
        let Some(content) = self.session.buffer().content(self.selected_section) else {
            return;
        };
        self.editor_state = Some(EditorState::new(Lines::from(content)));
        self.current_view = View::Detail;
    }

    /// Returns to the page, optionally keeping the editor's text as the section's draft.
    pub fn exit_detail_view(&mut self, save: bool) {
        if save {
            self.apply_editor();
        }
        self.editor_state = None;
        self.current_view = View::Guide;
    }

    /// Copies the editor text into the selected section's draft.
    pub fn apply_editor(&mut self) {
        let Some(ref editor_state) = self.editor_state else {
            return;
        };
        let text = editor_state
            .lines
            .iter_row()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        if let Err(e) = self
            .session
            .set_content(self.selected_section, text.trim())
        {
            self.report(&e);
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, input: String) {
        self.prompt = Some(Prompt { kind, input });
        self.current_view = View::Prompt;
    }

    /// Asks for a new title for the selected section.
    pub fn start_title_edit(&mut self) {
        if let Some(title) = self.session.buffer().title(self.selected_section) {
            let title = title.to_string();
            self.open_prompt(PromptKind::EditTitle(self.selected_section), title);
        }
    }

    /// Asks for an optional instruction before regenerating the selected section.
    pub fn start_regenerate(&mut self) {
        if self.selected_section < self.page_len() {
            self.open_prompt(PromptKind::Instruction(self.selected_section), String::new());
        }
    }

    /// Asks for confirmation before deleting the selected section.
    pub fn start_delete(&mut self) {
        if self.selected_section < self.page_len() {
            self.open_prompt(PromptKind::ConfirmDelete(self.selected_section), String::new());
        }
    }

    /// Closes the prompt without acting on it.
    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.current_view = View::Guide;
    }

    /// Acts on the prompt's answer and returns to the page.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        self.current_view = View::Guide;
        match prompt.kind {
            PromptKind::EditTitle(index) => {
                if let Err(e) = self.session.set_title(index, prompt.input.trim()) {
                    self.report(&e);
                }
            }
            PromptKind::Instruction(index) => self.queue(PendingAction::Regenerate {
                index,
                instruction: prompt.input,
            }),
            PromptKind::ConfirmDelete(index) => {
                if !prompt.input.trim().eq_ignore_ascii_case("y") {
                    self.message = Some("Delete cancelled".to_string());
                    return;
                }
                match self.session.delete_section(index) {
                    Ok(_) => {
                        self.message = Some("Section deleted".to_string());
                        if self.selected_section >= self.page_len() {
                            self.selected_section = self.page_len().saturating_sub(1);
                        }
                    }
                    Err(e) => self.report(&e),
                }
            }
        }
    }

    /// Puts the selected section's live content on the clipboard.
    pub fn copy_selected(&mut self) {
        let Some(content) = self.session.buffer().content(self.selected_section) else {
            return;
        };
        let content = content.to_string();
        match self.clipboard.write_text(&content) {
            Ok(()) => self.message = Some("Copied to clipboard".to_string()),
            Err(e) => self.report(&e),
        }
    }

    // --- Narration ---

    /// Reads the current page aloud, or stops if already reading.
    pub fn toggle_narration(&mut self) {
        let session = &mut self.session;
        match self.narrator.toggle(|| session.narration_text()) {
            Ok(NarrationState::Speaking) => {
                self.message = Some("Listening to guide (n to stop)".to_string());
            }
            Ok(NarrationState::Idle) => self.message = Some("Stopped listening".to_string()),
            Err(e) => self.report(&e),
        }
    }

    /// Periodic housekeeping between key events.
    pub fn tick(&mut self) {
        if self.narrator.poll() {
            self.message = Some("Finished listening".to_string());
        }
    }

    // --- Commands ---

    /// Writes `<place>_guide.txt` into the export directory.
    pub fn export(&mut self) {
        let dir = self.export_dir.clone();
        match self.session.export_to(&dir) {
            Ok(path) => self.message = Some(format!("Exported to {}", path.display())),
            Err(e) => self.report(&e),
        }
    }

    /// Executes a ':' command; returns true when the application should quit.
    pub fn run_command(&mut self, command: &str) -> bool {
        let in_editor = self.editor_state.is_some();
        self.current_view = if in_editor { View::Detail } else { View::Guide };

        match command.trim() {
            "w" if in_editor => self.apply_editor(),
            "x" if in_editor => self.exit_detail_view(true),
            "q" | "q!" if in_editor => self.exit_detail_view(false),
            "w" | "save" => self.queue(PendingAction::Save),
            "e" | "export" => self.export(),
            "q" => self.close_guide(),
            "q!" | "quit" => return true,
            other => self.message = Some(format!("Unknown command: {other}")),
        }
        false
    }

    #[must_use]
    /// Short status for the header of the guide screen.
    pub fn guide_title(&self) -> String {
        match self.session.status() {
            GuideStatus::Empty => "Guide".to_string(),
            GuideStatus::Loaded => self.session.place().to_string(),
            GuideStatus::Error(_) => format!("{} (unavailable)", self.session.place()),
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
