use super::{AppState, PendingAction, PromptKind, SearchFocus, View};
use crate::client::{
    GuideService, PlaceDetails, PlaceSummary, RegenerateRequest, RemoteCall, SearchResults,
};
use crate::clipboard::Clipboard;
use crate::error::{GuideError, Result};
use crate::narration::{Narrator, Speech};
use crate::session::GuideSession;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

const GUIDE: &str = "## Introduction\nWelcome.\n\n## History\nOld.\n\n## Food\nCrêpes.\n\n## Parting Tip\nGo early.\n";

#[derive(Default)]
struct Calls {
    searches: Vec<String>,
    saved: Vec<String>,
    copied: Vec<String>,
    spoken: Vec<String>,
    search_fails: bool,
}

struct FakeService(Rc<RefCell<Calls>>);

impl GuideService for FakeService {
    fn search_places(&self, location: &str) -> Result<SearchResults> {
        let mut calls = self.0.borrow_mut();
        calls.searches.push(location.to_string());
        if calls.search_fails {
            return Err(GuideError::Status {
                call: RemoteCall::SearchPlaces,
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            });
        }
        let places = if location == "nowhere" {
            Vec::new()
        } else {
            vec![
                PlaceSummary {
                    name: "Louvre".to_string(),
                    description: "Art museum.".to_string(),
                    image_url: None,
                    has_details: true,
                },
                PlaceSummary {
                    name: "Eiffel Tower".to_string(),
                    description: "Iron tower.".to_string(),
                    image_url: None,
                    has_details: false,
                },
            ]
        };
        Ok(SearchResults {
            places,
            token_count: 0,
        })
    }

    fn place_details(&self, _place_name: &str) -> Result<PlaceDetails> {
        Ok(PlaceDetails {
            description: GUIDE.to_string(),
            token_count: 0,
        })
    }

    fn regenerate_section(&self, request: &RegenerateRequest<'_>) -> Result<String> {
        Ok(format!("{} (rewritten)", request.current_text))
    }

    fn save_description(&self, _place_name: &str, description: &str) -> Result<()> {
        self.0.borrow_mut().saved.push(description.to_string());
        Ok(())
    }
}

struct FakeClipboard(Rc<RefCell<Calls>>);

impl Clipboard for FakeClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.0.borrow_mut().copied.push(text.to_string());
        Ok(())
    }
}

struct FakeSpeech(Rc<RefCell<Calls>>);

impl Speech for FakeSpeech {
    fn start(&mut self, text: &str) -> io::Result<()> {
        self.0.borrow_mut().spoken.push(text.to_string());
        Ok(())
    }

    fn stop(&mut self) {}

    fn finished(&mut self) -> bool {
        false
    }
}

fn app_with_dir(export_dir: PathBuf) -> (AppState, Rc<RefCell<Calls>>) {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let app = AppState::new(
        GuideSession::default(),
        Box::new(FakeService(Rc::clone(&calls))),
        Narrator::new(Box::new(FakeSpeech(Rc::clone(&calls)))),
        Box::new(FakeClipboard(Rc::clone(&calls))),
        export_dir,
    );
    (app, calls)
}

fn app() -> (AppState, Rc<RefCell<Calls>>) {
    app_with_dir(PathBuf::from("."))
}

fn guide_app() -> (AppState, Rc<RefCell<Calls>>) {
    let (mut app, calls) = app();
    app.queue(PendingAction::OpenPlace("Louvre".to_string()));
    app.run_pending();
    (app, calls)
}

#[test]
fn test_blank_search_is_rejected_before_any_call() {
    let (mut app, calls) = app();
    app.search_input = "   ".to_string();

    app.submit_search();

    assert_eq!(app.message.as_deref(), Some("Please enter a location."));
    assert!(app.pending.is_none());
    assert!(calls.borrow().searches.is_empty());
}

#[test]
fn test_search_runs_after_loading_message() {
    let (mut app, calls) = app();
    app.search_input = "  Paris ".to_string();

    app.submit_search();
    assert_eq!(
        app.message.as_deref(),
        Some("Searching places near Paris…")
    );
    assert!(calls.borrow().searches.is_empty());

    app.run_pending();
    assert_eq!(calls.borrow().searches, vec!["Paris".to_string()]);
    assert_eq!(app.places.len(), 2);
    assert_eq!(app.search_focus, SearchFocus::Results);
    assert!(app.message.is_none());
}

#[test]
fn test_only_one_action_pending() {
    let (mut app, _) = app();
    app.queue(PendingAction::Search("Paris".to_string()));
    app.queue(PendingAction::Save);

    assert_eq!(app.pending, Some(PendingAction::Search("Paris".to_string())));
}

#[test]
fn test_empty_and_failed_searches() {
    let (mut app, calls) = app();
    app.queue(PendingAction::Search("nowhere".to_string()));
    app.run_pending();
    assert_eq!(
        app.message.as_deref(),
        Some("No famous places found. Try a different search.")
    );

    calls.borrow_mut().search_fails = true;
    app.queue(PendingAction::Search("Paris".to_string()));
    app.run_pending();
    assert_eq!(
        app.message.as_deref(),
        Some("Sorry, something went wrong. Please try again.")
    );
    assert!(app.places.is_empty());
}

#[test]
fn test_open_selected_place_shows_first_page() {
    let (mut app, _) = app();
    app.queue(PendingAction::Search("Paris".to_string()));
    app.run_pending();
    app.select_next_place();
    app.select_next_place();
    assert_eq!(app.selected_place, 1);

    app.open_selected_place();
    assert_eq!(
        app.pending,
        Some(PendingAction::OpenPlace("Eiffel Tower".to_string()))
    );
    app.run_pending();

    assert_eq!(app.current_view, View::Guide);
    assert_eq!(app.page_indicator().as_deref(), Some("Page 1 of 2"));
    assert_eq!(app.guide_title(), "Eiffel Tower");
}

#[test]
fn test_page_navigation_resets_selection() {
    let (mut app, _) = guide_app();
    app.select_next_section();
    app.select_next_section();
    app.select_next_section();
    assert_eq!(app.selected_section, 2);

    app.next_page();
    assert_eq!(app.selected_section, 0);
    assert_eq!(app.page_indicator().as_deref(), Some("Page 2 of 2"));
    app.next_page();
    assert_eq!(app.page_indicator().as_deref(), Some("Page 2 of 2"));
}

#[test]
fn test_detail_view_edits_become_drafts() {
    let (mut app, _) = guide_app();
    app.select_next_section();
    app.enter_detail_view();
    assert_eq!(app.current_view, View::Detail);

    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("\nA royal palace.\n");
    }
    app.exit_detail_view(true);

    assert_eq!(app.current_view, View::Guide);
    assert_eq!(app.session.buffer().content(1), Some("A royal palace."));
}

#[test]
fn test_detail_view_discard() {
    let (mut app, _) = guide_app();
    app.enter_detail_view();
    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("Throwaway");
    }
    app.exit_detail_view(false);

    assert_eq!(app.session.buffer().content(0), Some("Welcome."));
    assert!(app.editor_state.is_none());
}

#[test]
fn test_title_prompt_updates_draft() {
    let (mut app, _) = guide_app();
    app.start_title_edit();
    let prompt = app.prompt.as_mut().unwrap();
    assert_eq!(prompt.kind, PromptKind::EditTitle(0));
    assert_eq!(prompt.input, "Introduction");
    prompt.input = "Bienvenue".to_string();

    app.submit_prompt();

    assert_eq!(app.current_view, View::Guide);
    assert_eq!(app.session.buffer().title(0), Some("Bienvenue"));
}

#[test]
fn test_blank_title_prompt_keeps_old_title() {
    let (mut app, _) = guide_app();
    app.start_title_edit();
    app.prompt.as_mut().unwrap().input = "   ".to_string();

    app.submit_prompt();

    assert_eq!(app.session.buffer().title(0), Some("Introduction"));
    assert_eq!(
        app.message.as_deref(),
        Some("Section title cannot be empty.")
    );
}

#[test]
fn test_delete_needs_confirmation() {
    let (mut app, _) = guide_app();
    app.start_delete();
    app.prompt.as_mut().unwrap().input = "n".to_string();
    app.submit_prompt();
    assert_eq!(app.session.buffer().len(), 3);

    app.select_next_section();
    app.select_next_section();
    app.start_delete();
    app.prompt.as_mut().unwrap().input = "y".to_string();
    app.submit_prompt();

    assert_eq!(app.session.buffer().len(), 2);
    assert_eq!(app.selected_section, 1);
    assert_eq!(app.message.as_deref(), Some("Section deleted"));
}

#[test]
fn test_regenerate_through_prompt() {
    let (mut app, _) = guide_app();
    app.select_next_section();
    app.start_regenerate();
    app.prompt.as_mut().unwrap().input = "shorter".to_string();
    app.submit_prompt();
    app.run_pending();

    assert_eq!(app.session.buffer().content(1), Some("Old. (rewritten)"));
    assert_eq!(app.message.as_deref(), Some("Section regenerated"));
}

#[test]
fn test_copy_uses_live_draft() {
    let (mut app, calls) = guide_app();
    app.session.set_content(0, "Edited welcome.").unwrap();

    app.copy_selected();

    assert_eq!(calls.borrow().copied, vec!["Edited welcome.".to_string()]);
}

#[test]
fn test_narration_toggles() {
    let (mut app, calls) = guide_app();

    app.toggle_narration();
    assert!(app.is_speaking());
    assert_eq!(
        calls.borrow().spoken,
        vec!["Introduction. Welcome.. History. Old.. Food. Crêpes.. ".to_string()]
    );

    app.toggle_narration();
    assert!(!app.is_speaking());
}

#[test]
fn test_narration_without_guide() {
    let (mut app, _) = app();
    app.toggle_narration();

    assert!(!app.is_speaking());
    assert_eq!(app.message.as_deref(), Some("No guide is loaded"));
}

#[test]
fn test_closing_guide_stops_narration() {
    let (mut app, _) = guide_app();
    app.toggle_narration();
    app.close_guide();

    assert!(!app.is_speaking());
    assert_eq!(app.current_view, View::Search);
}

#[test]
fn test_save_command() {
    let (mut app, calls) = guide_app();
    app.session.set_content(0, "Bonjour.").unwrap();

    assert!(!app.run_command("w"));
    app.run_pending();

    assert_eq!(app.message.as_deref(), Some("Guide saved successfully!"));
    assert!(calls.borrow().saved[0].starts_with("## Introduction\nBonjour.\n\n"));
}

#[test]
fn test_export_command_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _) = app_with_dir(dir.path().to_path_buf());
    app.queue(PendingAction::OpenPlace("Louvre".to_string()));
    app.run_pending();

    app.run_command("export");

    let text = fs::read_to_string(dir.path().join("Louvre_guide.txt")).unwrap();
    assert!(text.ends_with("## Parting Tip\nGo early.\n\n"));
    assert!(app.message.unwrap().starts_with("Exported to "));
}

#[test]
fn test_editor_commands() {
    let (mut app, _) = guide_app();
    app.enter_detail_view();
    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("Salut.");
    }

    assert!(!app.run_command("w"));
    assert_eq!(app.current_view, View::Detail);
    assert_eq!(app.session.buffer().content(0), Some("Salut."));

    assert!(!app.run_command("q"));
    assert_eq!(app.current_view, View::Guide);
    assert!(app.editor_state.is_none());
}

#[test]
fn test_quit_and_unknown_commands() {
    let (mut app, _) = guide_app();

    assert!(!app.run_command("frobnicate"));
    assert_eq!(app.message.as_deref(), Some("Unknown command: frobnicate"));
    assert!(!app.run_command("q"));
    assert_eq!(app.current_view, View::Search);
    assert!(app.run_command("quit"));
}
