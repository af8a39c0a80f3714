use super::GuideError;
use crate::client::RemoteCall;

fn status_error(call: RemoteCall) -> GuideError {
    GuideError::Status {
        call,
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: "model offline".to_string(),
    }
}

#[test]
fn test_status_display_names_the_call() {
    let err = status_error(RemoteCall::SaveDescription);
    assert_eq!(
        err.to_string(),
        "/save-detailed-description returned 500 Internal Server Error: model offline"
    );
}

#[test]
fn test_user_messages_per_call() {
    assert_eq!(
        status_error(RemoteCall::SearchPlaces).user_message(),
        "Sorry, something went wrong. Please try again."
    );
    assert_eq!(
        status_error(RemoteCall::PlaceDetails).user_message(),
        "Could not load details. Please try again later."
    );
    assert!(status_error(RemoteCall::RegenerateSection)
        .user_message()
        .starts_with("Could not regenerate section: /regenerate-section returned 500"));
    assert!(status_error(RemoteCall::SaveDescription)
        .user_message()
        .contains("model offline"));
}

#[test]
fn test_local_errors_are_not_network() {
    assert!(!GuideError::EmptyInput.is_network());
    assert_eq!(GuideError::EmptyInput.user_message(), "Please enter a location.");
    assert!(status_error(RemoteCall::PlaceDetails).is_network());
}
