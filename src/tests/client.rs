use super::{placeholder_image_url, HttpGuideService, PlaceSummary, RegenerateRequest};

#[test]
fn test_create_client_trims_base_url() {
    let client = HttpGuideService::new("http://127.0.0.1:5000/", None).unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:5000");
}

#[test]
fn test_placeholder_image_is_keyed_by_name() {
    assert_eq!(
        placeholder_image_url("Musée d'Orsay"),
        "https://picsum.photos/seed/Mus%C3%A9e%20d%27Orsay/400/300"
    );
}

#[test]
fn test_image_prefers_service_url() {
    let mut place = PlaceSummary {
        name: "Louvre".to_string(),
        description: String::new(),
        image_url: Some("https://upload.example/louvre.jpg".to_string()),
        has_details: false,
    };
    assert_eq!(place.image(), "https://upload.example/louvre.jpg");
    place.image_url = None;
    assert_eq!(place.image(), "https://picsum.photos/seed/Louvre/400/300");
}

#[test]
fn test_regenerate_request_omits_missing_instruction() {
    let request = RegenerateRequest {
        place_name: "Louvre",
        section_title: "## Food",
        current_text: "Crêpes.",
        user_instruction: None,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json.get("user_instruction").is_none());
    assert_eq!(json["section_title"], "## Food");
}
