// Unit tests for the data models and output helpers.
//
// Tests feed parsing (Graph API timestamps, page envelopes), likelihood
// ordering and strictness, the camelCase JSON shape of emitted records,
// and truncate_chars UTF-8 safety.

use cordoba::models::{Annotation, Color, Emotion, Label, Likelihood, Post, Summary};
use cordoba::output::truncate_chars;

// ============================================================
// Post parsing
// ============================================================

#[test]
fn parses_graph_api_media_array() {
    let json = r#"[
        {"id": "17895695668004550", "like_count": 42, "timestamp": "2020-03-01T18:10:00+0000",
         "media_url": "https://scontent.cdninstagram.com/a.jpg"},
        {"id": "17895695668004551", "timestamp": "2020-03-02T09:00:00+0000",
         "media_url": "https://scontent.cdninstagram.com/b.jpg"}
    ]"#;
    let posts = Post::parse_feed(json).unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].like_count, 42);
    assert_eq!(posts[0].timestamp.to_rfc3339(), "2020-03-01T18:10:00+00:00");
    // Hidden like counts default to zero
    assert_eq!(posts[1].like_count, 0);
}

#[test]
fn parses_graph_api_page_envelope() {
    let json = r#"{
        "data": [{"id": "1", "like_count": 3, "timestamp": "2021-07-04T12:00:00+0000",
                  "media_url": "https://cdn.example.com/1.jpg"}],
        "paging": {"cursors": {"before": "a", "after": "b"}}
    }"#;
    let posts = Post::parse_feed(json).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "1");
}

#[test]
fn accepts_rfc3339_timestamps() {
    let json = r#"[{"id": "1", "timestamp": "2021-07-04T12:00:00Z", "media_url": "u"}]"#;
    let posts = Post::parse_feed(json).unwrap();
    assert_eq!(posts[0].timestamp.to_rfc3339(), "2021-07-04T12:00:00+00:00");
}

#[test]
fn rejects_garbage_timestamps() {
    let json = r#"[{"id": "1", "timestamp": "yesterday", "media_url": "u"}]"#;
    assert!(Post::parse_feed(json).is_err());
}

#[test]
fn rejects_posts_without_media_url() {
    let json = r#"[{"id": "1", "timestamp": "2021-07-04T12:00:00Z"}]"#;
    assert!(Post::parse_feed(json).is_err());
}

// ============================================================
// Likelihood
// ============================================================

#[test]
fn likelihood_levels_are_ordered() {
    assert!(Likelihood::Unknown < Likelihood::VeryUnlikely);
    assert!(Likelihood::VeryUnlikely < Likelihood::Unlikely);
    assert!(Likelihood::Unlikely < Likelihood::Possible);
    assert!(Likelihood::Possible < Likelihood::Likely);
    assert!(Likelihood::Likely < Likelihood::VeryLikely);
}

#[test]
fn likelihood_parses_vendor_strings() {
    let parsed: Vec<Likelihood> =
        serde_json::from_str(r#"["UNKNOWN", "VERY_UNLIKELY", "POSSIBLE", "VERY_LIKELY"]"#).unwrap();
    assert_eq!(
        parsed,
        [
            Likelihood::Unknown,
            Likelihood::VeryUnlikely,
            Likelihood::Possible,
            Likelihood::VeryLikely
        ]
    );
}

#[test]
fn unknown_likelihood_string_is_an_error() {
    assert!(serde_json::from_str::<Likelihood>(r#""PROBABLY""#).is_err());
}

#[test]
fn face_fields_default_when_missing() {
    let annotation: Annotation =
        serde_json::from_str(r#"{"faceAnnotations": [{"joyLikelihood": "LIKELY"}]}"#).unwrap();
    let face = annotation.primary_face().unwrap();
    assert_eq!(face.joy_likelihood, Likelihood::Likely);
    assert_eq!(face.anger_likelihood, Likelihood::Unknown);
    assert_eq!(face.detection_confidence, 0.0);
    assert!(annotation.dominant_colors.is_empty());
}

// ============================================================
// Emitted JSON shape
// ============================================================

#[test]
fn summary_serializes_camel_case() {
    let summary = Summary {
        most_common_emotion: Some(Emotion::Joy),
        most_dominant_color: Color {
            red: 10,
            green: 20,
            blue: 30,
            pixel_fraction: 0.4,
            score: None,
        },
        most_common_subjects: vec![Label {
            mid: Some("/m/0bt9lr".to_string()),
            description: "dog".to_string(),
            score: 0.97,
            topicality: 0.97,
        }],
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["mostCommonEmotion"], "joy");
    assert_eq!(json["mostDominantColor"]["pixelFraction"], 0.4);
    assert!(json["mostDominantColor"].get("score").is_none());
    assert_eq!(json["mostCommonSubjects"][0]["description"], "dog");
}

#[test]
fn summary_without_faces_serializes_null_emotion() {
    let summary = Summary {
        most_common_emotion: None,
        most_dominant_color: Color::default(),
        most_common_subjects: vec![],
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["mostCommonEmotion"].is_null());
}

#[test]
fn color_hex_is_zero_padded() {
    let color = Color {
        red: 255,
        green: 8,
        blue: 0,
        pixel_fraction: 0.1,
        score: None,
    };
    assert_eq!(color.hex(), "#ff0800");
}

#[test]
fn emotion_display_is_lowercase() {
    let names: Vec<String> = Emotion::ALL.iter().map(|e| e.to_string()).collect();
    assert_eq!(names, ["anger", "joy", "sorrow", "surprise"]);
}

// ============================================================
// truncate_chars
// ============================================================

#[test]
fn truncate_short_string_unchanged() {
    assert_eq!(truncate_chars("golden retriever", 30), "golden retriever");
}

#[test]
fn truncate_long_string_appends_ellipsis() {
    assert_eq!(truncate_chars("abcdefghij", 4), "abcd...");
}

#[test]
fn truncate_respects_multibyte_chars() {
    assert_eq!(truncate_chars("café crème brûlée", 6), "café c...");
    assert_eq!(truncate_chars("🐶🐱🐭🐹", 2), "🐶🐱...");
}
