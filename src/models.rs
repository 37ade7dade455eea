// Data models: the records that flow from the feed, through the vision
// client, into the aggregator.
//
// Posts arrive in Instagram Graph API shape (snake_case). Everything the
// service emits (annotations, images, summaries) serializes as camelCase
// JSON for the dashboard front end.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A feed post as returned by the Instagram Graph API media edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Hidden like counts are omitted by the Graph API.
    #[serde(default)]
    pub like_count: i64,
    #[serde(with = "graph_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub media_url: String,
}

impl Post {
    /// Parse a feed export: either a bare array of media objects or a Graph
    /// API page (`{"data": [...], "paging": {...}}`).
    pub fn parse_feed(json: &str) -> serde_json::Result<Vec<Post>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Feed {
            List(Vec<Post>),
            Page { data: Vec<Post> },
        }

        serde_json::from_str::<Feed>(json).map(|feed| match feed {
            Feed::List(posts) | Feed::Page { data: posts } => posts,
        })
    }
}

/// Vendor confidence that a face attribute is present.
///
/// Variants are declared in ascending order so `Ord` follows the scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    /// Integer weight used when summing likelihoods across faces.
    pub fn weight(self) -> u32 {
        match self {
            Likelihood::Unknown | Likelihood::VeryUnlikely | Likelihood::Unlikely => 0,
            Likelihood::Possible => 1,
            Likelihood::Likely => 2,
            Likelihood::VeryLikely => 3,
        }
    }
}

/// One corner of a face bounding box, as fractions of image width/height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    pub x_fraction: f64,
    pub y_fraction: f64,
}

/// A single detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceAnnotation {
    pub anger_likelihood: Likelihood,
    pub joy_likelihood: Likelihood,
    pub sorrow_likelihood: Likelihood,
    pub surprise_likelihood: Likelihood,
    pub blurred_likelihood: Likelihood,
    pub headwear_likelihood: Likelihood,
    pub under_exposed_likelihood: Likelihood,
    pub detection_confidence: f64,
    pub pan_angle: f64,
    pub roll_angle: f64,
    pub tilt_angle: f64,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub bounds: [Corner; 4],
}

/// One entry of an image's dominant color palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub pixel_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Color {
    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// A detected subject label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    pub description: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub topicality: f64,
}

/// Everything the vision client reports for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_annotations: Option<Vec<FaceAnnotation>>,
    #[serde(default)]
    pub label_annotations: Vec<Label>,
    #[serde(default)]
    pub dominant_colors: Vec<Color>,
}

impl Annotation {
    /// The face the aggregator counts for this image. Additional faces are ignored.
    pub fn primary_face(&self) -> Option<&FaceAnnotation> {
        self.face_annotations.as_ref().and_then(|faces| faces.first())
    }
}

/// A post joined with its vision annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub like_count: i64,
    #[serde(with = "graph_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub url: String,
    pub annotation: Annotation,
}

impl Image {
    pub fn from_post(post: &Post, annotation: Annotation) -> Self {
        Self {
            id: post.id.clone(),
            like_count: post.like_count,
            timestamp: post.timestamp,
            url: post.media_url.clone(),
            annotation,
        }
    }
}

/// The four emotions the summary can report, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Joy,
    Sorrow,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Anger,
        Emotion::Joy,
        Emotion::Sorrow,
        Emotion::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Joy => "joy",
            Emotion::Sorrow => "sorrow",
            Emotion::Surprise => "surprise",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The aggregate description of a batch of images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub most_common_emotion: Option<Emotion>,
    pub most_dominant_color: Color,
    pub most_common_subjects: Vec<Label>,
}

/// Graph API timestamps look like `2020-03-01T18:10:00+0000`, which is not
/// quite RFC 3339. Accept both on the way in, always write RFC 3339.
pub mod graph_timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    const GRAPH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_str(raw, GRAPH_FORMAT).or_else(|_| DateTime::parse_from_rfc3339(raw))
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
