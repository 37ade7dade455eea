// Feed analysis pipeline: posts -> vision annotations -> summary.
//
// `batch` fans the selected posts out to the vision client; `analyze_posts`
// chains that with the aggregator. Both the CLI and the web handlers go
// through here.

pub mod batch;

use anyhow::Result;
use tracing::info;

use crate::aggregate;
use crate::models::{Image, Post, Summary};
use crate::vision::traits::VisionClient;

/// Fetch and annotate up to `cap` posts, then summarize them.
///
/// Returns the annotated images alongside the summary so callers can show
/// per-image detail.
pub async fn analyze_posts(
    vision: &dyn VisionClient,
    posts: &[Post],
    cap: usize,
) -> Result<(Vec<Image>, Summary)> {
    let images = batch::fetch_batch(vision, posts, cap).await?;
    let summary = aggregate::aggregate(&images)?;

    info!(
        images = images.len(),
        emotion = summary.most_common_emotion.map(|e| e.as_str()).unwrap_or("none"),
        color = summary.most_dominant_color.hex(),
        subjects = summary.most_common_subjects.len(),
        "Summarized feed"
    );

    Ok((images, summary))
}
