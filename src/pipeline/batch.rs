// Batch fetcher: annotate a prefix of the feed concurrently.
//
// Every selected post is sent to the vision client at once and the batch
// resolves when all of them have. The join is all-or-nothing: if any
// single annotation fails, the whole batch fails and no partial results are
// returned. There are no retries and no per-request timeout here; a hung
// request holds up the batch.

use anyhow::{Context, Result};
use futures::future;
use tracing::info;

use crate::models::{Image, Post};
use crate::vision::traits::VisionClient;

/// Annotate the first `cap` posts and join each with its post metadata.
///
/// Output order matches input order regardless of which request finishes
/// first.
pub async fn fetch_batch(
    vision: &dyn VisionClient,
    posts: &[Post],
    cap: usize,
) -> Result<Vec<Image>> {
    let selected = &posts[..cap.min(posts.len())];
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    info!(
        selected = selected.len(),
        available = posts.len(),
        "Annotating feed batch"
    );

    // join_all polls every request to completion and yields results in
    // submission order.
    let results: Vec<Result<Image>> =
        future::join_all(selected.iter().map(|post| annotate_post(vision, post))).await;

    let images = results.into_iter().collect::<Result<Vec<_>>>()?;

    info!(images = images.len(), "Feed batch annotated");

    Ok(images)
}

async fn annotate_post(vision: &dyn VisionClient, post: &Post) -> Result<Image> {
    let annotation = vision
        .analyze_image(&post.media_url)
        .await
        .with_context(|| format!("Analysis unavailable for post {}", post.id))?;
    Ok(Image::from_post(post, annotation))
}
