// Colored terminal output for feed batches and summaries.
//
// All terminal-specific formatting lives here: colors, tables, swatches.
// main.rs only decides what to show.

use colored::Colorize;

use crate::aggregate::colors;
use crate::models::{Color, Emotion, Image, Summary};

use super::truncate_chars;

/// Display one row per annotated image.
pub fn display_batch(images: &[Image]) {
    if images.is_empty() {
        println!("No images analyzed.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Analyzed Images ({}) ===", images.len()).bold()
    );
    println!();

    println!(
        "  {:<20} {:>7}  {:<20}  {:<4}  {:<COLOR_WIDTH$}  {}",
        "Post".dimmed(),
        "Likes".dimmed(),
        "Posted".dimmed(),
        "Face".dimmed(),
        "Color".dimmed(),
        "Labels".dimmed(),
    );
    println!("  {}", "-".repeat(86).dimmed());

    for image in images {
        let face = if image.annotation.primary_face().is_some() {
            "yes".green()
        } else {
            "no".dimmed()
        };
        let color = color_cell(colors::most_dominant(&image.annotation.dominant_colors));
        let labels = image
            .annotation
            .label_annotations
            .iter()
            .map(|l| l.description.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "  {:<20} {:>7}  {:<20}  {:<4}  {}  {}",
            truncate_chars(&image.id, 17),
            image.like_count,
            image.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            face,
            color,
            truncate_chars(&labels, 40),
        );
    }
    println!();
}

/// Display the batch summary.
pub fn display_summary(summary: &Summary, image_count: usize) {
    println!(
        "\n{}",
        format!("=== Feed Summary ({image_count} images) ===").bold()
    );
    println!();

    match summary.most_common_emotion {
        Some(emotion) => println!("  Emotion:  {}", colorize_emotion(emotion)),
        None => println!("  Emotion:  {}", "no faces detected".dimmed()),
    }

    let color = &summary.most_dominant_color;
    println!(
        "  Color:    {} {} (rgb {}, {}, {}; {:.1}% of pixels)",
        swatch(color),
        color.hex().bold(),
        color.red,
        color.green,
        color.blue,
        color.pixel_fraction * 100.0,
    );

    if summary.most_common_subjects.is_empty() {
        println!("  Subjects: {}", "none".dimmed());
    } else {
        println!("  Subjects:");
        for (i, label) in summary.most_common_subjects.iter().enumerate() {
            println!(
                "    {}. {:<32} {}",
                i + 1,
                truncate_chars(&label.description, 30),
                format!("topicality {:.2}", label.topicality).dimmed(),
            );
        }
    }
    println!();
}

/// Visible width of the Color column: a two-cell swatch, a space, `#rrggbb`.
const COLOR_WIDTH: usize = 10;

/// The Color column for one row. Only the visible text is padded; the
/// swatch's escape codes sit outside the width.
fn color_cell(color: Option<&Color>) -> String {
    match color {
        Some(c) => format!("{} {:<7}", swatch(c), c.hex()),
        None => format!("{:<COLOR_WIDTH$}", "-"),
    }
}

/// A two-cell block painted in the color itself.
fn swatch(color: &Color) -> colored::ColoredString {
    "  ".on_truecolor(color.red, color.green, color.blue)
}

fn colorize_emotion(emotion: Emotion) -> colored::ColoredString {
    match emotion {
        Emotion::Anger => emotion.as_str().red().bold(),
        Emotion::Joy => emotion.as_str().yellow().bold(),
        Emotion::Sorrow => emotion.as_str().blue().bold(),
        Emotion::Surprise => emotion.as_str().magenta().bold(),
    }
}
