//! List categories and audio vibes.

use vibe_project_model::category::{AudioVibe, Category};
use vibe_render_engine::filter::Filter;

pub fn run() -> anyhow::Result<()> {
    println!("Categories:");
    for category in Category::ALL {
        println!(
            "  {:<13} {:<13} {}",
            category.as_str(),
            category.label(),
            Filter::ColorGrade(category.color_grade())
        );
    }
    println!();

    println!("Audio vibes:");
    for vibe in AudioVibe::ALL {
        println!("  {:<13} {:<13} {}", vibe.as_str(), vibe.label(), vibe.description());
    }
    Ok(())
}
