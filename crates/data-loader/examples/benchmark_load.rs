use data_loader::{MovieDataset, Profile};
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/ml-1m");

    println!("Loading MovieLens 1M dataset...\n");

    let start = Instant::now();
    let dataset = MovieDataset::load_from_files(data_dir)
        .expect("Failed to load dataset");
    let loaded = start.elapsed();

    let start = Instant::now();
    let prompt_bytes: usize = dataset.iter().map(|user| user.prompt().len()).sum();
    let rendered = start.elapsed();

    let ratings: usize = dataset.iter().map(|user| user.ratings.len()).sum();

    println!("\n=== Load Complete ===");
    println!("Load time: {:?}", loaded);
    println!("Users: {}", dataset.len());
    println!("Ratings: {}", ratings);
    println!("Prompt render time: {:?} ({} bytes)", rendered, prompt_bytes);
}
