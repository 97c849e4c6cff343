use std::sync::Arc;
use std::thread;

use trigram_core::io;
use trigram_core::Model;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Folder holding the corpus (.txt files), "./data" by default
    let folder = io::normalize_folder(&std::env::args().nth(1).unwrap_or_else(|| "./data".to_owned()));
    let files = io::list_files(&folder, "txt")?;
    if files.is_empty() {
        return Err(format!("No .txt file in {}", folder.display()).into());
    }

    // Trigrams, keeping apostrophes, commas and periods inside words
    let model = Arc::new(Model::new(3));
    let keep = "'.,";

    // One learner thread per file, at most one per CPU at a time.
    // Learners only lock the model while inserting a batch.
    for chunk in files.chunks(num_cpus::get()) {
        let handles: Vec<_> = chunk
            .iter()
            .cloned()
            .map(|path| {
                let model = Arc::clone(&model);
                thread::spawn(move || (model.learn_file(&path, keep), path))
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok((Ok(n), path)) => println!("{}: {} n-grams", path.display(), n),
                Ok((Err(e), path)) => println!("{}: {}", path.display(), e),
                Err(_) => return Err("A learner thread panicked".into()),
            }
        }
    }

    let stats = model.stats()?;
    println!(
        "prefixes: {}, endings: {}, ratio: {:.2}",
        stats.prefixes,
        stats.continuations,
        stats.ratio()
    );

    // An unknown seed comes back as is
    println!("Unknown seed: {}", model.generate("zzz zzz", 10)?);

    // A seed must have n-1 words
    match model.generate("one", 10) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Seed 'one' is invalid: {}", e),
    }

    // Generate 10 texts of up to 30 words from random prefixes
    for i in 0..10 {
        println!("Generated text {}: {}", i + 1, model.generate("", 30)?);
    }

    Ok(())
}
