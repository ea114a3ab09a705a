//! `campusbuddy classify`: Show how an utterance's tone is scored.

use campusbuddy_agent::ToneClassifier;

pub fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = ToneClassifier::new();
    let scores = classifier.classify(text);

    println!("  casual:   {:.2}", scores.casual);
    println!("  formal:   {:.2}", scores.formal);
    println!("  academic: {:.2}", scores.academic);
    println!("  tone:     {}", scores.dominant());
    Ok(())
}
