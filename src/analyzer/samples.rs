/// Predefined example reviews offered next to the input box.
pub const SAMPLE_REVIEWS: [&str; 4] = [
    "The battery life on this new phone is incredible! Lasts me two full days with heavy usage. The camera is also a huge step up.",
    "I was really disappointed with the service. My order was late, and when it arrived, it was the wrong item. Customer support was not helpful.",
    "The movie was okay. The plot was a bit predictable, and the acting was decent but not outstanding. Not bad for a Saturday night.",
    "Absolutely love this new coffee machine! It's fast, quiet, and makes the perfect espresso every time. A game-changer for my mornings.",
];

/// Look up a sample by index.
pub fn sample(index: usize) -> Option<&'static str> {
    SAMPLE_REVIEWS.get(index).copied()
}
