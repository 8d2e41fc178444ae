//! Daily motivational quote selection
//!
//! The quote must be stable for a whole day and change between days, so
//! the selector hashes the day count with a simple sin-based generator
//! instead of drawing real randomness.

pub const MOTIVATIONAL_QUOTES: [&str; 16] = [
  "Every craving you outlast is a step further up the mountain.",
  "You didn't come this far to only come this far.",
  "The best view comes after the hardest climb.",
  "One day at a time is how every summit is reached.",
  "Your lungs are thanking you with every breath.",
  "Cravings are temporary. Quitting is forever.",
  "You are stronger than your strongest urge.",
  "Each smoke-free day is money in your pocket and years on your life.",
  "The climb is hard, but the air up here is so much cleaner.",
  "Don't look down. Look how far you've come.",
  "A setback is just a setup for a comeback.",
  "Breathe deep. That's what freedom feels like.",
  "You quit for a reason. That reason still matters.",
  "Small steps every day lead to peaks conquered.",
  "Your future self is already proud of you.",
  "The mountain doesn't care how slow you climb, only that you keep going.",
];

/// frac(sin(seed) * 10000): not a real PRNG, just enough spread to make
/// consecutive days usually pick different quotes.
fn pseudo_random(seed: i64) -> f64 {
  let x = (seed as f64).sin() * 10000.0;
  x - x.floor()
}

/// Index of the quote for a given day count, clamped into range to
/// tolerate floating-point edge values.
pub fn daily_quote_index(days_since_quitting: i64, len: usize) -> usize {
  let index = (pseudo_random(days_since_quitting) * len as f64).floor() as usize;
  index.min(len - 1)
}

/// The quote of the day. Same day in, same quote out.
pub fn daily_quote(days_since_quitting: i64) -> &'static str {
  MOTIVATIONAL_QUOTES[daily_quote_index(days_since_quitting, MOTIVATIONAL_QUOTES.len())]
}
