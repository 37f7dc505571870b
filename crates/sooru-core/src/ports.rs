/// Wall-clock source for record timestamps. Kept out of the pure crates so
/// layout and validation stay deterministic.
pub trait ClockPort: Send + Sync {
    fn now_unix_ms(&self) -> u64;
}
