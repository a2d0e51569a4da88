#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub bytes: u64,
    pub frames: usize,
    pub pixels: usize,
}
