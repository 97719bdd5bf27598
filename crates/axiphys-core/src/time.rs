/// Per-step counters returned by `World::step`.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepStats {
    pub pairs_tested: u32,
    pub contacts: u32,
    pub equations: u32,
    pub pairs_skipped: u32,
}
