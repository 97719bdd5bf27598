/// What a run promises about reproducibility. Two runs under the same
/// contract and the same inputs must produce identical step hashes.
#[derive(Copy, Clone, Debug)]
pub struct DeterminismContract {
    pub fixed_dt: f32,
    pub float: &'static str,
    pub iterations: u32,
    pub stable_order: bool,
}

impl DeterminismContract {
    pub fn default_contract() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            float: "f32",
            iterations: 10,
            stable_order: true,
        }
    }
}
