use crate::StepHasher;

/// The fixed phase order of a step. Recorded every tick and folded into the
/// step hash so a reordering shows up as a state divergence.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StepStage {
    Broadphase = 1,
    RotateContacts = 2,
    ApplyGravity = 3,
    Narrowphase = 4,
    Solve = 5,
    Integrate = 6,
    ResetForces = 7,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}
