use axiphys_core::{StepStage, schedule_digest, Vec3};

/* ---------------------- Schedule recorder ---------------------- */
#[derive(Default)]
pub struct ScheduleRecorder {
    stages: Vec<StepStage>,
}
impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/* ---------------------- Debug settings ---------------------- */
#[derive(Copy, Clone, Debug)]
pub struct DebugSettings {
    /// Print a summary (and dump the ledger) every N steps; 0 disables.
    pub print_every: u32,
    pub show_bodies: bool,
    pub show_contacts: bool,
    pub show_energy: bool,
    /// Clamp on printed lines per section.
    pub max_lines: usize,
}
impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            print_every: 0,
            show_bodies: false,
            show_contacts: false,
            show_energy: false,
            max_lines: 200,
        }
    }
}

/* ---------------------- Telemetry events ---------------------- */
#[derive(Copy, Clone, Debug)]
pub enum LedgerEvent {
    /// Narrowphase emitted a contact for this pair.
    ContactBegin { a: u32, b: u32, normal: Vec3, depth: f32 },
    /// First-contact impulse applied between a and b.
    Impulse { a: u32, b: u32, j: Vec3 },
    /// A persistent-contact row was handed to the solver. `b < 0` marks a
    /// one-body row.
    RowAdded { a: u32, b: i32 },
    /// Solver ran this step.
    SolveSummary { rows: u32, iterations: u32 },
    /// Pair had no narrowphase handler and was skipped.
    PairSkipped { a: u32, b: u32 },
}

impl LedgerEvent {
    pub fn to_json(&self) -> String {
        match *self {
            LedgerEvent::ContactBegin { a, b, normal, depth } =>
                format!(r#"{{"t":"C","a":{},"b":{},"nx":{:.6},"ny":{:.6},"nz":{:.6},"d":{:.6}}}"#,
                        a, b, normal.x, normal.y, normal.z, depth),
            LedgerEvent::Impulse { a, b, j } =>
                format!(r#"{{"t":"J","a":{},"b":{},"jx":{:.6},"jy":{:.6},"jz":{:.6}}}"#,
                        a, b, j.x, j.y, j.z),
            LedgerEvent::RowAdded { a, b } =>
                format!(r#"{{"t":"R","a":{},"b":{}}}"#, a, b),
            LedgerEvent::SolveSummary { rows, iterations } =>
                format!(r#"{{"t":"S","rows":{},"iters":{}}}"#, rows, iterations),
            LedgerEvent::PairSkipped { a, b } =>
                format!(r#"{{"t":"K","a":{},"b":{}}}"#, a, b),
        }
    }
}

/* ---------------------- Ledger buffer ---------------------- */
pub struct Ledger {
    events: Vec<LedgerEvent>,
    cap: usize,
}

impl Ledger {
    /// Create a ledger holding at most `cap` events per step.
    pub fn new(cap: usize) -> Self {
        Self { events: Vec::with_capacity(cap), cap }
    }
    pub fn clear(&mut self) { self.events.clear(); }
    /// Append one event (drops if over cap).
    pub fn push(&mut self, e: LedgerEvent) {
        if self.events.len() < self.cap {
            self.events.push(e);
        }
    }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }

    /// Write events as JSONL to `dir/telemetry_######.jsonl`, one file per
    /// step, lines in emission order.
    pub fn write_jsonl(&self, dir: &str, step: u64) -> std::io::Result<()> {
        use std::fs::{create_dir_all, OpenOptions};
        use std::io::Write;

        create_dir_all(dir)?;
        let path = format!("{}/telemetry_{:06}.jsonl", dir, step);
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        for e in self.events.iter() {
            f.write_all(e.to_json().as_bytes())?;
            f.write_all(b"\n")?;
        }
        Ok(())
    }
}
