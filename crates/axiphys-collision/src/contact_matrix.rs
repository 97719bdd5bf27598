/// Packed N×N contact-history table. For a pair `(lo, hi)` with `lo < hi`
/// the CURRENT step's bit lives in the upper triangle at `lo + hi·N` and the
/// PREVIOUS step's bit in the lower triangle at `hi + lo·N`. The diagonal is
/// never written.
#[derive(Clone, Debug, Default)]
pub struct ContactMatrix {
    n: usize,
    bits: Vec<u16>,
}

impl ContactMatrix {
    pub fn new() -> Self { Self { n: 0, bits: Vec::new() } }

    #[inline] pub fn len(&self) -> usize { self.n }
    #[inline] pub fn is_empty(&self) -> bool { self.n == 0 }

    /// Reallocate for `n` bodies. All history is dropped; every new pair
    /// starts as a first contact.
    pub fn resize(&mut self, n: usize) {
        self.n = n;
        self.bits = vec![0; n * n];
    }

    #[inline]
    fn order(i: usize, j: usize) -> (usize, usize) {
        if i < j { (i, j) } else { (j, i) }
    }

    pub fn current(&self, i: usize, j: usize) -> bool {
        if i == j { return false; }
        let (lo, hi) = Self::order(i, j);
        self.bits[lo + hi * self.n] != 0
    }

    pub fn set_current(&mut self, i: usize, j: usize, touching: bool) {
        if i == j { return; }
        let (lo, hi) = Self::order(i, j);
        self.bits[lo + hi * self.n] = touching as u16;
    }

    pub fn previous(&self, i: usize, j: usize) -> bool {
        if i == j { return false; }
        let (lo, hi) = Self::order(i, j);
        self.bits[hi + lo * self.n] != 0
    }

    /// Shift the current plane into the previous plane and clear the current
    /// one. Runs once per step, before narrowphase.
    pub fn rotate(&mut self) {
        for lo in 0..self.n {
            for hi in (lo + 1)..self.n {
                self.bits[hi + lo * self.n] = self.bits[lo + hi * self.n];
                self.bits[lo + hi * self.n] = 0;
            }
        }
    }

    /// Forget all history involving `body`, in both planes. The next touch
    /// against any partner resolves as a first contact again.
    pub fn clear_body(&mut self, body: usize) {
        for other in 0..self.n {
            if other == body { continue; }
            self.bits[body + other * self.n] = 0;
            self.bits[other + body * self.n] = 0;
        }
    }

    /// True iff every diagonal entry is zero. The engine never writes the
    /// diagonal; this is the checkable form of that invariant.
    pub fn diagonal_is_clear(&self) -> bool {
        (0..self.n).all(|i| self.bits[i + i * self.n] == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_planes_are_independent() {
        let mut m = ContactMatrix::new();
        m.resize(4);
        m.set_current(1, 3, true);
        assert!(m.current(1, 3));
        assert!(m.current(3, 1)); // order-insensitive lookup
        assert!(!m.previous(1, 3));
    }

    #[test]
    fn rotate_moves_current_into_previous() {
        let mut m = ContactMatrix::new();
        m.resize(3);
        m.set_current(0, 2, true);
        m.rotate();
        assert!(!m.current(0, 2));
        assert!(m.previous(0, 2));
        m.rotate();
        assert!(!m.previous(0, 2)); // history is one step deep
    }

    #[test]
    fn clear_body_wipes_both_planes() {
        let mut m = ContactMatrix::new();
        m.resize(3);
        m.set_current(0, 1, true);
        m.rotate();
        m.set_current(0, 1, true);
        m.clear_body(0);
        assert!(!m.current(0, 1));
        assert!(!m.previous(0, 1));
    }

    #[test]
    fn resize_drops_history() {
        let mut m = ContactMatrix::new();
        m.resize(2);
        m.set_current(0, 1, true);
        m.resize(3);
        assert!(!m.current(0, 1));
        assert!(m.diagonal_is_clear());
    }

    #[test]
    fn diagonal_stays_clear() {
        let mut m = ContactMatrix::new();
        m.resize(3);
        m.set_current(1, 1, true); // ignored
        m.set_current(0, 2, true);
        m.rotate();
        assert!(m.diagonal_is_clear());
    }
}
