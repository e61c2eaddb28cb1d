/// Compensated (Kahan) summation.
///
/// Keeps a running correction term so that summing many small quadrature
/// contributions does not lose low-order bits.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanAdder {
    sum: f64,
    c: f64,
}

impl KahanAdder {
    /// A new adder with a zero sum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one term.
    #[inline]
    pub fn add(&mut self, value: f64) {
        let y = value - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    /// The current sum.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Reset the sum to zero.
    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.c = 0.0;
    }
}

impl Extend<f64> for KahanAdder {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for v in iter {
            self.add(v);
        }
    }
}

impl FromIterator<f64> for KahanAdder {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut adder = Self::new();
        adder.extend(iter);
        adder
    }
}
