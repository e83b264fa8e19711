//! Collapsing measurement and non-collapsing sampling.

use std::collections::BTreeMap;

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::buffer::{AmplitudeBuffer, qubit_mask};
use crate::error::{SimError, SimResult};
use crate::statevector::StateVector;

/// Measurement counts keyed by bitstring (qubit 0 leftmost).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate outcomes in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Outcomes by descending count, ties in bitstring order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequencies.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        if total == 0.0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }
}

/// Bitstring of basis index `index` in an `n`-qubit register (qubit 0 leftmost).
pub fn bitstring(index: usize, num_qubits: usize) -> String {
    format!("{index:0num_qubits$b}")
}

/// Outcome probabilities `|a_i|²` in index order.
pub fn probabilities(state: &StateVector) -> Vec<f64> {
    state.amplitudes().iter().map(|a| a.norm_sqr()).collect()
}

/// `⟨Z⟩ = p0 - p1` on one qubit.
pub fn expectation_z<B: AmplitudeBuffer>(state: &B, target: usize) -> SimResult<f64> {
    let (p0, p1) = branch_probabilities(state, target)?;
    Ok(p0 - p1)
}

/// Measure `target` in the computational basis and collapse.
///
/// Draws `r` uniformly in `[0, 1)` and picks outcome 0 when
/// `r·(p0 + p1) < p0`, so a slightly unnormalized state can never select
/// an empty branch. Survivors are rescaled to unit norm. The input is left
/// untouched; the collapsed state is returned alongside the outcome.
pub fn measure_qubit<B, R>(state: &B, target: usize, rng: &mut R) -> SimResult<(u8, B)>
where
    B: AmplitudeBuffer,
    R: Rng + ?Sized,
{
    let (p0, p1) = branch_probabilities(state, target)?;
    let total = p0 + p1;
    if total <= 0.0 || !total.is_finite() {
        return Err(SimError::ZeroNorm);
    }

    let r: f64 = rng.r#gen();
    let outcome = u8::from(r * total >= p0);
    let kept = if outcome == 0 { p0 } else { p1 };

    let mask = qubit_mask(state.num_qubits(), target);
    let want = if outcome == 0 { 0 } else { mask };
    let mut collapsed = state.zeroed_like();
    state.for_each_nonzero(|i, a| {
        if i & mask == want {
            collapsed.accumulate(i, a);
        }
    });
    collapsed.scale(kept.sqrt().recip());
    collapsed.compact();
    Ok((outcome, collapsed))
}

/// Draw `shots` samples from `{|a_i|²}` without touching the state.
///
/// The returned counts always sum to exactly `shots`.
pub fn sample_counts<R: Rng + ?Sized>(
    state: &StateVector,
    shots: u64,
    rng: &mut R,
) -> SimResult<Counts> {
    let mut cumulative = Vec::new();
    let mut running = 0.0;
    for (i, a) in state.amplitudes().iter().enumerate() {
        let p = a.norm_sqr();
        if p > 0.0 {
            running += p;
            cumulative.push((i, running));
        }
    }
    let Some(&(last_index, total)) = cumulative.last() else {
        return Err(SimError::ZeroNorm);
    };

    let mut hits: FxHashMap<usize, u64> = FxHashMap::default();
    for _ in 0..shots {
        let r = rng.r#gen::<f64>() * total;
        let pos = cumulative.partition_point(|&(_, c)| c <= r);
        let index = cumulative.get(pos).map_or(last_index, |&(i, _)| i);
        *hits.entry(index).or_insert(0) += 1;
    }

    let n = state.num_qubits();
    let mut counts = Counts::new();
    for (index, count) in hits {
        counts.insert(bitstring(index, n), count);
    }
    Ok(counts)
}

fn branch_probabilities<B: AmplitudeBuffer>(state: &B, target: usize) -> SimResult<(f64, f64)> {
    let n = state.num_qubits();
    if target >= n {
        return Err(SimError::QubitOutOfRange {
            qubit: target,
            num_qubits: n,
        });
    }
    let mask = qubit_mask(n, target);
    let (mut p0, mut p1) = (0.0, 0.0);
    state.for_each_nonzero(|i, a| {
        if i & mask == 0 {
            p0 += a.norm_sqr();
        } else {
            p1 += a.norm_sqr();
        }
    });
    Ok((p0, p1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply;
    use qsv_ir::{FixedGate, Gate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plus_state() -> StateVector {
        apply(&StateVector::new(1), &Gate::fixed(FixedGate::H, 0)).unwrap()
    }

    #[test]
    fn test_bitstring_msb_first() {
        assert_eq!(bitstring(2, 2), "10");
        assert_eq!(bitstring(1, 3), "001");
        assert_eq!(bitstring(0, 1), "0");
    }

    #[test]
    fn test_counts_helpers() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);
        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.sorted(), vec![("00", 5), ("11", 5)]);
        assert_eq!(counts.probabilities()["11"], 0.5);
    }

    #[test]
    fn test_measure_basis_state_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = StateVector::basis(2, 0b10);
        for _ in 0..50 {
            let (bit0, after) = measure_qubit(&state, 0, &mut rng).unwrap();
            let (bit1, _) = measure_qubit(&state, 1, &mut rng).unwrap();
            assert_eq!((bit0, bit1), (1, 0));
            assert_eq!(after, state);
        }
    }

    #[test]
    fn test_measure_collapses_and_renormalizes() {
        let mut rng = StdRng::seed_from_u64(42);
        let (outcome, collapsed) = measure_qubit(&plus_state(), 0, &mut rng).unwrap();
        let expected = StateVector::basis(1, usize::from(outcome));
        assert!((collapsed.amplitudes()[usize::from(outcome)].norm() - 1.0).abs() < 1e-12);
        assert!(collapsed.amplitudes()[1 - usize::from(outcome)].norm() < 1e-15);
        assert_eq!(collapsed.num_qubits(), expected.num_qubits());
    }

    #[test]
    fn test_measure_rejects_bad_target() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            measure_qubit(&StateVector::new(1), 1, &mut rng),
            Err(SimError::QubitOutOfRange { qubit: 1, .. })
        ));
    }

    #[test]
    fn test_sampling_leaves_state_and_conserves_shots() {
        let state = plus_state();
        let before = state.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let counts = sample_counts(&state, 1000, &mut rng).unwrap();
        assert_eq!(counts.total(), 1000);
        assert!(counts.get("0") > 400 && counts.get("1") > 400);
        assert_eq!(state, before);
    }

    #[test]
    fn test_sampling_zero_shots() {
        let mut rng = StdRng::seed_from_u64(1);
        let counts = sample_counts(&StateVector::new(2), 0, &mut rng).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_expectation_z() {
        assert!((expectation_z(&StateVector::new(1), 0).unwrap() - 1.0).abs() < 1e-12);
        assert!((expectation_z(&StateVector::basis(1, 1), 0).unwrap() + 1.0).abs() < 1e-12);
        assert!(expectation_z(&plus_state(), 0).unwrap().abs() < 1e-12);
    }
}
