//! Bounded Proof Harnesses
//!
//! Kani harnesses for the arithmetic and ordering properties the engine
//! leans on. They only compile under `cargo kani`; the bounds are kept
//! small so the state spaces stay exhaustively explorable.

#[cfg(kani)]
mod kani_proofs {
    use crate::domain::index::TaskIndex;
    use crate::domain::task::Pid;
    use crate::domain::weight::{vruntime_delta, Nice, NICE_MAX, NICE_MIN, NICE_0_WEIGHT};

    /// Every in-range nice value maps to a non-zero weight, so the
    /// virtual-runtime division can never fault or degenerate.
    #[kani::proof]
    fn proof_weight_table_nonzero() {
        let raw: i8 = kani::any();
        kani::assume(raw >= NICE_MIN && raw <= NICE_MAX);

        let nice = Nice::new(raw).unwrap();
        let weight = nice.weight();
        kani::assert(weight >= 15, "weight below the table minimum");
        kani::assert(weight <= 88761, "weight above the table maximum");
    }

    /// Out-of-range values never construct a `Nice`.
    #[kani::proof]
    fn proof_nice_rejects_out_of_range() {
        let raw: i8 = kani::any();
        kani::assume(raw < NICE_MIN || raw > NICE_MAX);
        kani::assert(Nice::new(raw).is_none(), "out-of-range nice accepted");
    }

    /// Virtual-runtime scaling neither overflows nor inverts the weight
    /// relation for slices up to one simulated second.
    #[kani::proof]
    fn proof_vruntime_delta_bounded() {
        let granted: u64 = kani::any();
        kani::assume(granted <= 1_000_000_000);
        let raw: i8 = kani::any();
        kani::assume(raw >= NICE_MIN && raw <= NICE_MAX);

        let nice = Nice::new(raw).unwrap();
        let delta = vruntime_delta(granted, nice);

        // The lightest task (weight 15) pays the most virtual time.
        kani::assert(
            delta <= granted * NICE_0_WEIGHT / 15,
            "delta above the lightest-weight ceiling"
        );
        if nice.get() <= 0 {
            kani::assert(delta <= granted, "high-weight task overpaying");
        }
    }

    /// The cached minimum of the index always equals the true minimum
    /// over a small symbolic insertion sequence.
    #[kani::proof]
    #[kani::unwind(5)]
    fn proof_index_cached_min_coherent() {
        let mut index = TaskIndex::new();
        let mut true_min: Option<(u64, Pid)> = None;

        for pid in 0..3u32 {
            let key: u64 = kani::any();
            kani::assume(key < 1024);
            let entry = (key, Pid::new(pid));
            index.insert(key, Pid::new(pid));
            true_min = Some(match true_min {
                Some(min) if min <= entry => min,
                _ => entry,
            });
        }

        kani::assert(index.min() == true_min, "cached minimum drifted");
    }
}
