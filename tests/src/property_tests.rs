//! Property tests for accumulation

use proptest::prelude::*;

use rotate_core::test_utils::{sample_rotation, RecordingQueue};
use rotate_core::{accept_delta, DeltaFormat, ProcessMode, Rotation, SensorValue, SlotId, SlotStore};

use crate::{config, instance, TestStore, CALLER, KEYMAP_LEN};

const SLOT: SlotId = SlotId::new(0, 0);

fn sample() -> impl Strategy<Value = SensorValue> {
    (-400i32..400, -999_999i32..=999_999).prop_map(|(val1, val2)| SensorValue::new(val1, val2))
}

fn triggers_per_rotation() -> impl Strategy<Value = u16> {
    prop::sample::select(vec![1u16, 2, 4, 12, 20, 24, 30, 360])
}

proptest! {
    /// Dispatched steps plus the remainder always account for every micro-degree fed in
    #[test]
    fn prop_rotation_is_conserved(
        samples in prop::collection::vec(sample(), 1..64),
        triggers in triggers_per_rotation(),
    ) {
        let store = TestStore::new();
        let cfg = config(triggers).with_delta_format(DeltaFormat::Degrees);
        let step = cfg.degrees_per_trigger() as i64 * 1_000_000;

        let mut fed = 0i64;
        let mut fired = 0i64;
        for value in samples {
            accept_delta(&store, SLOT, value, &cfg);
            fed += Rotation::from(value).as_micros();
            fired += store.snapshot(SLOT).unwrap().pending_triggers as i64;
        }

        let slot = store.snapshot(SLOT).unwrap();
        prop_assert_eq!(fired * step + slot.remainder.as_micros(), fed);
        prop_assert!(slot.remainder.as_micros().abs() < step);
        prop_assert!(slot.remainder.fraction_micros().abs() < 1_000_000);
    }

    /// Mirrored input yields mirrored triggers and remainder
    #[test]
    fn prop_sign_symmetry(
        samples in prop::collection::vec(sample(), 1..32),
        triggers in triggers_per_rotation(),
    ) {
        let forward = TestStore::new();
        let backward = TestStore::new();
        let cfg = config(triggers).with_delta_format(DeltaFormat::Degrees);

        for value in samples {
            accept_delta(&forward, SLOT, value, &cfg);
            accept_delta(&backward, SLOT, SensorValue::new(-value.val1, -value.val2), &cfg);

            let f = forward.snapshot(SLOT).unwrap();
            let b = backward.snapshot(SLOT).unwrap();
            prop_assert_eq!(f.pending_triggers, -b.pending_triggers);
            prop_assert_eq!(f.remainder.as_micros(), -b.remainder.as_micros());
        }
    }

    /// However a turn is sliced into samples, the same number of taps comes out
    #[test]
    fn prop_taps_independent_of_sampling(
        degrees in -720.0f64..720.0,
        slices in 1usize..50,
    ) {
        let rotate = instance(config(20).with_delta_format(DeltaFormat::Degrees));
        let event = rotate_core::BindingEvent::new(KEYMAP_LEN, 0);
        let mut queue = RecordingQueue::new();

        for value in sample_rotation(degrees, slices) {
            rotate.accept_data(&CALLER, &event, value);
            rotate.process(&CALLER, event, ProcessMode::Trigger, &mut queue);
        }

        let total = (degrees * 1_000_000.0).round() as i64;
        let expected = (total / 18_000_000).unsigned_abs() as usize;
        prop_assert_eq!(queue.presses(), expected);
        prop_assert_eq!(queue.releases(), expected);
        prop_assert!(queue.is_alternating());
    }
}
