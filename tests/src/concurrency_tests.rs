//! Sensor sampling and key processing running in separate contexts

use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};

use rotate_core::test_utils::RecordingQueue;
use rotate_core::{
    BindingEvent, CoarseSlotTable, ProcessMode, SensorRotate, SensorValue, SlotId, SlotStore, VirtualPositions,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::{config, instance, positions, CALLER, KEYMAP_LEN};

/// Accept and process on different threads per slot; every slot ends up with its own exact count
fn run_disjoint_slots<S: SlotStore + Send + Sync + 'static>(rotate: Arc<SensorRotate<S>>) {
    let handles: Vec<_> = (0..2u32)
        .flat_map(|sensor| (0..4u8).map(move |layer| (sensor, layer)))
        .map(|(sensor, layer)| {
            let rotate = Arc::clone(&rotate);
            thread::spawn(move || {
                let event = BindingEvent::new(KEYMAP_LEN + sensor, layer);
                let mut queue = RecordingQueue::new();
                for _ in 0..500 {
                    rotate.accept_data(&CALLER, &event, SensorValue::new(45, 0));
                    rotate.process(&CALLER, event, ProcessMode::Trigger, &mut queue);
                }
                queue.presses()
            })
        })
        .collect();

    for handle in handles {
        // 500 samples of 45 degrees at 90 degrees per trigger
        assert_eq!(handle.join().unwrap(), 250);
    }
}

#[test]
fn test_per_slot_locking_across_threads() {
    run_disjoint_slots(Arc::new(instance(config(4))));
}

#[test]
fn test_coarse_locking_across_threads() {
    let store: CoarseSlotTable<CriticalSectionRawMutex, 2, 4> = CoarseSlotTable::new();
    run_disjoint_slots(Arc::new(SensorRotate::new(config(4), store, positions())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sample_visible_to_next_process() {
    let rotate = Arc::new(instance(config(20)));
    let event = BindingEvent::new(KEYMAP_LEN + 1, 3);
    let (tx, mut rx) = mpsc::channel::<oneshot::Sender<usize>>(1);

    let sensor = {
        let rotate = Arc::clone(&rotate);
        tokio::spawn(async move {
            let mut taps = 0;
            for i in 0..100 {
                let degrees = if i % 2 == 0 { 20 } else { -20 };
                rotate.accept_data(&CALLER, &event, SensorValue::new(degrees, 0));

                let (ack_tx, ack_rx) = oneshot::channel();
                tx.send(ack_tx).await.unwrap();
                taps += ack_rx.await.unwrap();
            }
            taps
        })
    };

    let keys = {
        let rotate = Arc::clone(&rotate);
        tokio::spawn(async move {
            let mut queue = RecordingQueue::new();
            while let Some(ack) = rx.recv().await {
                let before = queue.presses();
                rotate.process(&CALLER, event, ProcessMode::Trigger, &mut queue);
                ack.send(queue.presses() - before).unwrap();
            }
            queue
        })
    };

    let taps = sensor.await.unwrap();
    let queue = keys.await.unwrap();

    // Every 20 degree sample crosses exactly one 18 degree step
    assert_eq!(taps, 100);
    assert!(queue.is_alternating());
    assert_eq!(rotate.slots().snapshot(SlotId::new(1, 3)).unwrap().pending_triggers, 0);
}

#[test]
fn test_noop_mutex_single_context() {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use rotate_core::SlotTable;

    let rotate = SensorRotate::new(config(4), SlotTable::<NoopRawMutex, 1, 1>::new(), VirtualPositions::new(0));
    let event = BindingEvent::new(0, 0);
    let mut queue = RecordingQueue::new();

    rotate.accept_data(&CALLER, &event, SensorValue::new(360, 0));
    assert!(rotate.process(&CALLER, event, ProcessMode::Trigger, &mut queue).is_opaque());
    assert_eq!(queue.presses(), 4);
}
