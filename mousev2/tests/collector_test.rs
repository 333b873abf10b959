mod common;
pub(crate) use crate::common::*;

mod collector_test {
    use std::sync::Mutex;

    use mousev2::hid::{HidCollector, HidSignal, HidSource, HidSourceRegistry};

    use super::*;

    #[test]
    fn test_lower_id_fills_first() {
        let log = Mutex::new(Vec::new());
        let signal = HidSignal::new();
        let idle: Vec<RecordingSource> = ["s0", "s1", "s3", "s4"]
            .into_iter()
            .map(|name| RecordingSource::new(&signal, name, &log))
            .collect();
        let s2 = RecordingSource::new(&signal, "s2", &log).with_motion(1, 1);
        let s5 = RecordingSource::new(&signal, "s5", &log).with_motion(9, -9);
        let sources: [&dyn HidSource; 6] = [&idle[0], &idle[1], &s2, &idle[2], &idle[3], &s5];
        let registry = HidSourceRegistry::new(&signal, &sources);
        let mut collector = HidCollector::new(&registry, RecordingSink::default());

        // Signal the lower priority source first
        s5.slot.notify();
        s2.slot.notify();
        assert_eq!(try_collect(&mut collector), Some(Ok(())));

        assert_eq!(*log.lock().unwrap(), vec!["s2", "s5"]);
        // Both signals are coalesced into one report, the last writer wins
        let reports = &collector.sink().reports;
        assert_eq!(reports.len(), 1);
        assert_eq!((reports[0].x_delta, reports[0].y_delta), (9, -9));
        assert_eq!(try_collect(&mut collector), None);
    }

    #[test]
    fn test_mask_change_alone_delivers_nothing() {
        let log = Mutex::new(Vec::new());
        let signal = HidSignal::new();
        let a = RecordingSource::new(&signal, "a", &log);
        let b = RecordingSource::new(&signal, "b", &log);
        let sources: [&dyn HidSource; 2] = [&a, &b];
        let registry = HidSourceRegistry::new(&signal, &sources);
        let mut collector = HidCollector::new(&registry, RecordingSink::default());

        registry.enable(1, false);
        assert_eq!(try_collect(&mut collector), None);
        registry.enable(1, true);
        assert_eq!(try_collect(&mut collector), None);
        assert!(collector.sink().reports.is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_source_event_is_kept() {
        let log = Mutex::new(Vec::new());
        let signal = HidSignal::new();
        let a = RecordingSource::new(&signal, "a", &log);
        let b = RecordingSource::new(&signal, "b", &log).with_motion(4, 4);
        let sources: [&dyn HidSource; 2] = [&a, &b];
        let registry = HidSourceRegistry::new(&signal, &sources);
        let mut collector = HidCollector::new(&registry, RecordingSink::default());

        b.slot.set_enabled(false);
        b.slot.notify();
        assert_eq!(try_collect(&mut collector), None);

        // Enabling the source wakes the collector with the kept event
        registry.enable(1, true);
        assert_eq!(try_collect(&mut collector), Some(Ok(())));
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_report_is_reset_between_cycles() {
        let log = Mutex::new(Vec::new());
        let signal = HidSignal::new();
        let motion = RecordingSource::new(&signal, "motion", &log).with_motion(100, -50);
        let idle = RecordingSource::new(&signal, "idle", &log);
        let sources: [&dyn HidSource; 2] = [&motion, &idle];
        let registry = HidSourceRegistry::new(&signal, &sources);
        let mut collector = HidCollector::new(&registry, RecordingSink::default());

        motion.slot.notify();
        assert_eq!(try_collect(&mut collector), Some(Ok(())));
        idle.slot.notify();
        assert_eq!(try_collect(&mut collector), Some(Ok(())));

        let reports = &collector.sink().reports;
        assert_eq!((reports[0].x_delta, reports[0].y_delta), (100, -50));
        assert!(reports[1].is_idle());
    }
}
