use migrate::migration::{MigrationEvent, MigrationEventListener, Migrator, StopHandle};
use migrate_int_test::test_util::{cleanup, create_test_context, run_test};
use std::sync::{Arc, OnceLock};
use std::thread;

#[test]
fn test_stop_between_change_files() {
    run_test(
        create_test_context,
        |ctx| {
            let handle: Arc<OnceLock<StopHandle>> = Arc::new(OnceLock::new());
            let slot = handle.clone();
            let migrator = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .add_listener(MigrationEventListener::new(move |event: MigrationEvent| {
                    if let MigrationEvent::Applied(file) = &event {
                        if file.version().value() == 1 {
                            if let Some(stop) = slot.get() {
                                stop.stop();
                            }
                        }
                    }
                    Ok(())
                }))
                .open()?;
            let _ = handle.set(migrator.stop_handle());

            let report = migrator.up()?;
            assert!(report.cancelled);
            assert_eq!(report.len(), 1);
            assert_eq!(ctx.effects(), vec!["1 up"]);

            // the request was consumed, the next move runs to completion
            let report = migrator.up()?;
            assert!(!report.cancelled);
            assert_eq!(report.len(), 2);
            let versions: Vec<u64> = migrator.versions()?.into_iter().map(u64::from).collect();
            assert_eq!(versions, vec![1, 2, 3]);
            migrator.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_stop_from_another_thread_before_move() {
    run_test(
        create_test_context,
        |ctx| {
            let stop = ctx.migrator().stop_handle();
            thread::spawn(move || stop.stop())
                .join()
                .expect("stop thread panicked");

            let report = ctx.migrator().up()?;
            assert!(report.cancelled);
            assert!(report.is_empty());
            assert!(ctx.applied_versions()?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_moves_do_not_interleave() {
    run_test(
        create_test_context,
        |ctx| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let migrator = ctx.migrator();
                    thread::spawn(move || migrator.migrate(1).map(|report| report.len()))
                })
                .collect();

            let mut executed = 0;
            for worker in workers {
                executed += worker.join().expect("worker panicked")?;
            }

            // three units, so one of the four single steps finds nothing to do
            assert_eq!(executed, 3);
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3]);
            assert_eq!(ctx.effects(), vec!["1 up", "2 up", "3 up"]);
            Ok(())
        },
        cleanup,
    )
}
