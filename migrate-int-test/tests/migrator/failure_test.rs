use migrate::errors::ErrorKind;
use migrate::migration::{MigrationEvent, MigrationEventListener, Migrator};
use migrate_int_test::test_util::{cleanup, create_test_context, recording_script, run_test};
use std::sync::{Arc, Mutex};

#[test]
fn test_failing_script_halts_the_move() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("4_broken.up.sh", "echo 'relation missing' >&2\nexit 1\n");
            ctx.write_change_file("5_after.up.sh", &recording_script());

            let err = ctx.migrator().up().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ExecutionFailed);
            assert!(err.message().contains("4_broken.up.sh"));
            assert!(err.message().contains("after 3 of 5"));
            let cause = err.cause().expect("the executor error should be kept");
            assert!(cause.message().contains("relation missing"));

            // completed units stay recorded, the failed and later ones do not
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3]);
            assert_eq!(ctx.effects(), vec!["1 up", "2 up", "3 up"]);
            assert_eq!(std::fs::read_to_string(ctx.journal_file())?, "1\n2\n3\n");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_fixed_script_resumes_where_it_stopped() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("4_broken.up.sh", "exit 2\n");
            assert!(ctx.migrator().up().is_err());

            ctx.write_change_file("4_broken.up.sh", &recording_script());
            let report = ctx.migrator().up()?;
            assert_eq!(report.len(), 1);
            assert_eq!(ctx.applied_versions()?, vec![1, 2, 3, 4]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failure_is_reported_to_listeners() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.write_change_file("2_add_email.down.sh", "exit 1\n");

            let events = Arc::new(Mutex::new(Vec::new()));
            let seen = events.clone();
            let migrator = Migrator::builder()
                .url(&ctx.registry(), &format!("bash:{}", ctx.dir().display()))
                .add_listener(MigrationEventListener::new(move |event: MigrationEvent| {
                    let tag = match &event {
                        MigrationEvent::Started(_) => "started",
                        MigrationEvent::Applied(_) => "applied",
                        MigrationEvent::Reverted(_) => "reverted",
                        MigrationEvent::Failed(_, _) => "failed",
                    };
                    seen.lock()
                        .unwrap()
                        .push(format!("{} {}", tag, event.file().file_name()));
                    Ok(())
                }))
                .open()?;

            migrator.migrate(2)?;
            let err = migrator.down().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ExecutionFailed);
            assert_eq!(
                *events.lock().unwrap(),
                vec![
                    "started 1_create_users.up.sh",
                    "applied 1_create_users.up.sh",
                    "started 2_add_email.up.sh",
                    "applied 2_add_email.up.sh",
                    "started 2_add_email.down.sh",
                    "failed 2_add_email.down.sh",
                ]
            );
            assert_eq!(migrator.versions()?.len(), 2);
            migrator.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_migrator_rejects_moves() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.migrator().close()?;
            assert!(ctx.migrator().is_closed());

            let err = ctx.migrator().up().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        cleanup,
    )
}
